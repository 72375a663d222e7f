//! Live domain entities for every Lifebox module.
//!
//! # Responsibility
//! - Define the entity shapes persisted by the store.
//! - Define enum fields with stable symbolic names.
//!
//! # Invariants
//! - `id` is assigned by the store on insert; `0` means "not yet persisted".
//! - Symbolic enum names never change once released, even if variants are
//!   reordered.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bmi;
pub mod calendar;
pub mod expense;
pub mod focus;
pub mod habit;
pub mod profile;

pub use bmi::{BmiClassification, BmiRecord};
pub use calendar::{DateCalculation, PlannerTask};
pub use expense::{Expense, ExpenseCategory, Subscription};
pub use focus::{FocusCategory, FocusSession};
pub use habit::{CompletionType, Habit, HabitCompletion, HabitType};
pub use profile::{Gender, Profile};

/// Storage identifier assigned by the store.
pub type EntityId = i64;

/// A symbolic enum name that maps to no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Enum family, e.g. `HabitType`.
    pub kind: &'static str,
    /// The offending symbolic name.
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} variant `{}`", self.kind, self.value)
    }
}

impl Error for UnknownVariant {}

/// Generates a fieldless enum with an explicit name<->variant mapping.
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $symbol:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable symbolic name used on the wire and in storage.
            pub fn as_name(self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }

            /// Resolves a symbolic name back to its variant.
            pub fn from_name(value: &str) -> Result<Self, $crate::model::UnknownVariant> {
                match value {
                    $($symbol => Ok($name::$variant),)+
                    other => Err($crate::model::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_name())
            }
        }
    };
}

pub(crate) use symbolic_enum;
