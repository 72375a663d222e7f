//! User profile entity.
//!
//! # Invariants
//! - At most one profile row exists in a store.

use super::{symbolic_enum, EntityId};

symbolic_enum! {
    /// Self-reported gender used by the BMI calculator.
    Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: EntityId,
    pub name: String,
    /// Epoch milliseconds; `None` when the user skipped it.
    pub birth_date: Option<i64>,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub created_at: i64,
    pub updated_at: i64,
}
