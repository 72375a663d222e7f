//! Persistence gateway contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the per-entity CRUD contract the backup engine talks to.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `insert` ignores the entity's `id` and returns the store-assigned one.
//! - Read paths reject invalid persisted state (e.g. unknown enum names)
//!   instead of masking it.

use crate::db::DbError;
use crate::model::{
    BmiRecord, DateCalculation, EntityId, Expense, ExpenseCategory, FocusCategory, FocusSession,
    Habit, HabitCompletion, PlannerTask, Profile, Subscription,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod bmi_repo;
mod calendar_repo;
mod expense_repo;
mod focus_repo;
mod habit_repo;
mod profile_repo;
mod sqlite_store;

pub use sqlite_store::SqliteStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for gateway operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract for one entity type.
pub trait Gateway<E> {
    fn get_all(&self) -> RepoResult<Vec<E>>;
    fn insert(&self, entity: &E) -> RepoResult<EntityId>;
    fn update(&self, entity: &E) -> RepoResult<()>;
    fn delete(&self, entity: &E) -> RepoResult<()>;
    fn delete_all(&self) -> RepoResult<()>;
}

/// A store exposing a gateway for every module entity.
///
/// Implemented automatically for any type providing all gateways.
pub trait LifeStore:
    Gateway<Profile>
    + Gateway<FocusCategory>
    + Gateway<FocusSession>
    + Gateway<Habit>
    + Gateway<HabitCompletion>
    + Gateway<ExpenseCategory>
    + Gateway<Expense>
    + Gateway<Subscription>
    + Gateway<PlannerTask>
    + Gateway<DateCalculation>
    + Gateway<BmiRecord>
{
}

impl<T> LifeStore for T where
    T: Gateway<Profile>
        + Gateway<FocusCategory>
        + Gateway<FocusSession>
        + Gateway<Habit>
        + Gateway<HabitCompletion>
        + Gateway<ExpenseCategory>
        + Gateway<Expense>
        + Gateway<Subscription>
        + Gateway<PlannerTask>
        + Gateway<DateCalculation>
        + Gateway<BmiRecord>
{
}
