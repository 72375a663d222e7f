//! Versioned backup envelope and its JSON codec.
//!
//! # Responsibility
//! - Define the top-level wire document and its module sections.
//! - Encode/decode envelopes to/from bytes.
//!
//! # Invariants
//! - Encoding always emits every key: empty arrays and `null` profile are
//!   written explicitly.
//! - Decoding ignores unknown keys and never checks `version`; the import
//!   orchestrator owns the version gate.
//! - `version` is the only key a decodable document must carry.

use super::module::BackupModule;
use super::record::{
    BmiRecordRecord, DateCalculationRecord, ExpenseCategoryRecord, ExpenseRecord,
    FocusCategoryRecord, FocusSessionRecord, HabitCompletionRecord, HabitRecord, ProfileRecord,
    SubscriptionRecord, TaskRecord,
};
use super::{BackupError, BackupResult};
use serde::{Deserialize, Serialize};

/// Backup format contract number understood by this build.
pub const BACKUP_FORMAT_VERSION: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub version: i64,
    /// Export time, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub profile: Option<ProfileRecord>,
    #[serde(default)]
    pub focus_tracker: FocusTrackerSection,
    #[serde(default)]
    pub habit_tracker: HabitTrackerSection,
    #[serde(default)]
    pub expense_tracker: ExpenseTrackerSection,
    #[serde(default)]
    pub subscription_tracker: SubscriptionTrackerSection,
    #[serde(default)]
    pub daily_planner: DailyPlannerSection,
    #[serde(default)]
    pub year_calculator: YearCalculatorSection,
    #[serde(default)]
    pub bmi_calculator: BmiCalculatorSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTrackerSection {
    pub categories: Vec<FocusCategoryRecord>,
    pub sessions: Vec<FocusSessionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitTrackerSection {
    pub habits: Vec<HabitRecord>,
    pub completions: Vec<HabitCompletionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseTrackerSection {
    pub categories: Vec<ExpenseCategoryRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionTrackerSection {
    pub subscriptions: Vec<SubscriptionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPlannerSection {
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearCalculatorSection {
    pub calculations: Vec<DateCalculationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmiCalculatorSection {
    pub calculations: Vec<BmiRecordRecord>,
}

impl Envelope {
    /// Creates an empty envelope stamped with the supported version.
    pub fn empty(timestamp: i64) -> Self {
        Self {
            version: BACKUP_FORMAT_VERSION,
            timestamp,
            ..Self::default()
        }
    }

    /// Whether this build can import the envelope.
    pub fn is_supported_version(&self) -> bool {
        self.version == BACKUP_FORMAT_VERSION
    }

    /// Record count per module, in import order.
    pub fn section_counts(&self) -> Vec<(BackupModule, usize)> {
        BackupModule::ORDERED
            .iter()
            .map(|module| (*module, self.section_count(*module)))
            .collect()
    }

    /// Number of records a module section carries (parents and children).
    pub fn section_count(&self, module: BackupModule) -> usize {
        match module {
            BackupModule::Profile => usize::from(self.profile.is_some()),
            BackupModule::FocusTracker => {
                self.focus_tracker.categories.len() + self.focus_tracker.sessions.len()
            }
            BackupModule::HabitTracker => {
                self.habit_tracker.habits.len() + self.habit_tracker.completions.len()
            }
            BackupModule::ExpenseTracker => {
                self.expense_tracker.categories.len() + self.expense_tracker.expenses.len()
            }
            BackupModule::SubscriptionTracker => self.subscription_tracker.subscriptions.len(),
            BackupModule::DailyPlanner => self.daily_planner.tasks.len(),
            BackupModule::YearCalculator => self.year_calculator.calculations.len(),
            BackupModule::BmiCalculator => self.bmi_calculator.calculations.len(),
        }
    }

    /// Total records carried, profile counted as one.
    pub fn source_record_count(&self) -> usize {
        BackupModule::ORDERED
            .iter()
            .map(|module| self.section_count(*module))
            .sum()
    }
}

/// Serializes an envelope to UTF-8 JSON bytes.
pub fn encode(envelope: &Envelope, pretty: bool) -> BackupResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(envelope)
    } else {
        serde_json::to_vec(envelope)
    }
    .map_err(BackupError::Format)?;
    Ok(bytes)
}

/// Parses an envelope from JSON bytes.
///
/// Succeeds for any structurally valid document, whatever its `version`.
pub fn decode(bytes: &[u8]) -> BackupResult<Envelope> {
    serde_json::from_slice(bytes).map_err(BackupError::Format)
}
