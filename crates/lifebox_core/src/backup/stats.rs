//! Import statistics and the human-readable summary.
//!
//! # Invariants
//! - `ImportStats::total` is derived from per-module outcomes, never stored.
//! - A failed module contributes zero records even if some rows were written
//!   before the failure.

use super::module::BackupModule;

/// Result of importing one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// The module ran to completion.
    Imported {
        /// Records written (parents and children).
        records: usize,
        /// Records rejected for carrying an unknown enum name.
        skipped: usize,
        /// Children dropped because their parent was not in the backup.
        orphaned: usize,
    },
    /// A storage failure stopped the module.
    Failed { reason: String },
}

impl Default for ModuleOutcome {
    fn default() -> Self {
        Self::Imported {
            records: 0,
            skipped: 0,
            orphaned: 0,
        }
    }
}

impl ModuleOutcome {
    /// Records this module contributes to the import total.
    pub fn records(&self) -> usize {
        match self {
            Self::Imported { records, .. } => *records,
            Self::Failed { .. } => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Failure reason, when the module failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason.as_str()),
            Self::Imported { .. } => None,
        }
    }
}

/// Per-module outcomes of one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub profile: ModuleOutcome,
    /// Focus categories plus sessions.
    pub focus_tracker: ModuleOutcome,
    /// Habits plus completions.
    pub habit_tracker: ModuleOutcome,
    /// Expense categories plus expenses.
    pub expense_tracker: ModuleOutcome,
    pub subscriptions: ModuleOutcome,
    pub tasks: ModuleOutcome,
    pub date_calculations: ModuleOutcome,
    pub bmi_records: ModuleOutcome,
}

impl ImportStats {
    pub fn profile_imported(&self) -> bool {
        self.profile.records() > 0
    }

    pub fn outcome(&self, module: BackupModule) -> &ModuleOutcome {
        match module {
            BackupModule::Profile => &self.profile,
            BackupModule::FocusTracker => &self.focus_tracker,
            BackupModule::HabitTracker => &self.habit_tracker,
            BackupModule::ExpenseTracker => &self.expense_tracker,
            BackupModule::SubscriptionTracker => &self.subscriptions,
            BackupModule::DailyPlanner => &self.tasks,
            BackupModule::YearCalculator => &self.date_calculations,
            BackupModule::BmiCalculator => &self.bmi_records,
        }
    }

    pub(crate) fn outcome_mut(&mut self, module: BackupModule) -> &mut ModuleOutcome {
        match module {
            BackupModule::Profile => &mut self.profile,
            BackupModule::FocusTracker => &mut self.focus_tracker,
            BackupModule::HabitTracker => &mut self.habit_tracker,
            BackupModule::ExpenseTracker => &mut self.expense_tracker,
            BackupModule::SubscriptionTracker => &mut self.subscriptions,
            BackupModule::DailyPlanner => &mut self.tasks,
            BackupModule::YearCalculator => &mut self.date_calculations,
            BackupModule::BmiCalculator => &mut self.bmi_records,
        }
    }

    /// Records imported for one module.
    pub fn count(&self, module: BackupModule) -> usize {
        self.outcome(module).records()
    }

    /// Sum of every module's count; the profile counts as one record.
    pub fn total(&self) -> usize {
        BackupModule::ORDERED
            .iter()
            .map(|module| self.count(*module))
            .sum()
    }

    /// Modules that failed, with their reasons.
    pub fn failures(&self) -> Vec<(BackupModule, &str)> {
        BackupModule::ORDERED
            .iter()
            .filter_map(|module| {
                self.outcome(*module)
                    .failure()
                    .map(|reason| (*module, reason))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Lists modules that contributed records, or reports that none did.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No data found in backup.".to_string();
        }

        let mut summary = format!("Imported {} records:", self.total());
        for module in BackupModule::ORDERED {
            let count = self.count(module);
            if count == 0 {
                continue;
            }
            if module == BackupModule::Profile {
                summary.push_str("\n- Profile");
            } else {
                summary.push_str(&format!("\n- {}: {}", module.label(), count));
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportStats, ModuleOutcome};
    use crate::backup::module::BackupModule;

    fn imported(records: usize) -> ModuleOutcome {
        ModuleOutcome::Imported {
            records,
            skipped: 0,
            orphaned: 0,
        }
    }

    #[test]
    fn total_is_sum_of_module_counts() {
        let stats = ImportStats {
            profile: imported(1),
            focus_tracker: imported(5),
            habit_tracker: ModuleOutcome::Failed {
                reason: "disk I/O error".to_string(),
            },
            expense_tracker: imported(3),
            bmi_records: imported(2),
            ..ImportStats::default()
        };

        let sum: usize = BackupModule::ORDERED
            .iter()
            .map(|module| stats.count(*module))
            .sum();
        assert_eq!(stats.total(), sum);
        assert_eq!(stats.total(), 11);
        assert!(stats.profile_imported());
    }

    #[test]
    fn summary_lists_only_contributing_modules() {
        let stats = ImportStats {
            profile: imported(1),
            focus_tracker: imported(5),
            tasks: imported(2),
            ..ImportStats::default()
        };

        assert_eq!(
            stats.summary(),
            "Imported 8 records:\n- Profile\n- Focus tracker: 5\n- Daily planner: 2"
        );
    }

    #[test]
    fn summary_reports_nothing_found_when_empty() {
        assert_eq!(ImportStats::default().summary(), "No data found in backup.");
    }

    #[test]
    fn failures_are_distinguishable_from_empty_modules() {
        let stats = ImportStats {
            habit_tracker: ModuleOutcome::Failed {
                reason: "constraint failed".to_string(),
            },
            ..ImportStats::default()
        };

        assert_eq!(stats.count(BackupModule::HabitTracker), 0);
        assert_eq!(stats.count(BackupModule::DailyPlanner), 0);
        assert!(stats.habit_tracker.is_failed());
        assert!(!stats.tasks.is_failed());
        assert_eq!(
            stats.failures(),
            vec![(BackupModule::HabitTracker, "constraint failed")]
        );
    }
}
