//! Backup module identities shared by export, import and reporting.

use std::fmt::{Display, Formatter};

/// One independently imported/exported data group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupModule {
    Profile,
    FocusTracker,
    HabitTracker,
    ExpenseTracker,
    SubscriptionTracker,
    DailyPlanner,
    YearCalculator,
    BmiCalculator,
}

impl BackupModule {
    /// All modules in import dependency order.
    pub const ORDERED: [BackupModule; 8] = [
        BackupModule::Profile,
        BackupModule::FocusTracker,
        BackupModule::HabitTracker,
        BackupModule::ExpenseTracker,
        BackupModule::SubscriptionTracker,
        BackupModule::DailyPlanner,
        BackupModule::YearCalculator,
        BackupModule::BmiCalculator,
    ];

    /// Top-level envelope key of this module.
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::FocusTracker => "focusTracker",
            Self::HabitTracker => "habitTracker",
            Self::ExpenseTracker => "expenseTracker",
            Self::SubscriptionTracker => "subscriptionTracker",
            Self::DailyPlanner => "dailyPlanner",
            Self::YearCalculator => "yearCalculator",
            Self::BmiCalculator => "bmiCalculator",
        }
    }

    /// Human-readable label used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::FocusTracker => "Focus tracker",
            Self::HabitTracker => "Habit tracker",
            Self::ExpenseTracker => "Expense tracker",
            Self::SubscriptionTracker => "Subscriptions",
            Self::DailyPlanner => "Daily planner",
            Self::YearCalculator => "Year calculator",
            Self::BmiCalculator => "BMI calculator",
        }
    }
}

impl Display for BackupModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_key())
    }
}
