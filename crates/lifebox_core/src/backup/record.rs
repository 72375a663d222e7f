//! Portable records and the entity <-> record mapping.
//!
//! # Responsibility
//! - Define the flat, storage-id-free wire shape of every entity.
//! - Map entities to records 1:1 and back, enums by symbolic name.
//!
//! # Invariants
//! - `old_id` only relinks children inside one backup; it never becomes a
//!   storage id. Entities produced by `to_entity` carry `id = 0`.
//! - Enum fields stay strings on the wire so an unknown name fails the single
//!   record at import time instead of the whole envelope decode.

use crate::model::{
    BmiClassification, BmiRecord, CompletionType, DateCalculation, EntityId, Expense,
    ExpenseCategory, FocusCategory, FocusSession, Gender, Habit, HabitCompletion, HabitType,
    PlannerTask, Profile, Subscription, UnknownVariant,
};
use serde::{Deserialize, Serialize};

/// Entity/record pair handled by the mapper.
pub trait Portable: Sized {
    type Entity;

    fn from_entity(entity: &Self::Entity) -> Self;
    fn old_id(&self) -> EntityId;
    fn to_entity(&self) -> Result<Self::Entity, UnknownVariant>;

    /// First float field holding NaN or an infinity, if any. JSON has no
    /// encoding for those values.
    fn non_finite_field(&self) -> Option<&'static str> {
        None
    }
}

/// A record whose entity references a parent entity of another family.
pub trait Linked: Portable {
    /// Source-side id of the parent record.
    fn parent_old_id(&self) -> EntityId;
    /// Points an entity at its parent's destination id.
    fn relink(entity: &mut Self::Entity, new_parent_id: EntityId);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub old_id: EntityId,
    pub name: String,
    pub birth_date: Option<i64>,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Portable for ProfileRecord {
    type Entity = Profile;

    fn from_entity(profile: &Profile) -> Self {
        Self {
            old_id: profile.id,
            name: profile.name.clone(),
            birth_date: profile.birth_date,
            gender: profile.gender.as_name().to_string(),
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<Profile, UnknownVariant> {
        Ok(Profile {
            id: 0,
            name: self.name.clone(),
            birth_date: self.birth_date,
            gender: Gender::from_name(&self.gender)?,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite(&[
            ("profile.height_cm", self.height_cm),
            ("profile.weight_kg", self.weight_kg),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusCategoryRecord {
    pub old_id: EntityId,
    pub name: String,
    pub color: i64,
    pub icon: String,
    pub created_at: i64,
}

impl Portable for FocusCategoryRecord {
    type Entity = FocusCategory;

    fn from_entity(category: &FocusCategory) -> Self {
        Self {
            old_id: category.id,
            name: category.name.clone(),
            color: category.color,
            icon: category.icon.clone(),
            created_at: category.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<FocusCategory, UnknownVariant> {
        Ok(FocusCategory {
            id: 0,
            name: self.name.clone(),
            color: self.color,
            icon: self.icon.clone(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusSessionRecord {
    pub old_id: EntityId,
    pub category_id: EntityId,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_ms: i64,
    pub note: String,
}

impl Portable for FocusSessionRecord {
    type Entity = FocusSession;

    fn from_entity(session: &FocusSession) -> Self {
        Self {
            old_id: session.id,
            category_id: session.category_id,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_ms: session.duration_ms,
            note: session.note.clone(),
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<FocusSession, UnknownVariant> {
        Ok(FocusSession {
            id: 0,
            category_id: self.category_id,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_ms: self.duration_ms,
            note: self.note.clone(),
        })
    }
}

impl Linked for FocusSessionRecord {
    fn parent_old_id(&self) -> EntityId {
        self.category_id
    }

    fn relink(session: &mut FocusSession, new_parent_id: EntityId) {
        session.category_id = new_parent_id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitRecord {
    pub old_id: EntityId,
    pub name: String,
    pub description: String,
    pub habit_type: String,
    pub target_count: i32,
    pub color: i64,
    pub is_archived: bool,
    pub created_at: i64,
}

impl Portable for HabitRecord {
    type Entity = Habit;

    fn from_entity(habit: &Habit) -> Self {
        Self {
            old_id: habit.id,
            name: habit.name.clone(),
            description: habit.description.clone(),
            habit_type: habit.habit_type.as_name().to_string(),
            target_count: habit.target_count,
            color: habit.color,
            is_archived: habit.is_archived,
            created_at: habit.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<Habit, UnknownVariant> {
        Ok(Habit {
            id: 0,
            name: self.name.clone(),
            description: self.description.clone(),
            habit_type: HabitType::from_name(&self.habit_type)?,
            target_count: self.target_count,
            color: self.color,
            is_archived: self.is_archived,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitCompletionRecord {
    pub old_id: EntityId,
    pub habit_id: EntityId,
    pub date: i64,
    pub completion_type: String,
    pub value: i32,
}

impl Portable for HabitCompletionRecord {
    type Entity = HabitCompletion;

    fn from_entity(completion: &HabitCompletion) -> Self {
        Self {
            old_id: completion.id,
            habit_id: completion.habit_id,
            date: completion.date,
            completion_type: completion.completion_type.as_name().to_string(),
            value: completion.value,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<HabitCompletion, UnknownVariant> {
        Ok(HabitCompletion {
            id: 0,
            habit_id: self.habit_id,
            date: self.date,
            completion_type: CompletionType::from_name(&self.completion_type)?,
            value: self.value,
        })
    }
}

impl Linked for HabitCompletionRecord {
    fn parent_old_id(&self) -> EntityId {
        self.habit_id
    }

    fn relink(completion: &mut HabitCompletion, new_parent_id: EntityId) {
        completion.habit_id = new_parent_id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseCategoryRecord {
    pub old_id: EntityId,
    pub name: String,
    pub color: i64,
    pub icon: String,
    pub monthly_budget: f64,
}

impl Portable for ExpenseCategoryRecord {
    type Entity = ExpenseCategory;

    fn from_entity(category: &ExpenseCategory) -> Self {
        Self {
            old_id: category.id,
            name: category.name.clone(),
            color: category.color,
            icon: category.icon.clone(),
            monthly_budget: category.monthly_budget,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<ExpenseCategory, UnknownVariant> {
        Ok(ExpenseCategory {
            id: 0,
            name: self.name.clone(),
            color: self.color,
            icon: self.icon.clone(),
            monthly_budget: self.monthly_budget,
        })
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite(&[("expense_categories.monthly_budget", self.monthly_budget)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseRecord {
    pub old_id: EntityId,
    pub category_id: EntityId,
    pub amount: f64,
    pub description: String,
    pub date: i64,
    pub created_at: i64,
}

impl Portable for ExpenseRecord {
    type Entity = Expense;

    fn from_entity(expense: &Expense) -> Self {
        Self {
            old_id: expense.id,
            category_id: expense.category_id,
            amount: expense.amount,
            description: expense.description.clone(),
            date: expense.date,
            created_at: expense.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<Expense, UnknownVariant> {
        Ok(Expense {
            id: 0,
            category_id: self.category_id,
            amount: self.amount,
            description: self.description.clone(),
            date: self.date,
            created_at: self.created_at,
        })
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite(&[("expenses.amount", self.amount)])
    }
}

impl Linked for ExpenseRecord {
    fn parent_old_id(&self) -> EntityId {
        self.category_id
    }

    fn relink(expense: &mut Expense, new_parent_id: EntityId) {
        expense.category_id = new_parent_id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionRecord {
    pub old_id: EntityId,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle_days: i32,
    pub next_billing_date: i64,
    pub is_active: bool,
    pub note: String,
    pub created_at: i64,
}

impl Portable for SubscriptionRecord {
    type Entity = Subscription;

    fn from_entity(subscription: &Subscription) -> Self {
        Self {
            old_id: subscription.id,
            name: subscription.name.clone(),
            price: subscription.price,
            currency: subscription.currency.clone(),
            billing_cycle_days: subscription.billing_cycle_days,
            next_billing_date: subscription.next_billing_date,
            is_active: subscription.is_active,
            note: subscription.note.clone(),
            created_at: subscription.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<Subscription, UnknownVariant> {
        Ok(Subscription {
            id: 0,
            name: self.name.clone(),
            price: self.price,
            currency: self.currency.clone(),
            billing_cycle_days: self.billing_cycle_days,
            next_billing_date: self.next_billing_date,
            is_active: self.is_active,
            note: self.note.clone(),
            created_at: self.created_at,
        })
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite(&[("subscriptions.price", self.price)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    pub old_id: EntityId,
    pub title: String,
    pub description: String,
    pub date: i64,
    pub priority: i32,
    pub is_completed: bool,
    pub created_at: i64,
}

impl Portable for TaskRecord {
    type Entity = PlannerTask;

    fn from_entity(task: &PlannerTask) -> Self {
        Self {
            old_id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            date: task.date,
            priority: task.priority,
            is_completed: task.is_completed,
            created_at: task.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<PlannerTask, UnknownVariant> {
        Ok(PlannerTask {
            id: 0,
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            priority: self.priority,
            is_completed: self.is_completed,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateCalculationRecord {
    pub old_id: EntityId,
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    pub created_at: i64,
}

impl Portable for DateCalculationRecord {
    type Entity = DateCalculation;

    fn from_entity(calculation: &DateCalculation) -> Self {
        Self {
            old_id: calculation.id,
            title: calculation.title.clone(),
            start_date: calculation.start_date,
            end_date: calculation.end_date,
            created_at: calculation.created_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<DateCalculation, UnknownVariant> {
        Ok(DateCalculation {
            id: 0,
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BmiRecordRecord {
    pub old_id: EntityId,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub classification: String,
    pub recorded_at: i64,
}

impl Portable for BmiRecordRecord {
    type Entity = BmiRecord;

    fn from_entity(record: &BmiRecord) -> Self {
        Self {
            old_id: record.id,
            height_cm: record.height_cm,
            weight_kg: record.weight_kg,
            bmi: record.bmi,
            classification: record.classification.as_name().to_string(),
            recorded_at: record.recorded_at,
        }
    }

    fn old_id(&self) -> EntityId {
        self.old_id
    }

    fn to_entity(&self) -> Result<BmiRecord, UnknownVariant> {
        Ok(BmiRecord {
            id: 0,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bmi: self.bmi,
            classification: BmiClassification::from_name(&self.classification)?,
            recorded_at: self.recorded_at,
        })
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite(&[
            ("bmi_records.height_cm", self.height_cm),
            ("bmi_records.weight_kg", self.weight_kg),
            ("bmi_records.bmi", self.bmi),
        ])
    }
}

/// Maps every entity of a module to its record.
pub fn to_records<R: Portable>(entities: &[R::Entity]) -> Vec<R> {
    entities.iter().map(R::from_entity).collect()
}

fn first_non_finite(fields: &[(&'static str, f64)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::{
        BmiRecordRecord, HabitCompletionRecord, HabitRecord, Linked, Portable, ProfileRecord,
    };
    use crate::model::{CompletionType, Gender, Habit, HabitCompletion, HabitType, Profile};

    #[test]
    fn habit_maps_enum_by_symbolic_name() {
        let habit = Habit {
            id: 7,
            name: "Read".to_string(),
            description: "20 pages".to_string(),
            habit_type: HabitType::Countable,
            target_count: 20,
            color: 0xFF00_AA00,
            is_archived: false,
            created_at: 1_700_000_000_000,
        };

        let record = HabitRecord::from_entity(&habit);
        assert_eq!(record.old_id, 7);
        assert_eq!(record.habit_type, "COUNTABLE");

        let restored = record.to_entity().unwrap();
        assert_eq!(restored.id, 0);
        assert_eq!(restored.habit_type, HabitType::Countable);
        assert_eq!(restored.name, habit.name);
    }

    #[test]
    fn unknown_enum_name_fails_only_the_record() {
        let record = ProfileRecord {
            gender: "UNSPECIFIED".to_string(),
            ..ProfileRecord::default()
        };
        let err = record.to_entity().unwrap_err();
        assert_eq!(err.kind, "Gender");
        assert_eq!(err.value, "UNSPECIFIED");
    }

    #[test]
    fn relink_rewrites_parent_reference() {
        let completion = HabitCompletion {
            id: 3,
            habit_id: 41,
            date: 0,
            completion_type: CompletionType::Skipped,
            value: 0,
        };
        let record = HabitCompletionRecord::from_entity(&completion);
        assert_eq!(record.parent_old_id(), 41);

        let mut entity = record.to_entity().unwrap();
        HabitCompletionRecord::relink(&mut entity, 2);
        assert_eq!(entity.habit_id, 2);
    }

    #[test]
    fn profile_record_keeps_optional_birth_date() {
        let profile = Profile {
            id: 1,
            name: "Sam".to_string(),
            birth_date: None,
            gender: Gender::Other,
            height_cm: 170.0,
            weight_kg: 65.5,
            created_at: 10,
            updated_at: 20,
        };
        let record = ProfileRecord::from_entity(&profile);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["birthDate"].is_null());
        assert_eq!(json["gender"], "OTHER");
        assert_eq!(json["heightCm"], 170.0);
    }

    #[test]
    fn non_finite_field_names_the_offending_column() {
        let record = BmiRecordRecord {
            height_cm: 0.0,
            weight_kg: 70.0,
            bmi: f64::INFINITY,
            ..BmiRecordRecord::default()
        };
        assert_eq!(record.non_finite_field(), Some("bmi_records.bmi"));

        let profile = ProfileRecord {
            weight_kg: f64::NAN,
            ..ProfileRecord::default()
        };
        assert_eq!(profile.non_finite_field(), Some("profile.weight_kg"));
        assert_eq!(HabitRecord::default().non_finite_field(), None);
    }
}
