#![allow(dead_code)]

use lifebox_core::model::{
    BmiClassification, BmiRecord, CompletionType, DateCalculation, Expense, ExpenseCategory,
    FocusCategory, FocusSession, Gender, Habit, HabitCompletion, HabitType, PlannerTask, Profile,
    Subscription,
};
use lifebox_core::{open_db_in_memory, Gateway, SqliteStore};
use rusqlite::Connection;

pub const DAY_MS: i64 = 86_400_000;
pub const BASE_MS: i64 = 1_700_000_000_000;

/// Records inserted by `seed_every_module`, profile counted as one.
pub const SEEDED_RECORDS: usize = 19;

pub fn fresh_conn() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn profile(name: &str) -> Profile {
    Profile {
        id: 0,
        name: name.to_string(),
        birth_date: Some(BASE_MS - 30 * 365 * DAY_MS),
        gender: Gender::Female,
        height_cm: 168.0,
        weight_kg: 61.5,
        created_at: BASE_MS,
        updated_at: BASE_MS,
    }
}

pub fn focus_category(name: &str) -> FocusCategory {
    FocusCategory {
        id: 0,
        name: name.to_string(),
        color: 0xFF3366,
        icon: "timer".to_string(),
        created_at: BASE_MS,
    }
}

pub fn focus_session(category_id: i64, offset_days: i64) -> FocusSession {
    let start_time = BASE_MS + offset_days * DAY_MS;
    FocusSession {
        id: 0,
        category_id,
        start_time,
        end_time: start_time + 25 * 60_000,
        duration_ms: 25 * 60_000,
        note: String::new(),
    }
}

pub fn habit(name: &str, habit_type: HabitType) -> Habit {
    Habit {
        id: 0,
        name: name.to_string(),
        description: String::new(),
        habit_type,
        target_count: 1,
        color: 0x22AA66,
        is_archived: false,
        created_at: BASE_MS,
    }
}

pub fn completion(habit_id: i64, offset_days: i64) -> HabitCompletion {
    HabitCompletion {
        id: 0,
        habit_id,
        date: BASE_MS + offset_days * DAY_MS,
        completion_type: CompletionType::Completed,
        value: 1,
    }
}

pub fn expense_category(name: &str) -> ExpenseCategory {
    ExpenseCategory {
        id: 0,
        name: name.to_string(),
        color: 0x3366FF,
        icon: "cart".to_string(),
        monthly_budget: 400.0,
    }
}

pub fn expense(category_id: i64, amount: f64) -> Expense {
    Expense {
        id: 0,
        category_id,
        amount,
        description: "groceries".to_string(),
        date: BASE_MS,
        created_at: BASE_MS,
    }
}

/// Inserts a small but complete data set touching every module.
pub fn seed_every_module(store: &SqliteStore<'_>) {
    store.insert(&profile("Ada")).unwrap();

    let deep = store.insert(&focus_category("Deep work")).unwrap();
    let reading = store.insert(&focus_category("Reading")).unwrap();
    store.insert(&focus_session(deep, 0)).unwrap();
    store.insert(&focus_session(deep, 1)).unwrap();
    store.insert(&focus_session(reading, 2)).unwrap();

    let water = store.insert(&habit("Water", HabitType::Countable)).unwrap();
    let walk = store.insert(&habit("Walk", HabitType::Boolean)).unwrap();
    store.insert(&completion(water, 0)).unwrap();
    store.insert(&completion(water, 1)).unwrap();
    store.insert(&completion(walk, 0)).unwrap();

    let food = store.insert(&expense_category("Food")).unwrap();
    store.insert(&expense(food, 12.5)).unwrap();
    store.insert(&expense(food, 40.0)).unwrap();

    store
        .insert(&Subscription {
            id: 0,
            name: "Music".to_string(),
            price: 9.99,
            currency: "EUR".to_string(),
            billing_cycle_days: 30,
            next_billing_date: BASE_MS + 10 * DAY_MS,
            is_active: true,
            note: String::new(),
            created_at: BASE_MS,
        })
        .unwrap();

    for (title, priority) in [("Plan week", 2), ("Call bank", 1)] {
        store
            .insert(&PlannerTask {
                id: 0,
                title: title.to_string(),
                description: String::new(),
                date: BASE_MS,
                priority,
                is_completed: false,
                created_at: BASE_MS,
            })
            .unwrap();
    }

    store
        .insert(&DateCalculation {
            id: 0,
            title: "Until vacation".to_string(),
            start_date: BASE_MS,
            end_date: BASE_MS + 45 * DAY_MS,
            created_at: BASE_MS,
        })
        .unwrap();

    store
        .insert(&BmiRecord {
            id: 0,
            height_cm: 168.0,
            weight_kg: 61.5,
            bmi: 21.8,
            classification: BmiClassification::Normal,
            recorded_at: BASE_MS,
        })
        .unwrap();
}

pub fn count<E>(store: &SqliteStore<'_>) -> usize
where
    for<'a> SqliteStore<'a>: Gateway<E>,
{
    Gateway::<E>::get_all(store).unwrap().len()
}
