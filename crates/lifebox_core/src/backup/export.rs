//! Snapshot builder: store -> envelope.
//!
//! # Invariants
//! - Each module is read and mapped on its own; a failing module becomes an
//!   empty section and is listed in `Snapshot::degraded`.
//! - A module holding a NaN or infinite float is degraded too, so every
//!   written envelope decodes.
//! - Building a snapshot never fails as a whole.

use super::envelope::{
    encode, BmiCalculatorSection, DailyPlannerSection, Envelope, ExpenseTrackerSection,
    FocusTrackerSection, HabitTrackerSection, SubscriptionTrackerSection, YearCalculatorSection,
};
use super::module::BackupModule;
use super::record::{to_records, Portable, ProfileRecord};
use super::{now_millis, BackupResult};
use crate::model::{
    BmiRecord, DateCalculation, Expense, ExpenseCategory, FocusCategory, FocusSession, Habit,
    HabitCompletion, PlannerTask, Profile, Subscription,
};
use crate::repo::{Gateway, LifeStore, RepoError, RepoResult};
use log::{info, warn};
use std::io::Write;
use std::time::Instant;

/// A module section that was exported empty because reading it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub module: BackupModule,
    pub reason: String,
}

/// Envelope built from a store plus the sections that degraded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub envelope: Envelope,
    pub degraded: Vec<SectionFailure>,
}

impl Snapshot {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}

/// Reads every module through its gateway and maps it to records.
pub fn build_snapshot<S: LifeStore + ?Sized>(store: &S) -> Snapshot {
    let started_at = Instant::now();
    let mut degraded = Vec::new();
    let mut envelope = Envelope::empty(now_millis());

    envelope.profile = capture(BackupModule::Profile, &mut degraded, || {
        let profiles = Gateway::<Profile>::get_all(store)?;
        let records = export_records::<ProfileRecord>(&profiles[..profiles.len().min(1)])?;
        Ok(records.into_iter().next())
    });

    envelope.focus_tracker = capture(BackupModule::FocusTracker, &mut degraded, || {
        Ok(FocusTrackerSection {
            categories: export_records(&Gateway::<FocusCategory>::get_all(store)?)?,
            sessions: export_records(&Gateway::<FocusSession>::get_all(store)?)?,
        })
    });

    envelope.habit_tracker = capture(BackupModule::HabitTracker, &mut degraded, || {
        Ok(HabitTrackerSection {
            habits: export_records(&Gateway::<Habit>::get_all(store)?)?,
            completions: export_records(&Gateway::<HabitCompletion>::get_all(store)?)?,
        })
    });

    envelope.expense_tracker = capture(BackupModule::ExpenseTracker, &mut degraded, || {
        Ok(ExpenseTrackerSection {
            categories: export_records(&Gateway::<ExpenseCategory>::get_all(store)?)?,
            expenses: export_records(&Gateway::<Expense>::get_all(store)?)?,
        })
    });

    envelope.subscription_tracker =
        capture(BackupModule::SubscriptionTracker, &mut degraded, || {
            Ok(SubscriptionTrackerSection {
                subscriptions: export_records(&Gateway::<Subscription>::get_all(store)?)?,
            })
        });

    envelope.daily_planner = capture(BackupModule::DailyPlanner, &mut degraded, || {
        Ok(DailyPlannerSection {
            tasks: export_records(&Gateway::<PlannerTask>::get_all(store)?)?,
        })
    });

    envelope.year_calculator = capture(BackupModule::YearCalculator, &mut degraded, || {
        Ok(YearCalculatorSection {
            calculations: export_records(&Gateway::<DateCalculation>::get_all(store)?)?,
        })
    });

    envelope.bmi_calculator = capture(BackupModule::BmiCalculator, &mut degraded, || {
        Ok(BmiCalculatorSection {
            calculations: export_records(&Gateway::<BmiRecord>::get_all(store)?)?,
        })
    });

    info!(
        "event=backup_snapshot module=backup status=ok records={} degraded={} duration_ms={}",
        envelope.source_record_count(),
        degraded.len(),
        started_at.elapsed().as_millis()
    );

    Snapshot { envelope, degraded }
}

/// Builds a snapshot and writes the encoded envelope to `writer`.
///
/// Only a failing writer fails the call; degraded sections are reported on
/// the returned snapshot.
pub fn export_to_writer<S, W>(store: &S, writer: &mut W, pretty: bool) -> BackupResult<Snapshot>
where
    S: LifeStore + ?Sized,
    W: Write + ?Sized,
{
    let snapshot = build_snapshot(store);
    let bytes = encode(&snapshot.envelope, pretty)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(snapshot)
}

/// Maps a module's entities to records, rejecting values JSON cannot carry.
fn export_records<R: Portable>(entities: &[R::Entity]) -> RepoResult<Vec<R>> {
    let records = to_records::<R>(entities);
    if let Some((record, field)) = records
        .iter()
        .find_map(|record| record.non_finite_field().map(|field| (record, field)))
    {
        return Err(RepoError::InvalidData(format!(
            "non-finite value in {field} (id {})",
            record.old_id()
        )));
    }
    Ok(records)
}

fn capture<T, F>(module: BackupModule, degraded: &mut Vec<SectionFailure>, read: F) -> T
where
    T: Default,
    F: FnOnce() -> RepoResult<T>,
{
    match read() {
        Ok(section) => section,
        Err(err) => {
            warn!(
                "event=backup_snapshot_section module=backup status=degraded section={} error={}",
                module, err
            );
            degraded.push(SectionFailure {
                module,
                reason: err.to_string(),
            });
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_snapshot, export_to_writer};
    use crate::backup::envelope::decode;
    use crate::backup::module::BackupModule;
    use crate::db::open_db_in_memory;
    use crate::model::{BmiClassification, BmiRecord, FocusCategory, FocusSession};
    use crate::repo::{Gateway, SqliteStore};
    use std::io::{self, Write};

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn seed_focus(store: &SqliteStore<'_>) -> i64 {
        let category_id = store
            .insert(&FocusCategory {
                id: 0,
                name: "Study".to_string(),
                color: 1,
                icon: "book".to_string(),
                created_at: 100,
            })
            .unwrap();
        store
            .insert(&FocusSession {
                id: 0,
                category_id,
                start_time: 1_000,
                end_time: 2_000,
                duration_ms: 1_000,
                note: String::new(),
            })
            .unwrap();
        category_id
    }

    #[test]
    fn snapshot_carries_source_ids_as_old_ids() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let category_id = seed_focus(&store);

        let snapshot = build_snapshot(&store);
        assert!(snapshot.is_complete());
        let focus = &snapshot.envelope.focus_tracker;
        assert_eq!(focus.categories[0].old_id, category_id);
        assert_eq!(focus.sessions[0].category_id, category_id);
        assert!(snapshot.envelope.profile.is_none());
    }

    #[test]
    fn failing_module_degrades_to_empty_section() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        seed_focus(&store);
        conn.execute_batch("DROP TABLE habit_completions; DROP TABLE habits;")
            .unwrap();

        let snapshot = build_snapshot(&store);
        assert_eq!(snapshot.degraded.len(), 1);
        assert_eq!(snapshot.degraded[0].module, BackupModule::HabitTracker);
        assert!(snapshot.envelope.habit_tracker.habits.is_empty());
        assert_eq!(snapshot.envelope.focus_tracker.categories.len(), 1);
    }

    #[test]
    fn export_writes_decodable_bytes() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        seed_focus(&store);

        let mut buffer = Vec::new();
        export_to_writer(&store, &mut buffer, false).unwrap();

        let envelope = decode(&buffer).unwrap();
        assert_eq!(envelope.source_record_count(), 2);
    }

    #[test]
    fn unwritable_sink_is_an_io_failure() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let err = export_to_writer(&store, &mut BrokenSink, true).unwrap_err();
        assert_eq!(err.code(), "io_failure");
    }

    #[test]
    fn non_finite_float_degrades_only_its_module() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        seed_focus(&store);
        store
            .insert(&BmiRecord {
                id: 0,
                height_cm: 0.0,
                weight_kg: 70.0,
                bmi: 70.0 / 0.0,
                classification: BmiClassification::Obese,
                recorded_at: 1,
            })
            .unwrap();

        let mut buffer = Vec::new();
        let snapshot = export_to_writer(&store, &mut buffer, false).unwrap();
        assert_eq!(snapshot.degraded.len(), 1);
        assert_eq!(snapshot.degraded[0].module, BackupModule::BmiCalculator);
        assert!(snapshot.degraded[0].reason.contains("bmi_records.bmi"));

        let envelope = decode(&buffer).unwrap();
        assert!(envelope.bmi_calculator.calculations.is_empty());
        assert_eq!(envelope.focus_tracker.sessions.len(), 1);
    }
}
