//! Import orchestrator: envelope -> store.
//!
//! # Responsibility
//! - Gate on the envelope version before any write.
//! - Import modules parents-first so children can be relinked.
//! - Contain storage failures per module and report them as outcomes.
//!
//! # Invariants
//! - Modules run sequentially in `BackupModule::ORDERED`.
//! - A remap table lives for one family of one call and is passed explicitly
//!   to the child step.
//! - A child whose parent id is missing from the same envelope is dropped
//!   without raising an error.
//! - A record with an unknown enum name is skipped on its own; the rest of
//!   its module still imports.

use super::envelope::{decode, Envelope, BACKUP_FORMAT_VERSION};
use super::module::BackupModule;
use super::record::{Linked, Portable, ProfileRecord};
use super::remap::IdRemap;
use super::stats::{ImportStats, ModuleOutcome};
use super::{now_millis, BackupError, BackupResult, CancelToken};
use crate::model::Profile;
use crate::repo::{Gateway, LifeStore, RepoResult};
use log::{debug, error, info, warn};
use std::io::Read;
use std::time::Instant;

/// Running counters for one module.
#[derive(Debug, Default)]
struct Tally {
    records: usize,
    skipped: usize,
    orphaned: usize,
}

impl Tally {
    fn into_outcome(self) -> ModuleOutcome {
        ModuleOutcome::Imported {
            records: self.records,
            skipped: self.skipped,
            orphaned: self.orphaned,
        }
    }
}

/// Reads, decodes and imports one backup from `reader`.
///
/// # Errors
/// - `Io` when the source cannot be read.
/// - `Format` when the bytes are not an envelope.
/// - `UnsupportedVersion` when the envelope version is not supported.
/// - `Cancelled` when `cancel` fires at a checkpoint.
pub fn import_from_reader<S, R>(
    store: &S,
    reader: &mut R,
    cancel: &CancelToken,
) -> BackupResult<ImportStats>
where
    S: LifeStore + ?Sized,
    R: Read + ?Sized,
{
    cancel.checkpoint()?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|err| {
        error!("event=backup_import module=backup status=error error_code=io_failure error={err}");
        BackupError::Io(err)
    })?;

    cancel.checkpoint()?;
    let envelope = decode(&bytes).map_err(|err| {
        error!(
            "event=backup_import module=backup status=error error_code={} bytes={} error={}",
            err.code(),
            bytes.len(),
            err
        );
        err
    })?;

    import_envelope(store, &envelope, cancel)
}

/// Imports a decoded envelope into `store`.
///
/// Rejects unsupported versions before touching storage. Module failures
/// are reported in the returned stats, never as an error.
pub fn import_envelope<S: LifeStore + ?Sized>(
    store: &S,
    envelope: &Envelope,
    cancel: &CancelToken,
) -> BackupResult<ImportStats> {
    if !envelope.is_supported_version() {
        warn!(
            "event=backup_import module=backup status=rejected error_code=version_failure found={} supported={}",
            envelope.version, BACKUP_FORMAT_VERSION
        );
        return Err(BackupError::UnsupportedVersion {
            found: envelope.version,
            supported: BACKUP_FORMAT_VERSION,
        });
    }

    let started_at = Instant::now();
    info!(
        "event=backup_import module=backup status=start backup_timestamp={} source_records={}",
        envelope.timestamp,
        envelope.source_record_count()
    );

    let mut stats = ImportStats::default();
    for module in BackupModule::ORDERED {
        cancel.checkpoint().map_err(|err| {
            warn!(
                "event=backup_import module=backup status=cancelled before_section={} imported_so_far={}",
                module,
                stats.total()
            );
            err
        })?;
        *stats.outcome_mut(module) = run_module(module, |tally| {
            import_module(store, envelope, module, tally)
        });
    }

    info!(
        "event=backup_import module=backup status=ok total={} failed_sections={} duration_ms={}",
        stats.total(),
        stats.failures().len(),
        started_at.elapsed().as_millis()
    );
    Ok(stats)
}

fn import_module<S: LifeStore + ?Sized>(
    store: &S,
    envelope: &Envelope,
    module: BackupModule,
    tally: &mut Tally,
) -> RepoResult<()> {
    match module {
        BackupModule::Profile => match envelope.profile.as_ref() {
            Some(record) => replace_profile(store, record, tally),
            None => Ok(()),
        },
        BackupModule::FocusTracker => {
            let section = &envelope.focus_tracker;
            let categories = insert_parents(store, "focus_categories", &section.categories, tally)?;
            insert_children(store, &section.sessions, &categories, tally)
        }
        BackupModule::HabitTracker => {
            let section = &envelope.habit_tracker;
            let habits = insert_parents(store, "habits", &section.habits, tally)?;
            insert_children(store, &section.completions, &habits, tally)
        }
        BackupModule::ExpenseTracker => {
            let section = &envelope.expense_tracker;
            let categories =
                insert_parents(store, "expense_categories", &section.categories, tally)?;
            insert_children(store, &section.expenses, &categories, tally)
        }
        BackupModule::SubscriptionTracker => {
            insert_all(store, &envelope.subscription_tracker.subscriptions, tally)
        }
        BackupModule::DailyPlanner => insert_all(store, &envelope.daily_planner.tasks, tally),
        BackupModule::YearCalculator => {
            insert_all(store, &envelope.year_calculator.calculations, tally)
        }
        BackupModule::BmiCalculator => {
            insert_all(store, &envelope.bmi_calculator.calculations, tally)
        }
    }
}

/// Runs one module step and converts its result into an outcome.
fn run_module<F>(module: BackupModule, step: F) -> ModuleOutcome
where
    F: FnOnce(&mut Tally) -> RepoResult<()>,
{
    let mut tally = Tally::default();
    match step(&mut tally) {
        Ok(()) => {
            debug!(
                "event=backup_import_section module=backup status=ok section={} records={} skipped={} orphaned={}",
                module, tally.records, tally.skipped, tally.orphaned
            );
            tally.into_outcome()
        }
        Err(err) => {
            warn!(
                "event=backup_import_section module=backup status=failed section={} written_before_failure={} error={}",
                module, tally.records, err
            );
            ModuleOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// Replaces whatever profile the store holds with the backup's profile.
fn replace_profile<S: LifeStore + ?Sized>(
    store: &S,
    record: &ProfileRecord,
    tally: &mut Tally,
) -> RepoResult<()> {
    let mut profile = match record.to_entity() {
        Ok(profile) => profile,
        Err(err) => {
            warn!("event=backup_import_record module=backup status=skipped section=profile error={err}");
            tally.skipped += 1;
            return Ok(());
        }
    };
    profile.updated_at = now_millis();

    Gateway::<Profile>::delete_all(store)?;
    Gateway::<Profile>::insert(store, &profile)?;
    tally.records += 1;
    Ok(())
}

/// Inserts parent records and returns the family's remap table.
fn insert_parents<S, R>(
    store: &S,
    family: &'static str,
    records: &[R],
    tally: &mut Tally,
) -> RepoResult<IdRemap>
where
    S: Gateway<R::Entity> + ?Sized,
    R: Portable,
{
    let mut remap = IdRemap::new(family);
    for record in records {
        let entity = match record.to_entity() {
            Ok(entity) => entity,
            Err(err) => {
                warn!(
                    "event=backup_import_record module=backup status=skipped family={} old_id={} error={}",
                    family,
                    record.old_id(),
                    err
                );
                tally.skipped += 1;
                continue;
            }
        };
        let new_id = store.insert(&entity)?;
        remap.record(record.old_id(), new_id);
        tally.records += 1;
    }
    Ok(remap)
}

/// Inserts child records whose parent resolves through `parents`.
fn insert_children<S, R>(
    store: &S,
    records: &[R],
    parents: &IdRemap,
    tally: &mut Tally,
) -> RepoResult<()>
where
    S: Gateway<R::Entity> + ?Sized,
    R: Linked,
{
    for record in records {
        let Some(new_parent_id) = parents.resolve(record.parent_old_id()) else {
            debug!(
                "event=backup_import_record module=backup status=orphaned family={} parent_old_id={}",
                parents.family(),
                record.parent_old_id()
            );
            tally.orphaned += 1;
            continue;
        };
        let mut entity = match record.to_entity() {
            Ok(entity) => entity,
            Err(err) => {
                warn!(
                    "event=backup_import_record module=backup status=skipped family={} old_id={} error={}",
                    parents.family(),
                    record.old_id(),
                    err
                );
                tally.skipped += 1;
                continue;
            }
        };
        R::relink(&mut entity, new_parent_id);
        store.insert(&entity)?;
        tally.records += 1;
    }
    Ok(())
}

/// Inserts records of a module with no family dependency.
fn insert_all<S, R>(store: &S, records: &[R], tally: &mut Tally) -> RepoResult<()>
where
    S: Gateway<R::Entity> + ?Sized,
    R: Portable,
{
    for record in records {
        match record.to_entity() {
            Ok(entity) => {
                store.insert(&entity)?;
                tally.records += 1;
            }
            Err(err) => {
                warn!(
                    "event=backup_import_record module=backup status=skipped old_id={} error={}",
                    record.old_id(),
                    err
                );
                tally.skipped += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{import_envelope, import_from_reader};
    use crate::backup::envelope::{encode, Envelope};
    use crate::backup::module::BackupModule;
    use crate::backup::record::{
        FocusCategoryRecord, FocusSessionRecord, HabitCompletionRecord, HabitRecord,
        ProfileRecord,
    };
    use crate::backup::stats::ModuleOutcome;
    use crate::backup::CancelToken;
    use crate::db::open_db_in_memory;
    use crate::model::{FocusCategory, FocusSession, Habit, HabitCompletion, Profile};
    use crate::repo::{Gateway, SqliteStore};

    fn habit(old_id: i64, habit_type: &str) -> HabitRecord {
        HabitRecord {
            old_id,
            name: format!("habit-{old_id}"),
            habit_type: habit_type.to_string(),
            target_count: 1,
            ..HabitRecord::default()
        }
    }

    fn completion(old_id: i64, habit_id: i64) -> HabitCompletionRecord {
        HabitCompletionRecord {
            old_id,
            habit_id,
            date: 1_700_000_000_000,
            completion_type: "COMPLETED".to_string(),
            value: 1,
        }
    }

    #[test]
    fn children_follow_their_parent_to_the_new_id() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        // Occupy id 1 so the imported category cannot land on its old id.
        store
            .insert(&FocusCategory {
                id: 0,
                name: "Existing".to_string(),
                color: 0,
                icon: String::new(),
                created_at: 1,
            })
            .unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.focus_tracker.categories.push(FocusCategoryRecord {
            old_id: 1,
            name: "Deep work".to_string(),
            ..FocusCategoryRecord::default()
        });
        envelope.focus_tracker.sessions.push(FocusSessionRecord {
            old_id: 7,
            category_id: 1,
            start_time: 10,
            end_time: 20,
            duration_ms: 10,
            note: String::new(),
        });

        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert_eq!(stats.count(BackupModule::FocusTracker), 2);

        let categories = Gateway::<FocusCategory>::get_all(&store).unwrap();
        let imported = categories
            .iter()
            .find(|category| category.name == "Deep work")
            .unwrap();
        assert_ne!(imported.id, 1);
        let sessions = Gateway::<FocusSession>::get_all(&store).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].category_id, imported.id);
    }

    #[test]
    fn dangling_child_is_dropped_as_orphan() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.habit_tracker.habits.push(habit(1, "BOOLEAN"));
        envelope.habit_tracker.completions.push(completion(1, 1));
        envelope.habit_tracker.completions.push(completion(2, 99));

        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert_eq!(
            stats.habit_tracker,
            ModuleOutcome::Imported {
                records: 2,
                skipped: 0,
                orphaned: 1
            }
        );
        assert_eq!(Gateway::<HabitCompletion>::get_all(&store).unwrap().len(), 1);
    }

    #[test]
    fn unknown_enum_skips_record_and_orphans_its_children() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.habit_tracker.habits.push(habit(1, "BOOLEAN"));
        envelope.habit_tracker.habits.push(habit(2, "STREAK"));
        envelope.habit_tracker.completions.push(completion(1, 1));
        envelope.habit_tracker.completions.push(completion(2, 2));

        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert_eq!(
            stats.habit_tracker,
            ModuleOutcome::Imported {
                records: 2,
                skipped: 1,
                orphaned: 1
            }
        );
        let habits = Gateway::<Habit>::get_all(&store).unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].name, "habit-1");
    }

    #[test]
    fn profile_import_replaces_existing_profile() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.profile = Some(ProfileRecord {
            old_id: 1,
            name: "First".to_string(),
            gender: "FEMALE".to_string(),
            height_cm: 170.0,
            weight_kg: 60.0,
            updated_at: 5,
            ..ProfileRecord::default()
        });
        import_envelope(&store, &envelope, &CancelToken::new()).unwrap();

        if let Some(profile) = envelope.profile.as_mut() {
            profile.name = "Second".to_string();
        }
        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert!(stats.profile_imported());

        let profiles = Gateway::<Profile>::get_all(&store).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Second");
        assert!(profiles[0].updated_at > 5);
    }

    #[test]
    fn profile_with_unknown_gender_keeps_existing_profile() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.profile = Some(ProfileRecord {
            name: "Kept".to_string(),
            gender: "OTHER".to_string(),
            ..ProfileRecord::default()
        });
        import_envelope(&store, &envelope, &CancelToken::new()).unwrap();

        envelope.profile = Some(ProfileRecord {
            name: "Rejected".to_string(),
            gender: "UNSPECIFIED".to_string(),
            ..ProfileRecord::default()
        });
        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert!(!stats.profile_imported());

        let profiles = Gateway::<Profile>::get_all(&store).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Kept");
    }

    #[test]
    fn storage_failure_is_contained_to_its_module() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_habits BEFORE INSERT ON habits
             BEGIN SELECT RAISE(ABORT, 'habit storage offline'); END;",
        )
        .unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.habit_tracker.habits.push(habit(1, "BOOLEAN"));
        envelope.focus_tracker.categories.push(FocusCategoryRecord {
            old_id: 3,
            name: "Reading".to_string(),
            ..FocusCategoryRecord::default()
        });

        let stats = import_envelope(&store, &envelope, &CancelToken::new()).unwrap();
        assert!(stats.habit_tracker.is_failed());
        assert_eq!(stats.count(BackupModule::FocusTracker), 1);
        assert_eq!(stats.total(), 1);
        let failures = stats.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, BackupModule::HabitTracker);
        assert!(failures[0].1.contains("habit storage offline"));
    }

    #[test]
    fn unsupported_version_writes_nothing() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let mut envelope = Envelope::empty(42);
        envelope.version = 2;
        envelope.habit_tracker.habits.push(habit(1, "BOOLEAN"));

        let err = import_envelope(&store, &envelope, &CancelToken::new()).unwrap_err();
        assert_eq!(err.code(), "version_failure");
        assert!(Gateway::<Habit>::get_all(&store).unwrap().is_empty());
    }

    #[test]
    fn cancelled_token_stops_before_first_write() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let mut envelope = Envelope::empty(42);
        envelope.habit_tracker.habits.push(habit(1, "BOOLEAN"));
        let bytes = encode(&envelope, false).unwrap();

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = import_from_reader(&store, &mut bytes.as_slice(), &cancel).unwrap_err();
        assert_eq!(err.code(), "cancelled");
        assert!(Gateway::<Habit>::get_all(&store).unwrap().is_empty());
    }

    #[test]
    fn garbage_bytes_are_a_format_failure() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let err = import_from_reader(&store, &mut &b"not json"[..], &CancelToken::new())
            .unwrap_err();
        assert_eq!(err.code(), "format_failure");
    }
}
