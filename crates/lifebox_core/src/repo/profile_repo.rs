//! Profile gateway.

use super::sqlite_store::{ensure_changed, invalid_enum};
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{EntityId, Gender, Profile};
use rusqlite::{params, Row};

impl Gateway<Profile> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, birth_date, gender, height_cm, weight_kg, created_at, updated_at
             FROM profile
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn insert(&self, profile: &Profile) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO profile (
                name, birth_date, gender, height_cm, weight_kg, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                profile.name,
                profile.birth_date,
                profile.gender.as_name(),
                profile.height_cm,
                profile.weight_kg,
                profile.created_at,
                profile.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, profile: &Profile) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE profile
             SET name = ?1, birth_date = ?2, gender = ?3, height_cm = ?4,
                 weight_kg = ?5, created_at = ?6, updated_at = ?7
             WHERE id = ?8;",
            params![
                profile.name,
                profile.birth_date,
                profile.gender.as_name(),
                profile.height_cm,
                profile.weight_kg,
                profile.created_at,
                profile.updated_at,
                profile.id,
            ],
        )?;
        ensure_changed(changed, "Profile", profile.id)
    }

    fn delete(&self, profile: &Profile) -> RepoResult<()> {
        self.delete_by_id("profile", "Profile", profile.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("profile")
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let gender_text: String = row.get("gender")?;
    let gender =
        Gender::from_name(&gender_text).map_err(|err| invalid_enum("profile.gender", err))?;

    Ok(Profile {
        id: row.get("id")?,
        name: row.get("name")?,
        birth_date: row.get("birth_date")?,
        gender,
        height_cm: row.get("height_cm")?,
        weight_kg: row.get("weight_kg")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
