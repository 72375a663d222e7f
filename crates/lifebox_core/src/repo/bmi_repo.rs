//! BMI history gateway.

use super::sqlite_store::{ensure_changed, invalid_enum};
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{BmiClassification, BmiRecord, EntityId};
use rusqlite::{params, Row};

impl Gateway<BmiRecord> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<BmiRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, height_cm, weight_kg, bmi, classification, recorded_at
             FROM bmi_records
             ORDER BY recorded_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_bmi_row(row)?);
        }
        Ok(records)
    }

    fn insert(&self, record: &BmiRecord) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO bmi_records (height_cm, weight_kg, bmi, classification, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.height_cm,
                record.weight_kg,
                record.bmi,
                record.classification.as_name(),
                record.recorded_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, record: &BmiRecord) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE bmi_records
             SET height_cm = ?1, weight_kg = ?2, bmi = ?3, classification = ?4, recorded_at = ?5
             WHERE id = ?6;",
            params![
                record.height_cm,
                record.weight_kg,
                record.bmi,
                record.classification.as_name(),
                record.recorded_at,
                record.id,
            ],
        )?;
        ensure_changed(changed, "BmiRecord", record.id)
    }

    fn delete(&self, record: &BmiRecord) -> RepoResult<()> {
        self.delete_by_id("bmi_records", "BmiRecord", record.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("bmi_records")
    }
}

fn parse_bmi_row(row: &Row<'_>) -> RepoResult<BmiRecord> {
    let class_text: String = row.get("classification")?;
    let classification = BmiClassification::from_name(&class_text)
        .map_err(|err| invalid_enum("bmi_records.classification", err))?;

    Ok(BmiRecord {
        id: row.get("id")?,
        height_cm: row.get("height_cm")?,
        weight_kg: row.get("weight_kg")?,
        bmi: row.get("bmi")?,
        classification,
        recorded_at: row.get("recorded_at")?,
    })
}
