//! Import of the legacy `innovation_data.txt` file.
//!
//! The file holds pretty-printed JSON: either an array of records or, once records have
//! been deleted from it, an object keyed by the surviving array indices. Both shapes are
//! read in index order so the first-encounter order of the old file carries over into
//! the creation order of the imported records.

use crate::{
    core::record::RecordFields,
    entities::Record,
    errors::{Error, Result},
};
use sea_orm::{TransactionTrait, prelude::*};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};
use tracing::{info, instrument, warn};

/// One record as the legacy file stores it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyRecord {
    /// Opaque id, kept as-is
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Department name
    pub department: String,
    /// Person name
    pub name: String,
    /// Description
    pub content: String,
    /// Number of innovations
    pub quantity: i64,
    /// Points awarded
    pub points: i64,
    /// Went into production
    pub implemented: bool,
    /// Supplemental grant flag
    pub is_additional: bool,
    /// `YYYY-MM`, written for every record but only meaningful on additional ones
    pub month_for_points: Option<String>,
}

impl LegacyRecord {
    fn to_fields(&self) -> RecordFields {
        RecordFields {
            date: self.date.clone(),
            department: self.department.clone(),
            person_name: self.name.clone(),
            content: self.content.clone(),
            quantity: Some(self.quantity),
            points: Some(self.points),
            implemented: self.implemented,
            is_additional: self.is_additional,
            month_for_points: self.month_for_points.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyFile {
    List(Vec<LegacyRecord>),
    Keyed(BTreeMap<String, LegacyRecord>),
}

/// Parses the contents of a legacy data file. Blank contents are an empty list.
pub fn parse_legacy_records(contents: &str) -> Result<Vec<LegacyRecord>> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(match serde_json::from_str::<LegacyFile>(contents)? {
        LegacyFile::List(records) => records,
        LegacyFile::Keyed(records) => {
            let mut indexed = records
                .into_iter()
                .map(|(key, record)| {
                    key.parse::<u64>().map(|index| (index, record)).map_err(|_| {
                        Error::validation(format!("legacy record key '{key}' is not an index"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            indexed.sort_by_key(|(index, _)| *index);
            indexed.into_iter().map(|(_, record)| record).collect()
        }
    })
}

/// Outcome of a legacy import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records written to the store
    pub imported: usize,
    /// Records skipped for a repeated id or failed validation
    pub skipped: usize,
}

/// Imports `path` into the records table when the table is empty.
///
/// Returns `None` when the table already held records and nothing was read. Invalid
/// entries are logged and skipped; the rest are written in one transaction.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn import_legacy_file(
    db: &DatabaseConnection,
    path: &Path,
    departments: &[String],
) -> Result<Option<ImportSummary>> {
    let existing = Record::find().count(db).await?;
    if existing > 0 {
        info!(existing, "Records table not empty, skipping legacy import");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let legacy = parse_legacy_records(&contents)?;

    let mut summary = ImportSummary::default();
    let base = chrono::Utc::now();

    let txn = db.begin().await?;
    for (index, entry) in legacy.iter().enumerate() {
        let id = entry.id.trim();
        if id.is_empty() {
            warn!(index, "Legacy record has no id, skipping");
            summary.skipped += 1;
            continue;
        }
        if Record::find_by_id(id.to_string()).one(&txn).await?.is_some() {
            warn!(id, "Duplicate legacy record id, skipping");
            summary.skipped += 1;
            continue;
        }

        let valid = match entry.to_fields().validate(departments) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(id, "Invalid legacy record, skipping: {e}");
                summary.skipped += 1;
                continue;
            }
        };

        // Offsets keep file order in creation-ordered listings
        let offset = chrono::Duration::microseconds(i64::try_from(index).unwrap_or(i64::MAX));
        valid
            .into_active_model(id.to_string(), base + offset)
            .insert(&txn)
            .await?;
        summary.imported += 1;
    }
    txn.commit().await?;

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Legacy records imported"
    );
    Ok(Some(summary))
}
