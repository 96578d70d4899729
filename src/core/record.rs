//! Record business logic - Handles all activity record operations.
//!
//! Records are listed in creation order, which is also the first-encounter order the
//! rankings use to break ties. Every write runs inside a database transaction: read,
//! validate, mutate, commit. A write that fails before commit rolls back and leaves the
//! store unchanged.

use crate::{
    core::{period::YearMonth, user::AuthContext},
    entities::{Record, record},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Submitted record fields, as received from a caller before validation.
///
/// Every field defaults, so a missing field surfaces as a validation error rather than a
/// decoding error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordFields {
    /// Activity date, `YYYY-MM-DD`
    pub date: String,
    /// Department name
    pub department: String,
    /// Person credited with the activity
    pub person_name: String,
    /// Description of the innovation
    pub content: String,
    /// Number of innovations
    pub quantity: Option<i64>,
    /// Points awarded
    pub points: Option<i64>,
    /// Whether the innovation went into production
    pub implemented: bool,
    /// Supplemental point grant flag
    pub is_additional: bool,
    /// `YYYY-MM` grant month for additional records; defaults to the month of `date`
    pub month_for_points: Option<String>,
}

/// Record fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    date: NaiveDate,
    department: String,
    person_name: String,
    content: String,
    quantity: i32,
    points: i32,
    implemented: bool,
    is_additional: bool,
    month_for_points: Option<String>,
}

impl RecordFields {
    /// Validates the fields against the configured department list.
    pub fn validate(&self, departments: &[String]) -> Result<ValidRecord> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(Error::validation("date is required"));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::validation(format!("date '{date}' is not YYYY-MM-DD")))?;

        if self.department.trim().is_empty() {
            return Err(Error::validation("department is required"));
        }
        if !departments.iter().any(|d| d == &self.department) {
            return Err(Error::validation(format!(
                "unknown department '{}'",
                self.department
            )));
        }

        if self.person_name.trim().is_empty() {
            return Err(Error::validation("personName is required"));
        }
        if self.content.trim().is_empty() {
            return Err(Error::validation("content is required"));
        }

        let quantity = non_negative("quantity", self.quantity)?;
        let points = non_negative("points", self.points)?;

        let month_for_points = if self.is_additional {
            let month = match self.month_for_points.as_deref().map(str::trim) {
                Some(m) if !m.is_empty() => m.parse::<YearMonth>()?,
                _ => YearMonth::of(date),
            };
            Some(month.to_string())
        } else {
            None
        };

        Ok(ValidRecord {
            date,
            department: self.department.clone(),
            person_name: self.person_name.clone(),
            content: self.content.clone(),
            quantity,
            points,
            implemented: self.implemented,
            is_additional: self.is_additional,
            month_for_points,
        })
    }
}

impl ValidRecord {
    /// Builds an insertable model with the given id and creation time.
    pub(crate) fn into_active_model(
        self,
        id: String,
        created_at: DateTimeUtc,
    ) -> record::ActiveModel {
        record::ActiveModel {
            id: Set(id),
            date: Set(self.date),
            department: Set(self.department),
            person_name: Set(self.person_name),
            content: Set(self.content),
            quantity: Set(self.quantity),
            points: Set(self.points),
            implemented: Set(self.implemented),
            is_additional: Set(self.is_additional),
            month_for_points: Set(self.month_for_points),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
    }
}

/// A fresh opaque record id.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn non_negative(field: &str, value: Option<i64>) -> Result<i32> {
    let value = value.ok_or_else(|| Error::validation(format!("{field} is required")))?;
    if value < 0 {
        return Err(Error::validation(format!("{field} cannot be negative")));
    }
    i32::try_from(value).map_err(|_| Error::validation(format!("{field} is too large")))
}

/// Retrieves every record in creation order.
pub async fn list_records(db: &DatabaseConnection) -> Result<Vec<record::Model>> {
    Record::find()
        .order_by_asc(record::Column::CreatedAt)
        .order_by_asc(record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a record by id.
pub async fn get_record(db: &DatabaseConnection, id: &str) -> Result<Option<record::Model>> {
    Record::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Distinct person names in the order they were first entered.
pub async fn person_names(db: &DatabaseConnection) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for record in list_records(db).await? {
        if !names.contains(&record.person_name) {
            names.push(record.person_name);
        }
    }
    Ok(names)
}

/// Creates a record with a fresh id. Admin only.
#[instrument(skip(db, departments, input), fields(actor = %ctx.username))]
pub async fn create_record(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    departments: &[String],
    input: &RecordFields,
) -> Result<record::Model> {
    ctx.require_admin("create record")?;
    let valid = input.validate(departments)?;

    let model = valid.into_active_model(new_record_id(), chrono::Utc::now());

    let txn = db.begin().await?;
    let created = model.insert(&txn).await?;
    txn.commit().await?;

    info!(id = %created.id, points = created.points, "Record created");
    Ok(created)
}

/// Replaces every field of an existing record except its id. Admin only.
#[instrument(skip(db, departments, input), fields(actor = %ctx.username))]
pub async fn update_record(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    departments: &[String],
    id: &str,
    input: &RecordFields,
) -> Result<record::Model> {
    ctx.require_admin("update record")?;
    let valid = input.validate(departments)?;

    let txn = db.begin().await?;
    let existing = Record::find_by_id(id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::RecordNotFound { id: id.to_string() })?;

    let mut active: record::ActiveModel = existing.into();
    active.date = Set(valid.date);
    active.department = Set(valid.department);
    active.person_name = Set(valid.person_name);
    active.content = Set(valid.content);
    active.quantity = Set(valid.quantity);
    active.points = Set(valid.points);
    active.implemented = Set(valid.implemented);
    active.is_additional = Set(valid.is_additional);
    active.month_for_points = Set(valid.month_for_points);
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Record updated");
    Ok(updated)
}

/// Deletes a record by id. Admin only. A missing id is [`Error::RecordNotFound`].
#[instrument(skip(db), fields(actor = %ctx.username))]
pub async fn delete_record(db: &DatabaseConnection, ctx: &AuthContext, id: &str) -> Result<()> {
    ctx.require_admin("delete record")?;

    let txn = db.begin().await?;
    let result = Record::delete_by_id(id.to_string()).exec(&txn).await?;
    if result.rows_affected == 0 {
        debug!("Delete matched no record");
        return Err(Error::RecordNotFound { id: id.to_string() });
    }
    txn.commit().await?;

    info!("Record deleted");
    Ok(())
}
