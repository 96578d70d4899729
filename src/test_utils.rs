//! Shared test utilities for the innovation points ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and building records and principals with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        period::YearMonth,
        record::RecordFields,
        user::{AuthContext, Role},
    },
    entities::record,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date; panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The department list used throughout the tests.
pub fn departments() -> Vec<String> {
    vec!["A".to_string(), "B".to_string(), "C".to_string()]
}

/// An admin principal that does not need to exist in the store.
pub fn admin_ctx() -> AuthContext {
    AuthContext {
        username: "admin".to_string(),
        role: Role::Admin,
    }
}

/// A read-only principal.
pub fn user_ctx(username: &str) -> AuthContext {
    AuthContext {
        username: username.to_string(),
        role: Role::User,
    }
}

/// Builds an in-memory record model for pure filter and aggregation tests.
///
/// # Defaults
/// * `content`: "Test innovation"
/// * `is_additional`: false
pub fn sample_record(
    department: &str,
    person_name: &str,
    date: NaiveDate,
    points: i32,
    quantity: i32,
    implemented: bool,
) -> record::Model {
    let now = chrono::Utc::now();
    record::Model {
        id: format!("test-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)),
        date,
        department: department.to_string(),
        person_name: person_name.to_string(),
        content: "Test innovation".to_string(),
        quantity,
        points,
        implemented,
        is_additional: false,
        month_for_points: None,
        created_at: now,
        updated_at: now,
    }
}

/// Builds an additional (supplemental grant) record.
///
/// Quantity is 1 so tests can check that it is left out of totals.
pub fn additional_record(
    department: &str,
    person_name: &str,
    date: NaiveDate,
    points: i32,
    month_for_points: &str,
) -> record::Model {
    let month: YearMonth = month_for_points.parse().unwrap();
    record::Model {
        is_additional: true,
        month_for_points: Some(month.to_string()),
        ..sample_record(department, person_name, date, points, 1, false)
    }
}

/// Submitted fields for a plain record with content "Test innovation".
pub fn fields(
    department: &str,
    person_name: &str,
    date: &str,
    points: i64,
    quantity: i64,
) -> RecordFields {
    RecordFields {
        date: date.to_string(),
        department: department.to_string(),
        person_name: person_name.to_string(),
        content: "Test innovation".to_string(),
        quantity: Some(quantity),
        points: Some(points),
        ..RecordFields::default()
    }
}
