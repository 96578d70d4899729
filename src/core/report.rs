//! Report generation business logic.
//!
//! Each report loads the full record set and recomputes from scratch. The pure
//! `*_from` functions do the work on an in-memory slice; the async wrappers only add
//! the store read.

use crate::{
    core::{
        aggregate::{self, DepartmentKey, PersonKey, Totals},
        buckets::{self, Granularity, TimeBucket},
        period::{self, Period},
        ranking::{self, RankedEntry},
        record::list_records,
    },
    entities::record,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Number of people shown on the summary leaderboard.
const SUMMARY_TOP_PEOPLE: usize = 3;

/// What a ranking groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One entry per (department, person)
    Person,
    /// One entry per department
    Department,
    /// A single company-wide total
    Company,
}

impl FromStr for Scope {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "department" => Ok(Self::Department),
            "company" => Ok(Self::Company),
            other => Err(crate::errors::Error::validation(format!(
                "unknown ranking scope '{other}'"
            ))),
        }
    }
}

/// A computed ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "entries", rename_all = "lowercase")]
pub enum Ranking {
    /// People ordered by points
    Person(Vec<RankedEntry<PersonKey>>),
    /// Departments ordered by points
    Department(Vec<RankedEntry<DepartmentKey>>),
    /// Company totals
    Company(Totals),
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Totals over every record, quantity counted unconditionally
    pub overall: Totals,
    /// Leading people of the current week
    pub top_people_this_week: Vec<RankedEntry<PersonKey>>,
}

/// Ranks `records` for `scope` over `period` as of `today`.
#[must_use]
pub fn ranking_from(
    records: &[record::Model],
    scope: Scope,
    period: Period,
    today: NaiveDate,
) -> Ranking {
    let in_period = period::filter_for_period(records, period, today);
    debug!(
        ?scope,
        %period,
        total = records.len(),
        in_period = in_period.len(),
        "Computing ranking"
    );

    match scope {
        Scope::Person => Ranking::Person(ranking::rank(aggregate::by_person(&in_period))),
        Scope::Department => {
            Ranking::Department(ranking::rank(aggregate::by_department(&in_period)))
        }
        Scope::Company => Ranking::Company(aggregate::company_totals(&in_period)),
    }
}

/// Builds the dashboard summary from `records`.
#[must_use]
pub fn summary_from(records: &[record::Model], today: NaiveDate) -> Summary {
    let overall = records.iter().fold(Totals::default(), |mut totals, r| {
        totals.add_unconditional(r);
        totals
    });

    let this_week = period::filter_for_period(records, Period::Week, today);
    let mut top_people_this_week = ranking::rank(aggregate::by_person(&this_week));
    top_people_this_week.truncate(SUMMARY_TOP_PEOPLE);

    Summary {
        overall,
        top_people_this_week,
    }
}

/// Loads all records and ranks them.
pub async fn get_ranking(
    db: &DatabaseConnection,
    scope: Scope,
    period: Period,
    today: NaiveDate,
) -> Result<Ranking> {
    let records = list_records(db).await?;
    Ok(ranking_from(&records, scope, period, today))
}

/// Loads all records and groups them into calendar buckets.
pub async fn get_time_series(
    db: &DatabaseConnection,
    granularity: Granularity,
) -> Result<Vec<TimeBucket>> {
    let records = list_records(db).await?;
    Ok(buckets::bucket(&records, granularity))
}

/// Loads all records and builds the dashboard summary.
pub async fn get_summary(db: &DatabaseConnection, today: NaiveDate) -> Result<Summary> {
    let records = list_records(db).await?;
    Ok(summary_from(&records, today))
}
