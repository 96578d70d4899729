//! Calendar trend tables.
//!
//! Groups every record (no period filter) into ISO weeks, months, quarters or years.
//! Totals here count quantity unconditionally, additional records included.

use crate::core::aggregate::Totals;
use crate::entities::record;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Size of a trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// ISO week, labelled `2025-W07`
    Week,
    /// Calendar month, labelled `2025-02`
    Month,
    /// Calendar quarter, labelled `2025-Q1`
    Quarter,
    /// Calendar year, labelled `2025`
    Year,
}

impl FromStr for Granularity {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(crate::errors::Error::validation(format!(
                "unknown granularity '{other}'"
            ))),
        }
    }
}

/// Chronologically ordered bucket identity: year plus week, month or quarter number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    year: i32,
    index: u32,
}

impl Granularity {
    fn key(self, date: NaiveDate) -> BucketKey {
        match self {
            Self::Week => {
                let iso = date.iso_week();
                BucketKey {
                    year: iso.year(),
                    index: iso.week(),
                }
            }
            Self::Month => BucketKey {
                year: date.year(),
                index: date.month(),
            },
            Self::Quarter => BucketKey {
                year: date.year(),
                index: date.month().div_ceil(3),
            },
            Self::Year => BucketKey {
                year: date.year(),
                index: 0,
            },
        }
    }

    fn label(self, key: BucketKey) -> String {
        match self {
            Self::Week => format!("{}-W{:02}", key.year, key.index),
            Self::Month => format!("{}-{:02}", key.year, key.index),
            Self::Quarter => format!("{}-Q{}", key.year, key.index),
            Self::Year => key.year.to_string(),
        }
    }
}

/// Bucket label for `date` at the given granularity.
#[must_use]
pub fn bucket_label(date: NaiveDate, granularity: Granularity) -> String {
    granularity.label(granularity.key(date))
}

/// One row of a trend table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    /// Bucket label
    pub label: String,
    /// Summed figures for the bucket
    #[serde(flatten)]
    pub totals: Totals,
}

/// Groups all records into calendar buckets.
///
/// Weeks, months and quarters are returned oldest first; years are returned newest first.
#[must_use]
pub fn bucket(records: &[record::Model], granularity: Granularity) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<BucketKey, Totals> = BTreeMap::new();
    for record in records {
        buckets
            .entry(granularity.key(record.date))
            .or_default()
            .add_unconditional(record);
    }

    let rows = buckets.into_iter().map(|(key, totals)| TimeBucket {
        label: granularity.label(key),
        totals,
    });

    match granularity {
        Granularity::Year => rows.rev().collect(),
        _ => rows.collect(),
    }
}
