//! Reporting periods and the record filters built on them.
//!
//! A [`Period`] resolves against a reference date ("today") into an inclusive
//! [`DateRange`] that starts at the beginning of the current week, month, quarter or year
//! and ends at the reference date. Two filters use the range:
//!
//! - [`filter_for_period`] is the ranking filter. Additional point grants are compared by
//!   month against the start of the range only: a grant dated in or after the month the
//!   period starts in is included, however far past the reference date it lies.
//! - [`filter_by_date`] applies the date range to every record alike.

use crate::entities::record;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Reporting period keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Monday of the current ISO week through the reference date
    #[default]
    Week,
    /// First of the month through the reference date
    Month,
    /// First day of the quarter (Jan, Apr, Jul, Oct) through the reference date
    Quarter,
    /// January 1 through the reference date
    Year,
    /// No filtering
    All,
}

impl Period {
    /// Returns the inclusive range for this period, or `None` for [`Period::All`].
    #[must_use]
    pub fn range(self, reference: NaiveDate) -> Option<DateRange> {
        let start = match self {
            Self::Week => {
                let back = u64::from(reference.weekday().num_days_from_monday());
                reference.checked_sub_days(Days::new(back))?
            }
            Self::Month => reference.with_day(1)?,
            Self::Quarter => NaiveDate::from_ymd_opt(
                reference.year(),
                quarter_start_month(reference.month()),
                1,
            )?,
            Self::Year => NaiveDate::from_ymd_opt(reference.year(), 1, 1)?,
            Self::All => return None,
        };
        Some(DateRange {
            start,
            end: reference,
        })
    }

    /// The lowercase keyword used in queries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(crate::errors::Error::validation(format!(
                "unknown period '{other}'"
            ))),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub start: NaiveDate,
    /// Last day included
    pub end: NaiveDate,
}

impl DateRange {
    /// True when `date` falls within the range, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = crate::errors::Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || crate::errors::Error::validation(format!("'{s}' is not a YYYY-MM month"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

/// First month of the quarter containing `month` (1, 4, 7 or 10).
#[must_use]
pub const fn quarter_start_month(month: u32) -> u32 {
    ((month - 1) / 3) * 3 + 1
}

/// Ranking filter: records that count toward `period` as of `reference`.
///
/// Regular records must fall inside the date range. Additional records are included
/// when the month of their date is at or after the month the range starts in; the upper
/// bound does not apply to them.
#[must_use]
pub fn filter_for_period(
    records: &[record::Model],
    period: Period,
    reference: NaiveDate,
) -> Vec<record::Model> {
    let Some(range) = period.range(reference) else {
        return records.to_vec();
    };
    let start_month = YearMonth::of(range.start);

    records
        .iter()
        .filter(|r| {
            if r.is_additional {
                YearMonth::of(r.date) >= start_month
            } else {
                range.contains(r.date)
            }
        })
        .cloned()
        .collect()
}

/// Plain date filter: every record must fall inside the date range.
#[must_use]
pub fn filter_by_date(
    records: &[record::Model],
    period: Period,
    reference: NaiveDate,
) -> Vec<record::Model> {
    let Some(range) = period.range(reference) else {
        return records.to_vec();
    };
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{additional_record, date, sample_record};

    #[test]
    fn test_week_range_starts_on_monday() {
        // 2025-03-13 is a Thursday
        let range = Period::Week.range(date(2025, 3, 13)).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));
        assert_eq!(range.end, date(2025, 3, 13));

        // A Monday starts its own week
        let range = Period::Week.range(date(2025, 3, 10)).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));

        // A Sunday belongs to the week that began six days earlier
        let range = Period::Week.range(date(2025, 3, 16)).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));
    }

    #[test]
    fn test_week_range_crosses_month_boundary() {
        // 2025-04-02 is a Wednesday; its Monday is in March
        let range = Period::Week.range(date(2025, 4, 2)).unwrap();
        assert_eq!(range.start, date(2025, 3, 31));
    }

    #[test]
    fn test_month_and_year_ranges() {
        let range = Period::Month.range(date(2025, 2, 20)).unwrap();
        assert_eq!(range.start, date(2025, 2, 1));
        assert_eq!(range.end, date(2025, 2, 20));

        let range = Period::Year.range(date(2025, 8, 9)).unwrap();
        assert_eq!(range.start, date(2025, 1, 1));
    }

    #[test]
    fn test_quarter_start_floors_to_quarter_boundary() {
        assert_eq!(quarter_start_month(1), 1);
        assert_eq!(quarter_start_month(3), 1);
        assert_eq!(quarter_start_month(4), 4);
        assert_eq!(quarter_start_month(6), 4);
        assert_eq!(quarter_start_month(7), 7);
        assert_eq!(quarter_start_month(9), 7);
        assert_eq!(quarter_start_month(10), 10);
        assert_eq!(quarter_start_month(12), 10);

        let range = Period::Quarter.range(date(2025, 9, 30)).unwrap();
        assert_eq!(range.start, date(2025, 7, 1));
        let range = Period::Quarter.range(date(2025, 7, 1)).unwrap();
        assert_eq!(range.start, date(2025, 7, 1));
    }

    #[test]
    fn test_all_has_no_range() {
        assert!(Period::All.range(date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("quarter".parse::<Period>().unwrap(), Period::Quarter);
        assert_eq!("all".parse::<Period>().unwrap(), Period::All);
        assert!("fortnight".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::Week);
    }

    #[test]
    fn test_year_month_parse() {
        let ym: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(ym, YearMonth { year: 2025, month: 3 });
        assert_eq!(ym.to_string(), "2025-03");

        assert!("2025-3".parse::<YearMonth>().is_err());
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("202503".parse::<YearMonth>().is_err());
        assert!("abcd-01".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_regular_records_use_inclusive_date_range() {
        let today = date(2025, 3, 13);
        let records = vec![
            sample_record("A", "X", date(2025, 3, 9), 1, 1, false), // Sunday before
            sample_record("A", "X", date(2025, 3, 10), 2, 1, false), // Monday, start
            sample_record("A", "X", date(2025, 3, 13), 4, 1, false), // today, end
            sample_record("A", "X", date(2025, 3, 14), 8, 1, false), // tomorrow
        ];

        let points: Vec<i32> = filter_for_period(&records, Period::Week, today)
            .iter()
            .map(|r| r.points)
            .collect();
        assert_eq!(points, vec![2, 4]);
    }

    #[test]
    fn test_all_returns_everything() {
        let records = vec![
            sample_record("A", "X", date(2020, 1, 1), 1, 1, false),
            additional_record("A", "X", date(2030, 1, 1), 5, "2030-01"),
        ];
        assert_eq!(
            filter_for_period(&records, Period::All, date(2025, 1, 1)),
            records
        );
        assert_eq!(filter_by_date(&records, Period::All, date(2025, 1, 1)), records);
    }

    #[test]
    fn test_additional_points_compare_by_month_against_range_start() {
        let grant = additional_record("A", "X", date(2025, 3, 5), 10, "2025-03");
        let records = vec![grant];

        // Reports starting in March or earlier include the grant
        assert_eq!(
            filter_for_period(&records, Period::Month, date(2025, 3, 1)).len(),
            1
        );
        assert_eq!(
            filter_for_period(&records, Period::Month, date(2025, 2, 28)).len(),
            1
        );
        assert_eq!(
            filter_for_period(&records, Period::Quarter, date(2025, 2, 10)).len(),
            1
        );
        // Reports starting after March exclude it
        assert!(filter_for_period(&records, Period::Month, date(2025, 4, 15)).is_empty());
        assert!(filter_for_period(&records, Period::Quarter, date(2025, 4, 1)).is_empty());
    }

    #[test]
    fn test_additional_points_compare_whole_start_month() {
        // 2025-03-01 is a Saturday; its week starts 2025-02-24
        let today = date(2025, 3, 1);
        // Dated before the week began, but in the week's starting month
        let early = additional_record("A", "X", date(2025, 2, 3), 4, "2025-02");

        assert_eq!(filter_for_period(&[early.clone()], Period::Week, today).len(), 1);
        assert!(filter_by_date(&[early], Period::Week, today).is_empty());

        // January is before the starting month
        let older = additional_record("A", "X", date(2025, 1, 31), 4, "2025-01");
        assert!(filter_for_period(&[older], Period::Week, today).is_empty());
    }

    #[test]
    fn test_additional_points_ignore_upper_bound() {
        // Credited in March, but the record date is in the future
        let grant = additional_record("A", "X", date(2025, 3, 28), 10, "2025-03");
        let today = date(2025, 3, 3);
        assert_eq!(filter_for_period(&[grant.clone()], Period::Week, today).len(), 1);
        // The plain date filter still excludes it
        assert!(filter_by_date(&[grant], Period::Week, today).is_empty());
    }

    #[test]
    fn test_week_start_in_previous_month_uses_that_month_for_grants() {
        // Week of 2025-03-31 (Mon) .. 2025-04-02; the start month is March
        let grant = additional_record("A", "X", date(2025, 3, 1), 5, "2025-03");
        assert_eq!(
            filter_for_period(&[grant], Period::Week, date(2025, 4, 2)).len(),
            1
        );
    }
}
