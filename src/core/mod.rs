/// Grouping of records into totals keyed by person, department, or company
pub mod aggregate;

/// Calendar buckets for the statistics view
pub mod buckets;

/// One-time import of the legacy JSON data file
pub mod legacy;

/// Argon2 password hashing
pub mod password;

/// Reporting periods and the record filters built on them
pub mod period;

/// Stable points ranking
pub mod ranking;

/// Record validation and persistence
pub mod record;

/// Rankings, time series, and dashboard summary
pub mod report;

/// Accounts, roles, and authentication
pub mod user;
