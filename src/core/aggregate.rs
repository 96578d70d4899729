//! Grouping and summing of activity records.
//!
//! [`aggregate`] reduces records into one [`Totals`] per distinct key, keeping groups in
//! the order their keys were first encountered. Ranking totals never count the quantity
//! of additional records; the trend tables in [`crate::core::buckets`] use
//! [`Totals::add_unconditional`] instead.

use crate::entities::record;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Summed figures for a group of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Number of records in the group
    pub record_count: u64,
    /// Sum of quantities
    pub quantity: i64,
    /// Sum of points
    pub points: i64,
    /// Number of implemented records
    pub implemented_count: u64,
}

impl Totals {
    /// Adds a record with ranking semantics: additional records contribute points but no
    /// quantity.
    pub fn add(&mut self, record: &record::Model) {
        self.record_count += 1;
        self.points += i64::from(record.points);
        if !record.is_additional {
            self.quantity += i64::from(record.quantity);
        }
        if record.implemented {
            self.implemented_count += 1;
        }
    }

    /// Adds a record counting its quantity whether or not it is additional.
    pub fn add_unconditional(&mut self, record: &record::Model) {
        self.record_count += 1;
        self.points += i64::from(record.points);
        self.quantity += i64::from(record.quantity);
        if record.implemented {
            self.implemented_count += 1;
        }
    }
}

/// Grouping key for the person ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonKey {
    /// Department the person logged the record under
    pub department: String,
    /// Person name, verbatim
    pub person_name: String,
}

/// Grouping key for the department ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DepartmentKey {
    /// Department name
    pub department: String,
}

/// Groups `records` by `key_fn` and sums each group.
///
/// Groups come back in the order their key first appeared in `records`.
pub fn aggregate<K, F>(records: &[record::Model], key_fn: F) -> Vec<(K, Totals)>
where
    K: Eq + Hash + Clone,
    F: Fn(&record::Model) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Totals)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(record);
    }

    groups
}

/// Totals per `(department, person name)` pair.
#[must_use]
pub fn by_person(records: &[record::Model]) -> Vec<(PersonKey, Totals)> {
    aggregate(records, |r| PersonKey {
        department: r.department.clone(),
        person_name: r.person_name.clone(),
    })
}

/// Totals per department.
#[must_use]
pub fn by_department(records: &[record::Model]) -> Vec<(DepartmentKey, Totals)> {
    aggregate(records, |r| DepartmentKey {
        department: r.department.clone(),
    })
}

/// Company-wide totals. Zero-valued for no records.
#[must_use]
pub fn company_totals(records: &[record::Model]) -> Totals {
    records.iter().fold(Totals::default(), |mut totals, r| {
        totals.add(r);
        totals
    })
}
