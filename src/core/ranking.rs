//! Ranking of aggregated groups by points.

use crate::core::aggregate::Totals;
use serde::Serialize;

/// One position in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry<K> {
    /// 1-based position; positions 1 to 3 receive medals in presentation
    pub rank: usize,
    /// Group key (person or department)
    #[serde(flatten)]
    pub key: K,
    /// Summed figures for the group
    pub totals: Totals,
}

/// Orders groups by points, highest first.
///
/// The sort is stable, so groups with equal points keep the order they arrived in, which
/// for [`crate::core::aggregate`] output is the order their keys were first encountered.
#[must_use]
pub fn rank<K>(mut groups: Vec<(K, Totals)>) -> Vec<RankedEntry<K>> {
    groups.sort_by(|(_, a), (_, b)| b.points.cmp(&a.points));

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (key, totals))| RankedEntry {
            rank: i + 1,
            key,
            totals,
        })
        .collect()
}
