//! Aggregate self time by logical operation and compute trace totals.
//!
//! Groups are the primary reporting rows: how many spans share a key, how
//! their exclusive times are distributed, and what share of the covered
//! time they account for.

use crate::parser::schema::Span;
use crate::utils::error::AnalysisError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated self-time statistics for one key
///
/// **Public** - returned from aggregate_by_key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub key: String,

    /// Number of spans sharing the key
    pub count: usize,

    /// Mean exclusive time
    pub mean: f64,

    /// Population standard deviation of exclusive time
    pub std_dev: f64,

    /// Summed exclusive time
    pub sum: i64,

    /// `sum / covered_time * 100`, absent when nothing was covered
    pub percent_of_covered: Option<f64>,
}

/// Scalar totals of a reconstructed forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceTotals {
    /// Last root's end minus first root's start
    pub total_time: i64,

    /// Summed root durations
    pub covered_time: i64,

    /// `total_time - covered_time`
    pub unattributed_time: i64,
}

impl TraceTotals {
    /// Compute totals from the forest roots
    ///
    /// **Public** - roots need not be sorted
    ///
    /// # Errors
    /// * `AnalysisError::EmptyTrace` - forest has no roots
    pub fn from_forest(forest: &[Span]) -> Result<Self, AnalysisError> {
        let first = forest
            .iter()
            .min_by_key(|s| s.start)
            .ok_or(AnalysisError::EmptyTrace)?;
        let last = forest
            .iter()
            .max_by_key(|s| s.start)
            .ok_or(AnalysisError::EmptyTrace)?;

        let total_time = last.end - first.start;
        let covered_time: i64 = forest.iter().map(Span::duration).sum();

        Ok(Self {
            total_time,
            covered_time,
            unattributed_time: total_time - covered_time,
        })
    }
}

/// Group spans by key and compute self-time statistics
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `spans` - Every span to consider, typically `flatten_forest(&forest)`
/// * `key_of` - Label generator; spans with equal labels share a group
/// * `category_marker` - Only spans whose category contains this substring
///   are aggregated (empty matches everything)
/// * `covered_time` - Denominator for `percent_of_covered`
///
/// # Returns
/// Groups in order of first appearance
///
/// # Errors
/// * `AnalysisError::SelfTimeMissing` - a selected span was never annotated
pub fn aggregate_by_key<'a, I, F>(
    spans: I,
    key_of: F,
    category_marker: &str,
    covered_time: i64,
) -> Result<Vec<Group>, AnalysisError>
where
    I: IntoIterator<Item = &'a Span>,
    F: Fn(&Span) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<i64>)> = Vec::new();

    for span in spans {
        if !span.category.contains(category_marker) {
            continue;
        }

        let self_time = span
            .exclusive_time
            .ok_or_else(|| AnalysisError::SelfTimeMissing(span.name.clone()))?;

        let key = key_of(span);
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, Vec::new()));
                buckets.len() - 1
            }
        };

        if let Some((_, times)) = buckets.get_mut(slot) {
            times.push(self_time);
        }
    }

    if covered_time <= 0 {
        debug!("Covered time is zero, percentages are left unset");
    }

    let groups: Vec<Group> = buckets
        .into_iter()
        .map(|(key, times)| summarize_group(key, &times, covered_time))
        .collect();

    debug!("Aggregated into {} groups", groups.len());
    Ok(groups)
}

/// Compute statistics for one non-empty group
///
/// **Private** - internal helper for aggregate_by_key
fn summarize_group(key: String, times: &[i64], covered_time: i64) -> Group {
    let count = times.len();
    let sum: i64 = times.iter().sum();
    let mean = sum as f64 / count.max(1) as f64;

    let variance = times
        .iter()
        .map(|t| {
            let delta = *t as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count.max(1) as f64;

    let percent_of_covered = if covered_time > 0 {
        Some(sum as f64 / covered_time as f64 * 100.0)
    } else {
        None
    };

    Group {
        key,
        count,
        mean,
        std_dev: variance.sqrt(),
        sum,
        percent_of_covered,
    }
}

/// Order groups by summed self time, largest first
///
/// **Public** - presentation helper; ties keep their relative order
pub fn sort_by_total(groups: &mut [Group]) {
    groups.sort_by(|a, b| b.sum.cmp(&a.sum));
}

/// Reorder groups to follow the first appearance of their key in `keys`
///
/// **Public** - lets callers that aggregate over the forest report groups in
/// trace emission order. Groups whose key never appears go last, keeping
/// their relative order.
pub fn order_by_first_appearance<I>(groups: &mut [Group], keys: I)
where
    I: IntoIterator<Item = String>,
{
    let mut rank: HashMap<String, usize> = HashMap::new();
    for key in keys {
        let next = rank.len();
        rank.entry(key).or_insert(next);
    }

    groups.sort_by_key(|group| rank.get(&group.key).copied().unwrap_or(usize::MAX));
}
