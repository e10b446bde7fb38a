//! Exclusive ("self") time over a reconstructed forest.
//!
//! A span's exclusive time is its duration minus the durations of its
//! immediate children. Grandchildren are already inside their parent's
//! duration and are not subtracted again.

use crate::parser::schema::Span;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A span whose exclusive time came out negative
///
/// Only reachable when siblings overlap, i.e. the trace contained crossing
/// intervals. Reported alongside the results, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfTimeAnomaly {
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub exclusive_time: i64,
}

/// Annotate every span in the forest with its exclusive time
///
/// **Public** - main entry point for self-time computation
///
/// Pre-order walk over an explicit stack; each span is visited exactly once
/// and only needs its immediate children's durations. Running it again on
/// the same forest yields the same values.
///
/// # Returns
/// Every span whose exclusive time is negative, in pre-order
pub fn compute_self_times(forest: &mut [Span]) -> Vec<SelfTimeAnomaly> {
    let mut anomalies = Vec::new();
    let mut stack: Vec<&mut Span> = forest.iter_mut().rev().collect();

    while let Some(span) = stack.pop() {
        let exclusive_time = span.duration() - span.child_time();
        span.exclusive_time = Some(exclusive_time);

        if exclusive_time < 0 {
            warn!(
                "Negative self time {} for '{}' [{}, {}]",
                exclusive_time, span.name, span.start, span.end
            );
            anomalies.push(SelfTimeAnomaly {
                name: span.name.clone(),
                start: span.start,
                end: span.end,
                exclusive_time,
            });
        }

        stack.extend(span.children.iter_mut().rev());
    }

    if anomalies.is_empty() {
        debug!("Self time computed with no anomalies");
    } else {
        warn!(
            "{} spans have negative self time (overlapping siblings in trace)",
            anomalies.len()
        );
    }

    anomalies
}
