//! Convert raw trace records into a flat list of spans.
//!
//! Complete (`X`) records become spans immediately. Begin (`B`) markers open
//! a pending span keyed by name, and the next end (`E`) marker with that
//! name closes it. Pending entries live only for the duration of one call.
//!
//! There is no depth counter: a second begin for a name that is still open
//! replaces the earlier one, whose data is lost. End markers without a
//! pending begin are dropped.

use super::schema::{Phase, RawRecord, Span};
use crate::utils::config::RUNTIME_CATEGORY;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;

/// Record filters applied before a record reaches the span list
///
/// **Public** - built by the analyze command from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Keep only records whose name or category matches (anchored at the start)
    pub event_pattern: Option<Regex>,

    /// Keep runtime-overhead records (ignored when `event_pattern` is set)
    pub include_runtime: bool,

    /// Drop this many leading records that survive the other filters
    pub skip: usize,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` so that it must match at the start of the string
    pub fn with_event_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.event_pattern = Some(Regex::new(&format!("^(?:{})", pattern))?);
        Ok(self)
    }

    pub fn with_runtime(mut self, include_runtime: bool) -> Self {
        self.include_runtime = include_runtime;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Decide whether a record passes the name/category filters
    ///
    /// **Private** - the skip counter is handled by the caller
    fn accepts(&self, name: &str, category: &str) -> bool {
        match &self.event_pattern {
            Some(pattern) => pattern.is_match(name) || pattern.is_match(category),
            None => self.include_runtime || category != RUNTIME_CATEGORY,
        }
    }
}

/// Open begin marker waiting for its end
struct PendingSpan {
    category: String,
    start: i64,
}

/// Normalize raw records into spans
///
/// **Public** - main entry point for span normalization
///
/// # Arguments
/// * `records` - Raw records in document order
/// * `options` - Filters to apply
///
/// # Returns
/// Spans in emission order: complete records at their own position, paired
/// spans at the position of their end marker
pub fn normalize_records<I>(records: I, options: &NormalizeOptions) -> Vec<Span>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut spans = Vec::new();
    let mut pending: HashMap<String, PendingSpan> = HashMap::new();
    let mut to_skip = options.skip;
    let mut stray_ends = 0usize;

    for record in records {
        let category = record.category();

        let RawRecord {
            name, phase, ts, dur, ..
        } = record;

        let Some(name) = name else {
            continue;
        };

        let (Some(phase), Some(start)) = (phase, ts.as_ref().and_then(|t| t.as_i64())) else {
            warn!("Skipping record '{}' without a usable phase or timestamp", name);
            continue;
        };

        if !options.accepts(&name, &category) {
            continue;
        }

        if to_skip > 0 {
            to_skip -= 1;
            continue;
        }

        match phase {
            Phase::Complete => {
                let Some(end) = dur
                    .as_ref()
                    .and_then(|d| d.as_i64())
                    .filter(|d| *d >= 0)
                    .and_then(|d| start.checked_add(d))
                else {
                    warn!("Skipping complete record '{}' without a valid duration", name);
                    continue;
                };
                spans.push(Span::new(name, category, start, end));
            }

            Phase::Begin => {
                if pending
                    .insert(name.clone(), PendingSpan { category, start })
                    .is_some()
                {
                    debug!("Begin marker for '{}' replaces an open one", name);
                }
            }

            Phase::End => match pending.remove(&name) {
                Some(open) if start >= open.start => {
                    spans.push(Span::new(name, open.category, open.start, start));
                }
                Some(open) => {
                    warn!(
                        "Dropping span '{}': end {} precedes begin {}",
                        name, start, open.start
                    );
                }
                None => stray_ends += 1,
            },

            Phase::Other(ph) => {
                debug!("Ignoring '{}' record with phase '{}'", name, ph);
            }
        }
    }

    if stray_ends > 0 {
        debug!("Dropped {} end markers with no matching begin", stray_ends);
    }
    if !pending.is_empty() {
        debug!("{} begin markers were never closed", pending.len());
    }

    debug!("Normalized {} spans", spans.len());
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_records() -> NormalizeOptions {
        NormalizeOptions::new().with_runtime(true)
    }

    #[test]
    fn test_complete_record() {
        let spans = normalize_records(vec![RawRecord::complete("a", 10, 5)], &all_records());

        assert_eq!(spans, vec![Span::new("a", RUNTIME_CATEGORY, 10, 15)]);
    }

    #[test]
    fn test_begin_end_pairing_uses_begin_category() {
        let records = vec![
            RawRecord::begin("a", 0).with_category("conv"),
            RawRecord::end("a", 50).with_category("conv_end"),
        ];

        let spans = normalize_records(records, &all_records());
        assert_eq!(spans, vec![Span::new("a", "conv", 0, 50)]);
    }

    #[test]
    fn test_unclosed_begin_emits_nothing() {
        let spans = normalize_records(vec![RawRecord::begin("A", 0)], &all_records());
        assert!(spans.is_empty());
    }

    #[test]
    fn test_stray_end_is_dropped() {
        let records = vec![RawRecord::end("a", 5), RawRecord::complete("b", 0, 1)];

        let spans = normalize_records(records, &all_records());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "b");
    }

    #[test]
    fn test_second_begin_overwrites_first() {
        let records = vec![
            RawRecord::begin("a", 0),
            RawRecord::begin("a", 10),
            RawRecord::end("a", 20),
            RawRecord::end("a", 30),
        ];

        let spans = normalize_records(records, &all_records());
        assert_eq!(spans, vec![Span::new("a", RUNTIME_CATEGORY, 10, 20)]);
    }

    #[test]
    fn test_nameless_and_timeless_records_skipped() {
        let records = vec![
            RawRecord {
                name: None,
                ..RawRecord::complete("x", 0, 1)
            },
            RawRecord {
                ts: None,
                ..RawRecord::complete("y", 0, 1)
            },
            RawRecord {
                dur: None,
                ..RawRecord::complete("z", 0, 1)
            },
        ];

        assert!(normalize_records(records, &all_records()).is_empty());
    }

    #[test]
    fn test_runtime_records_dropped_by_default() {
        let records = vec![
            RawRecord::complete("memcpy", 0, 5),
            RawRecord::complete("conv1", 5, 5).with_category("conv"),
        ];

        let spans = normalize_records(records, &NormalizeOptions::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "conv1");
    }

    #[test]
    fn test_event_pattern_matches_name_or_category() {
        let records = vec![
            RawRecord::complete("conv1", 0, 5).with_category("convolution"),
            RawRecord::complete("relu1", 5, 5).with_category("activation"),
            RawRecord::complete("fused", 10, 5).with_category("conv_relu"),
            RawRecord::complete("memcpy", 15, 5),
        ];

        let options = NormalizeOptions::new().with_event_pattern("conv").unwrap();
        let names: Vec<_> = normalize_records(records, &options)
            .into_iter()
            .map(|s| s.name.clone())
            .collect();

        assert_eq!(names, vec!["conv1", "fused"]);
    }

    #[test]
    fn test_event_pattern_is_anchored() {
        let records = vec![RawRecord::complete("depthwise_conv", 0, 5).with_category("dw")];

        let options = NormalizeOptions::new().with_event_pattern("conv").unwrap();
        assert!(normalize_records(records, &options).is_empty());
    }

    #[test]
    fn test_event_pattern_keeps_runtime_records() {
        let records = vec![RawRecord::complete("runtime_sync", 0, 5)];

        let options = NormalizeOptions::new().with_event_pattern("runtime").unwrap();
        assert_eq!(normalize_records(records, &options).len(), 1);
    }

    #[test]
    fn test_skip_counts_markers_individually() {
        let records = vec![
            RawRecord::complete("warmup", 0, 5),
            RawRecord::begin("a", 10),
            RawRecord::end("a", 20),
            RawRecord::complete("b", 30, 5),
        ];

        let options = all_records().with_skip(2);
        let spans = normalize_records(records, &options);

        // the begin marker was skipped, so its end is stray
        assert_eq!(spans, vec![Span::new("b", RUNTIME_CATEGORY, 30, 35)]);
    }

    #[test]
    fn test_end_before_begin_dropped() {
        let records = vec![RawRecord::begin("a", 10), RawRecord::end("a", 5)];
        assert!(normalize_records(records, &all_records()).is_empty());
    }

    #[test]
    fn test_negative_duration_dropped() {
        let records = vec![RawRecord::complete("a", 10, -5)];
        assert!(normalize_records(records, &all_records()).is_empty());
    }
}
