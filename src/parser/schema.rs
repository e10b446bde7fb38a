//! Raw trace record and span schema definitions.
//!
//! `RawRecord` mirrors one entry of a Chrome-style trace document as emitted
//! by the instrumented runtime. `Span` is the normalized interval that the
//! rest of the pipeline works on.

use crate::utils::config::{CATEGORY_ARG_KEYS, RUNTIME_CATEGORY};
use serde::{Deserialize, Serialize};

/// Record phase discriminator (the `ph` field)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Phase {
    /// `X` - complete record carrying its own duration
    Complete,
    /// `B` - opens a span closed by a later `E` with the same name
    Begin,
    /// `E` - closes the pending span of the same name
    End,
    /// Anything else (instant events, counters, metadata...)
    Other(String),
}

impl From<String> for Phase {
    fn from(ph: String) -> Self {
        match ph.as_str() {
            "X" => Self::Complete,
            "B" => Self::Begin,
            "E" => Self::End,
            _ => Self::Other(ph),
        }
    }
}

/// Timestamp or duration as found in the wild: integer, float or numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Timestamp {
    /// Integer value in trace time units, truncating fractional parts.
    ///
    /// Returns `None` for non-numeric text and non-finite floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => float_to_i64(*v),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
            }
        }
    }
}

fn float_to_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.abs() < i64::MAX as f64 {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

/// One raw trace record
///
/// Every field is optional here; the normalizer decides which records are
/// usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "ph")]
    pub phase: Option<Phase>,

    #[serde(default)]
    pub ts: Option<Timestamp>,

    /// Only meaningful for complete (`X`) records
    #[serde(default)]
    pub dur: Option<Timestamp>,

    #[serde(default)]
    pub args: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RawRecord {
    /// Complete record with an explicit duration
    pub fn complete(name: impl Into<String>, ts: i64, dur: i64) -> Self {
        Self {
            name: Some(name.into()),
            phase: Some(Phase::Complete),
            ts: Some(Timestamp::Int(ts)),
            dur: Some(Timestamp::Int(dur)),
            args: None,
        }
    }

    /// Begin marker
    pub fn begin(name: impl Into<String>, ts: i64) -> Self {
        Self {
            name: Some(name.into()),
            phase: Some(Phase::Begin),
            ts: Some(Timestamp::Int(ts)),
            dur: None,
            args: None,
        }
    }

    /// End marker
    pub fn end(name: impl Into<String>, ts: i64) -> Self {
        Self {
            name: Some(name.into()),
            phase: Some(Phase::End),
            ts: Some(Timestamp::Int(ts)),
            dur: None,
            args: None,
        }
    }

    /// Attach a classification tag under `args.type`
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.args
            .get_or_insert_with(serde_json::Map::new)
            .insert("type".to_string(), serde_json::Value::String(category.into()));
        self
    }

    /// Classification tag: `args.type`, else `args.kind`, else the runtime category
    pub fn category(&self) -> String {
        let Some(args) = &self.args else {
            return RUNTIME_CATEGORY.to_string();
        };

        CATEGORY_ARG_KEYS
            .iter()
            .find_map(|key| args.get(*key))
            .map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| RUNTIME_CATEGORY.to_string())
    }
}

/// A named, timed interval representing one unit of execution
///
/// `children` is filled by the forest builder and `exclusive_time` by the
/// self-time pass; spans coming out of the normalizer have neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub name: String,
    pub category: String,
    pub start: i64,
    pub end: i64,

    /// Immediately enclosed spans, sorted by start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Span>,

    /// Duration minus the durations of the immediate children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_time: Option<i64>,
}

impl Span {
    pub fn new(name: impl Into<String>, category: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            start,
            end,
            children: Vec::new(),
            exclusive_time: None,
        }
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// True if this span totally encloses `other` (shared endpoints count)
    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Summed duration of the immediate children
    pub fn child_time(&self) -> i64 {
        self.children.iter().map(Span::duration).sum()
    }
}

// Zero-length markers can nest tens of thousands deep; the compiler's drop
// glue would recurse once per level.
impl Drop for Span {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut span) = pending.pop() {
            pending.append(&mut span.children);
        }
    }
}
