//! Plain-text rendering for terminal output.

use crate::aggregator::{Group, TraceTotals};
use crate::parser::schema::Span;

/// Format a duration in trace units (microseconds) as a whole number
pub fn format_us(time: f64) -> String {
    format!("{} us", time.trunc() as i64)
}

/// One line per group:
/// `conv1 (conv) 3 events, mean: 20 us, stddev: 8 us, total: 60 us (10.00%)`
pub fn format_group_line(group: &Group) -> String {
    let percent = group
        .percent_of_covered
        .map(|pc| format!("{:.2}%", pc))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{} {} events, mean: {}, stddev: {}, total: {} ({})",
        group.key,
        group.count,
        format_us(group.mean),
        format_us(group.std_dev),
        format_us(group.sum as f64),
        percent
    )
}

/// Trace totals block
pub fn format_summary(totals: &TraceTotals) -> String {
    [
        format!(
            "Total time of trace: {}",
            format_us(totals.total_time as f64)
        ),
        format!(
            "Time covered by events: {}",
            format_us(totals.covered_time as f64)
        ),
        format!(
            "Unattributed time: {}",
            format_us(totals.unattributed_time as f64)
        ),
    ]
    .join("\n")
}

/// Indented tree, one tab per level: `name (category)`
pub fn render_tree(forest: &[Span]) -> String {
    let mut lines = Vec::new();
    let mut stack: Vec<(&Span, usize)> = forest.iter().rev().map(|root| (root, 0)).collect();

    while let Some((span, depth)) = stack.pop() {
        lines.push(format!("{}{} ({})", "\t".repeat(depth), span.name, span.category));
        stack.extend(span.children.iter().rev().map(|child| (child, depth + 1)));
    }

    lines.join("\n")
}
