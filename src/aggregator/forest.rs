//! Rebuild the call hierarchy from a flat, unordered span list.
//!
//! Spans are sorted by start ascending, ties broken by end descending, so a
//! span that can be an ancestor of another is always seen first. The sorted
//! sequence is then scanned once with an explicit stack of open ancestors:
//! an ancestor that does not enclose the next span can gain no further
//! children, so it is closed and handed to its parent (or to the roots).
//!
//! Crossing intervals (overlapping without enclosure) are not rejected. The
//! later span simply does not belong to the earlier one and becomes its
//! sibling.
//!
//! Nothing here recurses, so nesting depth is bounded by memory only.

use crate::parser::schema::Span;
use log::debug;

/// Build the enclosure forest
///
/// **Public** - main entry point for hierarchy reconstruction
///
/// # Arguments
/// * `spans` - Flat spans in any order; existing `children` are discarded
///
/// # Returns
/// Root spans sorted by start, each owning its enclosed descendants
pub fn build_forest(spans: Vec<Span>) -> Vec<Span> {
    let span_count = spans.len();

    let mut sorted = spans;
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));

    let mut roots = Vec::new();
    let mut open: Vec<Span> = Vec::new();

    for mut span in sorted {
        span.children.clear();

        while open.last().is_some_and(|ancestor| !ancestor.encloses(&span)) {
            close_innermost(&mut open, &mut roots);
        }
        open.push(span);
    }

    while !open.is_empty() {
        close_innermost(&mut open, &mut roots);
    }

    debug!("Built forest of {} roots from {} spans", roots.len(), span_count);
    roots
}

/// Pop the innermost open span into its parent's children, or into the roots
///
/// **Private** - children arrive in sorted order, so each child list stays
/// sorted by start
fn close_innermost(open: &mut Vec<Span>, roots: &mut Vec<Span>) {
    if let Some(span) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(span),
            None => roots.push(span),
        }
    }
}

/// Visit every span of the forest in pre-order
///
/// **Public** - aggregation runs over all spans regardless of depth
pub fn flatten_forest(forest: &[Span]) -> Vec<&Span> {
    let mut flat = Vec::new();
    let mut stack: Vec<&Span> = forest.iter().rev().collect();

    while let Some(span) = stack.pop() {
        flat.push(span);
        stack.extend(span.children.iter().rev());
    }

    flat
}

/// Depth of the deepest span (roots are depth 1)
pub fn forest_depth(forest: &[Span]) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&Span, usize)> = forest.iter().map(|root| (root, 1)).collect();

    while let Some((span, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(span.children.iter().map(|child| (child, depth + 1)));
    }

    deepest
}
