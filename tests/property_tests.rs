use proptest::prelude::*;
use span_profiler::aggregator::{build_forest, compute_self_times, flatten_forest, TraceTotals};
use span_profiler::parser::Span;

/// Shape of a well-nested trace: each node starts `lead` after the previous
/// sibling and keeps `pad` of its own time on both sides of its children.
#[derive(Debug, Clone)]
struct Layout {
    lead: i64,
    pad: i64,
    children: Vec<Layout>,
}

fn layout() -> impl Strategy<Value = Layout> {
    let leaf = (0i64..5, 1i64..5).prop_map(|(lead, pad)| Layout {
        lead,
        pad,
        children: Vec::new(),
    });

    leaf.prop_recursive(4, 64, 4, |inner| {
        (0i64..5, 1i64..5, prop::collection::vec(inner, 0..4)).prop_map(
            |(lead, pad, children)| Layout {
                lead,
                pad,
                children,
            },
        )
    })
}

fn place(nodes: &[Layout], mut cursor: i64, out: &mut Vec<Span>) -> i64 {
    for node in nodes {
        let start = cursor + node.lead;
        let inner_end = place(&node.children, start + node.pad, out);
        let end = inner_end + node.pad;
        out.push(Span::new(format!("s{}", out.len()), "conv", start, end));
        cursor = end;
    }
    cursor
}

fn nested_spans() -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec(layout(), 1..6).prop_flat_map(|roots| {
        let mut spans = Vec::new();
        place(&roots, 0, &mut spans);
        Just(spans).prop_shuffle()
    })
}

fn arbitrary_spans() -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec((0i64..200, 0i64..50), 0..40).prop_map(|intervals| {
        intervals
            .into_iter()
            .enumerate()
            .map(|(i, (start, len))| Span::new(format!("s{}", i), "conv", start, start + len))
            .collect()
    })
}

fn assert_enclosed(span: &Span) {
    for child in &span.children {
        assert!(span.start <= child.start && child.end <= span.end);
        assert_enclosed(child);
    }
}

fn assert_siblings_disjoint(siblings: &[Span]) {
    for pair in siblings.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
    for span in siblings {
        assert_siblings_disjoint(&span.children);
    }
}

proptest! {
    #[test]
    fn children_are_enclosed_by_parents(spans in arbitrary_spans()) {
        let forest = build_forest(spans);
        for root in &forest {
            assert_enclosed(root);
        }
    }

    #[test]
    fn reconstruction_keeps_every_span(spans in arbitrary_spans()) {
        let count = spans.len();
        let forest = build_forest(spans);
        prop_assert_eq!(flatten_forest(&forest).len(), count);
    }

    #[test]
    fn self_time_is_conserved(spans in arbitrary_spans()) {
        let mut forest = build_forest(spans);
        compute_self_times(&mut forest);

        for span in flatten_forest(&forest) {
            let exclusive = span.exclusive_time.unwrap();
            prop_assert_eq!(exclusive + span.child_time(), span.duration());
        }
    }

    #[test]
    fn well_nested_siblings_never_overlap(spans in nested_spans()) {
        let forest = build_forest(spans);
        assert_siblings_disjoint(&forest);
    }

    #[test]
    fn well_nested_trace_has_no_anomalies(spans in nested_spans()) {
        let mut forest = build_forest(spans);
        let anomalies = compute_self_times(&mut forest);

        prop_assert!(anomalies.is_empty());
        for span in flatten_forest(&forest) {
            prop_assert!(span.exclusive_time.unwrap() >= 0);
        }
    }

    #[test]
    fn covered_time_identity(spans in nested_spans()) {
        let forest = build_forest(spans);
        let totals = TraceTotals::from_forest(&forest).unwrap();

        let root_sum: i64 = forest.iter().map(Span::duration).sum();
        prop_assert_eq!(totals.covered_time, root_sum);
        prop_assert!(totals.total_time >= totals.covered_time);
        prop_assert_eq!(totals.unattributed_time, totals.total_time - totals.covered_time);
    }
}
