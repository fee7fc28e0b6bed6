use super::*;
use crate::graph::model::EdgeKey;
use crate::graph::spec::ElementSpec;
use crate::sequence::event::{Effect, ElementRef, TargetKind};
use crate::sequence::resolve::{DEFAULT_EXPLICIT_DURATION, DropReason};
use serde_json::json;

fn graph(json: &str) -> Graph {
    Graph::from_json_str(json).unwrap()
}

fn chain() -> Graph {
    graph(
        r#"{"title": "t",
            "nodes": [{"id": "A", "label": "A"}, {"id": "B", "label": "B"}, {"id": "C", "label": "C"}],
            "edges": [{"from": "A", "to": "B"}, {"from": "B", "to": "C"}]}"#,
    )
}

fn anim(element: &str, effect: &str) -> AnimationSpec {
    AnimationSpec {
        element: Some(ElementSpec::Name(element.to_string())),
        effect: Some(json!(effect)),
        duration: None,
        order: Some(json!(1)),
    }
}

fn summary(t: &Timeline) -> Vec<(String, Effect, u32)> {
    t.events()
        .map(|e| (e.element.to_string(), e.effect, e.order))
        .collect()
}

#[test]
fn chain_fades_nodes_then_draws_edges() {
    let t = sequence(&chain(), None);
    assert_eq!(
        summary(&t),
        vec![
            ("A".to_string(), Effect::FadeIn, 1),
            ("B".to_string(), Effect::FadeIn, 2),
            ("C".to_string(), Effect::FadeIn, 3),
            ("A->B".to_string(), Effect::Draw, 4),
            ("B->C".to_string(), Effect::Draw, 5),
        ]
    );
    assert_eq!(
        t.source(),
        TimelineSource::Derived {
            degraded_ordering: false
        }
    );
    assert_eq!(t.max_order(), 5);
    assert_eq!(t.groups()[0].duration, 0.5);
    assert_eq!(t.groups()[4].duration, 0.3);
}

#[test]
fn derived_order_is_topological_not_declaration() {
    let g = graph(
        r#"{"title": "t",
            "nodes": [{"id": "b", "label": "B"}, {"id": "a", "label": "A"}],
            "edges": [{"from": "a", "to": "b"}]}"#,
    );
    let t = sequence(&g, None);
    let first: Vec<_> = summary(&t).into_iter().map(|(id, _, _)| id).collect();
    assert_eq!(first, ["a", "b", "a->b"]);
}

#[test]
fn cycle_degrades_but_covers_every_element() {
    let g = graph(
        r#"{"title": "t",
            "nodes": [{"id": "A", "label": "A"}, {"id": "B", "label": "B"}],
            "edges": [{"from": "A", "to": "B"}, {"from": "B", "to": "A"}]}"#,
    );
    let t = sequence(&g, None);
    assert!(t.degraded_ordering());
    assert_eq!(
        summary(&t),
        vec![
            ("A".to_string(), Effect::FadeIn, 1),
            ("B".to_string(), Effect::FadeIn, 2),
            ("A->B".to_string(), Effect::Draw, 3),
            ("B->A".to_string(), Effect::Draw, 4),
        ]
    );
}

#[test]
fn self_loop_counts_as_cycle() {
    let g = graph(
        r#"{"title": "t", "nodes": [{"id": "x", "label": "X"}], "edges": [{"from": "x", "to": "x"}]}"#,
    );
    let t = sequence(&g, None);
    assert!(t.degraded_ordering());
    assert_eq!(t.event_count(), 2);
}

#[test]
fn empty_explicit_list_derives_default() {
    let t = sequence(&chain(), Some(&[]));
    assert!(matches!(t.source(), TimelineSource::Derived { .. }));
    assert_eq!(t.event_count(), 5);
}

#[test]
fn explicit_defaults_and_grouping() {
    let mut slow = anim("B", "pulse");
    slow.duration = Some(json!(2.0));
    let mut early = anim("A", "fadeIn");
    early.order = None;
    let t = sequence(&chain(), Some(&[anim("A", "highlight"), slow, early]));

    assert_eq!(t.source(), TimelineSource::Explicit);
    assert!(t.dropped().is_empty());
    assert_eq!(t.groups().len(), 2);
    assert_eq!(t.groups()[0].order, 0);
    assert_eq!(t.groups()[0].duration, DEFAULT_EXPLICIT_DURATION);
    assert_eq!(t.groups()[1].order, 1);
    assert_eq!(t.groups()[1].duration, 2.0);
    assert_eq!(t.groups()[1].events[0].effect, Effect::Highlight);
    assert_eq!(t.max_order(), 1);
}

#[test]
fn legacy_edge_names_resolve_with_underscored_ids_and_reversal() {
    let g = graph(
        r#"{"title": "t",
            "nodes": [{"id": "load_data", "label": "L"}, {"id": "check", "label": "C"}],
            "edges": [{"from": "load_data", "to": "check"}]}"#,
    );
    let t = sequence(
        &g,
        Some(&[
            anim("edge_load_data_check", "draw"),
            anim("edge_check_load_data", "highlight"),
        ]),
    );
    assert!(t.dropped().is_empty());
    for e in t.events() {
        assert_eq!(
            e.element,
            ElementRef::Edge(EdgeKey::plain("load_data", "check"))
        );
    }
}

#[test]
fn unlabeled_reference_expands_to_parallel_edges() {
    let g = graph(
        r#"{"title": "t",
            "nodes": [{"id": "d", "label": "D"}, {"id": "x", "label": "X"}],
            "edges": [{"from": "d", "to": "x", "label": "yes"}, {"from": "d", "to": "x", "label": "no"}]}"#,
    );
    let all = AnimationSpec {
        element: Some(ElementSpec::Edge {
            from: "d".to_string(),
            to: "x".to_string(),
            label: None,
        }),
        effect: Some(json!("draw")),
        duration: None,
        order: Some(json!(2)),
    };
    let mut one = all.clone();
    one.element = Some(ElementSpec::Edge {
        from: "d".to_string(),
        to: "x".to_string(),
        label: Some("no".to_string()),
    });
    one.order = Some(json!(3));

    let t = sequence(&g, Some(&[all, one]));
    assert_eq!(t.groups()[0].events.len(), 2);
    assert_eq!(
        t.groups()[1].events[0].element,
        ElementRef::Edge(EdgeKey::new("d", "x", Some("no")))
    );
}

#[test]
fn invalid_explicit_events_are_dropped_with_reasons() {
    let mut zero = anim("A", "fadeIn");
    zero.duration = Some(json!(0.0));
    let mut negative = anim("A", "fadeIn");
    negative.order = Some(json!(-1));
    let missing = AnimationSpec {
        element: None,
        ..anim("A", "fadeIn")
    };

    let t = sequence(
        &chain(),
        Some(&[
            anim("ghost", "fadeIn"),
            anim("A", "spin"),
            anim("edge_A_B", "pulse"),
            anim("A", "draw"),
            zero,
            negative,
            missing,
            anim("C", "fadeIn"),
        ]),
    );

    let reasons: Vec<_> = t.dropped().iter().map(|d| (d.index, d.reason.clone())).collect();
    assert_eq!(
        reasons,
        vec![
            (
                0,
                DropReason::UnresolvedElement {
                    element: "ghost".to_string()
                }
            ),
            (
                1,
                DropReason::UnknownEffect {
                    effect: "spin".to_string()
                }
            ),
            (
                2,
                DropReason::EffectNotApplicable {
                    effect: Effect::Pulse,
                    target: TargetKind::Edge
                }
            ),
            (
                3,
                DropReason::EffectNotApplicable {
                    effect: Effect::Draw,
                    target: TargetKind::Node
                }
            ),
            (4, DropReason::InvalidDuration { duration: json!(0.0) }),
            (5, DropReason::InvalidOrder { order: json!(-1) }),
            (6, DropReason::MissingElement),
        ]
    );
    assert_eq!(t.event_count(), 1);
}

#[test]
fn all_dropped_yields_empty_explicit_timeline() {
    let t = sequence(&chain(), Some(&[anim("nope", "fadeIn")]));
    assert!(t.is_empty());
    assert_eq!(t.source(), TimelineSource::Explicit);
    assert_eq!(t.max_order(), 0);
    assert_eq!(t.last_step(), 1);
}

#[test]
fn effect_names_parse_loosely() {
    assert_eq!(Effect::parse("fadeIn"), Some(Effect::FadeIn));
    assert_eq!(Effect::parse("fade_in"), Some(Effect::FadeIn));
    assert_eq!(Effect::parse(" Highlight "), Some(Effect::Highlight));
    assert_eq!(Effect::parse("wobble"), None);
}

#[test]
fn odd_element_shapes_are_dropped_not_fatal() {
    let spec = crate::graph::spec::DiagramSpec::from_json_str(
        r#"{"title": "t", "nodes": [{"id": "A", "label": "A"}], "edges": [],
            "animations": [{"element": 42, "effect": "fadeIn"}, {"element": "A", "effect": "fadeIn"}]}"#,
    )
    .unwrap();
    let g = Graph::build(&spec).unwrap();
    let t = sequence(&g, spec.explicit_animations());
    assert_eq!(
        t.dropped()[0].reason,
        DropReason::UnresolvedElement {
            element: "42".to_string()
        }
    );
    assert_eq!(t.event_count(), 1);
}

#[test]
fn loosely_typed_animation_fields_drop_only_their_entry() {
    let spec = crate::graph::spec::DiagramSpec::from_json_str(
        r#"{"title": "t",
            "nodes": [{"id": "A", "label": "A"}, {"id": "B", "label": "B"}],
            "edges": [{"from": "A", "to": "B"}],
            "animations": [
              {"element": "A", "effect": "fadeIn", "order": 2.0},
              {"element": "B", "effect": "fadeIn", "order": 1, "duration": "0.5"},
              {"element": "B", "effect": 7, "order": 1},
              {"element": "A", "effect": "highlight", "order": 1.5},
              {"element": "edge_A_B", "effect": "draw", "order": 3, "duration": 0.25}
            ]}"#,
    )
    .unwrap();
    let g = Graph::build(&spec).unwrap();
    let t = sequence(&g, spec.explicit_animations());

    assert_eq!(
        summary(&t),
        vec![
            ("A".to_string(), Effect::FadeIn, 2),
            ("A->B".to_string(), Effect::Draw, 3),
        ]
    );
    assert_eq!(t.groups()[1].duration, 0.25);

    let reasons: Vec<_> = t.dropped().iter().map(|d| (d.index, d.reason.clone())).collect();
    assert_eq!(
        reasons,
        vec![
            (1, DropReason::InvalidDuration { duration: json!("0.5") }),
            (
                2,
                DropReason::UnknownEffect {
                    effect: "7".to_string()
                }
            ),
            (3, DropReason::InvalidOrder { order: json!(1.5) }),
        ]
    );
}
