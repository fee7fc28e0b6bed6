use super::*;
use crate::layout::Orientation;

#[test]
fn partial_options_fill_in_defaults() {
    let opts = EngineOpts::from_json_str(
        r#"{"layout": {"orientation": "left_to_right"}, "playback": {"speed": 2.0}}"#,
    )
    .unwrap();
    assert_eq!(opts.layout.orientation, Orientation::LeftToRight);
    assert_eq!(opts.layout.scale, 1.0);
    assert_eq!(opts.playback.speed, 2.0);
    assert_eq!(opts.export, ExportParams::default());
    assert_eq!(opts.threading, ExportThreading::default());
    assert_eq!(EngineOpts::from_json_str("{}").unwrap(), EngineOpts::default());
}

#[test]
fn invalid_options_are_rejected() {
    for json in [
        r#"{"playback": {"speed": 0}}"#,
        r#"{"export": {"fps": 0}}"#,
        r#"{"layout": {"scale": -1}}"#,
    ] {
        assert!(matches!(
            EngineOpts::from_json_str(json),
            Err(FlowError::Config(_))
        ));
    }
    assert!(matches!(
        EngineOpts::from_json_str("{"),
        Err(FlowError::Serde(_))
    ));
}

#[test]
fn diagram_keeps_graph_layout_and_timeline_together() {
    let d = Diagram::from_json_str(
        r#"{"title": "t",
            "nodes": [{"id": "a", "label": "A", "type": "start"}, {"id": "b", "label": "B", "type": "end"}],
            "edges": [{"from": "a", "to": "b"}]}"#,
        &LayoutOpts::default(),
    )
    .unwrap();
    assert_eq!(d.graph().title(), "t");
    assert_eq!(d.layout().len(), 2);
    assert_eq!(d.timeline().max_order(), 3);
    assert!(d.state(Snapshot::Final).is_calm());
    assert_eq!(
        d.playback(&PlaybackOpts::default()).unwrap().cues().len(),
        3
    );
}

#[test]
fn odd_animation_values_do_not_reject_the_diagram() {
    let d = Diagram::from_json_str(
        r#"{"title": "t",
            "nodes": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
            "edges": [{"from": "a", "to": "b"}],
            "animations": [
              {"element": "a", "effect": "fadeIn", "order": 2.0},
              {"element": "b", "effect": "fadeIn", "order": 1, "duration": "0.5"}
            ]}"#,
        &LayoutOpts::default(),
    )
    .unwrap();
    assert_eq!(d.timeline().event_count(), 1);
    assert_eq!(d.timeline().max_order(), 2);
    assert_eq!(d.timeline().dropped().len(), 1);
    assert_eq!(d.timeline().dropped()[0].index, 1);
}
