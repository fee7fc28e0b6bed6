use super::*;
use crate::export::sink::JsonLinesSink;
use crate::graph::model::Graph;
use crate::sequence::sequence;

fn scenario() -> Timeline {
    let g = Graph::from_json_str(
        r#"{"title": "t",
            "nodes": [
              {"id": "s", "label": "Start", "type": "start"},
              {"id": "p", "label": "Do X", "type": "process"},
              {"id": "e", "label": "End", "type": "end"}
            ],
            "edges": [{"from": "s", "to": "p"}, {"from": "p", "to": "e"}]}"#,
    )
    .unwrap();
    sequence(&g, None)
}

fn plain(frames: &[ExportFrame]) -> Vec<(u64, u32, VisualState)> {
    frames
        .iter()
        .map(|f| (f.frame.0, f.step, f.state.as_ref().clone()))
        .collect()
}

#[test]
fn default_params_give_sixty_frames() {
    let clock = ExportParams::default().clock().unwrap();
    assert_eq!(clock.total_frames(), 60);
    assert_eq!(clock.duration_secs(), 3.0);

    let tiny = ExportParams {
        duration_secs: 0.01,
        fps: 20,
    };
    assert_eq!(tiny.clock().unwrap().total_frames(), 1);
}

#[test]
fn invalid_params_are_config_errors() {
    for params in [
        ExportParams {
            duration_secs: 0.0,
            fps: 20,
        },
        ExportParams {
            duration_secs: f64::NAN,
            fps: 20,
        },
        ExportParams {
            duration_secs: 3.0,
            fps: 0,
        },
    ] {
        assert!(matches!(params.clock(), Err(FlowError::Config(_))));
    }

    let threading = ExportThreading {
        parallel: true,
        threads: Some(0),
        ..ExportThreading::default()
    };
    let err = project_frames(&scenario(), &ExportParams::default(), &threading).unwrap_err();
    assert!(err.to_string().contains("threads"));
}

#[test]
fn frames_step_through_the_timeline_evenly() {
    let t = scenario();
    let (frames, stats) =
        project_frames(&t, &ExportParams::default(), &ExportThreading::default()).unwrap();
    assert_eq!(frames.len(), 60);
    assert_eq!(stats.frames_total, 60);
    for (i, f) in frames.iter().enumerate() {
        assert_eq!(f.frame, FrameIndex(i as u64));
        assert_eq!(f.step, i as u32 / 12 + 1);
    }
    assert!((frames[30].at_secs - 1.5).abs() < 1e-12);
}

#[test]
fn parallel_projection_matches_sequential() {
    let t = scenario();
    let params = ExportParams {
        duration_secs: 2.0,
        fps: 37,
    };
    let sequential = ExportThreading {
        static_frame_elision: false,
        ..ExportThreading::default()
    };
    let parallel = ExportThreading {
        parallel: true,
        chunk_size: 5,
        threads: Some(3),
        static_frame_elision: false,
    };
    let (a, _) = project_frames(&t, &params, &sequential).unwrap();
    let (b, _) = project_frames(&t, &params, &parallel).unwrap();
    assert_eq!(plain(&a), plain(&b));
}

#[test]
fn elision_projects_each_step_once_across_chunks() {
    let t = scenario();
    for chunk_size in [0, 7, 64] {
        let threading = ExportThreading {
            parallel: true,
            chunk_size,
            threads: Some(2),
            static_frame_elision: true,
        };
        let (frames, stats) = project_frames(&t, &ExportParams::default(), &threading).unwrap();
        assert_eq!(stats.states_projected, 5, "chunk_size={chunk_size}");
        assert_eq!(stats.frames_elided, 55);
        assert!(Arc::ptr_eq(&frames[0].state, &frames[11].state));

        let (reference, _) = project_frames(
            &t,
            &ExportParams::default(),
            &ExportThreading {
                static_frame_elision: false,
                ..ExportThreading::default()
            },
        )
        .unwrap();
        assert_eq!(plain(&frames), plain(&reference));
    }
}

#[test]
fn sinks_receive_config_and_every_frame() {
    let t = scenario();
    let mut sink = InMemorySink::new();
    export_to_sink(
        &t,
        &ExportParams::default(),
        &ExportThreading::default(),
        &mut sink,
    )
    .unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.total_frames, 60);
    assert_eq!(cfg.max_order, 5);
    assert!(sink.is_ended());
    assert_eq!(sink.frames().len(), 60);

    let mut lines = JsonLinesSink::new(Vec::new());
    export_to_sink(
        &t,
        &ExportParams {
            duration_secs: 1.0,
            fps: 5,
        },
        &ExportThreading::default(),
        &mut lines,
    )
    .unwrap();
    let text = String::from_utf8(lines.into_inner()).unwrap();
    let rows: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["frame"], 0);
    assert_eq!(rows[0]["state"]["visibleNodes"], serde_json::json!(["s"]));
    assert_eq!(rows[4]["step"], 5);
}
