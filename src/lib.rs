//! Flowreel turns a declarative flow-diagram spec into a layout and a replayable reveal animation.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `DiagramSpec -> Graph` (validation reports every issue, styles resolve from kind)
//! 2. **Layout**: `Graph -> Layout` (multipartite, then hierarchy, then spring; never fails)
//! 3. **Sequence**: `Graph + animations? -> Timeline` (explicit events or a topology-derived default)
//! 4. **Project**: `Timeline + step/frame -> VisualState` (pure, safe to call concurrently)
//!
//! On top of projection, [`Playback`] paces steps in wall-clock time for live display and
//! [`export_to_sink`] maps a fixed duration and fps onto the same steps for export.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: layout, sequencing and projection are pure functions of their inputs; the
//!   spring layout is seeded.
//! - **No blocking in the core**: playback is poll-driven; only the `flowreel` binary sleeps.
//! - **No rendering**: renderers consume [`Layout`], [`VisualState`] and the style tables.
//!
//! ```no_run
//! use flowreel::{Diagram, LayoutOpts, Snapshot};
//!
//! let diagram = Diagram::from_path("flow.json", &LayoutOpts::default())?;
//! let first = diagram.state(Snapshot::Step(1));
//! println!("{} node(s) visible", first.visible_nodes.len());
//! # Ok::<(), flowreel::FlowError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod diagram;
mod export;
mod foundation;
mod graph;
mod layout;
mod playback;
mod project;
mod sequence;

pub use diagram::{Diagram, EngineOpts};
pub use export::frames::{
    ExportFrame, ExportParams, ExportStats, ExportThreading, export_to_sink, project_frames,
};
pub use export::sink::{InMemorySink, JsonLinesSink, SinkConfig, StateSink};
pub use foundation::core::{FrameClock, FrameIndex, FrameRange, Point};
pub use foundation::error::{
    FlowError, FlowResult, IssueKind, ValidationErrors, ValidationIssue,
};
pub use graph::model::{Edge, EdgeKey, EdgeKind, Graph, Node, NodeKind, TypeDecl};
pub use graph::spec::{AnimationSpec, DiagramSpec, EdgeSpec, ElementSpec, NodeSpec};
pub use graph::style::{EdgeStyle, HIGHLIGHT_COLOR, LineDash, NodeShape, NodeStyle};
pub use layout::{
    Layout, LayoutOpts, LayoutStrategy, Orientation, SkippedTier, TierFailure,
    compute as compute_layout,
};
pub use playback::{CancelToken, Cue, Playback, PlaybackOpts, Tick, schedule};
pub use project::projector::{Projector, Snapshot};
pub use project::visual::VisualState;
pub use sequence::event::{AnimationEvent, Effect, ElementRef, TargetKind};
pub use sequence::resolve::{DEFAULT_EXPLICIT_DURATION, DropReason, DroppedEvent};
pub use sequence::sequence;
pub use sequence::timeline::{EventGroup, Timeline, TimelineSource};
