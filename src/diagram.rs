use std::path::Path;

use anyhow::Context as _;

use crate::export::frames::{
    ExportFrame, ExportParams, ExportStats, ExportThreading, export_to_sink, project_frames,
};
use crate::export::sink::StateSink;
use crate::foundation::core::{FrameClock, FrameIndex};
use crate::foundation::error::{FlowError, FlowResult};
use crate::graph::model::Graph;
use crate::graph::spec::DiagramSpec;
use crate::layout::{Layout, LayoutOpts, compute};
use crate::playback::{Playback, PlaybackOpts};
use crate::project::projector::{Projector, Snapshot};
use crate::project::visual::VisualState;
use crate::sequence::sequence;
use crate::sequence::timeline::Timeline;

/// Engine-wide options, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Layout tuning.
    pub layout: LayoutOpts,
    /// Live playback pacing.
    pub playback: PlaybackOpts,
    /// Export length and rate.
    pub export: ExportParams,
    /// Export threading.
    pub threading: ExportThreading,
}

impl EngineOpts {
    /// Parse options from JSON text and validate them.
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check values serde cannot: positive scale, speed, duration and fps.
    pub fn validate(&self) -> FlowResult<()> {
        if !self.layout.scale.is_finite() || self.layout.scale <= 0.0 {
            return Err(FlowError::config("layout scale must be finite and > 0"));
        }
        self.playback.validate()?;
        self.export.clock()?;
        Ok(())
    }
}

/// A validated graph with its layout and timeline.
///
/// All three parts are immutable once built; visual state is projected on demand.
#[derive(Clone, Debug)]
pub struct Diagram {
    graph: Graph,
    layout: Layout,
    timeline: Timeline,
}

impl Diagram {
    /// Validate `spec`, lay it out and sequence it.
    pub fn build(spec: &DiagramSpec, layout_opts: &LayoutOpts) -> FlowResult<Self> {
        let graph = Graph::build(spec)?;
        let layout = compute(&graph, layout_opts);
        let timeline = sequence(&graph, spec.explicit_animations());
        Ok(Self {
            graph,
            layout,
            timeline,
        })
    }

    /// [`Diagram::build`] from JSON text.
    pub fn from_json_str(s: &str, layout_opts: &LayoutOpts) -> FlowResult<Self> {
        Self::build(&DiagramSpec::from_json_str(s)?, layout_opts)
    }

    /// [`Diagram::build`] from a JSON file.
    pub fn from_path(path: impl AsRef<Path>, layout_opts: &LayoutOpts) -> FlowResult<Self> {
        Self::build(&DiagramSpec::from_path(path)?, layout_opts)
    }

    /// The validated graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Node positions.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The animation schedule.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// State at a step or the terminal snapshot.
    pub fn state(&self, at: Snapshot) -> VisualState {
        Projector::snapshot(&self.timeline, at)
    }

    /// State at an export frame.
    pub fn state_at_frame(&self, frame: FrameIndex, clock: &FrameClock) -> VisualState {
        Projector::state_at_frame(&self.timeline, frame, clock)
    }

    /// Start live playback.
    pub fn playback(&self, opts: &PlaybackOpts) -> FlowResult<Playback<'_>> {
        Playback::new(&self.timeline, opts)
    }

    /// Project all export frames into memory.
    pub fn export(
        &self,
        params: &ExportParams,
        threading: &ExportThreading,
    ) -> FlowResult<(Vec<ExportFrame>, ExportStats)> {
        project_frames(&self.timeline, params, threading)
    }

    /// Stream all export frames to `sink`.
    pub fn export_to_sink(
        &self,
        params: &ExportParams,
        threading: &ExportThreading,
        sink: &mut dyn StateSink,
    ) -> FlowResult<ExportStats> {
        export_to_sink(&self.timeline, params, threading, sink)
    }
}

#[cfg(test)]
#[path = "../tests/unit/diagram.rs"]
mod tests;
