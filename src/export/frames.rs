use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize as _;

use crate::export::sink::{InMemorySink, SinkConfig, StateSink};
use crate::foundation::core::{FrameClock, FrameIndex, FrameRange};
use crate::foundation::error::{FlowError, FlowResult};
use crate::project::projector::Projector;
use crate::project::visual::VisualState;
use crate::sequence::timeline::Timeline;

/// Fixed-length export settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportParams {
    /// Export length in seconds, > 0.
    pub duration_secs: f64,
    /// Frames per second, > 0.
    pub fps: u32,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            fps: 20,
        }
    }
}

impl ExportParams {
    /// Frame clock for these parameters: `floor(duration * fps)` frames, at least one.
    pub fn clock(&self) -> FlowResult<FrameClock> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(FlowError::config(format!(
                "export duration must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        if self.fps == 0 {
            return Err(FlowError::config("export fps must be > 0"));
        }
        let frames = (self.duration_secs * f64::from(self.fps)).floor();
        if frames > u64::MAX as f64 {
            return Err(FlowError::config("export frame count overflows"));
        }
        FrameClock::new((frames as u64).max(1), self.duration_secs)
    }
}

/// How frames are projected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportThreading {
    /// Project on a rayon pool.
    pub parallel: bool,
    /// Frames per chunk handed to the sink; 0 is treated as 1.
    pub chunk_size: usize,
    /// Pool size; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Project each distinct step once and share the state across its frames.
    pub static_frame_elision: bool,
}

impl Default for ExportThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: true,
        }
    }
}

/// Counters from one export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExportStats {
    /// Frames delivered.
    pub frames_total: u64,
    /// States actually computed.
    pub states_projected: u64,
    /// Frames that reused an already computed state.
    pub frames_elided: u64,
}

/// One export frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportFrame {
    /// Frame index.
    pub frame: FrameIndex,
    /// Step shown.
    pub step: u32,
    /// Presentation time in seconds.
    pub at_secs: f64,
    /// State shown; frames of the same step may share one allocation.
    #[serde(serialize_with = "serialize_shared")]
    pub state: Arc<VisualState>,
}

fn serialize_shared<S: serde::Serializer>(
    state: &Arc<VisualState>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    state.as_ref().serialize(serializer)
}

/// Project every frame of the export into memory.
pub fn project_frames(
    timeline: &Timeline,
    params: &ExportParams,
    threading: &ExportThreading,
) -> FlowResult<(Vec<ExportFrame>, ExportStats)> {
    let mut sink = InMemorySink::new();
    let stats = export_to_sink(timeline, params, threading, &mut sink)?;
    Ok((sink.into_frames(), stats))
}

/// Project every frame of the export and stream it to `sink`, one chunk at a time.
#[tracing::instrument(skip(timeline, threading, sink), fields(max_order = timeline.max_order()))]
pub fn export_to_sink(
    timeline: &Timeline,
    params: &ExportParams,
    threading: &ExportThreading,
    sink: &mut dyn StateSink,
) -> FlowResult<ExportStats> {
    let clock = params.clock()?;
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    sink.begin(SinkConfig {
        total_frames: clock.total_frames(),
        fps: params.fps,
        duration_secs: clock.duration_secs(),
        max_order: timeline.max_order(),
    })?;

    let mut stats = ExportStats::default();
    let mut carry = None;
    let mut chunk_start = 0u64;
    while chunk_start < clock.total_frames() {
        let chunk_end = chunk_start.saturating_add(chunk_size).min(clock.total_frames());
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        let frames = project_chunk(
            timeline,
            &clock,
            chunk,
            threading.static_frame_elision,
            pool.as_ref(),
            &mut carry,
            &mut stats,
        );
        for frame in &frames {
            sink.push_frame(frame)?;
        }
        chunk_start = chunk_end;
    }
    sink.end()?;

    stats.frames_elided = stats.frames_total.saturating_sub(stats.states_projected);
    tracing::debug!(?stats, "export finished");
    Ok(stats)
}

/// Project one chunk. With elision, `carry` holds the last state of the previous chunk, which is
/// reused when the chunk opens on the same step.
fn project_chunk(
    timeline: &Timeline,
    clock: &FrameClock,
    chunk: FrameRange,
    elide: bool,
    pool: Option<&rayon::ThreadPool>,
    carry: &mut Option<(u32, Arc<VisualState>)>,
    stats: &mut ExportStats,
) -> Vec<ExportFrame> {
    let steps: Vec<u32> = (chunk.start.0..chunk.end.0)
        .map(|f| Projector::step_at_frame(timeline, FrameIndex(f), clock))
        .collect();

    let mut unique_steps = Vec::<u32>::with_capacity(steps.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(steps.len());
    let mut seeded = None;
    if elide {
        let mut first = HashMap::<u32, usize>::new();
        if let Some((step, state)) = carry.take() {
            first.insert(step, 0);
            unique_steps.push(step);
            seeded = Some(state);
        }
        for &step in &steps {
            let slot = *first.entry(step).or_insert_with(|| {
                unique_steps.push(step);
                unique_steps.len() - 1
            });
            frame_to_unique.push(slot);
        }
    } else {
        unique_steps.extend_from_slice(&steps);
        frame_to_unique.extend(0..steps.len());
    }

    let pending = &unique_steps[usize::from(seeded.is_some())..];
    let projected: Vec<VisualState> = match pool {
        Some(pool) => pool.install(|| {
            pending
                .par_iter()
                .map(|&step| Projector::state_at_step(timeline, step))
                .collect()
        }),
        None => pending
            .iter()
            .map(|&step| Projector::state_at_step(timeline, step))
            .collect(),
    };
    stats.states_projected += projected.len() as u64;
    stats.frames_total += steps.len() as u64;

    let states: Vec<Arc<VisualState>> = seeded
        .into_iter()
        .chain(projected.into_iter().map(Arc::new))
        .collect();

    let frames: Vec<ExportFrame> = steps
        .iter()
        .zip(frame_to_unique)
        .enumerate()
        .map(|(i, (&step, slot))| {
            let frame = FrameIndex(chunk.start.0 + i as u64);
            ExportFrame {
                frame,
                step,
                at_secs: clock.secs_at(frame),
                state: Arc::clone(&states[slot]),
            }
        })
        .collect();

    if elide {
        *carry = frames.last().map(|f| (f.step, Arc::clone(&f.state)));
    }
    frames
}

fn build_thread_pool(threads: Option<usize>) -> FlowResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FlowError::config(
            "export threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FlowError::export(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/frames.rs"]
mod tests;
