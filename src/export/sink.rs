use std::io::Write;

use crate::export::frames::ExportFrame;
use crate::foundation::error::{FlowError, FlowResult};

/// Configuration provided to a [`StateSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SinkConfig {
    /// Frames that will be pushed.
    pub total_frames: u64,
    /// Frames per second.
    pub fps: u32,
    /// Export length in seconds.
    pub duration_secs: f64,
    /// Largest order in the exported timeline.
    pub max_order: u32,
}

/// Consumer of projected export frames, typically a renderer or encoder.
///
/// Ordering contract: `push_frame` is called in strictly increasing frame order, starting at 0.
pub trait StateSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FlowResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, frame: &ExportFrame) -> FlowResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> FlowResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<ExportFrame>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in order.
    pub fn frames(&self) -> &[ExportFrame] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Take the captured frames.
    pub fn into_frames(self) -> Vec<ExportFrame> {
        self.frames
    }
}

impl StateSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlowResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &ExportFrame) -> FlowResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> FlowResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes one JSON object per frame, newline-delimited.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer. Buffering is the caller's choice.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StateSink for JsonLinesSink<W> {
    fn begin(&mut self, _cfg: SinkConfig) -> FlowResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, frame: &ExportFrame) -> FlowResult<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out
            .write_all(b"\n")
            .map_err(|e| FlowError::export(format!("write frame {}: {e}", frame.frame.0)))
    }

    fn end(&mut self) -> FlowResult<()> {
        self.out
            .flush()
            .map_err(|e| FlowError::export(format!("flush frames: {e}")))
    }
}
