use crate::foundation::error::{FlowError, FlowResult};

pub use kurbo::Point;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// 0-based index of an export frame.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open frame range `[start, end)`.
pub struct FrameRange {
    /// First frame in the range.
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> FlowResult<Self> {
        if start.0 > end.0 {
            return Err(FlowError::config("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// `true` when the range covers no frame.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// `true` when `f` lies inside the range.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Clamp `f` into the range (last frame inclusive).
    pub fn clamp(self, f: FrameIndex) -> FrameIndex {
        if self.is_empty() {
            return self.start;
        }
        let max_inclusive = self.end.0.saturating_sub(1);
        FrameIndex(f.0.clamp(self.start.0, max_inclusive))
    }
}

/// Fixed-length export clock: how many frames cover how many seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameClock {
    total_frames: u64,
    duration_secs: f64,
}

impl FrameClock {
    /// Build a clock; `total_frames` must be > 0 and `duration_secs` finite and > 0.
    pub fn new(total_frames: u64, duration_secs: f64) -> FlowResult<Self> {
        if total_frames == 0 {
            return Err(FlowError::config("total_frames must be > 0"));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(FlowError::config("duration_secs must be finite and > 0"));
        }
        Ok(Self {
            total_frames,
            duration_secs,
        })
    }

    /// Total number of frames.
    pub fn total_frames(self) -> u64 {
        self.total_frames
    }

    /// Total duration in seconds.
    pub fn duration_secs(self) -> f64 {
        self.duration_secs
    }

    /// The full `[0, total_frames)` range.
    pub fn range(self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Clamp an arbitrary frame index onto the clock.
    pub fn clamp(self, frame: FrameIndex) -> FrameIndex {
        self.range().clamp(frame)
    }

    /// Presentation time of the start of `frame`, in seconds.
    pub fn secs_at(self, frame: FrameIndex) -> f64 {
        let f = self.clamp(frame).0 as f64;
        f * self.duration_secs / self.total_frames as f64
    }

    /// Animation step shown at `frame` for a timeline whose largest order is `max_order`.
    ///
    /// `step = ceil((frame + 1) * max_order / total_frames)`. When `total_frames / max_order` is
    /// a whole number this equals `floor(frame / frames_per_step) + 1`. Otherwise it deliberately
    /// differs from that formula: with 60 frames and 7 steps, frame 8 shows step 2 here but
    /// step 1 under the floor formula. The first frame of step `k` is then always
    /// `floor((k - 1) * total_frames / max_order)`, the frame
    /// [`FrameClock::first_frame_of_step`] returns.
    pub fn step_for_frame(self, frame: FrameIndex, max_order: u32) -> u32 {
        if max_order == 0 {
            return 1;
        }
        let f = u128::from(self.clamp(frame).0);
        let m = u128::from(max_order);
        let t = u128::from(self.total_frames);
        let step = ((f + 1) * m).div_ceil(t);
        u32::try_from(step).unwrap_or(u32::MAX).max(1)
    }

    /// First frame showing `step`; `step` is clamped into `[1, max_order]`.
    pub fn first_frame_of_step(self, step: u32, max_order: u32) -> FrameIndex {
        if max_order == 0 {
            return FrameIndex(0);
        }
        let k = u128::from(step.clamp(1, max_order));
        let t = u128::from(self.total_frames);
        let m = u128::from(max_order);
        FrameIndex(u64::try_from((k - 1) * t / m).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
