//! Live, wall-clock-paced playback.
//!
//! [`Playback`] never sleeps. The host drives it from a timer with the elapsed time since playback
//! started and acts on the returned [`Tick`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{FlowError, FlowResult};
use crate::project::projector::Projector;
use crate::project::visual::VisualState;
use crate::sequence::timeline::Timeline;

/// Live playback settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackOpts {
    /// Speed multiplier; each group waits `duration / speed` seconds.
    pub speed: f64,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl PlaybackOpts {
    /// Reject non-finite or non-positive speeds.
    pub fn validate(&self) -> FlowResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(FlowError::config(format!(
                "playback speed must be finite and > 0, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Shared flag that stops a [`Playback`] before its next group.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One step of the live schedule.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Cue {
    /// Step shown.
    pub step: u32,
    /// Seconds from playback start at which the step is shown.
    pub at_secs: f64,
    /// Seconds the step stays before the next one.
    pub wait_secs: f64,
}

/// Live schedule for `timeline`: one cue per distinct step, in ascending order.
///
/// Order-0 groups fold into step 1 (their waits add up), matching how step and frame projection
/// treat them.
pub fn schedule(timeline: &Timeline, opts: &PlaybackOpts) -> FlowResult<Vec<Cue>> {
    opts.validate()?;
    let mut cues: Vec<Cue> = Vec::with_capacity(timeline.groups().len());
    let mut at = 0.0;
    for group in timeline.groups() {
        let step = group.order.max(1);
        let wait = group.duration / opts.speed;
        match cues.last_mut() {
            Some(cue) if cue.step == step => cue.wait_secs += wait,
            _ => cues.push(Cue {
                step,
                at_secs: at,
                wait_secs: wait,
            }),
        }
        at += wait;
    }
    Ok(cues)
}

/// What the host should do after a [`Playback::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// Render this state now. Poll again right away; more cues may already be due.
    Show {
        /// Step being shown.
        step: u32,
        /// Cumulative state after that step.
        state: VisualState,
    },
    /// Nothing to do for this long.
    Wait {
        /// Seconds until the next cue.
        remaining_secs: f64,
    },
    /// Playback ran to completion; render the terminal state.
    Finished {
        /// Everything visible, nothing highlighted.
        state: VisualState,
    },
    /// Playback was cancelled; nothing more will be shown.
    Cancelled,
    /// Already finished or cancelled.
    Done,
}

/// Poll-driven playback of one timeline.
pub struct Playback<'t> {
    timeline: &'t Timeline,
    cues: Vec<Cue>,
    next: usize,
    end_secs: f64,
    done: bool,
    cancel: CancelToken,
}

impl<'t> Playback<'t> {
    /// Prepare playback; fails only on invalid options.
    pub fn new(timeline: &'t Timeline, opts: &PlaybackOpts) -> FlowResult<Self> {
        let cues = schedule(timeline, opts)?;
        let end_secs = cues.last().map_or(0.0, |c| c.at_secs + c.wait_secs);
        Ok(Self {
            timeline,
            cues,
            next: 0,
            end_secs,
            done: false,
            cancel: CancelToken::default(),
        })
    }

    /// A handle that cancels this playback from anywhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The full schedule.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Seconds from start until the final state.
    pub fn total_secs(&self) -> f64 {
        self.end_secs
    }

    /// `true` after [`Tick::Finished`] or [`Tick::Cancelled`] was returned.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance to `elapsed_secs` since start.
    ///
    /// Returns at most one cue per call, so every group is applied whole and in order even when the
    /// host polls late. Cancellation takes effect at the next call and drops any remaining wait.
    pub fn poll(&mut self, elapsed_secs: f64) -> Tick {
        if self.done {
            return Tick::Done;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            tracing::debug!(shown = self.next, "playback cancelled");
            return Tick::Cancelled;
        }

        let Some(cue) = self.cues.get(self.next).copied() else {
            if elapsed_secs >= self.end_secs {
                self.done = true;
                return Tick::Finished {
                    state: Projector::final_state(self.timeline),
                };
            }
            return Tick::Wait {
                remaining_secs: self.end_secs - elapsed_secs,
            };
        };

        if elapsed_secs >= cue.at_secs {
            self.next += 1;
            Tick::Show {
                step: cue.step,
                state: Projector::state_at_step(self.timeline, cue.step),
            }
        } else {
            Tick::Wait {
                remaining_secs: cue.at_secs - elapsed_secs,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/mod.rs"]
mod tests;
