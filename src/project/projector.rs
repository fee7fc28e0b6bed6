use crate::foundation::core::{FrameClock, FrameIndex};
use crate::project::visual::VisualState;
use crate::sequence::timeline::Timeline;

/// Query point on a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Snapshot {
    /// Cumulative state after step `k` (1-based, clamped to the timeline).
    Step(u32),
    /// Terminal state: everything visible, nothing highlighted or pulsing.
    Final,
}

/// Stateless projection of a [`Timeline`] to [`VisualState`]s.
///
/// Every query is a pure function of its arguments, so frames may be projected concurrently.
pub struct Projector;

impl Projector {
    /// State after applying every group with `order <= step`.
    ///
    /// Steps are clamped into `[1, timeline.last_step()]`. Order-0 groups are part of step 1.
    pub fn state_at_step(timeline: &Timeline, step: u32) -> VisualState {
        let step = step.clamp(1, timeline.last_step());
        let mut state = VisualState::default();
        for group in timeline.groups().iter().take_while(|g| g.order <= step) {
            for event in &group.events {
                state.apply(event);
            }
        }
        state
    }

    /// Step shown at `frame` of a fixed-length export.
    pub fn step_at_frame(timeline: &Timeline, frame: FrameIndex, clock: &FrameClock) -> u32 {
        clock.step_for_frame(frame, timeline.max_order())
    }

    /// State shown at `frame` of a fixed-length export; out-of-range frames clamp to the last one.
    pub fn state_at_frame(timeline: &Timeline, frame: FrameIndex, clock: &FrameClock) -> VisualState {
        Self::state_at_step(timeline, Self::step_at_frame(timeline, frame, clock))
    }

    /// The terminal snapshot. Not reachable by stepping: it also reveals elements no event touched.
    pub fn final_state(timeline: &Timeline) -> VisualState {
        VisualState {
            visible_nodes: timeline.node_ids().iter().cloned().collect(),
            visible_edges: timeline.edge_keys().iter().cloned().collect(),
            ..VisualState::default()
        }
    }

    /// Dispatch on a [`Snapshot`].
    pub fn snapshot(timeline: &Timeline, at: Snapshot) -> VisualState {
        match at {
            Snapshot::Step(k) => Self::state_at_step(timeline, k),
            Snapshot::Final => Self::final_state(timeline),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/projector.rs"]
mod tests;
