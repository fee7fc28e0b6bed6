use crate::graph::model::{EdgeKey, Graph};
use crate::sequence::event::AnimationEvent;
use crate::sequence::resolve::DroppedEvent;

/// Where a timeline's events came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineSource {
    /// The diagram's `animations` list.
    Explicit,
    /// Derived from graph topology.
    Derived {
        /// The graph is cyclic and declaration order replaced the topological order.
        degraded_ordering: bool,
    },
}

/// Events sharing one `order`; they start together.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EventGroup {
    /// Shared order.
    pub order: u32,
    /// Longest event duration in the group, in seconds.
    pub duration: f64,
    /// Events in input order.
    pub events: Vec<AnimationEvent>,
}

/// Immutable, ordered animation schedule for one graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    groups: Vec<EventGroup>,
    source: TimelineSource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<DroppedEvent>,
    #[serde(skip)]
    node_ids: Vec<String>,
    #[serde(skip)]
    edge_keys: Vec<EdgeKey>,
}

impl Timeline {
    /// Group `events` by order (stable within a group) and capture the graph's element set for the
    /// final snapshot.
    pub(crate) fn new(
        graph: &Graph,
        mut events: Vec<AnimationEvent>,
        source: TimelineSource,
        dropped: Vec<DroppedEvent>,
    ) -> Self {
        events.sort_by_key(|e| e.order);

        let mut groups: Vec<EventGroup> = Vec::new();
        for event in events {
            match groups.last_mut() {
                Some(g) if g.order == event.order => {
                    g.duration = g.duration.max(event.duration);
                    g.events.push(event);
                }
                _ => groups.push(EventGroup {
                    order: event.order,
                    duration: event.duration,
                    events: vec![event],
                }),
            }
        }

        Self {
            groups,
            source,
            dropped,
            node_ids: graph.nodes().iter().map(|n| n.id.clone()).collect(),
            edge_keys: graph.edges().iter().map(|e| e.key.clone()).collect(),
        }
    }

    /// Groups in ascending order.
    pub fn groups(&self) -> &[EventGroup] {
        &self.groups
    }

    /// All events, sorted by order.
    pub fn events(&self) -> impl Iterator<Item = &AnimationEvent> + '_ {
        self.groups.iter().flat_map(|g| g.events.iter())
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(|g| g.events.len()).sum()
    }

    /// `true` when there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Largest order present, 0 for an empty timeline.
    pub fn max_order(&self) -> u32 {
        self.groups.last().map_or(0, |g| g.order)
    }

    /// Highest meaningful step index: `max_order`, but at least 1.
    pub fn last_step(&self) -> u32 {
        self.max_order().max(1)
    }

    /// Origin of the events.
    pub fn source(&self) -> TimelineSource {
        self.source
    }

    /// `true` when derived ordering had to fall back to declaration order.
    pub fn degraded_ordering(&self) -> bool {
        matches!(
            self.source,
            TimelineSource::Derived {
                degraded_ordering: true
            }
        )
    }

    /// Explicit animations that were discarded.
    pub fn dropped(&self) -> &[DroppedEvent] {
        &self.dropped
    }

    /// Sum of group durations in seconds, at speed 1.
    pub fn total_duration(&self) -> f64 {
        self.groups.iter().map(|g| g.duration).sum()
    }

    /// Every node id of the source graph, in declaration order.
    pub(crate) fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    /// Every edge key of the source graph, in declaration order.
    pub(crate) fn edge_keys(&self) -> &[EdgeKey] {
        &self.edge_keys
    }
}
