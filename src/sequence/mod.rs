//! Animation sequencing: explicit animations or a topology-derived default, grouped by order.

pub(crate) mod derive;
pub(crate) mod event;
pub(crate) mod resolve;
pub(crate) mod timeline;
pub(crate) mod topo;

use crate::graph::model::Graph;
use crate::graph::spec::AnimationSpec;
use crate::sequence::resolve::resolve_explicit;
use crate::sequence::timeline::{Timeline, TimelineSource};

/// Build the timeline for `graph`.
///
/// A non-empty `explicit` list is used as given, minus entries that fail to resolve (recorded in
/// [`Timeline::dropped`]). Otherwise the default sequence is derived from topology.
#[tracing::instrument(skip(graph, explicit), fields(explicit = explicit.map_or(0, |s| s.len())))]
pub fn sequence(graph: &Graph, explicit: Option<&[AnimationSpec]>) -> Timeline {
    if let Some(specs) = explicit.filter(|s| !s.is_empty()) {
        let (events, dropped) = resolve_explicit(graph, specs);
        if events.is_empty() {
            tracing::warn!(
                dropped = dropped.len(),
                "every explicit animation was dropped, timeline is empty"
            );
        }
        return Timeline::new(graph, events, TimelineSource::Explicit, dropped);
    }

    let (events, order) = derive::derive(graph);
    let degraded_ordering = order.is_degraded();
    if degraded_ordering {
        tracing::warn!("graph has a cycle, deriving animation order from declaration order");
    }
    Timeline::new(
        graph,
        events,
        TimelineSource::Derived { degraded_ordering },
        Vec::new(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/mod.rs"]
mod tests;
