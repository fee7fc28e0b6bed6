use crate::graph::model::Graph;
use crate::sequence::event::{AnimationEvent, Effect, ElementRef};
use crate::sequence::topo::{NodeOrder, node_order};

pub(crate) const NODE_FADE_SECS: f64 = 0.5;
pub(crate) const EDGE_DRAW_SECS: f64 = 0.3;

/// Default reveal sequence: every node fades in, one per step, then every edge is drawn.
///
/// Nodes take orders `1..=n` in topological order (declaration order on a cycle). Edges follow at
/// `n + 1, n + 2, ...`, walking nodes in the same order and each node's outgoing edges in
/// declaration order. In a topological order the last node has no outgoing edges, so only edges
/// out of earlier nodes are drawn; under the cyclic fallback every edge still gets its draw.
pub(crate) fn derive(graph: &Graph) -> (Vec<AnimationEvent>, NodeOrder) {
    let order = node_order(graph);
    let nodes = order.indices();
    let node_count = u32::try_from(nodes.len()).unwrap_or(u32::MAX);

    let mut events = Vec::with_capacity(nodes.len() + graph.edges().len());
    let mut next = 1u32;
    for &idx in nodes {
        events.push(AnimationEvent {
            element: ElementRef::node(graph.nodes()[idx].id.as_str()),
            effect: Effect::FadeIn,
            duration: NODE_FADE_SECS,
            order: next,
        });
        next = next.saturating_add(1);
    }

    let mut running = 0u32;
    for &idx in nodes {
        for edge in graph.outgoing_edges(idx) {
            running = running.saturating_add(1);
            events.push(AnimationEvent {
                element: ElementRef::Edge(edge.key.clone()),
                effect: Effect::Draw,
                duration: EDGE_DRAW_SECS,
                order: node_count.saturating_add(running),
            });
        }
    }

    (events, order)
}
