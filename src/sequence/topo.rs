use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::model::Graph;

/// Node ordering used to derive a default timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeOrder {
    /// A full topological order.
    Topological(Vec<usize>),
    /// The graph is cyclic; declaration order is used instead.
    Insertion(Vec<usize>),
}

impl NodeOrder {
    pub(crate) fn indices(&self) -> &[usize] {
        match self {
            Self::Topological(v) | Self::Insertion(v) => v,
        }
    }

    pub(crate) fn is_degraded(&self) -> bool {
        matches!(self, Self::Insertion(_))
    }
}

/// Kahn's algorithm over declaration indices.
///
/// When several nodes are ready, the earliest-declared one comes first, so the result is a pure
/// function of the graph. Parallel edges each count towards in-degree.
pub(crate) fn node_order(graph: &Graph) -> NodeOrder {
    let n = graph.node_count();
    let mut indeg = vec![0u32; n];
    for e in graph.edges() {
        indeg[e.to_idx] = indeg[e.to_idx].saturating_add(1);
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indeg
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut out = Vec::with_capacity(n);
    while let Some(Reverse(u)) = ready.pop() {
        out.push(u);
        for e in graph.outgoing_edges(u) {
            let d = &mut indeg[e.to_idx];
            *d = d.saturating_sub(1);
            if *d == 0 {
                ready.push(Reverse(e.to_idx));
            }
        }
    }

    if out.len() == n {
        NodeOrder::Topological(out)
    } else {
        NodeOrder::Insertion((0..n).collect())
    }
}
