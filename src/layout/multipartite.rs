use crate::foundation::core::Point;
use crate::graph::model::{Graph, NodeKind, TypeDecl};
use crate::layout::{Orientation, TierFailure, centred_slot};

/// One layer per node kind in [`NodeKind::FLOW_ORDER`], empty layers skipped.
///
/// Nodes keep declaration order inside their layer. Every node must have a declared, recognised
/// type; otherwise the grouping would be a guess and the next strategy is tried instead.
pub(crate) fn place(graph: &Graph, orientation: Orientation) -> Result<Vec<Point>, TierFailure> {
    if let Some(node) = graph
        .nodes()
        .iter()
        .find(|n| n.type_decl != TypeDecl::Declared)
    {
        return Err(TierFailure::UngroupedNode {
            node: node.id.clone(),
        });
    }

    let mut layers: [Vec<usize>; NodeKind::FLOW_ORDER.len()] = Default::default();
    for (i, node) in graph.nodes().iter().enumerate() {
        layers[node.kind.flow_rank()].push(i);
    }

    let mut out = vec![Point::ORIGIN; graph.node_count()];
    for (depth, layer) in layers.iter().filter(|l| !l.is_empty()).enumerate() {
        for (slot, &idx) in layer.iter().enumerate() {
            out[idx] = orientation.place(centred_slot(slot, layer.len()), depth as f64);
        }
    }
    Ok(out)
}
