use std::collections::HashSet;
use std::f64::consts::TAU;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::foundation::core::Point;
use crate::foundation::hash::unit_jitter;
use crate::graph::model::Graph;

const RING_RADIUS: f64 = 100.0;
const JITTER: f64 = 10.0;
const TICK_SECS: f32 = 0.016;

/// Force-directed placement. Always succeeds.
///
/// Nodes start on a ring (declaration order, perturbed by a jitter derived from `seed` and the
/// node id) and the simulation runs a fixed number of ticks, so the output depends only on the
/// graph and the seed.
pub(crate) fn place(graph: &Graph, seed: u64, iterations: u32) -> Vec<Point> {
    let n = graph.node_count();
    let start: Vec<Point> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = i as f64 * TAU / n.max(1) as f64;
            Point::new(
                RING_RADIUS * angle.cos() + JITTER * unit_jitter(seed, &node.id, 0),
                RING_RADIUS * angle.sin() + JITTER * unit_jitter(seed, &node.id, 1),
            )
        })
        .collect();
    if n < 2 {
        return start;
    }

    let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    });
    let handles: Vec<_> = start
        .iter()
        .enumerate()
        .map(|(i, p)| {
            sim.add_node(NodeData {
                x: p.x as f32,
                y: p.y as f32,
                mass: 10.0,
                is_anchor: false,
                user_data: i,
            })
        })
        .collect();

    // One spring per connected pair; direction and multiplicity do not matter to the forces.
    let mut linked = HashSet::new();
    for e in graph.edges() {
        let pair = (e.from_idx.min(e.to_idx), e.from_idx.max(e.to_idx));
        if pair.0 != pair.1 && linked.insert(pair) {
            sim.add_edge(handles[pair.0], handles[pair.1], EdgeData::default());
        }
    }

    for _ in 0..iterations {
        sim.update(TICK_SECS);
    }

    let mut out = start.clone();
    let mut unstable = 0usize;
    sim.visit_nodes(|node| {
        let (x, y) = (f64::from(node.x()), f64::from(node.y()));
        let i = node.data.user_data;
        if x.is_finite() && y.is_finite() {
            out[i] = Point::new(x, y);
        } else {
            unstable += 1;
        }
    });
    if unstable > 0 {
        tracing::warn!(unstable, "spring simulation diverged for some nodes, keeping start positions");
    }
    out
}
