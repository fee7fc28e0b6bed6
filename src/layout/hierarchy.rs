use std::cmp::Ordering;

use crate::foundation::core::Point;
use crate::graph::model::Graph;
use crate::layout::{Orientation, TierFailure, centred_slot};

const SWEEPS: usize = 4;

/// Dot-style layered placement: longest-path ranks, barycenter ordering, centred ranks.
///
/// Rejects cyclic graphs, which have no consistent ranking.
pub(crate) fn place(graph: &Graph, orientation: Orientation) -> Result<Vec<Point>, TierFailure> {
    let n = graph.node_count();
    let succ: Vec<Vec<usize>> = (0..n).map(|i| graph.successors(i)).collect();
    let pred: Vec<Vec<usize>> = (0..n).map(|i| graph.predecessors(i)).collect();

    let ranks = assign_ranks(graph, &succ, &pred)?;
    let mut rank_order = build_rank_buckets(&ranks);

    for _ in 0..SWEEPS {
        for r in 1..rank_order.len() {
            let prev = rank_order[r - 1].clone();
            reorder_by_barycenter(&mut rank_order[r], &prev, &pred);
        }
        for r in (0..rank_order.len().saturating_sub(1)).rev() {
            let next = rank_order[r + 1].clone();
            reorder_by_barycenter(&mut rank_order[r], &next, &succ);
        }
    }

    let mut out = vec![Point::ORIGIN; n];
    for (rank, order) in rank_order.iter().enumerate() {
        for (slot, &v) in order.iter().enumerate() {
            out[v] = orientation.place(centred_slot(slot, order.len()), rank as f64);
        }
    }
    Ok(out)
}

/// Longest-path ranking via Kahn's algorithm over declaration order.
fn assign_ranks(
    graph: &Graph,
    succ: &[Vec<usize>],
    pred: &[Vec<usize>],
) -> Result<Vec<usize>, TierFailure> {
    let n = succ.len();
    let mut in_degree: Vec<usize> = pred.iter().map(Vec::len).collect();
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut ranks = vec![0usize; n];

    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &succ[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push(v);
            }
        }
    }

    if queue.len() < n {
        let stuck = (0..n).find(|&v| in_degree[v] > 0).unwrap_or(0);
        return Err(TierFailure::Cycle {
            node: graph.nodes()[stuck].id.clone(),
        });
    }
    Ok(ranks)
}

fn build_rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let depth = ranks.iter().copied().max().map_or(0, |m| m + 1);
    let mut buckets = vec![Vec::new(); depth];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

/// Stable sort of `rank` by mean position of each node's neighbours in `fixed`.
///
/// Nodes with no neighbour in `fixed` keep their current slot as score, so they do not all drift
/// to one end.
fn reorder_by_barycenter(rank: &mut Vec<usize>, fixed: &[usize], neighbours: &[Vec<usize>]) {
    let mut scored: Vec<(usize, f64)> = rank
        .iter()
        .enumerate()
        .map(|(slot, &v)| {
            let hits: Vec<f64> = neighbours[v]
                .iter()
                .filter_map(|nb| fixed.iter().position(|x| x == nb))
                .map(|p| p as f64)
                .collect();
            let score = if hits.is_empty() {
                slot as f64
            } else {
                hits.iter().sum::<f64>() / hits.len() as f64
            };
            (v, score)
        })
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    *rank = scored.into_iter().map(|(v, _)| v).collect();
}
