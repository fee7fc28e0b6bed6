//! Node placement.
//!
//! [`compute`] tries three strategies in a fixed order and returns the first that succeeds:
//!
//! 1. [`LayoutStrategy::Multipartite`]: one layer per node kind, in flow order.
//! 2. [`LayoutStrategy::Hierarchy`]: longest-path ranks with barycenter ordering.
//! 3. [`LayoutStrategy::Spring`]: seeded force-directed simulation.
//!
//! The last tier cannot fail, so every graph gets a position for every node. All tiers are
//! rescaled into the same box (mean at the origin, largest |coordinate| equal to
//! [`LayoutOpts::scale`]).

pub(crate) mod hierarchy;
pub(crate) mod multipartite;
pub(crate) mod spring;

use std::collections::BTreeMap;

use crate::foundation::core::Point;
use crate::graph::model::Graph;

/// Direction in which layers/ranks advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Layers stack downward (+y).
    #[default]
    TopToBottom,
    /// Layers stack rightward (+x).
    LeftToRight,
}

impl Orientation {
    /// Map `(along_layer, across_layers)` to a point.
    pub(crate) fn place(self, along: f64, across: f64) -> Point {
        match self {
            Self::TopToBottom => Point::new(along, across),
            Self::LeftToRight => Point::new(across, along),
        }
    }
}

/// Layout tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutOpts {
    /// Flow direction for the layered strategies.
    pub orientation: Orientation,
    /// Half-extent of the output box. Must be finite and > 0; [`compute`] replaces anything else
    /// with the default of 1.0.
    pub scale: f64,
    /// Seed for the spring strategy's initial positions.
    pub seed: u64,
    /// Number of simulation ticks in the spring strategy.
    pub spring_iterations: u32,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            orientation: Orientation::TopToBottom,
            scale: 1.0,
            seed: 42,
            spring_iterations: 300,
        }
    }
}

/// Strategy that produced a [`Layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Layers keyed by node kind.
    Multipartite,
    /// Dot-style ranked hierarchy.
    Hierarchy,
    /// Force-directed simulation.
    Spring,
}

/// Why a fallible strategy declined a graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TierFailure {
    /// A node carries no usable type to group it by.
    #[error("node '{node}' has no declared type")]
    UngroupedNode {
        /// Offending node id.
        node: String,
    },
    /// The graph is cyclic and cannot be ranked.
    #[error("cycle through node '{node}'")]
    Cycle {
        /// A node on or behind the cycle.
        node: String,
    },
}

/// A strategy that was tried and rejected before the one in use.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedTier {
    /// The rejected strategy.
    pub strategy: LayoutStrategy,
    /// Why it was rejected.
    pub failure: TierFailure,
}

/// Position of every node, plus how it was obtained.
///
/// Serializes as the bare mapping `{ "<node id>": [x, y] }`; [`Layout::strategy`] and
/// [`Layout::skipped`] are diagnostics and are not part of the output.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    positions: BTreeMap<String, Point>,
    strategy: LayoutStrategy,
    skipped: Vec<SkippedTier>,
}

impl Layout {
    /// Position of node `id`.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// All positions, ordered by node id.
    pub fn positions(&self) -> &BTreeMap<String, Point> {
        &self.positions
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` for the layout of an empty graph.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Strategy that produced the positions.
    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// Strategies that were tried first and rejected.
    pub fn skipped(&self) -> &[SkippedTier] {
        &self.skipped
    }
}

impl serde::Serialize for Layout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.positions.iter().map(|(id, p)| (id, [p.x, p.y])))
    }
}

/// Compute a layout, falling back through the strategy chain.
#[tracing::instrument(skip(graph, opts), fields(nodes = graph.node_count()))]
pub fn compute(graph: &Graph, opts: &LayoutOpts) -> Layout {
    let mut skipped = Vec::new();

    let (strategy, raw) = match multipartite::place(graph, opts.orientation) {
        Ok(raw) => (LayoutStrategy::Multipartite, raw),
        Err(failure) => {
            tracing::debug!(%failure, "multipartite layout rejected");
            skipped.push(SkippedTier {
                strategy: LayoutStrategy::Multipartite,
                failure,
            });
            match hierarchy::place(graph, opts.orientation) {
                Ok(raw) => (LayoutStrategy::Hierarchy, raw),
                Err(failure) => {
                    tracing::debug!(%failure, "hierarchy layout rejected");
                    skipped.push(SkippedTier {
                        strategy: LayoutStrategy::Hierarchy,
                        failure,
                    });
                    (
                        LayoutStrategy::Spring,
                        spring::place(graph, opts.seed, opts.spring_iterations),
                    )
                }
            }
        }
    };

    let scale = if opts.scale.is_finite() && opts.scale > 0.0 {
        opts.scale
    } else {
        tracing::warn!(scale = opts.scale, "invalid layout scale, using 1.0");
        LayoutOpts::default().scale
    };
    let rescaled = rescale(raw, scale);
    let positions = graph
        .nodes()
        .iter()
        .zip(rescaled)
        .map(|(n, p)| (n.id.clone(), p))
        .collect();

    Layout {
        positions,
        strategy,
        skipped,
    }
}

/// Shift to zero mean, then scale uniformly so the largest |coordinate| equals `scale`.
///
/// Degenerate inputs (one node, all nodes coincident) end up at the origin.
pub(crate) fn rescale(mut points: Vec<Point>, scale: f64) -> Vec<Point> {
    if points.is_empty() {
        return points;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (mx, my) = (sx / n, sy / n);

    let mut extent = 0.0f64;
    for p in &mut points {
        p.x -= mx;
        p.y -= my;
        extent = extent.max(p.x.abs()).max(p.y.abs());
    }
    if extent > 0.0 && extent.is_finite() {
        let k = scale / extent;
        for p in &mut points {
            p.x *= k;
            p.y *= k;
        }
    }
    points
}

/// Offsets `0..len` centred on zero: `i - (len - 1) / 2`.
pub(crate) fn centred_slot(i: usize, len: usize) -> f64 {
    i as f64 - (len.saturating_sub(1)) as f64 / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mod.rs"]
mod tests;
