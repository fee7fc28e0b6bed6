use std::fmt;

use crate::graph::model::EdgeKey;

/// Visual effect applied by an [`AnimationEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    /// Make the element visible.
    FadeIn,
    /// Make visible and mark highlighted.
    Highlight,
    /// Make visible and mark pulsing (nodes only).
    Pulse,
    /// Make visible by stroking it in (edges only).
    Draw,
}

impl Effect {
    /// Parse an effect name. Accepts the camelCase form and common spellings (`fade_in`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "fadein" => Some(Self::FadeIn),
            "highlight" => Some(Self::Highlight),
            "pulse" => Some(Self::Pulse),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }

    /// `true` when this effect is meaningful for `target`.
    pub fn applies_to(self, target: TargetKind) -> bool {
        match target {
            TargetKind::Node => matches!(self, Self::FadeIn | Self::Highlight | Self::Pulse),
            TargetKind::Edge => matches!(self, Self::Draw | Self::FadeIn | Self::Highlight),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FadeIn => "fadeIn",
            Self::Highlight => "highlight",
            Self::Pulse => "pulse",
            Self::Draw => "draw",
        })
    }
}

/// Whether an element is a node or an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A node.
    Node,
    /// An edge.
    Edge,
}

/// A resolved reference to one graph element.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementRef {
    /// Node by id.
    Node {
        /// Node id.
        id: String,
    },
    /// Edge by key.
    Edge(EdgeKey),
}

impl ElementRef {
    /// Node reference shorthand.
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node { id: id.into() }
    }

    /// Node or edge.
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Self::Node { .. } => TargetKind::Node,
            Self::Edge(_) => TargetKind::Edge,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { id } => f.write_str(id),
            Self::Edge(key) => write!(f, "{key}"),
        }
    }
}

/// One timed effect on one element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationEvent {
    /// Target element; always resolves in the graph the timeline was built for.
    pub element: ElementRef,
    /// Effect to apply.
    pub effect: Effect,
    /// Effect duration in seconds, > 0.
    pub duration: f64,
    /// Group order; equal orders play together.
    pub order: u32,
}
