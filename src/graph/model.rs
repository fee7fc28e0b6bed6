use std::collections::HashMap;
use std::fmt;

use crate::graph::style::{
    DEFAULT_EDGE_STYLE, DEFAULT_NODE_STYLE, EdgeStyle, LineDash, NodeShape, NodeStyle,
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Flow-chart node category.
pub enum NodeKind {
    /// A processing step (default).
    #[default]
    Process,
    /// A branch point.
    Decision,
    /// Entry point.
    Start,
    /// Exit point.
    End,
    /// Input/output step.
    Io,
}

impl NodeKind {
    /// All kinds, in canonical flow order (start, io, process, decision, end).
    pub const FLOW_ORDER: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Io,
        NodeKind::Process,
        NodeKind::Decision,
        NodeKind::End,
    ];

    /// Parse a spec type name. Unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Some(Self::Process),
            "decision" => Some(Self::Decision),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            "io" => Some(Self::Io),
            _ => None,
        }
    }

    /// Style record for this kind.
    pub fn style(self) -> NodeStyle {
        match self {
            Self::Process => DEFAULT_NODE_STYLE,
            Self::Decision => NodeStyle {
                shape: NodeShape::Diamond,
                color: "#FBBC05",
                font_color: "black",
            },
            Self::Start => NodeStyle {
                shape: NodeShape::Oval,
                color: "#34A853",
                font_color: "white",
            },
            Self::End => NodeStyle {
                shape: NodeShape::Oval,
                color: "#EA4335",
                font_color: "white",
            },
            Self::Io => NodeStyle {
                shape: NodeShape::Parallelogram,
                color: "#9C27B0",
                font_color: "white",
            },
        }
    }

    /// Position of this kind in [`NodeKind::FLOW_ORDER`].
    pub fn flow_rank(self) -> usize {
        match self {
            Self::Start => 0,
            Self::Io => 1,
            Self::Process => 2,
            Self::Decision => 3,
            Self::End => 4,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Flow-chart edge category.
pub enum EdgeKind {
    /// Plain control flow (default).
    #[default]
    Normal,
    /// Branch taken under a condition.
    Conditional,
    /// Loop-back edge.
    Feedback,
}

impl EdgeKind {
    /// Parse a spec type name. Unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "conditional" => Some(Self::Conditional),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }

    /// Style record for this kind.
    pub fn style(self) -> EdgeStyle {
        match self {
            Self::Normal => DEFAULT_EDGE_STYLE,
            Self::Conditional => EdgeStyle {
                dash: LineDash::Dashed,
                color: "#FF9800",
                width: 1.5,
            },
            Self::Feedback => EdgeStyle {
                dash: LineDash::Dotted,
                color: "#9C27B0",
                width: 1.5,
            },
        }
    }
}

/// How a node or edge type was given in the diagram JSON.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDecl {
    /// A recognised type name was present.
    Declared,
    /// No type was given; the default kind applies.
    Defaulted,
    /// An unrecognised type name was given; the default kind and style apply.
    Unrecognized(String),
}

/// Identity of an edge: ordered endpoints plus optional label.
///
/// Parallel edges between the same pair are distinct when their labels differ.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EdgeKey {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Label, `None` when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeKey {
    /// Build a key, normalizing an empty label to `None`.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        label: Option<impl Into<String>>,
    ) -> Self {
        let label: Option<String> = label.map(Into::into).filter(|l| !l.is_empty());
        Self {
            from: from.into(),
            to: to.into(),
            label,
        }
    }

    /// Key of an unlabeled edge.
    pub fn plain(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, None::<String>)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}->{}[{label}]", self.from, self.to),
            None => write!(f, "{}->{}", self.from, self.to),
        }
    }
}

/// A validated node.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Node {
    /// Unique id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Resolved kind.
    pub kind: NodeKind,
    /// How the kind was declared.
    pub type_decl: TypeDecl,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Node {
    /// Style derived from [`Node::kind`].
    pub fn style(&self) -> NodeStyle {
        self.kind.style()
    }
}

/// A validated edge whose endpoints exist in the owning [`Graph`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Edge {
    /// Identity (endpoints + label).
    pub key: EdgeKey,
    /// Resolved kind.
    pub kind: EdgeKind,
    /// How the kind was declared.
    pub type_decl: TypeDecl,
    #[serde(skip)]
    pub(crate) from_idx: usize,
    #[serde(skip)]
    pub(crate) to_idx: usize,
}

impl Edge {
    /// Style derived from [`Edge::kind`].
    pub fn style(&self) -> EdgeStyle {
        self.kind.style()
    }
}

/// Immutable, validated diagram graph.
///
/// Nodes and edges keep declaration order, which is the tie-breaker for every ordering decision
/// downstream (layering, topological sort, default animation order).
#[derive(Clone, Debug, serde::Serialize)]
pub struct Graph {
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    #[serde(skip)]
    pub(crate) node_index: HashMap<String, usize>,
    #[serde(skip)]
    pub(crate) outgoing: Vec<Vec<usize>>,
}

impl Graph {
    /// Diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Diagram description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Declaration index of a node.
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// `true` if a node with `id` exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Look up an edge by exact key.
    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.key == key)
    }

    /// All parallel edges `from -> to`, in declaration order.
    pub fn edges_between<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.key.from == from && e.key.to == to)
    }

    /// Outgoing edges of the node at declaration index `idx`, in declaration order.
    pub(crate) fn outgoing_edges(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(idx)
            .into_iter()
            .flatten()
            .map(|&e| &self.edges[e])
    }

    /// Distinct successor node indices of `idx`, in first-edge order.
    pub(crate) fn successors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for e in self.outgoing_edges(idx) {
            if !out.contains(&e.to_idx) {
                out.push(e.to_idx);
            }
        }
        out
    }

    /// Distinct predecessor node indices of `idx`, in edge declaration order.
    pub(crate) fn predecessors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for e in &self.edges {
            if e.to_idx == idx && !out.contains(&e.from_idx) {
                out.push(e.from_idx);
            }
        }
        out
    }
}
