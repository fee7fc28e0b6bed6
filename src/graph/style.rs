//! Closed style tables for node and edge kinds.
//!
//! Style is a pure function of kind. Renderers read these records; nothing in the engine stores a
//! per-instance copy that could drift from its kind.

/// Node outline shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    /// Rectangle.
    Box,
    /// Rhombus.
    Diamond,
    /// Ellipse.
    Oval,
    /// Slanted rectangle.
    Parallelogram,
}

/// Edge stroke pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    /// Continuous stroke.
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
}

/// Resolved style of a node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct NodeStyle {
    /// Outline shape.
    pub shape: NodeShape,
    /// Fill color, `#RRGGBB`.
    pub color: &'static str,
    /// Label color.
    pub font_color: &'static str,
}

/// Resolved style of an edge kind.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EdgeStyle {
    /// Stroke pattern.
    pub dash: LineDash,
    /// Stroke color, `#RRGGBB`.
    pub color: &'static str,
    /// Stroke width in renderer units.
    pub width: f64,
}

/// Color used by renderers for highlighted elements.
pub const HIGHLIGHT_COLOR: &str = "#FF9800";

pub(crate) const DEFAULT_NODE_STYLE: NodeStyle = NodeStyle {
    shape: NodeShape::Box,
    color: "#4285F4",
    font_color: "white",
};

pub(crate) const DEFAULT_EDGE_STYLE: EdgeStyle = EdgeStyle {
    dash: LineDash::Solid,
    color: "#333333",
    width: 1.5,
};
