use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{FlowError, FlowResult};

/// Declarative diagram description, as produced by an authoring tool or an LLM.
///
/// Every field is optional at the serde level so that [`crate::Graph::build`] can name exactly
/// what is missing instead of failing inside the JSON parser.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiagramSpec {
    /// Diagram title (required by validation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Node declarations (required by validation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeSpec>>,
    /// Edge declarations (required by validation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<EdgeSpec>>,
    /// Explicit animation instructions; derived from topology when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<Vec<AnimationSpec>>,
}

/// Raw node declaration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    /// Unique node id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Node type name (`process`, `decision`, `start`, `end`, `io`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Optional hover/tooltip text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw edge declaration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeSpec {
    /// Source node id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target node id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Optional edge label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Edge type name (`normal`, `conditional`, `feedback`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Raw animation instruction.
///
/// `effect`, `duration` and `order` stay untyped JSON here: a value of the wrong shape drops that
/// one animation during sequencing instead of rejecting the whole diagram.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    /// Target node id or edge reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementSpec>,
    /// Effect name (`fadeIn`, `highlight`, `pulse`, `draw`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<serde_json::Value>,
    /// Effect duration in seconds, a positive number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Value>,
    /// Group order, a non-negative integer (`2.0` is accepted); equal orders play simultaneously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<serde_json::Value>,
}

/// Element reference as written in a spec.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ElementSpec {
    /// A node id, or an edge in the `edge_<from>_<to>` encoding.
    Name(String),
    /// An explicit edge reference.
    Edge {
        /// Source node id.
        from: String,
        /// Target node id.
        to: String,
        /// Restricts the reference to the parallel edge carrying this label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Any other JSON value. Kept so one odd entry does not reject the whole spec; it never
    /// resolves.
    Unsupported(serde_json::Value),
}

impl DiagramSpec {
    /// Parse a spec from JSON text.
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a spec from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read diagram spec '{}'", path.display()))?;
        Self::from_json_str(&text).map_err(|e| match e {
            FlowError::Serde(msg) => FlowError::serde(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Explicit animations, if any were supplied and the list is non-empty.
    pub fn explicit_animations(&self) -> Option<&[AnimationSpec]> {
        self.animations
            .as_deref()
            .filter(|anims| !anims.is_empty())
    }
}
