use std::collections::{HashMap, HashSet};

use crate::{
    foundation::error::{FlowError, FlowResult, ValidationErrors, ValidationIssue},
    graph::model::{Edge, EdgeKey, EdgeKind, Graph, Node, NodeKind, TypeDecl},
    graph::spec::{DiagramSpec, EdgeSpec, NodeSpec},
};

impl Graph {
    /// Validate a spec and build the immutable graph.
    ///
    /// Validation runs to completion and reports every issue found: missing `title`/`nodes`/
    /// `edges`, nodes without `id`/`label`, edges without `from`/`to`, duplicate node ids and
    /// edges pointing at unknown nodes. No partial graph is returned on failure.
    ///
    /// Unknown node/edge type names are not errors; they resolve to the default kind.
    #[tracing::instrument(skip(spec), fields(title = spec.title.as_deref().unwrap_or("")))]
    pub fn build(spec: &DiagramSpec) -> FlowResult<Graph> {
        let mut issues = Vec::new();

        if spec.title.is_none() {
            issues.push(ValidationIssue::missing("$", "title"));
        }
        if spec.nodes.is_none() {
            issues.push(ValidationIssue::missing("$", "nodes"));
        }
        if spec.edges.is_none() {
            issues.push(ValidationIssue::missing("$", "edges"));
        }

        let node_specs = spec.nodes.as_deref().unwrap_or(&[]);
        let edge_specs = spec.edges.as_deref().unwrap_or(&[]);

        // Pass 1: nodes. Every declared id counts for reference checks, even when the node is
        // otherwise malformed, so one bad node does not cascade into dangling-edge noise.
        let declared_ids: HashSet<&str> = node_specs.iter().filter_map(|n| n.id.as_deref()).collect();
        let mut nodes = Vec::with_capacity(node_specs.len());
        let mut node_index = HashMap::with_capacity(node_specs.len());
        for (i, spec_node) in node_specs.iter().enumerate() {
            if let Some(node) = build_node(i, spec_node, &node_index, &mut issues) {
                node_index.insert(node.id.clone(), nodes.len());
                nodes.push(node);
            }
        }

        // Pass 2: edges.
        let mut edges: Vec<Edge> = Vec::with_capacity(edge_specs.len());
        for (i, spec_edge) in edge_specs.iter().enumerate() {
            let Some(edge) = build_edge(i, spec_edge, &declared_ids, &node_index, &mut issues)
            else {
                continue;
            };
            if let Some(existing) = edges.iter_mut().find(|e| e.key == edge.key) {
                tracing::debug!(edge = %edge.key, "duplicate edge declaration replaces earlier one");
                *existing = edge;
            } else {
                edges.push(edge);
            }
        }

        if !issues.is_empty() {
            return Err(FlowError::Validation(ValidationErrors { issues }));
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        for (ei, e) in edges.iter().enumerate() {
            outgoing[e.from_idx].push(ei);
        }

        Ok(Graph {
            title: spec.title.clone().unwrap_or_default(),
            description: spec.description.clone(),
            nodes,
            edges,
            node_index,
            outgoing,
        })
    }

    /// Parse JSON text and build the graph in one step.
    pub fn from_json_str(s: &str) -> FlowResult<Graph> {
        Self::build(&DiagramSpec::from_json_str(s)?)
    }
}

fn build_node(
    i: usize,
    spec: &NodeSpec,
    seen: &HashMap<String, usize>,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Node> {
    let path = format!("$.nodes[{i}]");
    if spec.id.is_none() {
        issues.push(ValidationIssue::missing(path.as_str(), "id"));
    }
    if spec.label.is_none() {
        issues.push(ValidationIssue::missing(path.as_str(), "label"));
    }
    let (Some(id), Some(label)) = (spec.id.as_ref(), spec.label.as_ref()) else {
        return None;
    };
    if seen.contains_key(id) {
        issues.push(ValidationIssue::duplicate(format!("{path}.id"), id.as_str()));
        return None;
    }

    let (kind, type_decl) = match spec.kind.as_deref() {
        None => (NodeKind::default(), TypeDecl::Defaulted),
        Some(raw) => match NodeKind::parse(raw) {
            Some(kind) => (kind, TypeDecl::Declared),
            None => {
                tracing::warn!(node = %id, type_name = raw, "unrecognized node type, using default style");
                (NodeKind::default(), TypeDecl::Unrecognized(raw.to_string()))
            }
        },
    };

    Some(Node {
        id: id.clone(),
        label: label.clone(),
        kind,
        type_decl,
        description: spec.description.clone(),
    })
}

fn build_edge(
    i: usize,
    spec: &EdgeSpec,
    declared_ids: &HashSet<&str>,
    node_index: &HashMap<String, usize>,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Edge> {
    let path = format!("$.edges[{i}]");
    for (field, value) in [("from", &spec.from), ("to", &spec.to)] {
        match value {
            None => issues.push(ValidationIssue::missing(path.as_str(), field)),
            Some(id) if !declared_ids.contains(id.as_str()) => {
                issues.push(ValidationIssue::dangling(format!("{path}.{field}"), id.as_str()));
            }
            Some(_) => {}
        }
    }

    let (Some(from), Some(to)) = (spec.from.as_ref(), spec.to.as_ref()) else {
        return None;
    };
    let (Some(&from_idx), Some(&to_idx)) = (node_index.get(from), node_index.get(to)) else {
        return None;
    };

    let (kind, type_decl) = match spec.kind.as_deref() {
        None => (EdgeKind::default(), TypeDecl::Defaulted),
        Some(raw) => match EdgeKind::parse(raw) {
            Some(kind) => (kind, TypeDecl::Declared),
            None => {
                tracing::warn!(from = %from, to = %to, type_name = raw, "unrecognized edge type, using default style");
                (EdgeKind::default(), TypeDecl::Unrecognized(raw.to_string()))
            }
        },
    };

    Some(Edge {
        key: EdgeKey::new(from.as_str(), to.as_str(), spec.label.as_deref()),
        kind,
        type_decl,
        from_idx,
        to_idx,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/graph/build.rs"]
mod tests;
