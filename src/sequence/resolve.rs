use serde_json::Value;

use crate::graph::model::{EdgeKey, Graph};
use crate::graph::spec::{AnimationSpec, ElementSpec};
use crate::sequence::event::{AnimationEvent, Effect, ElementRef, TargetKind};

/// Duration applied when an explicit animation omits one.
pub const DEFAULT_EXPLICIT_DURATION: f64 = 0.8;

const LEGACY_EDGE_PREFIX: &str = "edge_";

/// Why an explicit animation was discarded.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// No `element` given.
    MissingElement,
    /// `element` matches no node or edge.
    UnresolvedElement {
        /// The reference as written.
        element: String,
    },
    /// No `effect` given.
    MissingEffect,
    /// `effect` is not a known effect name.
    UnknownEffect {
        /// The name as written.
        effect: String,
    },
    /// The effect does not apply to this kind of element (e.g. `pulse` on an edge).
    EffectNotApplicable {
        /// The effect.
        effect: Effect,
        /// The resolved element kind.
        target: TargetKind,
    },
    /// `duration` is not a positive number.
    InvalidDuration {
        /// The value as given.
        duration: Value,
    },
    /// `order` is not a non-negative integer within the supported range.
    InvalidOrder {
        /// The value as given.
        order: Value,
    },
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingElement => f.write_str("missing element"),
            Self::UnresolvedElement { element } => {
                write!(f, "element '{element}' matches no node or edge")
            }
            Self::MissingEffect => f.write_str("missing effect"),
            Self::UnknownEffect { effect } => write!(f, "unknown effect '{effect}'"),
            Self::EffectNotApplicable { effect, target } => {
                write!(f, "effect '{effect}' does not apply to {target:?}")
            }
            Self::InvalidDuration { duration } => write!(f, "invalid duration {duration}"),
            Self::InvalidOrder { order } => write!(f, "invalid order {order}"),
        }
    }
}

/// An explicit animation that was discarded, by position in the input list.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DroppedEvent {
    /// Index into the diagram's `animations` list.
    pub index: usize,
    /// Why it was discarded.
    pub reason: DropReason,
}

/// Resolve explicit animations against `graph`.
///
/// Invalid entries are dropped, never fatal. A single entry may expand into several events when an
/// unlabeled edge reference covers parallel edges.
pub(crate) fn resolve_explicit(
    graph: &Graph,
    specs: &[AnimationSpec],
) -> (Vec<AnimationEvent>, Vec<DroppedEvent>) {
    let mut events = Vec::with_capacity(specs.len());
    let mut dropped = Vec::new();

    for (index, spec) in specs.iter().enumerate() {
        match resolve_one(graph, spec) {
            Ok(resolved) => events.extend(resolved),
            Err(reason) => {
                tracing::warn!(index, %reason, "dropping animation");
                dropped.push(DroppedEvent { index, reason });
            }
        }
    }
    (events, dropped)
}

fn resolve_one(graph: &Graph, spec: &AnimationSpec) -> Result<Vec<AnimationEvent>, DropReason> {
    let element = spec.element.as_ref().ok_or(DropReason::MissingElement)?;
    let targets = resolve_element(graph, element).ok_or_else(|| DropReason::UnresolvedElement {
        element: describe(element),
    })?;

    let raw_effect = spec.effect.as_ref().ok_or(DropReason::MissingEffect)?;
    let effect = raw_effect
        .as_str()
        .and_then(Effect::parse)
        .ok_or_else(|| DropReason::UnknownEffect {
            effect: match raw_effect {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            },
        })?;

    let duration = match &spec.duration {
        None => DEFAULT_EXPLICIT_DURATION,
        Some(raw) => raw
            .as_f64()
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| DropReason::InvalidDuration {
                duration: raw.clone(),
            })?,
    };

    let order = match &spec.order {
        None => 0,
        Some(raw) => parse_order(raw).ok_or_else(|| DropReason::InvalidOrder { order: raw.clone() })?,
    };

    let mut out = Vec::with_capacity(targets.len());
    for element in targets {
        let target = element.target_kind();
        if !effect.applies_to(target) {
            return Err(DropReason::EffectNotApplicable { effect, target });
        }
        out.push(AnimationEvent {
            element,
            effect,
            duration,
            order,
        });
    }
    Ok(out)
}

/// Integer orders, or floats with no fractional part, within `u32`.
fn parse_order(raw: &Value) -> Option<u32> {
    if let Some(n) = raw.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = raw.as_f64()?;
    (f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f)).then_some(f as u32)
}

/// Resolve an element reference to one node or one-or-more edges.
pub(crate) fn resolve_element(graph: &Graph, element: &ElementSpec) -> Option<Vec<ElementRef>> {
    match element {
        ElementSpec::Name(name) => {
            if graph.contains_node(name) {
                return Some(vec![ElementRef::node(name.as_str())]);
            }
            let rest = name.strip_prefix(LEGACY_EDGE_PREFIX)?;
            // Ids may contain '_', so try every split point, leftmost first.
            rest.match_indices('_').find_map(|(i, _)| {
                let (from, to) = (&rest[..i], &rest[i + 1..]);
                edge_refs(graph, from, to, None)
            })
        }
        ElementSpec::Edge { from, to, label } => edge_refs(graph, from, to, label.as_deref()),
        ElementSpec::Unsupported(_) => None,
    }
}

/// Edges `from -> to` (or, failing that, `to -> from`) matching `label` if one is given.
fn edge_refs(graph: &Graph, from: &str, to: &str, label: Option<&str>) -> Option<Vec<ElementRef>> {
    let matching = |a: &str, b: &str| -> Vec<ElementRef> {
        match label.filter(|l| !l.is_empty()) {
            Some(l) => graph
                .edge(&EdgeKey::new(a, b, Some(l)))
                .map(|e| ElementRef::Edge(e.key.clone()))
                .into_iter()
                .collect(),
            None => graph
                .edges_between(a, b)
                .map(|e| ElementRef::Edge(e.key.clone()))
                .collect(),
        }
    };

    let forward = matching(from, to);
    if !forward.is_empty() {
        return Some(forward);
    }
    let reversed = matching(to, from);
    (!reversed.is_empty()).then_some(reversed)
}

fn describe(element: &ElementSpec) -> String {
    match element {
        ElementSpec::Name(name) => name.clone(),
        ElementSpec::Edge { from, to, label } => EdgeKey::new(
            from.as_str(),
            to.as_str(),
            label.as_deref(),
        )
        .to_string(),
        ElementSpec::Unsupported(value) => value.to_string(),
    }
}
