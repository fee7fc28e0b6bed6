use std::collections::BTreeSet;

use crate::graph::model::EdgeKey;
use crate::sequence::event::{AnimationEvent, Effect, ElementRef};

/// What a renderer should show at one point of a timeline.
///
/// Derived on demand; carries no identity. Sets are ordered so equal states compare and serialize
/// identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualState {
    /// Node ids drawn.
    pub visible_nodes: BTreeSet<String>,
    /// Edges drawn.
    pub visible_edges: BTreeSet<EdgeKey>,
    /// Node ids drawn in the highlight color.
    pub highlighted_nodes: BTreeSet<String>,
    /// Edges drawn in the highlight color.
    pub highlighted_edges: BTreeSet<EdgeKey>,
    /// Node ids drawn with a pulse marker.
    pub pulsing_nodes: BTreeSet<String>,
}

impl VisualState {
    /// Apply one event. Every effect reveals its target; highlight and pulse also mark it.
    pub(crate) fn apply(&mut self, event: &AnimationEvent) {
        match &event.element {
            ElementRef::Node { id } => {
                self.visible_nodes.insert(id.clone());
                match event.effect {
                    Effect::Highlight => {
                        self.highlighted_nodes.insert(id.clone());
                    }
                    Effect::Pulse => {
                        self.pulsing_nodes.insert(id.clone());
                    }
                    Effect::FadeIn | Effect::Draw => {}
                }
            }
            ElementRef::Edge(key) => {
                self.visible_edges.insert(key.clone());
                if event.effect == Effect::Highlight {
                    self.highlighted_edges.insert(key.clone());
                }
            }
        }
    }

    /// `true` if nothing is highlighted or pulsing.
    pub fn is_calm(&self) -> bool {
        self.highlighted_nodes.is_empty()
            && self.highlighted_edges.is_empty()
            && self.pulsing_nodes.is_empty()
    }

    /// `true` if every set of `self` is contained in the matching set of `other`.
    pub fn is_subset_of(&self, other: &VisualState) -> bool {
        self.visible_nodes.is_subset(&other.visible_nodes)
            && self.visible_edges.is_subset(&other.visible_edges)
            && self.highlighted_nodes.is_subset(&other.highlighted_nodes)
            && self.highlighted_edges.is_subset(&other.highlighted_edges)
            && self.pulsing_nodes.is_subset(&other.pulsing_nodes)
    }
}
