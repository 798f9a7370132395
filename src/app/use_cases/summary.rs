//! Use-Case: Übersicht über alle Layer (für das Panel).

use serde::Serialize;

use crate::core::{Document, Entity, LayerKind};

/// Zählwerte eines Layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub name: String,
    pub kind: LayerKind,
    pub locked: bool,
    pub visible: bool,
    pub anchor_markers: usize,
    pub drawn_paths: usize,
    pub placed_assets: usize,
}

/// Fasst alle Layer in Z-Reihenfolge (oberster zuerst) zusammen.
pub fn layer_summary(doc: &Document) -> Vec<LayerSummary> {
    doc.layers()
        .map(|layer| {
            let mut summary = LayerSummary {
                name: layer.name.clone(),
                kind: layer.kind(),
                locked: layer.locked,
                visible: layer.visible,
                anchor_markers: 0,
                drawn_paths: 0,
                placed_assets: 0,
            };
            for entity in doc.entities_on(layer.id) {
                match entity {
                    Entity::Path(path) if path.is_anchor_marker() => summary.anchor_markers += 1,
                    Entity::Path(_) => summary.drawn_paths += 1,
                    Entity::Asset(_) => summary.placed_assets += 1,
                }
            }
            summary
        })
        .collect()
}
