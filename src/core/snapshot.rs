//! Dokument-Snapshots (JSON) zum Befüllen einer Sitzung ohne Host.

use serde::Deserialize;

use super::{Document, Entity};
use crate::error::OrganizerResult;

/// Ein Layer im Snapshot; Elemente in Stapelreihenfolge (vorderstes zuerst).
#[derive(Debug, Clone, Deserialize)]
pub struct LayerSnapshot {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

fn default_visible() -> bool {
    true
}

/// Gesamtes Dokument; Layer in Z-Reihenfolge (oberster zuerst).
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSnapshot {
    pub name: String,
    #[serde(default)]
    pub layers: Vec<LayerSnapshot>,
}

impl DocumentSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Baut das Dokument auf. IDs werden in Traversierungsreihenfolge neu vergeben
    /// (Layer von oben nach unten, innerhalb eines Layers von hinten nach vorne,
    /// beginnend bei 1).
    pub fn into_document(self) -> OrganizerResult<Document> {
        let mut doc = Document::new(self.name);
        let mut pending = Vec::with_capacity(self.layers.len());

        // Unterster Layer zuerst anlegen, damit die Z-Reihenfolge erhalten bleibt
        for layer in self.layers.iter().rev() {
            pending.push(doc.add_layer(&layer.name)?);
        }
        pending.reverse();

        for (snapshot, layer_id) in self.layers.into_iter().zip(pending) {
            for entity in snapshot.entities.into_iter().rev() {
                doc.insert(layer_id, entity)?;
            }
            doc.set_layer_locked(layer_id, snapshot.locked)?;
            doc.set_layer_visible(layer_id, snapshot.visible)?;
        }
        Ok(doc)
    }
}
