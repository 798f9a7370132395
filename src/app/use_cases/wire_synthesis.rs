//! Use-Case: Register-Drähte synthetisieren.
//!
//! Ablauf:
//! 1. Kanonisierung (Alternativ-Varianten, fehlende Register-Assets)
//! 2. Alte Drähte entfernen (Kennzeichnung über die Pfad-Notiz)
//! 3. Für jedes offene Kanal-Ende: Ignore-Punkt in der Nähe → ausgeschlossen,
//!    sonst Register-Anker in Verbindungstoleranz → Draht erzeugen.

use glam::Vec2;
use serde::Serialize;

use super::canonicalize::{place_missing_register_assets, swap_to_alternates};
use crate::app::batch::{BatchOutcome, ItemFailure};
use crate::app::tools::wire::{DuctEnd, DuctEndpoint, WireGeometry};
use crate::app::AppState;
use crate::core::{
    is_duct_layer, AnchorIndex, Document, Entity, EntityId, LayerExitState, LayerId, IGNORE_LAYER,
    REGISTER_LAYERS,
};
use crate::error::{OrganizerError, OrganizerResult};
use crate::shared::OrganizerOptions;

/// Ergebnis eines Synthese-Laufs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReport {
    /// Auf Alternativ-Variante umgestellte Assets
    pub swapped: usize,
    /// Neu platzierte Register-Assets
    pub placed: usize,
    /// Erzeugte Drähte (`None` wenn die Drahterzeugung deaktiviert war)
    pub wires_created: Option<usize>,
    /// Entfernte Drähte eines früheren Laufs
    pub removed_stale: usize,
    /// Durch Ignore-Punkte ausgeschlossene Kanal-Enden
    pub ignored_endpoints: usize,
    #[serde(skip)]
    pub failures: Vec<ItemFailure>,
}

impl WireReport {
    /// Status-Text für das Panel; Teilerfolge bleiben von Erfolg unterscheidbar.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Swapped {} asset(s), placed {} register asset(s)",
            self.swapped, self.placed
        );
        match self.wires_created {
            Some(created) => {
                text.push_str(&format!(", created {created} wire(s)"));
                if self.ignored_endpoints > 0 {
                    text.push_str(&format!(" ({} endpoint(s) ignored)", self.ignored_endpoints));
                }
            }
            None => text.push_str(", wire creation disabled"),
        }
        if !self.failures.is_empty() {
            text.push_str(&format!("; {} item(s) failed", self.failures.len()));
        }
        text.push('.');
        text
    }
}

/// Führt Kanonisierung und (optional) Drahtsynthese auf dem offenen Dokument aus.
pub fn synthesize_register_wires(
    state: &mut AppState,
    enable_wire_creation: bool,
) -> OrganizerResult<WireReport> {
    let AppState {
        document,
        options,
        assets,
        ..
    } = &mut *state;
    let doc = document.as_mut().ok_or(OrganizerError::NoDocument)?;

    let library = options.asset_library();
    let mut batch = BatchOutcome::new("Drahtsynthese");
    let mut report = WireReport {
        swapped: swap_to_alternates(doc, &library, &**assets, &mut batch),
        placed: place_missing_register_assets(
            doc,
            &library,
            &**assets,
            options.register_asset_tolerance,
            &mut batch,
        ),
        ..WireReport::default()
    };

    if enable_wire_creation {
        report.removed_stale = remove_stale_wires(doc, &options.wire_tag, &mut batch);
        let (created, ignored) = create_wires(doc, options, &mut batch);
        report.wires_created = Some(created);
        report.ignored_endpoints = ignored;
    }

    if batch.degenerate_count() > 0 {
        log::debug!("{} zu kurze Drähte verworfen", batch.degenerate_count());
    }
    report.failures = batch.failures().to_vec();
    log::info!("Drahtsynthese: {}", report.summary());
    Ok(report)
}

/// Entfernt alle Pfade mit Draht-Kennzeichnung.
fn remove_stale_wires(doc: &mut Document, tag: &str, batch: &mut BatchOutcome) -> usize {
    let stale: Vec<EntityId> = doc
        .layers()
        .flat_map(|layer| doc.entities_on(layer.id))
        .filter_map(Entity::as_path)
        .filter(|path| path.has_note(tag))
        .map(|path| path.id)
        .collect();

    stale
        .into_iter()
        .filter(|id| batch.record(Some(*id), doc.remove(*id)).is_some())
        .count()
}

/// Kanal-Pfade: offene Pfade auf Kategorie-Layern mit Kanal-Schlüsselwort.
fn collect_ducts(doc: &Document, tag: &str) -> Vec<(EntityId, LayerId, Vec<Vec2>)> {
    doc.layers()
        .filter(|layer| layer.is_category() && is_duct_layer(&layer.name))
        .flat_map(|layer| doc.entities_on(layer.id))
        .filter_map(Entity::as_path)
        .filter(|path| path.has_open_ends() && !path.has_note(tag))
        .map(|path| (path.id, path.layer, path.anchors().collect()))
        .collect()
}

/// Alle Punkte aller Pfade auf dem Ignore-Layer.
fn collect_ignore_points(doc: &Document) -> Vec<Vec2> {
    let Some(layer) = doc.layer_id(IGNORE_LAYER) else {
        return Vec::new();
    };
    doc.entities_on(layer)
        .filter_map(Entity::as_path)
        .flat_map(|path| path.anchors())
        .collect()
}

fn create_wires(
    doc: &mut Document,
    options: &OrganizerOptions,
    batch: &mut BatchOutcome,
) -> (usize, usize) {
    let ducts = collect_ducts(doc, &options.wire_tag);
    let ignore_points = collect_ignore_points(doc);
    let registers: Vec<LayerId> = REGISTER_LAYERS
        .iter()
        .filter_map(|name| doc.layer_id(name))
        .collect();
    let register_anchors = AnchorIndex::from_layers(doc, registers);

    let mut created = 0;
    let mut ignored = 0;
    for (duct_id, layer, anchors) in ducts {
        for end in DuctEnd::BOTH {
            let Some(endpoint) = DuctEndpoint::from_anchors(&anchors, end) else {
                continue;
            };

            // Ignore-Punkte haben Vorrang vor Register-Treffern
            let excluded = ignore_points
                .iter()
                .any(|point| point.distance(endpoint.endpoint) <= options.ignore_tolerance);
            if excluded {
                log::debug!("{} {:?}: durch Ignore-Punkt ausgeschlossen", duct_id, end);
                ignored += 1;
                continue;
            }

            if register_anchors
                .within_radius(endpoint.endpoint, options.connection_tolerance)
                .is_empty()
            {
                continue;
            }

            let result = WireGeometry::for_endpoint(&endpoint, options.min_wire_length)
                .and_then(|wire| insert_wire(doc, layer, &wire, options));
            if batch.record(Some(duct_id), result).is_some() {
                created += 1;
            }
        }
    }
    (created, ignored)
}

fn insert_wire(
    doc: &mut Document,
    layer: LayerId,
    wire: &WireGeometry,
    options: &OrganizerOptions,
) -> OrganizerResult<EntityId> {
    let path = wire.to_path(options.wire_stroke_width, options.wire_rgb(), &options.wire_tag);
    doc.with_layer_access(layer, LayerExitState::Restore, |doc| doc.insert(layer, path))?
}
