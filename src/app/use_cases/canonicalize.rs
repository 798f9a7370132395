//! Kanonisierung der platzierten Komponenten vor der Verdrahtung.
//!
//! 1. Assets auf Kategorie-Layern werden auf ihre Alternativ-Variante umgestellt,
//!    sofern diese existiert.
//! 2. Register-Anker ohne nahes Asset bekommen das Register-Asset ihres Layers.

use glam::Vec2;

use super::relocate::normalized_scale;
use crate::app::batch::BatchOutcome;
use crate::core::{
    AssetLibrary, AssetResolver, Document, Entity, EntityId, LayerExitState, LayerId,
    PlacedAsset, REGISTER_LAYERS,
};
use crate::error::{OrganizerError, OrganizerResult};

/// Stellt alle Assets auf Kategorie-Layern auf ihre Alternativ-Variante um.
///
/// Mittelpunkt, Skalierung und Rotation bleiben erhalten; die native Größe
/// wird aus der neuen Datei gelesen. Gibt die Anzahl umgestellter Assets zurück.
pub fn swap_to_alternates(
    doc: &mut Document,
    library: &AssetLibrary,
    assets: &dyn AssetResolver,
    batch: &mut BatchOutcome,
) -> usize {
    let candidates: Vec<(EntityId, std::path::PathBuf)> = doc
        .layers()
        .filter(|layer| layer.is_category())
        .flat_map(|layer| doc.entities_on(layer.id))
        .filter_map(Entity::as_asset)
        .filter_map(|asset| {
            let alternate = library.alternate_of(&asset.file)?;
            assets.exists(&alternate).then_some((asset.id, alternate))
        })
        .collect();

    let mut swapped = 0;
    for (id, alternate) in candidates {
        let result = assets.native_size(&alternate).and_then(|size| {
            let asset = doc
                .asset_mut(id)
                .ok_or_else(|| OrganizerError::HostOperationFailed(format!("no asset {id}")))?;
            let center = asset.center();
            asset.file = alternate.clone();
            asset.native_size = size;
            asset.set_center(center);
            Ok(())
        });
        if batch.record(Some(id), result).is_some() {
            log::debug!("{} auf Alternativ-Variante {} umgestellt", id, alternate.display());
            swapped += 1;
        }
    }
    swapped
}

/// Setzt an jeden Register-Anker ohne nahes Asset das Register-Asset des Layers.
///
/// Gibt die Anzahl neu platzierter Assets zurück.
pub fn place_missing_register_assets(
    doc: &mut Document,
    library: &AssetLibrary,
    assets: &dyn AssetResolver,
    tolerance: f32,
    batch: &mut BatchOutcome,
) -> usize {
    let registers: Vec<(LayerId, String)> = REGISTER_LAYERS
        .iter()
        .filter_map(|name| Some((doc.layer_id(name)?, name.to_string())))
        .collect();

    let mut placed = 0;
    for (layer, name) in registers {
        let uncovered = uncovered_anchors(doc, layer, tolerance);
        if uncovered.is_empty() {
            continue;
        }

        let file = library.preferred_path(&name, assets);
        let placement = doc.with_layer_access(layer, LayerExitState::Restore, |doc| {
            let mut count = 0;
            for (anchor_id, position) in &uncovered {
                let result = place_asset(doc, layer, &file, assets, *position);
                if batch.record(Some(*anchor_id), result).is_some() {
                    count += 1;
                }
            }
            count
        });
        if let Some(count) = batch.record(None, placement) {
            log::debug!("{} Register-Assets auf '{}' platziert", count, name);
            placed += count;
        }
    }
    placed
}

/// Ankermarker eines Layers, in deren Toleranz kein Asset-Mittelpunkt liegt.
fn uncovered_anchors(doc: &Document, layer: LayerId, tolerance: f32) -> Vec<(EntityId, Vec2)> {
    let centers: Vec<Vec2> = doc
        .entities_on(layer)
        .filter_map(Entity::as_asset)
        .map(PlacedAsset::center)
        .collect();

    doc.entities_on(layer)
        .filter_map(Entity::as_path)
        .filter_map(|path| Some((path.id, path.marker_position()?)))
        .filter(|(_, position)| {
            !centers
                .iter()
                .any(|center| center.distance(*position) <= tolerance)
        })
        .collect()
}

fn place_asset(
    doc: &mut Document,
    layer: LayerId,
    file: &std::path::Path,
    assets: &dyn AssetResolver,
    center: Vec2,
) -> OrganizerResult<EntityId> {
    let size = assets.native_size(file)?;
    let scale = normalized_scale(doc, layer, None);
    doc.insert(layer, PlacedAsset::new(file, size, center).with_scale_percent(scale))
}
