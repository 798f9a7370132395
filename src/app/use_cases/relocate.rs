//! Use-Case: Selektion auf einen Kategorie-Layer verschieben.
//!
//! Platzierte Assets können dabei durch ein kanonisches Asset ersetzt werden,
//! das auf den nächsten Ankermarker der Selektion zentriert wird.
//! Verwaiste Ankermarker in der Umgebung wandern mit.

use std::path::Path;

use glam::Vec2;
use serde::Serialize;

use crate::app::batch::BatchOutcome;
use crate::app::AppState;
use crate::core::{
    is_category_layer, AnchorIndex, AssetResolver, Document, Entity, EntityId, ItemRef,
    LayerExitState, LayerId, PlacedAsset, Selectable, CATEGORY_LAYERS, IGNORE_LAYER,
};
use crate::error::{OrganizerError, OrganizerResult};
use crate::shared::OrganizerOptions;

/// Grund, warum nichts verschoben wurde (kein Fehler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveSkipReason {
    NoDocument,
    NoSelection,
}

/// Ergebnis von `move_selection_to_layer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub items_moved: usize,
    pub anchors_moved: usize,
    pub items_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MoveSkipReason>,
}

impl MoveReport {
    fn skipped(reason: MoveSkipReason) -> Self {
        Self {
            reason: Some(reason),
            ..Self::default()
        }
    }
}

/// Ziel-Skalierung für ein Asset auf `layer`: Minimum der vorhandenen
/// Geschwister-Assets, sonst 100 %.
pub(crate) fn normalized_scale(doc: &Document, layer: LayerId, exclude: Option<EntityId>) -> f32 {
    doc.entities_on(layer)
        .filter_map(Entity::as_asset)
        .filter(|asset| Some(asset.id) != exclude)
        .map(PlacedAsset::scale_percent)
        .reduce(f32::min)
        .unwrap_or(100.0)
}

/// Verschiebt die aktuelle Selektion auf den Kategorie-Layer `target`.
///
/// Ohne Dokument oder Selektion wird ein Null-Ergebnis mit Grund geliefert.
/// Ein Ziel außerhalb der Kategorie-Liste ist `InvalidInput`.
pub fn move_selection_to_layer(
    state: &mut AppState,
    target: &str,
    replacement: Option<&Path>,
) -> OrganizerResult<MoveReport> {
    let AppState {
        document,
        options,
        assets,
        ..
    } = &mut *state;
    let Some(doc) = document.as_mut() else {
        return Ok(MoveReport::skipped(MoveSkipReason::NoDocument));
    };
    if !is_category_layer(target) {
        return Err(OrganizerError::InvalidInput(format!(
            "'{target}' is not a category layer"
        )));
    }
    if doc.selection().is_empty() {
        return Ok(MoveReport::skipped(MoveSkipReason::NoSelection));
    }

    // Auf dem Ignore-Layer werden nie Assets ersetzt
    let replacement = replacement.filter(|_| target != IGNORE_LAYER);

    let target_id = doc.ensure_layer(target);
    let report = doc.with_layer_access(target_id, LayerExitState::for_layer(target), |doc| {
        let mut run = RelocateRun::new(doc, target_id, options, &**assets);
        run.process(replacement);
        run.report
    })?;

    log::info!(
        "Auf '{}' verschoben: {} Elemente, {} Anker, {} übersprungen",
        target,
        report.items_moved,
        report.anchors_moved,
        report.items_skipped
    );

    doc.clear_selection();
    state.notify_selection_changed();
    Ok(report)
}

/// Zustand eines einzelnen Verschiebe-Laufs.
struct RelocateRun<'a> {
    doc: &'a mut Document,
    target: LayerId,
    options: &'a OrganizerOptions,
    assets: &'a dyn AssetResolver,
    /// Selektion zu Beginn des Laufs
    selection: Vec<Selectable>,
    selection_anchors: AnchorIndex,
    batch: BatchOutcome,
    report: MoveReport,
}

impl<'a> RelocateRun<'a> {
    fn new(
        doc: &'a mut Document,
        target: LayerId,
        options: &'a OrganizerOptions,
        assets: &'a dyn AssetResolver,
    ) -> Self {
        let selection: Vec<Selectable> = doc.selection().iter().copied().collect();
        let selection_anchors = AnchorIndex::from_entities(doc, doc.selected_entities());
        Self {
            doc,
            target,
            options,
            assets,
            selection,
            selection_anchors,
            batch: BatchOutcome::new("Verschieben"),
            report: MoveReport::default(),
        }
    }

    fn process(&mut self, replacement: Option<&Path>) {
        for item in self.selection.clone() {
            let Some(id) = self.eligible_entity(item) else {
                self.report.items_skipped += 1;
                continue;
            };

            let is_asset = matches!(self.doc.entity(id), Some(Entity::Asset(_)));
            match replacement {
                Some(file) if is_asset => self.replace_or_relocate(id, file),
                _ => self.relocate(id),
            }
        }

        if self.batch.failure_count() > 0 {
            log::warn!(
                "{} Elemente konnten nicht verschoben werden",
                self.batch.failure_count()
            );
        }
    }

    /// Selektiertes Element auf einem Kategorie-Layer, sonst `None`.
    fn eligible_entity(&self, item: Selectable) -> Option<EntityId> {
        let (id, layer) = match self.doc.resolve(item)? {
            ItemRef::Path(path) => (path.id, path.layer),
            ItemRef::Asset(asset) => (asset.id, asset.layer),
            ItemRef::Layer(layer) => {
                log::debug!("Layer '{}' in Selektion übersprungen", layer.name);
                return None;
            }
        };
        let on_category = self.doc.layer(layer).is_some_and(|l| l.is_category());
        if !on_category {
            log::debug!("{} liegt nicht auf einem Kategorie-Layer", id);
            return None;
        }
        Some(id)
    }

    fn count_moved(&mut self, id: EntityId) {
        if self.doc.entity(id).is_some_and(Entity::is_anchor_marker) {
            self.report.anchors_moved += 1;
        } else {
            self.report.items_moved += 1;
        }
    }

    /// Ersetzt ein Asset; bei jedem Fehler wird stattdessen einfach verschoben.
    fn replace_or_relocate(&mut self, id: EntityId, file: &Path) {
        match self.replace_asset(id, file) {
            Ok(anchor) => {
                self.report.items_moved += 1;
                self.adopt_orphans(anchor, self.options.replace_rescan_tolerance);
            }
            Err(e) => {
                log::warn!("Ersetzen von {} fehlgeschlagen ({}), verschiebe ohne Ersatz", id, e);
                self.relocate(id);
            }
        }
    }

    /// Fügt das Ersatz-Asset am nächsten Selektions-Anker ein und entfernt das alte.
    /// Liefert den Zielpunkt.
    fn replace_asset(&mut self, id: EntityId, file: &Path) -> OrganizerResult<Vec2> {
        let center = self
            .doc
            .asset(id)
            .map(PlacedAsset::center)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("no asset {id}")))?;
        let anchor = self
            .selection_anchors
            .nearest(center)
            .map_or(center, |hit| hit.position);

        let native_size = self.assets.native_size(file)?;
        let scale = normalized_scale(self.doc, self.target, Some(id));
        let replacement = PlacedAsset::new(file, native_size, anchor).with_scale_percent(scale);

        let new_id = self.doc.insert(self.target, replacement)?;
        if let Err(e) = self.doc.remove(id) {
            // Ersatz zurücknehmen, damit nichts doppelt liegt
            self.doc.remove(new_id)?;
            return Err(e);
        }
        log::debug!("{} ersetzt durch {} ({}%)", id, new_id, scale);
        Ok(anchor)
    }

    /// Verschiebt ein Element unverändert; Assets werden skaliert.
    fn relocate(&mut self, id: EntityId) {
        let Some(center) = self.doc.entity(id).and_then(Entity::center) else {
            self.batch.record::<()>(
                Some(id),
                Err(OrganizerError::GeometryDegenerate("entity without geometry".to_string())),
            );
            self.report.items_skipped += 1;
            return;
        };

        let scale = normalized_scale(self.doc, self.target, Some(id));
        let result = self.doc.move_to_layer(id, self.target);
        if self.batch.record(Some(id), result).is_none() {
            self.report.items_skipped += 1;
            return;
        }
        if let Some(asset) = self.doc.asset_mut(id) {
            asset.set_scale_percent(scale);
        }

        self.count_moved(id);
        self.adopt_orphans(center, self.options.relocate_rescan_tolerance);
    }

    /// Holt verwaiste Ankermarker in der Umgebung von `point` auf den Ziel-Layer.
    fn adopt_orphans(&mut self, point: Vec2, radius: f32) {
        let whitelist: Vec<LayerId> = CATEGORY_LAYERS
            .iter()
            .filter_map(|name| self.doc.layer_id(name))
            .filter(|layer| *layer != self.target)
            .collect();

        let orphans: Vec<EntityId> = AnchorIndex::from_layers(self.doc, whitelist)
            .within_radius(point, radius)
            .into_iter()
            .map(|hit| hit.entity_id)
            .filter(|id| !self.selection.contains(&Selectable::Entity(*id)))
            .collect();

        for orphan in orphans {
            let result = self.doc.move_to_layer(orphan, self.target);
            if self.batch.record(Some(orphan), result).is_some() {
                log::debug!("Verwaister Anker {} mitgenommen", orphan);
                self.report.anchors_moved += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryAssetResolver, PathEntity};
    use approx::assert_relative_eq;

    fn state_with(doc: Document) -> AppState {
        AppState::new()
            .with_assets(MemoryAssetResolver::new().with("assets/Square Registers.png", Vec2::new(20.0, 10.0)))
            .with_document(doc)
    }

    fn doc(state: &AppState) -> &Document {
        state.document.as_ref().expect("Dokument offen")
    }

    #[test]
    fn missing_document_and_selection_are_reported() {
        let mut state = AppState::new();
        let report = move_selection_to_layer(&mut state, "Units", None).expect("kein Fehler");
        assert_eq!(report.reason, Some(MoveSkipReason::NoDocument));

        let mut state = state_with(Document::new("plan"));
        let report = move_selection_to_layer(&mut state, "Units", None).expect("kein Fehler");
        assert_eq!(report.reason, Some(MoveSkipReason::NoSelection));
        assert!(doc(&state).layer_by_name("Units").is_none());
    }

    #[test]
    fn non_category_target_is_invalid_input() {
        let mut state = state_with(Document::new("plan"));
        let result = move_selection_to_layer(&mut state, "Layer 1", None);
        assert!(matches!(result, Err(OrganizerError::InvalidInput(_))));
    }

    #[test]
    fn entities_outside_whitelist_are_skipped_untouched() {
        let mut plan = Document::new("plan");
        let scratch = plan.ensure_layer("Layer 1");
        let a = plan
            .insert(scratch, PathEntity::anchor_marker(Vec2::ZERO))
            .expect("Einfügen");
        let b = plan
            .insert(scratch, PathEntity::polyline(&[Vec2::ZERO, Vec2::X]))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(a), Selectable::Entity(b)]);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(&mut state, "Units", None).expect("Verschieben");

        assert_eq!(report.items_moved, 0);
        assert_eq!(report.anchors_moved, 0);
        assert_eq!(report.items_skipped, 2);
        assert_eq!(doc(&state).entity(a).map(Entity::layer), Some(scratch));
    }

    #[test]
    fn plain_relocate_normalizes_scale_and_adopts_orphans() {
        let mut plan = Document::new("plan");
        let target = plan.ensure_layer("Thermostats");
        let source = plan.ensure_layer("Units");
        for percent in [120.0, 80.0, 150.0] {
            plan.insert(
                target,
                PlacedAsset::new("t.png", Vec2::splat(10.0), Vec2::splat(500.0)).with_scale_percent(percent),
            )
            .expect("Einfügen");
        }
        let asset = plan
            .insert(source, PlacedAsset::new("u.png", Vec2::splat(10.0), Vec2::ZERO))
            .expect("Einfügen");
        let orphan = plan
            .insert(source, PathEntity::anchor_marker(Vec2::new(4.0, 0.0)))
            .expect("Einfügen");
        let far = plan
            .insert(source, PathEntity::anchor_marker(Vec2::new(40.0, 0.0)))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(asset)]);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(&mut state, "Thermostats", None).expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        assert_eq!(report.anchors_moved, 1);
        let doc = doc(&state);
        let moved = doc.asset(asset).expect("Asset");
        assert_eq!(moved.layer, target);
        assert_relative_eq!(moved.scale_percent(), 80.0, epsilon = 1e-3);
        assert_relative_eq!(moved.center().x, 0.0, epsilon = 1e-3);
        assert_eq!(doc.entity(orphan).map(Entity::layer), Some(target));
        assert_eq!(doc.entity(far).map(Entity::layer), Some(source));
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn replacement_is_centered_on_selected_anchor() {
        let mut plan = Document::new("plan");
        let source = plan.ensure_layer("Units");
        let asset = plan
            .insert(source, PlacedAsset::new("old.png", Vec2::splat(10.0), Vec2::ZERO))
            .expect("Einfügen");
        let anchor = plan
            .insert(source, PathEntity::anchor_marker(Vec2::new(30.0, 10.0)))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(asset), Selectable::Entity(anchor)]);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(
            &mut state,
            "Square Registers",
            Some(Path::new("assets/Square Registers.png")),
        )
        .expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        assert_eq!(report.anchors_moved, 1);
        let doc = doc(&state);
        assert!(doc.entity(asset).is_none());
        let layer = doc.layer_by_name("Square Registers").expect("Layer angelegt");
        let placed: Vec<&PlacedAsset> = doc.entities_on(layer.id).filter_map(Entity::as_asset).collect();
        assert_eq!(placed.len(), 1);
        assert_relative_eq!(placed[0].center().x, 30.0, epsilon = 1e-3);
        assert_relative_eq!(placed[0].center().y, 10.0, epsilon = 1e-3);
        assert_relative_eq!(placed[0].scale_percent(), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn missing_replacement_falls_back_to_relocate() {
        let mut plan = Document::new("plan");
        let source = plan.ensure_layer("Units");
        let asset = plan
            .insert(source, PlacedAsset::new("old.png", Vec2::splat(10.0), Vec2::ZERO))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(asset)]);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(&mut state, "Thermostats", Some(Path::new("assets/missing.png")))
            .expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        let moved = doc(&state).asset(asset).expect("altes Asset bleibt");
        assert_eq!(moved.file, Path::new("old.png"));
    }

    #[test]
    fn ignore_target_suppresses_replacement_and_hides_layer() {
        let mut plan = Document::new("plan");
        let source = plan.ensure_layer("Units");
        let asset = plan
            .insert(source, PlacedAsset::new("old.png", Vec2::splat(10.0), Vec2::ZERO))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(asset)]);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(
            &mut state,
            IGNORE_LAYER,
            Some(Path::new("assets/Square Registers.png")),
        )
        .expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        let doc = doc(&state);
        assert_eq!(doc.asset(asset).map(|a| a.file.clone()), Some("old.png".into()));
        let ignore = doc.layer_by_name(IGNORE_LAYER).expect("Ignore-Layer");
        assert!(ignore.locked);
        assert!(!ignore.visible);
    }

    fn plan_with_orphan_at(distance: f32) -> (Document, EntityId, EntityId, EntityId) {
        let mut plan = Document::new("plan");
        let target = plan.ensure_layer("Thermostats");
        let source = plan.ensure_layer("Units");
        let resident = plan
            .insert(target, PathEntity::anchor_marker(Vec2::new(2.0, 0.0)))
            .expect("Einfügen");
        let asset = plan
            .insert(source, PlacedAsset::new("old.png", Vec2::splat(10.0), Vec2::ZERO))
            .expect("Einfügen");
        let orphan = plan
            .insert(source, PathEntity::anchor_marker(Vec2::new(distance, 0.0)))
            .expect("Einfügen");
        plan.set_selection([Selectable::Entity(asset)]);
        (plan, asset, orphan, resident)
    }

    #[test]
    fn replacement_rescan_is_tighter_than_plain_relocate() {
        let (plan, _, orphan, _) = plan_with_orphan_at(7.0);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(
            &mut state,
            "Thermostats",
            Some(Path::new("assets/Square Registers.png")),
        )
        .expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        assert_eq!(report.anchors_moved, 0);
        let doc = doc(&state);
        let units = doc.layer_id("Units").expect("Layer");
        assert_eq!(doc.entity(orphan).map(Entity::layer), Some(units));
    }

    #[test]
    fn plain_relocate_adopts_orphan_at_seven_units() {
        let (plan, _, orphan, _) = plan_with_orphan_at(7.0);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(&mut state, "Thermostats", None).expect("Verschieben");

        assert_eq!(report.items_moved, 1);
        assert_eq!(report.anchors_moved, 1);
        let doc = doc(&state);
        let target = doc.layer_id("Thermostats").expect("Layer");
        assert_eq!(doc.entity(orphan).map(Entity::layer), Some(target));
    }

    #[test]
    fn anchors_already_on_target_are_not_counted() {
        let (plan, _, _, resident) = plan_with_orphan_at(40.0);
        let mut state = state_with(plan);

        let report = move_selection_to_layer(&mut state, "Thermostats", None).expect("Verschieben");
        assert_eq!(report.anchors_moved, 0);

        let (plan, _, _, resident_replaced) = plan_with_orphan_at(40.0);
        let mut replaced = state_with(plan);
        let report = move_selection_to_layer(
            &mut replaced,
            "Thermostats",
            Some(Path::new("assets/Square Registers.png")),
        )
        .expect("Verschieben");
        assert_eq!(report.anchors_moved, 0);

        let target = doc(&state).layer_id("Thermostats").expect("Layer");
        assert_eq!(doc(&state).entity(resident).map(Entity::layer), Some(target));
        assert!(doc(&replaced).entity(resident_replaced).is_some());
    }
}
