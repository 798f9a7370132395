//! Ignore-Modus: Zustandsautomat mit Live-Vorschau an Selektionsänderungen.
//!
//! Zustände: `Inactive`, `ActiveNoSelection`, `ActiveSelected`.
//! Beim Aktivieren wird ein Selektions-Abo angelegt, beim Deaktivieren
//! wieder beendet; es existiert höchstens ein Abo gleichzeitig.
//! Der Vorschau-Layer gehört exklusiv diesem Controller.

use glam::Vec2;
use serde::Serialize;

use crate::app::tools::ignore_preview::{build_overlay, EndpointProbe, PreviewStyle};
use crate::core::{
    Document, EntityId, ItemRef, LayerExitState, PathEntity, PathPoint, PathStyle,
    SelectionSubscription, IGNORE_LAYER, PREVIEW_LAYER,
};
use crate::error::{OrganizerError, OrganizerResult};
use crate::shared::{OrganizerOptions, IGNORE_MARKER_TAG};

/// Der aktuell vorgemerkte Endpunkt im Zustand `ActiveSelected`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedEndpoint {
    pub entity_id: EntityId,
    pub name: String,
    pub probe: EndpointProbe,
}

/// Zustand des Ignore-Modus.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IgnoreModeState {
    #[default]
    Inactive,
    ActiveNoSelection,
    ActiveSelected(SelectedEndpoint),
}

/// Ergebnis von `apply_ignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IgnoreOutcome {
    IgnoreAdded,
    NoSelection,
    NoDocument,
    InvalidSelection,
}

impl IgnoreOutcome {
    /// Bridge-Token des Ergebnisses.
    pub fn token(self) -> &'static str {
        match self {
            IgnoreOutcome::IgnoreAdded => "IGNORE_ADDED",
            IgnoreOutcome::NoSelection => "NO_SELECTION",
            IgnoreOutcome::NoDocument => "NO_DOCUMENT",
            IgnoreOutcome::InvalidSelection => "INVALID_SELECTION",
        }
    }
}

/// Controller des Ignore-Modus (einmal pro Sitzung).
#[derive(Debug, Default)]
pub struct IgnoreModeController {
    state: IgnoreModeState,
    subscription: Option<SelectionSubscription>,
}

impl IgnoreModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &IgnoreModeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, IgnoreModeState::Inactive)
    }

    /// Status-Text: `inactive` | `active:no-selection` | `active:<name>`.
    pub fn status(&self) -> String {
        match &self.state {
            IgnoreModeState::Inactive => "inactive".to_string(),
            IgnoreModeState::ActiveNoSelection => "active:no-selection".to_string(),
            IgnoreModeState::ActiveSelected(selected) => format!("active:{}", selected.name),
        }
    }

    /// Schaltet den Modus um und gibt den neuen Aktiv-Zustand zurück.
    pub fn toggle(
        &mut self,
        doc: Option<&mut Document>,
        options: &OrganizerOptions,
    ) -> OrganizerResult<bool> {
        let target = !self.is_active();
        self.set_mode(doc, target, options)
    }

    /// Setzt den Modus explizit; ein bereits gesetzter Modus bleibt unverändert.
    ///
    /// Aktivieren ohne geöffnetes Dokument ist ein Fehler.
    pub fn set_mode(
        &mut self,
        doc: Option<&mut Document>,
        active: bool,
        options: &OrganizerOptions,
    ) -> OrganizerResult<bool> {
        match (active, self.is_active()) {
            (true, true) | (false, false) => Ok(active),
            (true, false) => {
                let doc = doc.ok_or(OrganizerError::NoDocument)?;
                self.subscription = Some(doc.subscribe_selection());
                self.state = IgnoreModeState::ActiveNoSelection;
                log::info!("Ignore-Modus aktiviert");
                self.refresh(doc, options);
                Ok(true)
            }
            (false, true) => {
                self.deactivate(doc);
                Ok(false)
            }
        }
    }

    /// Erzwingt die Deaktivierung unabhängig vom aktuellen Zustand (Panel-Abbau).
    pub fn cleanup(&mut self, doc: Option<&mut Document>) {
        self.deactivate(doc);
    }

    fn deactivate(&mut self, doc: Option<&mut Document>) {
        let subscription = self.subscription.take();
        if let Some(doc) = doc {
            if let Some(subscription) = subscription {
                doc.unsubscribe_selection(subscription);
            }
            clear_overlay(doc);
        }
        if self.is_active() {
            log::info!("Ignore-Modus deaktiviert");
        }
        self.state = IgnoreModeState::Inactive;
    }

    /// Selektions-Callback; wirkt nur bei lebendem Abo auf diesem Dokument.
    pub fn on_selection_changed(&mut self, doc: &mut Document, options: &OrganizerOptions) {
        let subscribed = self
            .subscription
            .as_ref()
            .is_some_and(|subscription| doc.is_subscribed(subscription));
        if !subscribed {
            return;
        }
        self.refresh(doc, options);
    }

    /// Baut die Vorschau vollständig neu auf (vorher immer leeren).
    fn refresh(&mut self, doc: &mut Document, options: &OrganizerOptions) {
        clear_overlay(doc);

        let Some((path, probe)) = first_eligible_path(doc) else {
            self.state = IgnoreModeState::ActiveNoSelection;
            return;
        };

        let style = PreviewStyle {
            color: options.preview_rgb(),
            opacity: options.preview_opacity,
        };
        let overlay = build_overlay(&path, &probe, style);
        if let Err(e) = render_overlay(doc, overlay) {
            log::warn!("Ignore-Vorschau konnte nicht gezeichnet werden: {}", e);
        }

        log::debug!("Ignore-Vorschau für '{}' bei {:?}", path.display_name(), probe.endpoint);
        self.state = IgnoreModeState::ActiveSelected(SelectedEndpoint {
            entity_id: path.id,
            name: path.display_name(),
            probe,
        });
    }

    /// Legt einen Ignore-Marker am vorgemerkten Endpunkt an.
    pub fn apply_ignore(
        &mut self,
        doc: Option<&mut Document>,
        options: &OrganizerOptions,
    ) -> OrganizerResult<IgnoreOutcome> {
        let Some(doc) = doc else {
            return Ok(IgnoreOutcome::NoDocument);
        };
        let IgnoreModeState::ActiveSelected(selected) = &self.state else {
            return Ok(IgnoreOutcome::NoSelection);
        };

        let still_valid = doc
            .path(selected.entity_id)
            .and_then(EndpointProbe::of)
            .is_some_and(|probe| probe.endpoint == selected.probe.endpoint);
        if !still_valid {
            log::warn!("Vorgemerkter Pfad '{}' ist nicht mehr gültig", selected.name);
            return Ok(IgnoreOutcome::InvalidSelection);
        }

        let endpoint = selected.probe.endpoint;
        add_ignore_marker(doc, endpoint)?;
        log::info!("Ignore-Marker bei {:?} angelegt ('{}')", endpoint, selected.name);

        self.refresh(doc, options);
        Ok(IgnoreOutcome::IgnoreAdded)
    }
}

/// Erster selektierter offener Pfad mit mindestens zwei Punkten außerhalb des Vorschau-Layers.
fn first_eligible_path(doc: &Document) -> Option<(PathEntity, EndpointProbe)> {
    let preview = doc.layer_id(PREVIEW_LAYER);
    doc.selection().iter().find_map(|item| match doc.resolve(*item)? {
        ItemRef::Path(path) if Some(path.layer) != preview => {
            let probe = EndpointProbe::of(path)?;
            Some((path.clone(), probe))
        }
        ItemRef::Path(_) | ItemRef::Asset(_) | ItemRef::Layer(_) => None,
    })
}

/// Entfernt den Vorschau-Layer samt Inhalt.
fn clear_overlay(doc: &mut Document) {
    if let Some(layer) = doc.layer_id(PREVIEW_LAYER) {
        if let Err(e) = doc.remove_layer(layer) {
            log::warn!("Vorschau-Layer konnte nicht entfernt werden: {}", e);
        }
    }
}

fn render_overlay(doc: &mut Document, overlay: Vec<PathEntity>) -> OrganizerResult<()> {
    let layer = doc.ensure_layer(PREVIEW_LAYER);
    doc.bring_layer_to_front(layer)?;
    for path in overlay {
        doc.insert(layer, path)?;
    }
    Ok(())
}

/// Degenerierter, unsichtbarer Zwei-Punkt-Pfad auf dem Ignore-Layer.
fn add_ignore_marker(doc: &mut Document, position: Vec2) -> OrganizerResult<EntityId> {
    let layer = doc.ensure_layer(IGNORE_LAYER);
    let mut marker = PathEntity::open(vec![PathPoint::corner(position), PathPoint::corner(position)])
        .with_style(PathStyle::invisible())
        .with_note(IGNORE_MARKER_TAG);
    marker.hidden = true;

    doc.with_layer_access(layer, LayerExitState::LockedHidden, |doc| {
        doc.insert(layer, marker)
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Selectable, PREVIEW_LAYER};

    fn doc_with_duct() -> (Document, EntityId) {
        let mut doc = Document::new("plan");
        let layer = doc.ensure_layer("Ductwork");
        let id = doc
            .insert(
                layer,
                PathEntity::polyline(&[Vec2::ZERO, Vec2::new(0.0, 30.0), Vec2::new(30.0, 30.0)])
                    .with_name("Supply 1"),
            )
            .expect("Einfügen");
        (doc, id)
    }

    fn preview_count(doc: &Document) -> usize {
        doc.layer_by_name(PREVIEW_LAYER)
            .map_or(0, |layer| layer.children.len())
    }

    #[test]
    fn activation_requires_document() {
        let mut controller = IgnoreModeController::new();
        let result = controller.set_mode(None, true, &OrganizerOptions::default());

        assert_eq!(result, Err(OrganizerError::NoDocument));
        assert_eq!(controller.status(), "inactive");
    }

    #[test]
    fn activation_evaluates_current_selection() {
        let (mut doc, id) = doc_with_duct();
        doc.set_selection([Selectable::Entity(id)]);
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();

        let active = controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");

        assert!(active);
        assert_eq!(controller.status(), "active:Supply 1");
        assert_eq!(preview_count(&doc), 4);
        assert_eq!(doc.subscriber_count(), 1);
    }

    #[test]
    fn repeated_activation_keeps_single_subscription() {
        let (mut doc, _) = doc_with_duct();
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();

        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");
        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("erneute Aktivierung");

        assert_eq!(doc.subscriber_count(), 1);
        assert_eq!(controller.status(), "active:no-selection");
    }

    #[test]
    fn repeated_refresh_never_accumulates_overlay() {
        let (mut doc, id) = doc_with_duct();
        doc.set_selection([Selectable::Entity(id)]);
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();
        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");

        controller.on_selection_changed(&mut doc, &options);
        controller.on_selection_changed(&mut doc, &options);

        assert_eq!(preview_count(&doc), 4);
    }

    #[test]
    fn apply_ignore_outside_selected_state_reports_no_selection() {
        let (mut doc, _) = doc_with_duct();
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();

        let inactive = controller
            .apply_ignore(Some(&mut doc), &options)
            .expect("kein Fehler");
        assert_eq!(inactive, IgnoreOutcome::NoSelection);

        let no_doc = controller.apply_ignore(None, &options).expect("kein Fehler");
        assert_eq!(no_doc, IgnoreOutcome::NoDocument);
    }

    #[test]
    fn apply_ignore_creates_locked_hidden_marker() {
        let (mut doc, id) = doc_with_duct();
        doc.set_selection([Selectable::Entity(id)]);
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();
        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");

        let outcome = controller
            .apply_ignore(Some(&mut doc), &options)
            .expect("Marker anlegbar");

        assert_eq!(outcome, IgnoreOutcome::IgnoreAdded);
        let layer = doc.layer_by_name(IGNORE_LAYER).expect("Ignore-Layer");
        assert!(layer.locked);
        assert!(!layer.visible);
        let marker = doc.path(layer.children[0]).expect("Marker");
        assert_eq!(marker.points.len(), 2);
        assert_eq!(marker.points[0].anchor, Vec2::new(30.0, 30.0));
        assert_eq!(marker.points[0].anchor, marker.points[1].anchor);
        assert!(marker.has_note(IGNORE_MARKER_TAG));
        // Selektion wird neu ausgewertet
        assert_eq!(controller.status(), "active:Supply 1");
    }

    #[test]
    fn apply_ignore_on_removed_path_is_invalid() {
        let (mut doc, id) = doc_with_duct();
        doc.set_selection([Selectable::Entity(id)]);
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();
        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");

        doc.remove(id).expect("Entfernen");
        let outcome = controller
            .apply_ignore(Some(&mut doc), &options)
            .expect("kein Fehler");

        assert_eq!(outcome, IgnoreOutcome::InvalidSelection);
        assert!(doc.layer_by_name(IGNORE_LAYER).is_none());
    }

    #[test]
    fn cleanup_clears_overlay_and_subscription() {
        let (mut doc, id) = doc_with_duct();
        doc.set_selection([Selectable::Entity(id)]);
        let options = OrganizerOptions::default();
        let mut controller = IgnoreModeController::new();
        controller
            .set_mode(Some(&mut doc), true, &options)
            .expect("Aktivierung");

        controller.cleanup(Some(&mut doc));

        assert_eq!(controller.status(), "inactive");
        assert_eq!(preview_count(&doc), 0);
        assert_eq!(doc.subscriber_count(), 0);
    }
}
