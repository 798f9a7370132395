//! Dokument-Modell: Layer in Z-Reihenfolge, Elemente und Selektion.
//!
//! Bildet die Host-Fähigkeiten ab, die die Kern-Operationen benötigen:
//! Layer-Verwaltung (Lookup, Anlegen, Entfernen, Sperre/Sichtbarkeit),
//! Element-Primitive (Einfügen, Verschieben, Duplizieren, Entfernen)
//! sowie Selektion mit expliziten Änderungs-Abonnements.

use std::collections::HashMap;

use indexmap::IndexSet;

use super::entity::{Entity, EntityId, PathEntity, PlacedAsset};
use super::layer::{Layer, LayerExitState, LayerId};
use crate::error::{OrganizerError, OrganizerResult};

/// Selektierbares Objekt des Hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selectable {
    Layer(LayerId),
    Entity(EntityId),
}

impl From<EntityId> for Selectable {
    fn from(id: EntityId) -> Self {
        Selectable::Entity(id)
    }
}

/// Aufgelöste Sicht auf ein selektiertes Objekt (exhaustiv auszuwerten).
#[derive(Debug, Clone, Copy)]
pub enum ItemRef<'a> {
    Layer(&'a Layer),
    Path(&'a PathEntity),
    Asset(&'a PlacedAsset),
}

/// Handle eines Selektions-Abonnements.
///
/// Nicht klonbar: wer das Handle besitzt, kann das Abo genau einmal beenden.
#[derive(Debug, PartialEq, Eq)]
pub struct SelectionSubscription {
    id: u64,
}

impl SelectionSubscription {
    /// Gibt die interne Kennung des Abonnements zurück.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Ein geöffnetes Dokument.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    /// Layer in Z-Reihenfolge, Index 0 = oberster Layer
    layers: Vec<Layer>,
    entities: HashMap<EntityId, Entity>,
    selection: IndexSet<Selectable>,
    subscribers: IndexSet<u64>,
    next_entity_id: u64,
    next_layer_id: u32,
    next_subscription_id: u64,
}

impl Document {
    /// Erstellt ein leeres Dokument ohne Layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
            entities: HashMap::new(),
            selection: IndexSet::new(),
            subscribers: IndexSet::new(),
            next_entity_id: 1,
            next_layer_id: 1,
            next_subscription_id: 1,
        }
    }

    // ── Layer ────────────────────────────────────────────────────────

    /// Alle Layer in Z-Reihenfolge (oberster zuerst).
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Gibt den Layer mit der ID zurück.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn layer_mut(&mut self, id: LayerId) -> OrganizerResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown layer {}", id.0)))
    }

    /// Gibt den Layer mit exakt diesem Namen zurück.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Gibt die ID des Layers mit diesem Namen zurück.
    pub fn layer_id(&self, name: &str) -> Option<LayerId> {
        self.layer_by_name(name).map(|l| l.id)
    }

    /// Z-Rang eines Layers (0 = oberster).
    pub fn layer_rank(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Legt einen neuen Layer ganz oben an.
    pub fn add_layer(&mut self, name: &str) -> OrganizerResult<LayerId> {
        if self.layer_by_name(name).is_some() {
            return Err(OrganizerError::HostOperationFailed(format!(
                "layer '{name}' already exists"
            )));
        }
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.insert(0, Layer::new(id, name));
        log::debug!("Layer '{}' angelegt", name);
        Ok(id)
    }

    /// Liefert den Layer mit diesem Namen oder legt ihn an (idempotent).
    pub fn ensure_layer(&mut self, name: &str) -> LayerId {
        if let Some(id) = self.layer_id(name) {
            return id;
        }
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.insert(0, Layer::new(id, name));
        log::debug!("Layer '{}' bei Bedarf angelegt", name);
        id
    }

    /// Entfernt einen Layer samt aller Elemente und gibt die Elemente zurück.
    pub fn remove_layer(&mut self, id: LayerId) -> OrganizerResult<Vec<Entity>> {
        let rank = self
            .layer_rank(id)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown layer {}", id.0)))?;
        let layer = self.layers.remove(rank);
        let removed: Vec<Entity> = layer
            .children
            .iter()
            .filter_map(|child| self.entities.remove(child))
            .collect();
        self.selection.retain(|item| match item {
            Selectable::Layer(layer_id) => *layer_id != id,
            Selectable::Entity(entity_id) => !layer.children.contains(entity_id),
        });
        Ok(removed)
    }

    /// Verschiebt einen Layer an die oberste Position.
    pub fn bring_layer_to_front(&mut self, id: LayerId) -> OrganizerResult<()> {
        let rank = self
            .layer_rank(id)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown layer {}", id.0)))?;
        let layer = self.layers.remove(rank);
        self.layers.insert(0, layer);
        Ok(())
    }

    /// Sperrt oder entsperrt einen Layer.
    pub fn set_layer_locked(&mut self, id: LayerId, locked: bool) -> OrganizerResult<()> {
        self.layer_mut(id)?.locked = locked;
        Ok(())
    }

    /// Blendet einen Layer ein oder aus.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> OrganizerResult<()> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// Führt `f` mit entsperrtem, sichtbarem Layer aus und setzt danach den Exit-Zustand.
    pub fn with_layer_access<T>(
        &mut self,
        id: LayerId,
        exit: LayerExitState,
        f: impl FnOnce(&mut Self) -> T,
    ) -> OrganizerResult<T> {
        let (was_locked, was_visible) = {
            let layer = self.layer_mut(id)?;
            let previous = (layer.locked, layer.visible);
            layer.locked = false;
            layer.visible = true;
            previous
        };

        let result = f(self);

        if let Ok(layer) = self.layer_mut(id) {
            match exit {
                LayerExitState::Restore => {
                    layer.locked = was_locked;
                    layer.visible = was_visible;
                }
                LayerExitState::LockedHidden => {
                    layer.locked = true;
                    layer.visible = false;
                }
            }
        }
        Ok(result)
    }

    // ── Elemente ─────────────────────────────────────────────────────

    /// Gibt das Element mit der ID zurück.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Gibt das Element mit der ID veränderbar zurück.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Gibt den Pfad mit der ID zurück (`None` auch bei Assets).
    pub fn path(&self, id: EntityId) -> Option<&PathEntity> {
        self.entity(id).and_then(Entity::as_path)
    }

    /// Gibt das platzierte Asset mit der ID zurück (`None` auch bei Pfaden).
    pub fn asset(&self, id: EntityId) -> Option<&PlacedAsset> {
        self.entity(id).and_then(Entity::as_asset)
    }

    /// Gibt das platzierte Asset mit der ID veränderbar zurück.
    pub fn asset_mut(&mut self, id: EntityId) -> Option<&mut PlacedAsset> {
        match self.entities.get_mut(&id) {
            Some(Entity::Asset(asset)) => Some(asset),
            _ => None,
        }
    }

    /// Elemente eines Layers in Stapelreihenfolge (vorderstes zuerst).
    pub fn entities_on(&self, layer: LayerId) -> impl Iterator<Item = &Entity> {
        self.layer(layer)
            .into_iter()
            .flat_map(|l| l.children.iter())
            .filter_map(|id| self.entities.get(id))
    }

    /// Anzahl aller Elemente im Dokument.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn ensure_editable(&self, layer: LayerId) -> OrganizerResult<&Layer> {
        let target = self
            .layer(layer)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown layer {}", layer.0)))?;
        if !target.is_editable() {
            return Err(OrganizerError::HostOperationFailed(format!(
                "layer '{}' is locked or hidden",
                target.name
            )));
        }
        Ok(target)
    }

    /// Fügt ein Element ganz vorne auf dem Layer ein und vergibt eine neue ID.
    pub fn insert(&mut self, layer: LayerId, entity: impl Into<Entity>) -> OrganizerResult<EntityId> {
        self.ensure_editable(layer)?;
        let mut entity = entity.into();
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        entity.assign(id, layer);
        self.entities.insert(id, entity);
        self.layer_mut(layer)?.children.insert(0, id);
        Ok(id)
    }

    /// Entfernt ein Element; es verschwindet auch aus der Selektion.
    pub fn remove(&mut self, id: EntityId) -> OrganizerResult<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown entity {id}")))?;
        if let Ok(layer) = self.layer_mut(entity.layer()) {
            layer.children.retain(|child| *child != id);
        }
        self.selection.shift_remove(&Selectable::Entity(id));
        Ok(entity)
    }

    /// Verschiebt ein Element ganz nach vorne auf den Ziel-Layer.
    pub fn move_to_layer(&mut self, id: EntityId, target: LayerId) -> OrganizerResult<()> {
        self.ensure_editable(target)?;
        let source = self
            .entities
            .get(&id)
            .map(Entity::layer)
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("unknown entity {id}")))?;

        if let Ok(layer) = self.layer_mut(source) {
            layer.children.retain(|child| *child != id);
        }
        self.layer_mut(target)?.children.insert(0, id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.set_layer(target);
        }
        Ok(())
    }

    /// Dupliziert einen Pfad auf den Ziel-Layer und gibt die ID der Kopie zurück.
    pub fn duplicate_path(&mut self, id: EntityId, target: LayerId) -> OrganizerResult<EntityId> {
        let copy = self
            .path(id)
            .cloned()
            .ok_or_else(|| OrganizerError::HostOperationFailed(format!("no path {id}")))?;
        self.insert(target, copy)
    }

    // ── Selektion ────────────────────────────────────────────────────

    /// Aktuelle Selektion in Auswahlreihenfolge.
    pub fn selection(&self) -> &IndexSet<Selectable> {
        &self.selection
    }

    /// Ersetzt die Selektion; unbekannte Elemente werden verworfen.
    pub fn set_selection(&mut self, items: impl IntoIterator<Item = Selectable>) {
        self.selection = items
            .into_iter()
            .filter(|item| match item {
                Selectable::Layer(id) => self.layer(*id).is_some(),
                Selectable::Entity(id) => self.entities.contains_key(id),
            })
            .collect();
    }

    /// Leert die Selektion ohne Benachrichtigung.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Löst ein selektiertes Objekt auf; `None` wenn es nicht mehr existiert.
    pub fn resolve(&self, item: Selectable) -> Option<ItemRef<'_>> {
        match item {
            Selectable::Layer(id) => self.layer(id).map(ItemRef::Layer),
            Selectable::Entity(id) => match self.entities.get(&id)? {
                Entity::Path(path) => Some(ItemRef::Path(path)),
                Entity::Asset(asset) => Some(ItemRef::Asset(asset)),
            },
        }
    }

    /// Selektierte Element-IDs (Layer-Selektionen ausgenommen).
    pub fn selected_entities(&self) -> Vec<EntityId> {
        self.selection
            .iter()
            .filter_map(|item| match item {
                Selectable::Entity(id) => Some(*id),
                Selectable::Layer(_) => None,
            })
            .collect()
    }

    /// Registriert einen Empfänger für Selektionsänderungen.
    pub fn subscribe_selection(&mut self) -> SelectionSubscription {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.subscribers.insert(id);
        SelectionSubscription { id }
    }

    /// Beendet ein Abo; `false` wenn es nicht (mehr) registriert war.
    pub fn unsubscribe_selection(&mut self, subscription: SelectionSubscription) -> bool {
        self.subscribers.shift_remove(&subscription.id)
    }

    /// Gibt zurück, ob das Abonnement noch aktiv ist.
    pub fn is_subscribed(&self, subscription: &SelectionSubscription) -> bool {
        self.subscribers.contains(&subscription.id)
    }

    /// Gibt die Anzahl aktiver Selektions-Abonnements zurück.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
