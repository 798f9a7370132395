//! Anker-Index (KD-Tree) für Toleranz- und Nearest-Abfragen über Ankermarker.

use std::collections::HashMap;

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::{Document, EntityId, LayerId};

/// Treffer einer Abfrage gegen den Anker-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorMatch {
    /// ID des Ankermarkers
    pub entity_id: EntityId,
    /// Layer, auf dem der Marker liegt
    pub layer: LayerId,
    /// Position des Markers
    pub position: Vec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f32,
}

#[derive(Debug, Clone, Copy)]
struct AnchorEntry {
    entity_id: EntityId,
    layer: LayerId,
    position: Vec2,
}

/// Read-only Index über Ankermarker (Ein-Punkt-Pfade).
///
/// Die Eintragsreihenfolge ist die Traversierungsreihenfolge beim Aufbau
/// (Layer, dann Element); Radius-Abfragen liefern in genau dieser Reihenfolge.
///
/// Der KD-Tree enthält jede Position nur einmal (ein Blatt fasst höchstens
/// 32 identische Punkte); `groups` ordnet jeder Position ihre Einträge zu.
#[derive(Debug, Clone)]
pub struct AnchorIndex {
    tree: KdTree<f64, 2>,
    groups: Vec<Vec<usize>>,
    entries: Vec<AnchorEntry>,
}

impl AnchorIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            groups: Vec::new(),
            entries: Vec::new(),
        }
    }

    fn from_entries(entries: Vec<AnchorEntry>) -> Self {
        let mut slots: HashMap<(u32, u32), usize> = HashMap::new();
        let mut points: Vec<[f64; 2]> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            // +0.0 fasst -0.0 und 0.0 zusammen
            let x = entry.position.x + 0.0;
            let y = entry.position.y + 0.0;
            let slot = *slots.entry((x.to_bits(), y.to_bits())).or_insert_with(|| {
                points.push([x as f64, y as f64]);
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(index);
        }

        Self {
            tree: (&points).into(),
            groups,
            entries,
        }
    }

    /// Indexiert alle Ankermarker der angegebenen Layer in Layer-dann-Element-Reihenfolge.
    pub fn from_layers(doc: &Document, layers: impl IntoIterator<Item = LayerId>) -> Self {
        let entries = layers
            .into_iter()
            .flat_map(|layer| doc.entities_on(layer))
            .filter_map(|entity| {
                let path = entity.as_path()?;
                Some(AnchorEntry {
                    entity_id: path.id,
                    layer: path.layer,
                    position: path.marker_position()?,
                })
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Indexiert die Ankermarker unter den übergebenen Elementen (z.B. der Selektion).
    pub fn from_entities(doc: &Document, ids: impl IntoIterator<Item = EntityId>) -> Self {
        let entries = ids
            .into_iter()
            .filter_map(|id| {
                let path = doc.path(id)?;
                Some(AnchorEntry {
                    entity_id: path.id,
                    layer: path.layer,
                    position: path.marker_position()?,
                })
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Gibt die Anzahl indexierter Ankermarker zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt zurück, ob der Index keine Ankermarker enthält.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_match(&self, index: usize, query: Vec2) -> Option<AnchorMatch> {
        let entry = self.entries.get(index)?;
        Some(AnchorMatch {
            entity_id: entry.entity_id,
            layer: entry.layer,
            position: entry.position,
            distance: entry.position.distance(query),
        })
    }

    /// Nächster Ankermarker ohne Distanzgrenze.
    pub fn nearest(&self, query: Vec2) -> Option<AnchorMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        // Bei gestapelten Markern gewinnt der erste in Traversierungsreihenfolge
        let first = self.groups.get(result.item as usize)?.first()?;
        self.to_match(*first, query)
    }

    /// Alle Ankermarker mit Distanz ≤ `radius` (inklusiv), in Traversierungsreihenfolge.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<AnchorMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        // KD-Tree-Vorfilter mit etwas Luft, exakte Prüfung danach
        let slack = (radius as f64 + 1e-3).powi(2);
        let mut indices: Vec<usize> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], slack)
            .into_iter()
            .filter_map(|neighbour| self.groups.get(neighbour.item as usize))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();

        let radius_sq = radius * radius;
        indices
            .into_iter()
            .filter_map(|index| {
                let entry = self.entries.get(index)?;
                if entry.position.distance_squared(query) <= radius_sq {
                    self.to_match(index, query)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Einmalige Radius-Abfrage über die Ankermarker der angegebenen Layer.
pub fn anchors_within(
    doc: &Document,
    layers: impl IntoIterator<Item = LayerId>,
    query: Vec2,
    radius: f32,
) -> Vec<AnchorMatch> {
    AnchorIndex::from_layers(doc, layers).within_radius(query, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PathEntity;

    fn sample_document() -> (Document, LayerId, LayerId) {
        let mut doc = Document::new("plan");
        let registers = doc.ensure_layer("Square Registers");
        let units = doc.ensure_layer("Units");
        // Einfügen erfolgt vorne: Reihenfolge auf dem Layer ist umgekehrt
        doc.insert(registers, PathEntity::anchor_marker(Vec2::new(4.0, 3.0)))
            .expect("Einfügen");
        doc.insert(registers, PathEntity::anchor_marker(Vec2::new(1.0, 0.0)))
            .expect("Einfügen");
        doc.insert(units, PathEntity::anchor_marker(Vec2::new(0.5, 0.0)))
            .expect("Einfügen");
        doc.insert(units, PathEntity::polyline(&[Vec2::ZERO, Vec2::X]))
            .expect("Einfügen");
        (doc, registers, units)
    }

    #[test]
    fn radius_query_keeps_traversal_order() {
        let (doc, registers, units) = sample_document();
        let index = AnchorIndex::from_layers(&doc, [registers, units]);

        let positions: Vec<Vec2> = index
            .within_radius(Vec2::ZERO, 5.0)
            .into_iter()
            .map(|m| m.position)
            .collect();

        // Layer-Reihenfolge vor Distanz: (1,0) und (4,3) vor (0.5,0)
        assert_eq!(
            positions,
            vec![Vec2::new(1.0, 0.0), Vec2::new(4.0, 3.0), Vec2::new(0.5, 0.0)]
        );
    }

    #[test]
    fn radius_is_inclusive() {
        let (doc, registers, _) = sample_document();
        let index = AnchorIndex::from_layers(&doc, [registers]);

        let hits = index.within_radius(Vec2::ZERO, 5.0);
        assert!(hits.iter().any(|m| m.position == Vec2::new(4.0, 3.0)));

        let hits = index.within_radius(Vec2::ZERO, 4.99);
        assert!(hits.iter().all(|m| m.position != Vec2::new(4.0, 3.0)));
    }

    #[test]
    fn drawn_geometry_is_not_indexed() {
        let (doc, _, units) = sample_document();
        let index = AnchorIndex::from_layers(&doc, [units]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn nearest_ignores_distance_bound() {
        let (doc, registers, _) = sample_document();
        let index = AnchorIndex::from_layers(&doc, [registers]);

        let nearest = index
            .nearest(Vec2::new(400.0, 300.0))
            .expect("Treffer erwartet");

        assert_eq!(nearest.position, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn stacked_markers_beyond_leaf_capacity_are_all_found() {
        let mut doc = Document::new("plan");
        let registers = doc.ensure_layer("Square Registers");
        for _ in 0..40 {
            doc.insert(registers, PathEntity::anchor_marker(Vec2::new(7.0, 7.0)))
                .expect("Einfügen");
        }
        doc.insert(registers, PathEntity::anchor_marker(Vec2::new(-0.0, 0.0)))
            .expect("Einfügen");
        doc.insert(registers, PathEntity::anchor_marker(Vec2::new(0.0, 0.0)))
            .expect("Einfügen");

        let hits = anchors_within(&doc, [registers], Vec2::new(7.0, 7.0), 1.0);
        assert_eq!(hits.len(), 40);

        let index = AnchorIndex::from_layers(&doc, [registers]);
        assert_eq!(index.len(), 42);
        assert_eq!(index.within_radius(Vec2::ZERO, 0.5).len(), 2);

        // Erster Marker in Traversierungsreihenfolge (zuletzt eingefügt = vorne)
        let nearest = index.nearest(Vec2::new(6.0, 6.0)).expect("Treffer erwartet");
        let first_stacked = index.within_radius(Vec2::new(7.0, 7.0), 0.0)[0].entity_id;
        assert_eq!(nearest.entity_id, first_stacked);
    }

    #[test]
    fn empty_index_has_no_matches() {
        let index = AnchorIndex::empty();
        assert!(index.is_empty());
        assert!(index.nearest(Vec2::ZERO).is_none());
        assert!(index.within_radius(Vec2::ZERO, 10.0).is_empty());
    }
}
