//! Geometrie-Grundtypen: Ankerpunkte mit Richtungsgriffen und Bounding-Boxen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ein Ankerpunkt eines Pfads inklusive seiner beiden Richtungsgriffe.
///
/// Fallen die Griffe mit dem Anker zusammen, ist der Punkt ein Eckpunkt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Position des Ankers
    pub anchor: Vec2,
    /// Eingehender Griff (Richtung zum vorherigen Punkt)
    pub left_direction: Vec2,
    /// Ausgehender Griff (Richtung zum nächsten Punkt)
    pub right_direction: Vec2,
}

impl PathPoint {
    /// Erstellt einen Eckpunkt ohne ausgezogene Griffe.
    pub fn corner(anchor: Vec2) -> Self {
        Self {
            anchor,
            left_direction: anchor,
            right_direction: anchor,
        }
    }

    /// Erstellt einen Punkt mit expliziten Griffen.
    pub fn with_handles(anchor: Vec2, left_direction: Vec2, right_direction: Vec2) -> Self {
        Self {
            anchor,
            left_direction,
            right_direction,
        }
    }

    /// Verschiebt Anker und beide Griffe um denselben Offset.
    pub fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
        self.left_direction += delta;
        self.right_direction += delta;
    }
}

/// Achsenparallele Bounding-Box im Dokumentraum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounding-Box über alle Punkte; `None` bei leerer Eingabe.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Geometrischer Mittelpunkt.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Breite und Höhe.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Normalisierte Richtung von `from` nach `to`; `None` bei (nahezu) identischen Punkten.
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}
