//! Dokument-Elemente: Pfade (inkl. Ankermarker) und platzierte Assets.

use std::path::{Path, PathBuf};

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, PathPoint};
use super::layer::LayerId;
use super::style::PathStyle;

/// Stabile Element-ID innerhalb eines Dokuments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Platzhalter für noch nicht eingefügte Elemente.
    pub const UNASSIGNED: EntityId = EntityId(0);
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pfad-Element: geordnete Ankerpunkte, offen oder geschlossen.
///
/// Ein Pfad mit genau einem Punkt ist ein Ankermarker (Verbindungspunkt-Metadaten),
/// ab zwei Punkten ist es gezeichnete Geometrie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntity {
    #[serde(default = "unassigned_entity")]
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    pub points: Vec<PathPoint>,
    #[serde(default)]
    pub closed: bool,
    /// Besitzender Layer (schwache Rückreferenz über die ID)
    #[serde(default = "unassigned_layer")]
    pub layer: LayerId,
    #[serde(default)]
    pub style: PathStyle,
    /// Freitext-Kennzeichnung (z.B. für synthetisierte Drähte)
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

fn unassigned_layer() -> LayerId {
    LayerId::UNASSIGNED
}

fn unassigned_entity() -> EntityId {
    EntityId::UNASSIGNED
}

impl PathEntity {
    /// Offener Pfad aus Ankerpunkten, noch ohne ID und Layer.
    pub fn open(points: Vec<PathPoint>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: None,
            points,
            closed: false,
            layer: LayerId::UNASSIGNED,
            style: PathStyle::default(),
            note: None,
            hidden: false,
        }
    }

    /// Offener Polygonzug aus reinen Eckpunkten.
    pub fn polyline(positions: &[Vec2]) -> Self {
        Self::open(positions.iter().copied().map(PathPoint::corner).collect())
    }

    /// Ankermarker (Ein-Punkt-Pfad) an der gegebenen Position.
    pub fn anchor_marker(position: Vec2) -> Self {
        Self::open(vec![PathPoint::corner(position)])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Ein-Punkt-Pfad, der nur als Verbindungspunkt dient.
    pub fn is_anchor_marker(&self) -> bool {
        self.points.len() == 1
    }

    pub fn is_drawn_geometry(&self) -> bool {
        self.points.len() >= 2
    }

    /// Offene Pfade mit mindestens zwei Punkten haben zwei freie Endpunkte.
    pub fn has_open_ends(&self) -> bool {
        !self.closed && self.is_drawn_geometry()
    }

    /// Position eines Ankermarkers (nur bei Ein-Punkt-Pfaden).
    pub fn marker_position(&self) -> Option<Vec2> {
        match self.points.as_slice() {
            [single] => Some(single.anchor),
            _ => None,
        }
    }

    /// Gibt die Ankerpunkte in Pfadreihenfolge zurück.
    pub fn anchors(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(|p| p.anchor)
    }

    pub fn has_note(&self, note: &str) -> bool {
        self.note.as_deref() == Some(note)
    }

    /// Bounding-Box über die Ankerpunkte.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.anchors())
    }

    /// Anzeigename für Statusmeldungen.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("path-{}", self.id.0),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            point.translate(delta);
        }
    }
}

/// Platziertes Bild-Asset mit 2×2-Skalierungs/Rotations-Matrix.
///
/// `position` ist die minimale Ecke der transformierten Bounding-Box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedAsset {
    #[serde(default = "unassigned_entity")]
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    pub file: PathBuf,
    pub position: Vec2,
    #[serde(default = "identity_transform")]
    pub transform: Mat2,
    /// Unskalierte Größe des Bildes
    pub native_size: Vec2,
    #[serde(default = "unassigned_layer")]
    pub layer: LayerId,
}

fn identity_transform() -> Mat2 {
    Mat2::IDENTITY
}

impl PlacedAsset {
    /// Neues Asset in Originalgröße mit Mittelpunkt `center`.
    pub fn new(file: impl Into<PathBuf>, native_size: Vec2, center: Vec2) -> Self {
        let mut asset = Self {
            id: EntityId::UNASSIGNED,
            name: None,
            file: file.into(),
            position: Vec2::ZERO,
            transform: Mat2::IDENTITY,
            native_size,
            layer: LayerId::UNASSIGNED,
        };
        asset.set_center(center);
        asset
    }

    /// Builder-Variante von [`Self::set_scale_percent`].
    pub fn with_scale_percent(mut self, percent: f32) -> Self {
        self.set_scale_percent(percent);
        self
    }

    /// Ausdehnung der transformierten Bounding-Box.
    fn extent(&self) -> Vec2 {
        let a = self.transform.x_axis * self.native_size.x;
        let b = self.transform.y_axis * self.native_size.y;
        Vec2::new(a.x.abs() + b.x.abs(), a.y.abs() + b.y.abs())
    }

    /// Gibt die Bounding-Box bei aktueller Skalierung zurück.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: self.position,
            max: self.position + self.extent(),
        }
    }

    /// Gibt den geometrischen Mittelpunkt zurück.
    pub fn center(&self) -> Vec2 {
        self.position + self.extent() * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.position = center - self.extent() * 0.5;
    }

    /// Rotationswinkel der Matrix (Radiant).
    pub fn rotation(&self) -> f32 {
        self.transform.x_axis.y.atan2(self.transform.x_axis.x)
    }

    /// Aktuelle (horizontale) Skalierung in Prozent.
    pub fn scale_percent(&self) -> f32 {
        self.transform.x_axis.length() * 100.0
    }

    /// Skaliert gleichmäßig auf `percent` um den Mittelpunkt; die Rotation bleibt erhalten.
    pub fn set_scale_percent(&mut self, percent: f32) {
        let center = self.center();
        self.transform = Mat2::from_scale_angle(Vec2::splat(percent / 100.0), self.rotation());
        self.set_center(center);
    }

    /// Dateiname (ohne Verzeichnis) des referenzierten Bildes.
    pub fn file_name(&self) -> Option<&str> {
        self.file.file_name().and_then(|n| n.to_str())
    }

    pub fn references(&self, file: &Path) -> bool {
        self.file == file
    }
}

/// Geschlossene Variante über alle Element-Arten eines Layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Path(PathEntity),
    Asset(PlacedAsset),
}

impl Entity {
    /// Gibt die ID des Elements zurück.
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Path(path) => path.id,
            Entity::Asset(asset) => asset.id,
        }
    }

    /// Gibt den Layer zurück, auf dem das Element liegt.
    pub fn layer(&self) -> LayerId {
        match self {
            Entity::Path(path) => path.layer,
            Entity::Asset(asset) => asset.layer,
        }
    }

    pub(crate) fn assign(&mut self, id: EntityId, layer: LayerId) {
        match self {
            Entity::Path(path) => {
                path.id = id;
                path.layer = layer;
            }
            Entity::Asset(asset) => {
                asset.id = id;
                asset.layer = layer;
            }
        }
    }

    pub(crate) fn set_layer(&mut self, layer: LayerId) {
        match self {
            Entity::Path(path) => path.layer = layer,
            Entity::Asset(asset) => asset.layer = layer,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Entity::Path(path) => path.bounds(),
            Entity::Asset(asset) => Some(asset.bounds()),
        }
    }

    /// Geometrischer Mittelpunkt (Bounding-Box-Zentrum).
    pub fn center(&self) -> Option<Vec2> {
        self.bounds().map(|b| b.center())
    }

    pub fn as_path(&self) -> Option<&PathEntity> {
        match self {
            Entity::Path(path) => Some(path),
            Entity::Asset(_) => None,
        }
    }

    pub fn as_asset(&self) -> Option<&PlacedAsset> {
        match self {
            Entity::Asset(asset) => Some(asset),
            Entity::Path(_) => None,
        }
    }

    pub fn is_anchor_marker(&self) -> bool {
        self.as_path().is_some_and(PathEntity::is_anchor_marker)
    }
}

impl From<PathEntity> for Entity {
    fn from(path: PathEntity) -> Self {
        Entity::Path(path)
    }
}

impl From<PlacedAsset> for Entity {
    fn from(asset: PlacedAsset) -> Self {
        Entity::Asset(asset)
    }
}
