//! Vorschau-Geometrie des Ignore-Modus: halbtransparente Pfad-Kopie,
//! Scheibe am Endpunkt und kurzer Richtungspfeil.

use glam::Vec2;

use crate::core::geometry::direction;
use crate::core::{PathEntity, PathPoint, PathStyle, Rgb};

/// Kreis-Approximation mit vier kubischen Segmenten.
const CIRCLE_KAPPA: f32 = 0.552_284_8;

/// Minimaler/maximaler Radius der Endpunkt-Scheibe.
pub const DISK_RADIUS_MIN: f32 = 3.0;
pub const DISK_RADIUS_MAX: f32 = 15.0;

/// Endpunkt eines offenen Pfads samt Anfahrtsrichtung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointProbe {
    /// Letzter Anker des Pfads
    pub endpoint: Vec2,
    /// Normalisierte Richtung, mit der der Pfad am Endpunkt ankommt
    pub tangent: Vec2,
    /// Länge des letzten nicht-degenerierten Segments
    pub approach_length: f32,
}

impl EndpointProbe {
    /// Analysiert den End-Anker eines offenen Pfads.
    ///
    /// Degenerierte Schlusssegmente (identische Punkte) werden übersprungen;
    /// fallen alle Punkte zusammen, gibt es keinen Endpunkt.
    pub fn of(path: &PathEntity) -> Option<Self> {
        if !path.has_open_ends() {
            return None;
        }
        let endpoint = path.points.last()?.anchor;
        path.points.iter().rev().skip(1).find_map(|point| {
            let tangent = direction(point.anchor, endpoint)?;
            Some(Self {
                endpoint,
                tangent,
                approach_length: point.anchor.distance(endpoint),
            })
        })
    }

    /// Radius der Endpunkt-Scheibe: ein Sechstel der Anfahrtslänge, begrenzt.
    pub fn disk_radius(&self) -> f32 {
        (self.approach_length / 6.0).clamp(DISK_RADIUS_MIN, DISK_RADIUS_MAX)
    }
}

/// Stil-Parameter der Vorschau.
#[derive(Debug, Clone, Copy)]
pub struct PreviewStyle {
    pub color: Rgb,
    pub opacity: f32,
}

/// Erzeugt alle Overlay-Pfade für einen selektierten Pfad.
pub fn build_overlay(path: &PathEntity, probe: &EndpointProbe, style: PreviewStyle) -> Vec<PathEntity> {
    let mut clone = PathEntity::open(path.points.clone())
        .with_name(format!("preview:{}", path.display_name()))
        .with_style(PathStyle {
            opacity: style.opacity,
            ..PathStyle::round_stroke(path.style.stroke_width.max(1.0), style.color)
        });
    clone.closed = path.closed;

    let radius = probe.disk_radius();
    let disk = disk_path(probe.endpoint, radius).with_style(PathStyle {
        filled: true,
        fill_color: Some(style.color),
        opacity: style.opacity,
        ..PathStyle::invisible()
    });

    let (shaft, head) = arrow_paths(probe, radius * 2.0);
    let arrow_style = PathStyle::round_stroke(1.0, style.color);

    vec![
        clone,
        disk,
        shaft.with_style(arrow_style.clone()),
        head.with_style(arrow_style),
    ]
}

/// Geschlossener Kreis aus vier Bézier-Segmenten.
fn disk_path(center: Vec2, radius: f32) -> PathEntity {
    let handle = radius * CIRCLE_KAPPA;
    let points = [Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y, Vec2::X]
        .into_iter()
        .map(|axis| {
            // Tangente gegen den Uhrzeigersinn
            let tangent = axis.perp();
            let anchor = center + axis * radius;
            PathPoint::with_handles(anchor, anchor - tangent * handle, anchor + tangent * handle)
        })
        .collect();
    PathEntity::open(points).closed()
}

/// Pfeil entlang der Anfahrtsrichtung; Spitze liegt hinter dem Endpunkt.
fn arrow_paths(probe: &EndpointProbe, length: f32) -> (PathEntity, PathEntity) {
    let tail = probe.endpoint;
    let tip = probe.endpoint + probe.tangent * length;
    let wing = length * 0.35;
    let back = -probe.tangent * wing;
    let side = probe.tangent.perp() * wing * 0.6;

    let shaft = PathEntity::polyline(&[tail, tip]);
    let head = PathEntity::polyline(&[tip + back + side, tip, tip + back - side]);
    (shaft, head)
}
