//! Darstellungsattribute von Pfaden (Kontur, Füllung, Deckkraft).

use serde::{Deserialize, Serialize};

/// RGB-Farbe mit 8 Bit pro Kanal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Linienenden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Projecting,
}

/// Linienecken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Vollständiger Stil eines Pfads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathStyle {
    pub stroked: bool,
    pub stroke_width: f32,
    pub stroke_color: Option<Rgb>,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    /// Strichmuster; leer = durchgezogen
    pub dash_pattern: Vec<f32>,
    pub filled: bool,
    pub fill_color: Option<Rgb>,
    /// Deckkraft in Prozent (0–100)
    pub opacity: f32,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroked: true,
            stroke_width: 1.0,
            stroke_color: Some(Rgb::new(0, 0, 0)),
            stroke_cap: StrokeCap::Butt,
            stroke_join: StrokeJoin::Miter,
            dash_pattern: Vec::new(),
            filled: false,
            fill_color: None,
            opacity: 100.0,
        }
    }
}

impl PathStyle {
    /// Stil ohne Kontur und ohne Füllung (unsichtbare Metadaten-Geometrie).
    pub fn invisible() -> Self {
        Self {
            stroked: false,
            stroke_width: 0.0,
            stroke_color: None,
            filled: false,
            fill_color: None,
            ..Self::default()
        }
    }

    /// Offene Kontur mit runden Enden/Ecken, explizit ohne Füllung.
    pub fn round_stroke(width: f32, color: Rgb) -> Self {
        Self {
            stroked: true,
            stroke_width: width,
            stroke_color: Some(color),
            stroke_cap: StrokeCap::Round,
            stroke_join: StrokeJoin::Round,
            dash_pattern: Vec::new(),
            filled: false,
            fill_color: None,
            opacity: 100.0,
        }
    }
}
