//! Geometrie der Register-Drähte: Endpunkt-Analyse, Griff-Längen, Bézier-Griffe.

use glam::Vec2;

use crate::core::geometry::direction;
use crate::core::{PathEntity, PathPoint, PathStyle, Rgb};
use crate::error::{OrganizerError, OrganizerResult};

/// Richtung des End-Griffs im y-up-Dokumentraum (senkrecht nach unten).
pub const END_HANDLE_DIRECTION: Vec2 = Vec2::NEG_Y;

/// Welches Ende eines Kanal-Pfads betrachtet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuctEnd {
    Start,
    End,
}

impl DuctEnd {
    pub const BOTH: [DuctEnd; 2] = [DuctEnd::Start, DuctEnd::End];
}

/// Ein offenes Ende eines Kanal-Pfads mit seinen Nachbarpunkten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuctEndpoint {
    /// Freier Endpunkt
    pub endpoint: Vec2,
    /// Vorletzter Anker (vom Ende aus gesehen)
    pub previous: Vec2,
    /// Anker vor `previous`; `None` bei Zwei-Punkt-Pfaden
    pub preceding: Option<Vec2>,
}

impl DuctEndpoint {
    /// Liest ein Ende aus den Ankern eines Pfads (mind. zwei Punkte nötig).
    pub fn from_anchors(anchors: &[Vec2], end: DuctEnd) -> Option<Self> {
        let n = anchors.len();
        if n < 2 {
            return None;
        }
        let (endpoint, previous, preceding) = match end {
            DuctEnd::End => (anchors[n - 1], anchors[n - 2], n.checked_sub(3).map(|i| anchors[i])),
            DuctEnd::Start => (anchors[0], anchors[1], anchors.get(2).copied()),
        };
        Some(Self {
            endpoint,
            previous,
            preceding,
        })
    }
}

/// Griff-Länge als monotone, stückweise Funktion der Drahtlänge.
///
/// Unter 10 Einheiten 5 %, bis 25 Einheiten 10 %, bis 50 Einheiten 15 %,
/// darüber 30 % gedeckelt auf 30 Einheiten.
pub fn handle_length(wire_length: f32) -> f32 {
    let length = wire_length.max(0.0);
    if length < 10.0 {
        length * 0.05
    } else if length < 25.0 {
        length * 0.10
    } else if length < 50.0 {
        length * 0.15
    } else {
        (length * 0.30).min(30.0)
    }
}

/// Zweipunkt-Draht mit Bézier-Griffen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireGeometry {
    pub start: Vec2,
    pub end: Vec2,
    pub start_handle: Vec2,
    pub end_handle: Vec2,
}

impl WireGeometry {
    /// Baut den Draht vom vorletzten Kanal-Anker zum freien Endpunkt.
    ///
    /// Kürzer als `min_length` ergibt `GeometryDegenerate`.
    pub fn for_endpoint(end: &DuctEndpoint, min_length: f32) -> OrganizerResult<Self> {
        let length = end.previous.distance(end.endpoint);
        if length < min_length {
            return Err(OrganizerError::GeometryDegenerate(format!(
                "wire length {length:.2} below {min_length:.2}"
            )));
        }
        let own_direction = direction(end.previous, end.endpoint).ok_or_else(|| {
            OrganizerError::GeometryDegenerate("zero-length wire".to_string())
        })?;

        // Richtung des Segments vor `previous`, sonst die eigene Drahtrichtung
        let start_direction = end
            .preceding
            .and_then(|preceding| direction(preceding, end.previous))
            .unwrap_or(own_direction);

        let handle = handle_length(length);
        Ok(Self {
            start: end.previous,
            end: end.endpoint,
            start_handle: end.previous + start_direction * handle,
            end_handle: end.endpoint + END_HANDLE_DIRECTION * handle,
        })
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Offener Pfad mit festem Draht-Stil und Kennzeichnung.
    pub fn to_path(&self, stroke_width: f32, color: Rgb, tag: &str) -> PathEntity {
        PathEntity::open(vec![
            PathPoint::with_handles(self.start, self.start, self.start_handle),
            PathPoint::with_handles(self.end, self.end_handle, self.end),
        ])
        .with_style(PathStyle::round_stroke(stroke_width, color))
        .with_note(tag)
    }
}
