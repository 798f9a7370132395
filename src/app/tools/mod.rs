//! Reine Geometrie-Bausteine ohne Dokument-Mutation.
//!
//! Die Use-Cases erzeugen daraus Pfade und fügen sie zentral ins Dokument ein.

/// Vorschau-Overlay des Ignore-Modus.
pub mod ignore_preview;
/// Register-Drähte (Griff-Längen, Endpunkt-Analyse).
pub mod wire;

pub use ignore_preview::{EndpointProbe, PreviewStyle};
pub use wire::{handle_length, DuctEnd, DuctEndpoint, WireGeometry};
