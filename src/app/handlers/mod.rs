//! Feature-Handler für BridgeCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion.

pub mod ignore;
pub mod organize;
pub mod selection;
