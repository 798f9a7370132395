//! Geteilte Konfiguration für alle Layer der Anwendung.

pub mod options;

pub use options::OrganizerOptions;
pub use options::{IGNORE_MARKER_TAG, WIRE_TAG};
