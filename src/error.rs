//! Fehler-Taxonomie der Kern-Operationen.

use std::path::PathBuf;

use thiserror::Error;

/// Alle Fehler, die eine Kern-Operation an den Aufrufer meldet.
///
/// Die `Display`-Texte gehen unverändert als `ERROR:<text>` über die Bridge
/// und erscheinen so im Status-Text des Panels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrganizerError {
    #[error("No document open")]
    NoDocument,

    #[error("Nothing selected")]
    NoSelection,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Degenerate geometry: {0}")]
    GeometryDegenerate(String),

    #[error("Host operation failed: {0}")]
    HostOperationFailed(String),
}

/// Kurzform für Ergebnisse der Kern-Operationen.
pub type OrganizerResult<T> = Result<T, OrganizerError>;
