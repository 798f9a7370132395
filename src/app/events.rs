//! Bridge-Commands und ihre strukturierten Antworten.
//!
//! Commands sind mutierende oder abfragende Schritte, die zentral im
//! `AppController` ausgeführt werden. Die String-Serialisierung passiert
//! ausschließlich in `crate::bridge`.

use super::ignore_mode::IgnoreOutcome;
use super::use_cases::{LayerSummary, MoveReport, WireReport};

/// Ein Command des Panels (eine Zeile über die Bridge).
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    /// Selektion auf einen Kategorie-Layer verschieben, optional mit Asset-Ersatz
    MoveSelectionToLayer {
        layer_name: String,
        file_base_name: Option<String>,
    },
    /// Ignore-Modus umschalten
    ToggleIgnoreMode,
    /// Ignore-Modus explizit setzen
    SetIgnoreMode { active: bool },
    /// Ignore-Marker am vorgemerkten Endpunkt anlegen
    ApplyIgnoreToCurrent,
    /// Status des Ignore-Modus abfragen
    IgnoreModeStatus,
    /// Kanonisierung und optional Drahtsynthese
    RunRegisterWireSynthesis { enable_wire_creation: bool },
    /// Panel-Abbau: Ignore-Modus beenden, Vorschau entfernen
    Cleanup,
    /// Layer-Übersicht abfragen
    LayerSummary,
    /// Host meldet eine neue Selektion (Element-IDs)
    HostSetSelection { ids: Vec<u64> },
}

impl BridgeCommand {
    /// Name des Commands auf der Bridge.
    pub fn name(&self) -> &'static str {
        match self {
            BridgeCommand::MoveSelectionToLayer { .. } => "moveSelectionToLayer",
            BridgeCommand::ToggleIgnoreMode => "toggleIgnoreMode",
            BridgeCommand::SetIgnoreMode { .. } => "setIgnoreMode",
            BridgeCommand::ApplyIgnoreToCurrent => "applyIgnoreToCurrent",
            BridgeCommand::IgnoreModeStatus => "ignoreModeStatus",
            BridgeCommand::RunRegisterWireSynthesis { .. } => "runRegisterWireSynthesis",
            BridgeCommand::Cleanup => "cleanup",
            BridgeCommand::LayerSummary => "layerSummary",
            BridgeCommand::HostSetSelection { .. } => "hostSetSelection",
        }
    }

    /// `true` für reine Abfragen ohne Dokument-Mutation.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            BridgeCommand::IgnoreModeStatus | BridgeCommand::LayerSummary
        )
    }
}

/// Strukturierte Antwort auf einen Command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    Moved(MoveReport),
    /// Neuer Aktiv-Zustand des Ignore-Modus
    IgnoreMode(bool),
    Ignore(IgnoreOutcome),
    Status(String),
    Wires(WireReport),
    Layers(Vec<LayerSummary>),
    Ok,
}
