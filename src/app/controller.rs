//! Application Controller für zentrale Command-Verarbeitung.

use super::handlers;
use super::{AppState, BridgeCommand, CommandReply};
use crate::error::OrganizerResult;

/// Orchestriert Bridge-Commands und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt einen Command aus, protokolliert den Ausgang und liefert die Antwort.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: BridgeCommand,
    ) -> OrganizerResult<CommandReply> {
        let name = command.name();
        if !command.is_query() {
            log::debug!("Command: {}", name);
        }

        let result = Self::dispatch(state, command);
        state.command_log.record(name, &result);
        result
    }

    /// Dispatcht an Feature-Handler in `handlers/`.
    fn dispatch(state: &mut AppState, command: BridgeCommand) -> OrganizerResult<CommandReply> {
        let reply = match command {
            // === Verschieben & Verdrahten ===
            BridgeCommand::MoveSelectionToLayer {
                layer_name,
                file_base_name,
            } => CommandReply::Moved(handlers::organize::move_selection(
                state,
                &layer_name,
                file_base_name.as_deref(),
            )?),
            BridgeCommand::RunRegisterWireSynthesis {
                enable_wire_creation,
            } => CommandReply::Wires(handlers::organize::synthesize_wires(
                state,
                enable_wire_creation,
            )?),
            BridgeCommand::LayerSummary => {
                CommandReply::Layers(handlers::organize::layer_summary(state)?)
            }

            // === Ignore-Modus ===
            BridgeCommand::ToggleIgnoreMode => {
                CommandReply::IgnoreMode(handlers::ignore::toggle(state)?)
            }
            BridgeCommand::SetIgnoreMode { active } => {
                CommandReply::IgnoreMode(handlers::ignore::set_mode(state, active)?)
            }
            BridgeCommand::ApplyIgnoreToCurrent => {
                CommandReply::Ignore(handlers::ignore::apply(state)?)
            }
            BridgeCommand::IgnoreModeStatus => CommandReply::Status(handlers::ignore::status(state)),
            BridgeCommand::Cleanup => {
                handlers::ignore::cleanup(state);
                CommandReply::Ok
            }

            // === Host-Selektion ===
            BridgeCommand::HostSetSelection { ids } => {
                handlers::selection::host_set_selection(state, &ids)?;
                CommandReply::Ok
            }
        };

        Ok(reply)
    }
}
