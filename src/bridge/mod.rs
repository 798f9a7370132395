//! Serialisierungs-Kante zum Panel: ein Command-String rein, ein Ergebnis-String raus.
//!
//! Format einer Anfrage: `name(args)`, wobei `args` leer oder ein JSON-Wert ist.
//! Fehler werden ausschließlich hier zu `ERROR:<text>`.

use regex::Regex;
use serde::Deserialize;

use crate::app::{AppController, AppState, BridgeCommand, CommandReply};
use crate::error::{OrganizerError, OrganizerResult};

/// Präfix fehlgeschlagener Antworten.
pub const ERROR_PREFIX: &str = "ERROR:";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveArgs {
    layer_name: String,
    #[serde(default)]
    file_base_name: Option<String>,
}

/// Zerlegt eine Anfrage-Zeile in einen `BridgeCommand`.
#[derive(Debug, Clone)]
pub struct CommandParser {
    call: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            call: Regex::new(r"^\s*([A-Za-z]+)\s*\((.*)\)\s*$")?,
        })
    }

    pub fn parse(&self, line: &str) -> OrganizerResult<BridgeCommand> {
        let captures = self
            .call
            .captures(line)
            .ok_or_else(|| OrganizerError::InvalidInput(format!("malformed command '{}'", line.trim())))?;
        let name = &captures[1];
        let args = captures[2].trim();

        let command = match name {
            "moveSelectionToLayer" => {
                let args: MoveArgs = json_args(name, args)?;
                BridgeCommand::MoveSelectionToLayer {
                    layer_name: args.layer_name,
                    file_base_name: args.file_base_name,
                }
            }
            "toggleIgnoreMode" => no_args(name, args, BridgeCommand::ToggleIgnoreMode)?,
            "setIgnoreMode" => BridgeCommand::SetIgnoreMode {
                active: json_args(name, args)?,
            },
            "applyIgnoreToCurrent" => no_args(name, args, BridgeCommand::ApplyIgnoreToCurrent)?,
            "ignoreModeStatus" => no_args(name, args, BridgeCommand::IgnoreModeStatus)?,
            "runRegisterWireSynthesis" => BridgeCommand::RunRegisterWireSynthesis {
                // Ohne Argument: Drähte erzeugen
                enable_wire_creation: if args.is_empty() {
                    true
                } else {
                    json_args(name, args)?
                },
            },
            "cleanup" => no_args(name, args, BridgeCommand::Cleanup)?,
            "layerSummary" => no_args(name, args, BridgeCommand::LayerSummary)?,
            "hostSetSelection" => BridgeCommand::HostSetSelection {
                ids: json_args(name, args)?,
            },
            other => {
                return Err(OrganizerError::InvalidInput(format!(
                    "unknown command '{other}'"
                )))
            }
        };
        Ok(command)
    }
}

fn json_args<T: for<'de> Deserialize<'de>>(name: &str, args: &str) -> OrganizerResult<T> {
    serde_json::from_str(args)
        .map_err(|e| OrganizerError::InvalidInput(format!("{name}: bad arguments ({e})")))
}

fn no_args(name: &str, args: &str, command: BridgeCommand) -> OrganizerResult<BridgeCommand> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(OrganizerError::InvalidInput(format!(
            "{name} takes no arguments"
        )))
    }
}

/// Serialisiert eine Antwort: Token, Klartext oder JSON.
pub fn render_reply(reply: &CommandReply) -> OrganizerResult<String> {
    let text = match reply {
        CommandReply::Moved(report) => to_json(report)?,
        CommandReply::IgnoreMode(active) => active.to_string(),
        CommandReply::Ignore(outcome) => outcome.token().to_string(),
        CommandReply::Status(status) => status.clone(),
        CommandReply::Wires(report) => report.summary(),
        CommandReply::Layers(layers) => to_json(layers)?,
        CommandReply::Ok => "OK".to_string(),
    };
    Ok(text)
}

fn to_json<T: serde::Serialize>(value: &T) -> OrganizerResult<String> {
    serde_json::to_string(value).map_err(|e| OrganizerError::HostOperationFailed(e.to_string()))
}

/// Formatiert einen Fehler für das Panel.
pub fn render_error(error: &OrganizerError) -> String {
    format!("{ERROR_PREFIX}{error}")
}

/// Eine Bridge-Sitzung: Parser, Controller und Sitzungszustand.
pub struct Bridge {
    parser: CommandParser,
    controller: AppController,
    state: AppState,
}

impl Bridge {
    pub fn new(state: AppState) -> Result<Self, regex::Error> {
        Ok(Self {
            parser: CommandParser::new()?,
            controller: AppController::new(),
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Verarbeitet eine Anfrage-Zeile; liefert immer einen Antwort-String.
    pub fn handle_line(&mut self, line: &str) -> String {
        let result = self
            .parser
            .parse(line)
            .and_then(|command| self.controller.handle_command(&mut self.state, command))
            .and_then(|reply| render_reply(&reply));

        match result {
            Ok(text) => text,
            Err(error) => {
                log::warn!("Command '{}' fehlgeschlagen: {}", line.trim(), error);
                render_error(&error)
            }
        }
    }

    /// Sitzungsende: Ignore-Modus beenden und Vorschau entfernen.
    pub fn shutdown(mut self) -> AppState {
        self.state.ignore_mode.cleanup(self.state.document.as_mut());
        self.state
    }
}
