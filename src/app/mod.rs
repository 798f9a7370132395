//! Application-Layer: Controller, State, Commands und Use-Cases.

pub mod batch;
pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod ignore_mode;
/// Sitzungszustand
///
/// Hält das geöffnete Dokument, die Optionen und den Ignore-Modus.
pub mod state;
pub mod tools;
pub mod use_cases;

pub use batch::{BatchOutcome, ItemFailure};
pub use command_log::{CommandLog, CommandOutcome, CommandRecord};
pub use controller::AppController;
pub use events::{BridgeCommand, CommandReply};
pub use ignore_mode::{IgnoreModeController, IgnoreModeState, IgnoreOutcome};
pub use state::AppState;
pub use use_cases::{LayerSummary, MoveReport, MoveSkipReason, WireReport};
