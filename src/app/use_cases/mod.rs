//! Use-Cases der Application-Layer-Orchestrierung.

pub mod canonicalize;
pub mod relocate;
pub mod summary;
pub mod wire_synthesis;

pub use relocate::{move_selection_to_layer, MoveReport, MoveSkipReason};
pub use summary::{layer_summary, LayerSummary};
pub use wire_synthesis::{synthesize_register_wires, WireReport};
