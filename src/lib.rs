//! HVAC Duct Organizer Library.
//! Core-Funktionalität als Library exportiert für Tests und die Bridge-Binary.

pub mod app;
pub mod bridge;
pub mod core;
pub mod error;
pub mod shared;

pub use app::{
    AppController, AppState, BridgeCommand, CommandReply, IgnoreModeController, IgnoreOutcome,
    MoveReport, WireReport,
};
pub use bridge::Bridge;
pub use core::{
    AnchorIndex, AnchorMatch, Document, DocumentSnapshot, Entity, EntityId, Layer, LayerId,
    PathEntity, PlacedAsset, Selectable,
};
pub use error::{OrganizerError, OrganizerResult};
pub use shared::OrganizerOptions;
