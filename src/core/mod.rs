//! Core-Domänentypen: Layer, Pfade, platzierte Assets, Dokument, Anker-Index.

pub mod assets;
pub mod document;
pub mod entity;
pub mod geometry;
pub mod layer;
pub mod snapshot;
pub mod spatial;
pub mod style;

pub use assets::{AssetLibrary, AssetResolver, FsAssetResolver, MemoryAssetResolver};
pub use document::{Document, ItemRef, Selectable, SelectionSubscription};
pub use entity::{Entity, EntityId, PathEntity, PlacedAsset};
pub use geometry::{Bounds, PathPoint};
pub use layer::{
    is_category_layer, is_duct_layer, is_register_layer, Layer, LayerExitState, LayerId,
    LayerKind, CATEGORY_LAYERS, IGNORE_LAYER, PREVIEW_LAYER, REGISTER_LAYERS,
};
pub use snapshot::DocumentSnapshot;
pub use spatial::{AnchorIndex, AnchorMatch};
pub use style::{PathStyle, Rgb, StrokeCap, StrokeJoin};
