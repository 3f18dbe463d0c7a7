//! Read-only value types for editor documents.
//!
//! These mirror what the editor knows about tilesets and maps, reduced to
//! what the exporters read. They are built by [`crate::loader`] or directly
//! in code, and never mutated during an export.

mod map;
mod property;
mod tileset;

pub use map::{Layer, LayerKind, Map, MapObject, TileGrid, TileRef, CUSTOM_DEPENDENCY_PREFIX};
pub use property::{Properties, PropertyValue};
pub use tileset::{
    base_name, CollisionShape, Image, ShapeKind, TileDef, Tileset, MASK_PROPERTY,
    SCALE_DIVIDER_PROPERTY,
};
