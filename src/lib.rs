//! tilex - Tiled to engine descriptor exporter
//!
//! A library for turning Tiled tilesets and maps into the YAML assembly
//! descriptors (prototype libraries and levels) read by the engine.

pub mod cli;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod output;
pub mod project;
pub mod validation;

pub use error::{Result, TilexError};
pub use export::{
    export_map, export_tileset, flatten_layers, plan_map, plan_tileset, ExportPlan,
    ExportSettings, ExportTarget, OutputFile, ROOT_SENTINEL,
};
pub use loader::{load_map, load_tileset};
pub use model::{Layer, LayerKind, Map, MapObject, Properties, PropertyValue, TileDef, Tileset};
pub use project::{discover, Manifest, Project, ScanResult};
pub use validation::{validate_map, validate_tileset, Diagnostic, Severity, ValidationResult};
