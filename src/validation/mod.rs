//! Diagnostics for tilesets and maps.
//!
//! Exporters raise diagnostics for elements they skip; the checks here look
//! for problems that would not stop an export but would make its output
//! surprising. Used by `tilex validate` and the export commands.

mod checks;
mod diagnostic;

pub use diagnostic::{Diagnostic, Severity, ValidationResult};

use crate::model::{Map, Tileset};
use crate::output::Printer;

/// Diagnostic codes.
pub mod codes {
    pub const IMAGE_LAYER: &str = "tilex::export::image-layer";
    pub const NON_CIRCULAR_ELLIPSE: &str = "tilex::export::non-circular-ellipse";
    pub const UNSUPPORTED_SHAPE: &str = "tilex::export::unsupported-shape";
    pub const MISSING_IMAGE: &str = "tilex::export::missing-image";
    pub const DUPLICATE_CLASS: &str = "tilex::validate::duplicate-class";
    pub const ATLAS_COLUMNS: &str = "tilex::validate::atlas-columns";
    pub const SCALE_DIVIDER: &str = "tilex::validate::scale-divider";
    pub const DEPENDENCY_GAP: &str = "tilex::validate::dependency-gap";
    pub const UNRESOLVED_TILE: &str = "tilex::validate::unresolved-tile";
}

/// Run all tileset checks.
pub fn validate_tileset(tileset: &Tileset) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_duplicate_classes(tileset));
    result.merge(checks::check_atlas_columns(tileset));
    result.merge(checks::check_scale_divider(tileset));

    result
}

/// Run all map checks, including those of the map's tilesets.
pub fn validate_map(map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_dependency_gaps(map));
    result.merge(checks::check_unresolved_tiles(map));
    for tileset in map.used_tilesets() {
        result.merge(checks::check_atlas_columns(tileset));
    }

    result
}

/// Print diagnostics in the order they were raised.
pub fn print_diagnostics(printer: &Printer, result: &ValidationResult) {
    for diagnostic in result {
        printer.diagnostic(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Image, TileDef};

    #[test]
    fn test_validate_clean_tileset() {
        let tileset = Tileset::new("Forest", 16, 16)
            .with_image(Image::new("forest.png", 64, 64))
            .with_tile(TileDef::new(0).with_class("Grass"));
        assert!(validate_tileset(&tileset).is_ok());
    }

    #[test]
    fn test_validate_map_checks_used_atlases() {
        use crate::model::{Layer, TileGrid, TileRef};

        let narrow = Tileset::new("Narrow", 32, 32).with_image(Image::new("n.png", 8, 8));
        let map = Map::new("m", 32, 32).with_tileset(narrow).with_layer(Layer::tiles(
            "t",
            TileGrid::new(1, 1).with_tile(0, 0, TileRef::new(0, 0)),
        ));

        let result = validate_map(&map);
        assert_eq!(result.with_code(codes::ATLAS_COLUMNS).count(), 1);
    }
}
