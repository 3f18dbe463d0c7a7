//! Static checks over loaded tilesets and maps.
//!
//! Each check returns a `ValidationResult`. These find problems the
//! exporters would silently paper over (overwritten files, ignored
//! dependencies), on top of the diagnostics the exporters raise themselves.

use std::collections::HashMap;

use crate::model::{Map, Tileset, CUSTOM_DEPENDENCY_PREFIX, SCALE_DIVIDER_PROPERTY};

use super::codes;
use super::diagnostic::{Diagnostic, ValidationResult};

/// Two exported tiles with the same class write to the same descriptor files.
pub fn check_duplicate_classes(tileset: &Tileset) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: HashMap<&str, u32> = HashMap::new();

    for tile in &tileset.tiles {
        let Some(class) = tile.exported_class() else {
            continue;
        };
        if let Some(first) = seen.insert(class, tile.id) {
            result.push(
                Diagnostic::warning(
                    codes::DUPLICATE_CLASS,
                    format!(
                        "Tileset '{}': tiles {} and {} share class '{}'",
                        tileset.name, first, tile.id, class
                    ),
                )
                .with_help("The later tile overwrites the earlier tile's descriptor files"),
            );
        }
    }

    result
}

/// An atlas must be at least one tile (plus spacing) wide.
pub fn check_atlas_columns(tileset: &Tileset) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(image) = &tileset.image {
        if tileset.columns() == 0 {
            result.push(
                Diagnostic::error(
                    codes::ATLAS_COLUMNS,
                    format!(
                        "Tileset '{}': atlas image '{}' ({}px) is narrower than one tile ({}px)",
                        tileset.name,
                        image.file_name(),
                        image.width,
                        tileset.tile_width + tileset.spacing
                    ),
                )
                .with_help("Check the tile size and the image dimensions"),
            );
        }
    }

    result
}

/// Loose-image tilesets divide by `ScaleDivider`; it must be positive.
pub fn check_scale_divider(tileset: &Tileset) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !tileset.is_atlas() && tileset.scale_divider() <= 0.0 {
        result.push(
            Diagnostic::error(
                codes::SCALE_DIVIDER,
                format!(
                    "Tileset '{}': {} must be positive, got {}",
                    tileset.name,
                    SCALE_DIVIDER_PROPERTY,
                    tileset.scale_divider()
                ),
            )
            .with_help("Remove the property to use 1.0"),
        );
    }

    result
}

/// `CustomDependencyN` entries past the first missing index are never read.
pub fn check_dependency_gaps(map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();
    let listed = map.custom_dependencies().len();

    let mut ignored: Vec<usize> = map
        .properties
        .iter()
        .filter_map(|(name, _)| name.strip_prefix(CUSTOM_DEPENDENCY_PREFIX))
        .filter_map(|index| index.parse::<usize>().ok())
        .filter(|index| *index > listed)
        .collect();
    ignored.sort_unstable();

    for index in ignored {
        result.push(
            Diagnostic::warning(
                codes::DEPENDENCY_GAP,
                format!(
                    "Map '{}': {}{} is ignored because {}{} is missing",
                    map.export_name(),
                    CUSTOM_DEPENDENCY_PREFIX,
                    index,
                    CUSTOM_DEPENDENCY_PREFIX,
                    listed
                ),
            )
            .with_help("Number custom dependencies without gaps, starting at 0"),
        );
    }

    result
}

/// Placed tiles must point at a tileset the map carries.
pub fn check_unresolved_tiles(map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut refs = map.tile_refs();
    refs.sort_by_key(|t| (t.tileset, t.id));
    refs.dedup();

    for tile in refs {
        if map.tilesets.get(tile.tileset).is_none() {
            result.warning(
                codes::UNRESOLVED_TILE,
                format!(
                    "Map '{}': tile {} references missing tileset #{}",
                    map.export_name(),
                    tile.id,
                    tile.tileset
                ),
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Image, Layer, MapObject, Properties, PropertyValue, TileDef, TileGrid, TileRef,
    };

    #[test]
    fn test_duplicate_classes() {
        let tileset = Tileset::new("Forest", 16, 16)
            .with_tile(TileDef::new(0).with_class("Rock"))
            .with_tile(TileDef::new(1).with_class("Tree"))
            .with_tile(TileDef::new(2).with_class("Rock"))
            .with_tile(TileDef::new(3));

        let result = check_duplicate_classes(&tileset);
        assert_eq!(result.warning_count(), 1);
        assert!(result.iter().next().unwrap().message.contains("tiles 0 and 2"));
    }

    #[test]
    fn test_atlas_columns() {
        let narrow = Tileset::new("Narrow", 32, 32).with_image(Image::new("n.png", 16, 64));
        assert!(check_atlas_columns(&narrow).has_errors());

        let fine = Tileset::new("Fine", 32, 32).with_image(Image::new("f.png", 64, 64));
        assert!(check_atlas_columns(&fine).is_ok());

        let loose = Tileset::new("Loose", 32, 32);
        assert!(check_atlas_columns(&loose).is_ok());
    }

    #[test]
    fn test_scale_divider() {
        let zero = Tileset::new("Loose", 0, 0).with_properties(
            Properties::new().with(SCALE_DIVIDER_PROPERTY, PropertyValue::Float(0.0)),
        );
        assert!(check_scale_divider(&zero).has_errors());

        // Atlas tilesets never read the divider.
        let atlas = zero.clone().with_image(Image::new("a.png", 64, 64));
        assert!(check_scale_divider(&atlas).is_ok());
    }

    #[test]
    fn test_dependency_gaps() {
        let props = Properties::new()
            .with("CustomDependency0", PropertyValue::String("a".into()))
            .with("CustomDependency2", PropertyValue::String("c".into()))
            .with("CustomDependency10", PropertyValue::String("k".into()));
        let map = Map::new("m", 16, 16).with_properties(props);

        let result = check_dependency_gaps(&map);
        let messages: Vec<&str> = result.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("CustomDependency2 is ignored"));
        assert!(messages[1].contains("CustomDependency10 is ignored"));
    }

    #[test]
    fn test_dependency_gaps_none_without_gap() {
        let props = Properties::new()
            .with("CustomDependency0", PropertyValue::String("a".into()))
            .with("CustomDependency1", PropertyValue::String("b".into()));
        let map = Map::new("m", 16, 16).with_properties(props);

        assert!(check_dependency_gaps(&map).is_ok());
    }

    #[test]
    fn test_unresolved_tiles() {
        let map = Map::new("m", 16, 16)
            .with_tileset(Tileset::new("A", 16, 16))
            .with_layer(Layer::tiles(
                "t",
                TileGrid::new(2, 1)
                    .with_tile(0, 0, TileRef::new(0, 0))
                    .with_tile(1, 0, TileRef::new(3, 7)),
            ))
            .with_layer(Layer::objects(
                "o",
                vec![MapObject::new(1, 0.0, 0.0, 1.0, 1.0).with_tile(TileRef::new(3, 7))],
            ));

        let result = check_unresolved_tiles(&map);
        assert_eq!(result.warning_count(), 1);
    }
}
