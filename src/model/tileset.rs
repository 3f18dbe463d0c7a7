//! Tileset and tile definition types.
//!
//! A tileset is either atlas-backed (one shared image, tiles addressed by
//! row/column) or a collection of loose images (each tile owns its image).

use std::path::{Path, PathBuf};

use super::property::Properties;

/// Name of the tileset property dividing loose-image pixel sizes into world units.
pub const SCALE_DIVIDER_PROPERTY: &str = "ScaleDivider";

/// Name of the tile property holding the sprite visibility mask.
pub const MASK_PROPERTY: &str = "Mask";

/// An image referenced by a tileset or tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(source: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }

    /// File name including extension (e.g. `ForestTiles.png`).
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name up to its first dot (e.g. `ForestTiles`).
    pub fn base_name(&self) -> String {
        base_name(&self.source)
    }
}

/// File name of `path` truncated at the first `.`.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((base, _)) => base.to_string(),
        None => name,
    }
}

/// Geometry of a collision shape, in tile-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle { width: f64, height: f64 },
    Ellipse { width: f64, height: f64 },
    Polygon { points: usize },
    Polyline { points: usize },
    Point,
    Text,
}

impl ShapeKind {
    /// Human-readable shape name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle { .. } => "rectangle",
            ShapeKind::Ellipse { .. } => "ellipse",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Polyline { .. } => "polyline",
            ShapeKind::Point => "point",
            ShapeKind::Text => "text",
        }
    }

    /// Bounding size; zero for shapes without one.
    pub fn size(&self) -> (f64, f64) {
        match self {
            ShapeKind::Rectangle { width, height } | ShapeKind::Ellipse { width, height } => {
                (*width, *height)
            }
            _ => (0.0, 0.0),
        }
    }
}

/// A collision shape attached to a tile definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShape {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub kind: ShapeKind,
    pub properties: Properties,
}

impl CollisionShape {
    pub fn new(id: u32, x: f64, y: f64, kind: ShapeKind) -> Self {
        Self {
            id,
            x,
            y,
            rotation: 0.0,
            kind,
            properties: Properties::new(),
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// One entry of a tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDef {
    pub id: u32,
    pub class: Option<String>,
    /// Own image, for loose-image tilesets.
    pub image: Option<Image>,
    /// Collision region; `Some` even when it holds no shapes.
    pub collision: Option<Vec<CollisionShape>>,
    pub properties: Properties,
}

impl TileDef {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            class: None,
            image: None,
            collision: None,
            properties: Properties::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_collision(mut self, shapes: Vec<CollisionShape>) -> Self {
        self.collision = Some(shapes);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Class name if the tile is exported (non-empty class).
    pub fn exported_class(&self) -> Option<&str> {
        self.class.as_deref().filter(|c| !c.is_empty())
    }
}

/// A named catalog of tile definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    /// Shared atlas image; `None` for loose-image tilesets.
    pub image: Option<Image>,
    /// Tile definitions in ascending id order.
    pub tiles: Vec<TileDef>,
    pub properties: Properties,
}

impl Tileset {
    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name: name.into(),
            tile_width,
            tile_height,
            spacing: 0,
            image: None,
            tiles: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Add a tile, keeping tiles sorted by id.
    pub fn add_tile(&mut self, tile: TileDef) {
        let index = self.tiles.partition_point(|t| t.id < tile.id);
        if self.tiles.get(index).is_some_and(|t| t.id == tile.id) {
            self.tiles[index] = tile;
        } else {
            self.tiles.insert(index, tile);
        }
    }

    pub fn with_tile(mut self, tile: TileDef) -> Self {
        self.add_tile(tile);
        self
    }

    pub fn is_atlas(&self) -> bool {
        self.image.is_some()
    }

    pub fn tile(&self, id: u32) -> Option<&TileDef> {
        self.tiles
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|i| &self.tiles[i])
    }

    /// Tiles with a non-empty class, in id order.
    pub fn exported_tiles(&self) -> impl Iterator<Item = &TileDef> {
        self.tiles.iter().filter(|t| t.exported_class().is_some())
    }

    /// Number of atlas columns; zero without an atlas image.
    pub fn columns(&self) -> u32 {
        match &self.image {
            Some(image) => image.width / (self.tile_width + self.spacing).max(1),
            None => 0,
        }
    }

    /// Raw `ScaleDivider` property, defaulting to 1.
    pub fn scale_divider(&self) -> f64 {
        self.properties
            .float(SCALE_DIVIDER_PROPERTY)
            .unwrap_or(1.0)
    }

    /// Pixel size of a tile: its own image for loose tiles, the grid size otherwise.
    pub fn tile_size(&self, tile: &TileDef) -> (f64, f64) {
        match (&self.image, &tile.image) {
            (None, Some(image)) => (image.width as f64, image.height as f64),
            _ => (self.tile_width as f64, self.tile_height as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;

    #[test]
    fn test_base_name_stops_at_first_dot() {
        assert_eq!(base_name(Path::new("../Textures/Hero.idle.png")), "Hero");
        assert_eq!(base_name(Path::new("Plain")), "Plain");
    }

    #[test]
    fn test_add_tile_keeps_id_order() {
        let tileset = Tileset::new("Forest", 16, 16)
            .with_tile(TileDef::new(5))
            .with_tile(TileDef::new(1))
            .with_tile(TileDef::new(3));

        let ids: Vec<u32> = tileset.tiles.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert!(tileset.tile(3).is_some());
        assert!(tileset.tile(4).is_none());
    }

    #[test]
    fn test_add_tile_replaces_same_id() {
        let tileset = Tileset::new("Forest", 16, 16)
            .with_tile(TileDef::new(2).with_class("Old"))
            .with_tile(TileDef::new(2).with_class("New"));

        assert_eq!(tileset.tiles.len(), 1);
        assert_eq!(tileset.tile(2).and_then(|t| t.exported_class()), Some("New"));
    }

    #[test]
    fn test_exported_class_ignores_empty() {
        assert_eq!(TileDef::new(0).with_class("").exported_class(), None);
        assert_eq!(TileDef::new(0).exported_class(), None);
        assert_eq!(TileDef::new(0).with_class("Rock").exported_class(), Some("Rock"));
    }

    #[test]
    fn test_columns_accounts_for_spacing() {
        let tileset = Tileset::new("Atlas", 32, 32)
            .with_spacing(2)
            .with_image(Image::new("atlas.png", 170, 68));
        // 170 / 34 = 5
        assert_eq!(tileset.columns(), 5);

        let loose = Tileset::new("Loose", 32, 32);
        assert_eq!(loose.columns(), 0);
    }

    #[test]
    fn test_scale_divider_default() {
        let tileset = Tileset::new("Loose", 0, 0);
        assert_eq!(tileset.scale_divider(), 1.0);

        let tileset = tileset.with_properties(
            Properties::new().with(SCALE_DIVIDER_PROPERTY, PropertyValue::Float(64.0)),
        );
        assert_eq!(tileset.scale_divider(), 64.0);
    }

    #[test]
    fn test_tile_size_prefers_loose_image() {
        let loose = Tileset::new("Loose", 16, 16);
        let tile = TileDef::new(0).with_image(Image::new("hero.png", 48, 64));
        assert_eq!(loose.tile_size(&tile), (48.0, 64.0));

        let atlas = Tileset::new("Atlas", 16, 16).with_image(Image::new("a.png", 64, 64));
        assert_eq!(atlas.tile_size(&TileDef::new(0)), (16.0, 16.0));
    }
}
