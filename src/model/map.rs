//! Map, layer and placement types.

use std::collections::BTreeMap;

use super::property::Properties;
use super::tileset::{TileDef, Tileset};

/// Prefix of the indexed map properties listing extra dependency folders.
pub const CUSTOM_DEPENDENCY_PREFIX: &str = "CustomDependency";

/// Reference from a placement to a tile definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRef {
    /// Index into `Map::tilesets`.
    pub tileset: usize,
    pub id: u32,
}

impl TileRef {
    pub fn new(tileset: usize, id: u32) -> Self {
        Self { tileset, id }
    }
}

/// A free-form placement on an object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    pub class: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    /// Set for tile objects.
    pub tile: Option<TileRef>,
}

impl MapObject {
    pub fn new(id: u32, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            name: String::new(),
            class: None,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            tile: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_tile(mut self, tile: TileRef) -> Self {
        self.tile = Some(tile);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Sparse tile grid; coordinates may be negative on infinite maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    cells: BTreeMap<(i32, i32), TileRef>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: BTreeMap::new(),
        }
    }

    /// Place a tile, growing the grid extents to cover the cell.
    pub fn set(&mut self, x: i32, y: i32, tile: TileRef) {
        self.width = self.width.max(extent(x));
        self.height = self.height.max(extent(y));
        self.cells.insert((x, y), tile);
    }

    pub fn with_tile(mut self, x: i32, y: i32, tile: TileRef) -> Self {
        self.set(x, y, tile);
        self
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileRef> {
        self.cells.get(&(x, y)).copied()
    }

    /// Occupied cells within `[-width, width) x [-height, height)`,
    /// column by column (x-major, then y).
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, TileRef)> + '_ {
        let (w, h) = (self.width as i64, self.height as i64);
        self.cells
            .iter()
            .filter(move |((x, y), _)| {
                let (x, y) = (*x as i64, *y as i64);
                -w <= x && x < w && -h <= y && y < h
            })
            .map(|((x, y), tile)| (*x, *y, *tile))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Half-open extent needed to cover coordinate `c` in `[-e, e)`.
fn extent(c: i32) -> u32 {
    if c >= 0 {
        c as u32 + 1
    } else {
        c.unsigned_abs()
    }
}

/// Layer contents.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Group(Vec<Layer>),
    Objects(Vec<MapObject>),
    Tiles(TileGrid),
    Image,
}

/// A map subdivision.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub kind: LayerKind,
}

impl Layer {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            offset_x: 0.0,
            offset_y: 0.0,
            kind,
        }
    }

    pub fn objects(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self::new(name, LayerKind::Objects(objects))
    }

    pub fn tiles(name: impl Into<String>, grid: TileGrid) -> Self {
        Self::new(name, LayerKind::Tiles(grid))
    }

    pub fn group(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self::new(name, LayerKind::Group(layers))
    }

    pub fn image(name: impl Into<String>) -> Self {
        Self::new(name, LayerKind::Image)
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group(_))
    }
}

/// A tile map: a named tree of layers plus the tilesets it draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// File stem of the map document.
    pub name: String,
    pub class: Option<String>,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
    pub properties: Properties,
}

impl Map {
    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name: name.into(),
            class: None,
            tile_width,
            tile_height,
            tilesets: Vec::new(),
            layers: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_tileset(mut self, tileset: Tileset) -> Self {
        self.tilesets.push(tileset);
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Name of the exported level: the map class, else the file stem.
    pub fn export_name(&self) -> &str {
        self.class
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn tile(&self, tile: TileRef) -> Option<&TileDef> {
        self.tilesets.get(tile.tileset)?.tile(tile.id)
    }

    /// Exported class of a referenced tile.
    pub fn tile_class(&self, tile: TileRef) -> Option<&str> {
        self.tile(tile).and_then(|t| t.exported_class())
    }

    /// Every tile reference placed anywhere in the layer tree.
    pub fn tile_refs(&self) -> Vec<TileRef> {
        let mut refs = Vec::new();
        collect_tile_refs(&self.layers, &mut refs);
        refs
    }

    /// Tilesets referenced by at least one tile cell or tile object, in tileset order.
    pub fn used_tilesets(&self) -> Vec<&Tileset> {
        let mut used = vec![false; self.tilesets.len()];
        for tile in self.tile_refs() {
            if let Some(flag) = used.get_mut(tile.tileset) {
                *flag = true;
            }
        }
        self.tilesets
            .iter()
            .zip(used)
            .filter_map(|(tileset, used)| used.then_some(tileset))
            .collect()
    }

    /// `CustomDependency0`, `CustomDependency1`, ... up to the first missing index.
    pub fn custom_dependencies(&self) -> Vec<String> {
        (0..)
            .map(|i| self.properties.text(&format!("{CUSTOM_DEPENDENCY_PREFIX}{i}")))
            .take_while(Option::is_some)
            .flatten()
            .collect()
    }
}

fn collect_tile_refs(layers: &[Layer], refs: &mut Vec<TileRef>) {
    for layer in layers {
        match &layer.kind {
            LayerKind::Group(children) => collect_tile_refs(children, refs),
            LayerKind::Objects(objects) => refs.extend(objects.iter().filter_map(|o| o.tile)),
            LayerKind::Tiles(grid) => refs.extend(grid.occupied().map(|(_, _, t)| t)),
            LayerKind::Image => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;

    #[test]
    fn test_grid_occupied_is_x_major() {
        let tile = TileRef::new(0, 0);
        let grid = TileGrid::new(3, 3)
            .with_tile(1, 0, tile)
            .with_tile(0, 2, tile)
            .with_tile(0, 1, tile);

        let cells: Vec<(i32, i32)> = grid.occupied().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(cells, vec![(0, 1), (0, 2), (1, 0)]);
    }

    #[test]
    fn test_grid_grows_for_negative_cells() {
        let grid = TileGrid::new(2, 2).with_tile(-5, 3, TileRef::new(0, 1));
        assert_eq!(grid.width, 5);
        assert_eq!(grid.height, 4);
        assert_eq!(grid.occupied().count(), 1);
        assert_eq!(grid.tile_at(-5, 3), Some(TileRef::new(0, 1)));
    }

    #[test]
    fn test_export_name_prefers_class() {
        let map = Map::new("level-01", 16, 16);
        assert_eq!(map.export_name(), "level-01");
        assert_eq!(map.clone().with_class("").export_name(), "level-01");
        assert_eq!(map.with_class("Forest").export_name(), "Forest");
    }

    #[test]
    fn test_used_tilesets_follow_tileset_order() {
        let map = Map::new("m", 16, 16)
            .with_tileset(Tileset::new("A", 16, 16))
            .with_tileset(Tileset::new("B", 16, 16))
            .with_tileset(Tileset::new("C", 16, 16))
            .with_layer(Layer::group(
                "g",
                vec![Layer::objects(
                    "o",
                    vec![MapObject::new(1, 0.0, 0.0, 16.0, 16.0).with_tile(TileRef::new(2, 0))],
                )],
            ))
            .with_layer(Layer::tiles(
                "t",
                TileGrid::new(1, 1).with_tile(0, 0, TileRef::new(0, 0)),
            ));

        let names: Vec<&str> = map.used_tilesets().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_custom_dependencies_stop_at_gap() {
        let props = Properties::new()
            .with("CustomDependency0", PropertyValue::String("a".into()))
            .with("CustomDependency1", PropertyValue::String("b".into()))
            .with("CustomDependency2", PropertyValue::File("c".into()))
            .with("CustomDependency4", PropertyValue::String("ignored".into()));
        let map = Map::new("m", 16, 16).with_properties(props);

        assert_eq!(map.custom_dependencies(), vec!["a", "b", "c"]);
    }
}
