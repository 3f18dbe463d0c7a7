//! Reading Tiled documents into the export model.
//!
//! `.tsx` tilesets and `.tmx` maps are parsed with the `tiled` crate and
//! converted into the plain values of [`crate::model`]. Everything the
//! exporters need is copied out, so nothing downstream depends on `tiled`.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, TilexError};
use crate::model::{
    CollisionShape, Image, Layer, LayerKind, Map, MapObject, Properties, PropertyValue, ShapeKind,
    TileDef, TileGrid, TileRef, Tileset,
};

/// Load a `.tsx` tileset.
pub fn load_tileset(path: impl AsRef<Path>) -> Result<Tileset> {
    let path = path.as_ref();
    let mut loader = tiled::Loader::new();
    let tileset = loader
        .load_tsx_tileset(path)
        .map_err(|e| load_error(path, e))?;

    Ok(convert_tileset(&tileset))
}

/// Load a `.tmx` map along with every tileset it references.
///
/// The map is named after the file stem.
pub fn load_map(path: impl AsRef<Path>) -> Result<Map> {
    let path = path.as_ref();
    let mut loader = tiled::Loader::new();
    let map = loader.load_tmx_map(path).map_err(|e| load_error(path, e))?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut converter = MapConverter::new(&map);
    let layers = map.layers().map(|l| converter.layer(&l)).collect();

    Ok(Map {
        name,
        class: map.user_type.clone().filter(|c| !c.is_empty()),
        tile_width: map.tile_width,
        tile_height: map.tile_height,
        tilesets: converter.tilesets,
        layers,
        properties: convert_properties(&map.properties),
    })
}

fn load_error(path: &Path, error: tiled::Error) -> TilexError {
    TilexError::Load {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn convert_tileset(tileset: &tiled::Tileset) -> Tileset {
    let mut converted = Tileset::new(&tileset.name, tileset.tile_width, tileset.tile_height)
        .with_spacing(tileset.spacing)
        .with_properties(convert_properties(&tileset.properties));

    if let Some(image) = &tileset.image {
        converted = converted.with_image(convert_image(image));
    }

    for (id, tile) in tileset.tiles() {
        let mut def = TileDef::new(id).with_properties(convert_properties(&tile.properties));
        if let Some(class) = tile.user_type.as_deref().filter(|c| !c.is_empty()) {
            def = def.with_class(class);
        }
        if let Some(image) = &tile.image {
            def = def.with_image(convert_image(image));
        }
        if let Some(collision) = &tile.collision {
            def = def.with_collision(
                collision
                    .object_data()
                    .iter()
                    .map(convert_collision_shape)
                    .collect(),
            );
        }
        converted.add_tile(def);
    }

    converted
}

fn convert_image(image: &tiled::Image) -> Image {
    Image::new(
        image.source.clone(),
        image.width.max(0) as u32,
        image.height.max(0) as u32,
    )
}

fn convert_collision_shape(object: &tiled::ObjectData) -> CollisionShape {
    let kind = match &object.shape {
        tiled::ObjectShape::Rect { width, height } => ShapeKind::Rectangle {
            width: *width as f64,
            height: *height as f64,
        },
        tiled::ObjectShape::Ellipse { width, height } => ShapeKind::Ellipse {
            width: *width as f64,
            height: *height as f64,
        },
        tiled::ObjectShape::Polygon { points } => ShapeKind::Polygon {
            points: points.len(),
        },
        tiled::ObjectShape::Polyline { points } => ShapeKind::Polyline {
            points: points.len(),
        },
        tiled::ObjectShape::Point(_, _) => ShapeKind::Point,
        tiled::ObjectShape::Text { .. } => ShapeKind::Text,
    };

    let mut shape = CollisionShape::new(object.id(), object.x as f64, object.y as f64, kind)
        .with_properties(convert_properties(&object.properties));
    shape.rotation = object.rotation as f64;
    shape
}

/// Converts one map, collecting template tilesets as they are met.
struct MapConverter {
    tilesets: Vec<Tileset>,
    /// Template tilesets already appended, with their index in `tilesets`.
    templates: Vec<(Arc<tiled::Tileset>, usize)>,
}

impl MapConverter {
    fn new(map: &tiled::Map) -> Self {
        Self {
            tilesets: map.tilesets().iter().map(|t| convert_tileset(t)).collect(),
            templates: Vec::new(),
        }
    }

    fn layer(&mut self, layer: &tiled::Layer) -> Layer {
        let kind = match layer.layer_type() {
            tiled::LayerType::Group(group) => {
                LayerKind::Group(group.layers().map(|l| self.layer(&l)).collect())
            }
            tiled::LayerType::Objects(objects) => {
                LayerKind::Objects(objects.objects().map(|o| self.object(&o)).collect())
            }
            tiled::LayerType::Tiles(tiles) => LayerKind::Tiles(convert_tile_layer(&tiles)),
            tiled::LayerType::Image(_) => LayerKind::Image,
        };

        Layer::new(layer.name.clone(), kind)
            .with_offset(layer.offset_x as f64, layer.offset_y as f64)
    }

    fn object(&mut self, object: &tiled::ObjectData) -> MapObject {
        let (width, height) = match &object.shape {
            tiled::ObjectShape::Rect { width, height }
            | tiled::ObjectShape::Ellipse { width, height } => (*width as f64, *height as f64),
            _ => (0.0, 0.0),
        };

        let mut converted =
            MapObject::new(object.id(), object.x as f64, object.y as f64, width, height)
                .with_rotation(object.rotation as f64);
        converted.name = object.name.clone();
        if !object.user_type.is_empty() {
            converted = converted.with_class(object.user_type.clone());
        }
        if let Some(tile) = object.tile_data() {
            let tileset = match tile.tileset_location() {
                tiled::TilesetLocation::Map(index) => *index,
                tiled::TilesetLocation::Template(tileset) => self.template_tileset(tileset),
            };
            converted = converted.with_tile(TileRef::new(tileset, tile.id()));
        }
        converted
    }

    /// Index of a tileset only reachable through an object template.
    fn template_tileset(&mut self, tileset: &Arc<tiled::Tileset>) -> usize {
        if let Some((_, index)) = self
            .templates
            .iter()
            .find(|(known, _)| Arc::ptr_eq(known, tileset))
        {
            return *index;
        }

        let index = self.tilesets.len();
        self.tilesets.push(convert_tileset(tileset));
        self.templates.push((Arc::clone(tileset), index));
        index
    }
}

fn convert_tile_layer(layer: &tiled::TileLayer) -> TileGrid {
    match layer {
        tiled::TileLayer::Finite(finite) => {
            let mut grid = TileGrid::new(finite.width(), finite.height());
            for x in 0..finite.width() as i32 {
                for y in 0..finite.height() as i32 {
                    if let Some(tile) = finite.get_tile(x, y) {
                        grid.set(x, y, TileRef::new(tile.tileset_index(), tile.id()));
                    }
                }
            }
            grid
        }
        tiled::TileLayer::Infinite(infinite) => {
            let (chunk_width, chunk_height) = (
                tiled::ChunkData::WIDTH as i32,
                tiled::ChunkData::HEIGHT as i32,
            );
            let mut grid = TileGrid::new(0, 0);
            for ((chunk_x, chunk_y), chunk) in infinite.chunks() {
                for local_x in 0..chunk_width {
                    for local_y in 0..chunk_height {
                        if let Some(tile) = chunk.get_tile(local_x, local_y) {
                            grid.set(
                                chunk_x * chunk_width + local_x,
                                chunk_y * chunk_height + local_y,
                                TileRef::new(tile.tileset_index(), tile.id()),
                            );
                        }
                    }
                }
            }
            grid
        }
    }
}

fn convert_properties(properties: &tiled::Properties) -> Properties {
    properties
        .iter()
        .map(|(name, value)| (name.clone(), convert_property(value)))
        .collect()
}

fn convert_property(value: &tiled::PropertyValue) -> PropertyValue {
    match value {
        tiled::PropertyValue::BoolValue(b) => PropertyValue::Bool(*b),
        tiled::PropertyValue::IntValue(i) => PropertyValue::Int(*i as i64),
        tiled::PropertyValue::FloatValue(f) => PropertyValue::Float(*f as f64),
        tiled::PropertyValue::StringValue(s) => PropertyValue::String(s.clone()),
        tiled::PropertyValue::FileValue(s) => PropertyValue::File(s.clone()),
        tiled::PropertyValue::ColorValue(c) => PropertyValue::Color(format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            c.alpha, c.red, c.green, c.blue
        )),
        tiled::PropertyValue::ObjectValue(id) => PropertyValue::Object(*id),
        tiled::PropertyValue::ClassValue { property_type, .. } => {
            PropertyValue::Class(property_type.clone())
        }
    }
}
