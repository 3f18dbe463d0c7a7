//! Map export: one level descriptor listing every classified placement.

use crate::error::Result;
use crate::model::{Layer, LayerKind, Map, MapObject, TileGrid};
use crate::validation::{codes, Diagnostic, ValidationResult};

use super::descriptor::{
    to_yaml, Component, Declaration, FolderDependency, LayerSetup, LocalTransform, Prototype,
    Transform2d,
};
use super::geometry::{Placement, Vec2};
use super::layers::flatten_layers;
use super::sink::ExportPlan;
use super::{tileset_dependency_path, ExportSettings, ExportTarget, FOLDER_DEPENDENCIES};

/// Hands out level object ids: 1, 2, 3, ... with no gaps.
#[derive(Debug)]
pub struct ObjectIds {
    next: u64,
}

impl ObjectIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for ObjectIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Plan the export of `map` without touching the filesystem.
pub fn plan_map(map: &Map, target: &ExportTarget, _settings: &ExportSettings) -> Result<ExportPlan> {
    let mut plan = ExportPlan::new();
    let name = map.export_name();
    let level = target.level_dir(name);

    plan.push_text(
        level.join(format!("{}.yaml", FOLDER_DEPENDENCIES)),
        to_yaml(&dependencies(map))?,
    );
    plan.push_text(
        level.join(format!("{}.declaration.yaml", name)),
        to_yaml(&Declaration::default())?,
    );

    let components = level_components(map, &mut plan.diagnostics);
    plan.push_text(
        level.join(format!("{}.body.yaml", name)),
        to_yaml(&components)?,
    );

    Ok(plan)
}

/// Plan and write the export of `map`.
pub fn export_map(map: &Map, target: &ExportTarget, settings: &ExportSettings) -> Result<ExportPlan> {
    let plan = plan_map(map, target, settings)?;
    plan.commit()?;
    Ok(plan)
}

/// Libraries of the used tilesets, then the map's custom dependencies.
pub fn dependencies(map: &Map) -> Vec<FolderDependency> {
    map.used_tilesets()
        .into_iter()
        .map(|tileset| tileset_dependency_path(&tileset.name))
        .chain(map.custom_dependencies())
        .map(|relative_path| FolderDependency { relative_path })
        .collect()
}

/// Component declarations of every placement, layer by layer.
pub fn level_components(map: &Map, diagnostics: &mut ValidationResult) -> Vec<Component> {
    let mut components = Vec::new();
    let mut ids = ObjectIds::new();

    for (layer_index, layer) in flatten_layers(&map.layers).into_iter().enumerate() {
        let placement = Placement {
            tile_width: map.tile_width as f64,
            tile_height: map.tile_height as f64,
            offset_x: layer.offset_x,
            offset_y: layer.offset_y,
        };

        match &layer.kind {
            LayerKind::Objects(objects) => {
                for object in objects {
                    let Some(class) = object_class(map, object) else {
                        continue;
                    };
                    let location =
                        placement.object(object.x, object.y, object.width, object.height);
                    push_instance(
                        &mut components,
                        ids.next_id(),
                        class,
                        location,
                        object.rotation,
                        layer_index,
                    );
                }
            }
            LayerKind::Tiles(grid) => {
                for (x, y, class) in classified_cells(map, grid) {
                    push_instance(
                        &mut components,
                        ids.next_id(),
                        class,
                        placement.cell(x, y),
                        0.0,
                        layer_index,
                    );
                }
            }
            LayerKind::Image => diagnostics.push(image_layer_diagnostic(map, layer)),
            // Flattening never yields groups.
            LayerKind::Group(_) => {}
        }
    }

    components
}

/// Exported class of an object: its tile's class first, then its own.
fn object_class<'a>(map: &'a Map, object: &'a MapObject) -> Option<&'a str> {
    object
        .tile
        .and_then(|tile| map.tile_class(tile))
        .or_else(|| object.class.as_deref().filter(|c| !c.is_empty()))
}

fn classified_cells<'a>(
    map: &'a Map,
    grid: &'a TileGrid,
) -> impl Iterator<Item = (i32, i32, &'a str)> + 'a {
    grid.occupied()
        .filter_map(move |(x, y, tile)| map.tile_class(tile).map(|class| (x, y, class)))
}

fn push_instance(
    components: &mut Vec<Component>,
    object_id: u64,
    class: &str,
    location: Vec2,
    rotation: f64,
    layer: usize,
) {
    components.push(Component::Transform2d(Transform2d {
        object_id,
        logical_local_transform: LocalTransform {
            translation: location,
            rotation,
        },
    }));
    components.push(Component::LayerSetup(LayerSetup { object_id, layer }));
    components.push(Component::Prototype(Prototype {
        object_id,
        descriptor_id: class.to_string(),
        request_immediate_fixed_assembly: false,
        request_immediate_normal_assembly: false,
    }));
}

fn image_layer_diagnostic(map: &Map, layer: &Layer) -> Diagnostic {
    Diagnostic::warning(
        codes::IMAGE_LAYER,
        format!(
            "Image layers are not supported yet! Layer '{}' of map '{}' is skipped",
            layer.name,
            map.export_name()
        ),
    )
    .with_help("Place the image as a tile object instead")
}
