//! Tileset export: one prototype descriptor per classified tile.

use std::collections::BTreeSet;

use crate::error::{Result, TilexError};
use crate::model::{CollisionShape, Image, ShapeKind, TileDef, Tileset, MASK_PROPERTY};
use crate::validation::{codes, Diagnostic, ValidationResult};

use super::descriptor::{
    to_yaml, BodyType, CollisionShape2d, Component, Declaration, Geometry, MaterialInstance,
    RigidBody2d, Sprite2d, UniformValue, PROTOTYPE_OBJECT_ID, TEXTURE_UNIFORM_TYPE,
};
use super::geometry::{
    box_half_extents, loose_half_size, shape_translation, AtlasLayout, UvRect, ATLAS_HALF_SIZE,
};
use super::sink::ExportPlan;
use super::{ExportSettings, ExportTarget, FOLDER_DEPENDENCIES};

const MATERIAL_PROPERTY: &str = "Material";
const TRIGGER_PROPERTY: &str = "Trigger";
const COLLISION_GROUP_PROPERTY: &str = "CollisionGroup";
const DEFAULT_MATERIAL: &str = "Default";

/// Plan the export of `tileset` without touching the filesystem.
pub fn plan_tileset(
    tileset: &Tileset,
    target: &ExportTarget,
    settings: &ExportSettings,
) -> Result<ExportPlan> {
    let mut plan = ExportPlan::new();
    let library = target.objects_dir(&tileset.name);
    let mut material_instances = BTreeSet::new();

    let atlas = match &tileset.image {
        Some(image) => {
            let layout = atlas_layout(tileset, image);
            if layout.columns() == 0 {
                return Err(TilexError::Validation {
                    message: format!(
                        "Tileset '{}': atlas image '{}' is narrower than one tile",
                        tileset.name,
                        image.file_name()
                    ),
                    help: Some("Check the tile size and the image dimensions".to_string()),
                });
            }
            plan_material_instance(&mut plan, &mut material_instances, target, settings, image)?;
            Some(layout)
        }
        None => None,
    };

    let scale_divider = scale_divider(tileset, &mut plan.diagnostics);

    plan.push_empty(library.join(format!("{}.bin", FOLDER_DEPENDENCIES)));

    for tile in tileset.exported_tiles() {
        let Some(class) = tile.exported_class() else {
            continue;
        };

        let (material_instance, uv, half_size) = match (&atlas, &tileset.image) {
            (Some(layout), Some(image)) => {
                let uv = layout
                    .uv(tile.id, settings.uv_epsilon)
                    .unwrap_or(UvRect::FULL);
                (image.base_name(), uv, ATLAS_HALF_SIZE)
            }
            _ => {
                let (width, height) = tileset.tile_size(tile);
                let instance = match &tile.image {
                    Some(image) => {
                        plan_material_instance(
                            &mut plan,
                            &mut material_instances,
                            target,
                            settings,
                            image,
                        )?;
                        image.base_name()
                    }
                    None => {
                        plan.diagnostics.warning(
                            codes::MISSING_IMAGE,
                            format!(
                                "Tile '{}' in loose-image tileset '{}' has no image",
                                class, tileset.name
                            ),
                        );
                        String::new()
                    }
                };
                (
                    instance,
                    UvRect::FULL,
                    loose_half_size(width, height, scale_divider),
                )
            }
        };

        let mut components = vec![Component::Sprite2d(Sprite2d {
            object_id: PROTOTYPE_OBJECT_ID,
            sprite_id: 0,
            material_instance_id: material_instance,
            uv,
            half_size,
            layer: 0,
            visibility_mask: tile.properties.int(MASK_PROPERTY).unwrap_or(1),
        })];
        components.extend(collision_components(
            tileset,
            tile,
            class,
            &mut plan.diagnostics,
        ));

        plan.push_text(
            library.join(format!("{}.declaration.yaml", class)),
            to_yaml(&Declaration::default())?,
        );
        plan.push_text(
            library.join(format!("{}.body.yaml", class)),
            to_yaml(&components)?,
        );
    }

    Ok(plan)
}

/// Plan and write the export of `tileset`.
pub fn export_tileset(
    tileset: &Tileset,
    target: &ExportTarget,
    settings: &ExportSettings,
) -> Result<ExportPlan> {
    let plan = plan_tileset(tileset, target, settings)?;
    plan.commit()?;
    Ok(plan)
}

fn atlas_layout(tileset: &Tileset, image: &Image) -> AtlasLayout {
    AtlasLayout {
        image_width: image.width,
        image_height: image.height,
        tile_width: tileset.tile_width,
        tile_height: tileset.tile_height,
        spacing: tileset.spacing,
    }
}

fn scale_divider(tileset: &Tileset, diagnostics: &mut ValidationResult) -> f64 {
    let divider = tileset.scale_divider();
    if tileset.is_atlas() || divider > 0.0 {
        return divider;
    }

    diagnostics.push(
        Diagnostic::error(
            codes::SCALE_DIVIDER,
            format!(
                "Tileset '{}': scale divider {} is not positive, using 1.0",
                tileset.name, divider
            ),
        )
        .with_help("Remove the property to use 1.0"),
    );
    1.0
}

/// Material instance pair for a sprite texture, planned once per instance name.
fn plan_material_instance(
    plan: &mut ExportPlan,
    planned: &mut BTreeSet<String>,
    target: &ExportTarget,
    settings: &ExportSettings,
    image: &Image,
) -> Result<()> {
    let name = image.base_name();
    if !planned.insert(name.clone()) {
        return Ok(());
    }

    let dir = target.material_instances_dir();
    plan.push_text(
        dir.join(format!("{}.material.instance.yaml", name)),
        to_yaml(&MaterialInstance {
            material: settings.material.clone(),
        })?,
    );
    plan.push_text(
        dir.join(format!("{}.uniform.values.yaml", name)),
        to_yaml(&vec![UniformValue {
            name: settings.texture_uniform.clone(),
            kind: TEXTURE_UNIFORM_TYPE,
            texture_id: image.file_name(),
        }])?,
    );
    Ok(())
}

/// Rigid body plus one collision shape per supported shape, or nothing
/// when the tile has no collision region.
pub fn collision_components(
    tileset: &Tileset,
    tile: &TileDef,
    class: &str,
    diagnostics: &mut ValidationResult,
) -> Vec<Component> {
    let Some(shapes) = &tile.collision else {
        return Vec::new();
    };

    let mut components = vec![Component::RigidBody2d(RigidBody2d {
        object_id: PROTOTYPE_OBJECT_ID,
        body_type: BodyType::Static,
    })];

    let (tile_width, tile_height) = tileset.tile_size(tile);

    for shape in shapes {
        let Some(geometry) = shape_geometry(shape, class, tile_width, tile_height, diagnostics)
        else {
            continue;
        };

        let (width, height) = shape.kind.size();
        components.push(Component::CollisionShape2d(CollisionShape2d {
            object_id: PROTOTYPE_OBJECT_ID,
            shape_id: shape.id,
            translation: shape_translation(
                shape.x,
                shape.y,
                width,
                height,
                tile_width,
                tile_height,
            ),
            rotation: shape.rotation,
            geometry,
            material_id: shape
                .properties
                .text(MATERIAL_PROPERTY)
                .unwrap_or_else(|| DEFAULT_MATERIAL.to_string()),
            trigger: shape.properties.bool(TRIGGER_PROPERTY).unwrap_or(false),
            collision_group: shape.properties.int(COLLISION_GROUP_PROPERTY).unwrap_or(0),
        }));
    }

    components
}

fn shape_geometry(
    shape: &CollisionShape,
    class: &str,
    tile_width: f64,
    tile_height: f64,
    diagnostics: &mut ValidationResult,
) -> Option<Geometry> {
    match shape.kind {
        ShapeKind::Rectangle { width, height } => Some(Geometry::Box {
            half_extents: box_half_extents(width, height, tile_width, tile_height),
        }),
        ShapeKind::Ellipse { width, height } if width == height => Some(Geometry::Circle {
            radius: width / 2.0,
        }),
        ShapeKind::Ellipse { width, height } => {
            diagnostics.push(
                Diagnostic::error(
                    codes::NON_CIRCULAR_ELLIPSE,
                    format!(
                        "Only circles are supported! Tile '{}' has a {}x{} ellipse (shape {})",
                        class, width, height, shape.id
                    ),
                )
                .with_help("Give the ellipse equal width and height"),
            );
            None
        }
        ref other => {
            diagnostics.push(
                Diagnostic::error(
                    codes::UNSUPPORTED_SHAPE,
                    format!(
                        "Only rectangle and ellipse collision shapes are supported! Tile '{}' has a {} (shape {})",
                        class,
                        other.name(),
                        shape.id
                    ),
                )
                .with_help("Replace the shape with rectangles or circles"),
            );
            None
        }
    }
}
