//! Engine descriptor documents.
//!
//! Every file the exporters write is one of these types serialized as YAML.
//! Field names follow the engine's schema (camelCase); component lists are
//! adjacently tagged as `- type: <Component>` / `content: {...}`.

use serde::{Serialize, Serializer};

use crate::error::{Result, TilexError};

use super::geometry::{UvRect, Vec2};

/// Object id of prototype bodies; bound by the engine when assembling.
pub const PROTOTYPE_OBJECT_ID: u64 = 0;

/// Uniform type tag for 2D textures.
pub const TEXTURE_UNIFORM_TYPE: u8 = 3;

/// One component declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content")]
pub enum Component {
    #[serde(rename = "Sprite2dComponent")]
    Sprite2d(Sprite2d),
    #[serde(rename = "RigidBody2dComponent")]
    RigidBody2d(RigidBody2d),
    #[serde(rename = "CollisionShape2dComponent")]
    CollisionShape2d(CollisionShape2d),
    #[serde(rename = "Transform2dComponent")]
    Transform2d(Transform2d),
    #[serde(rename = "LayerSetupComponent")]
    LayerSetup(LayerSetup),
    #[serde(rename = "PrototypeComponent")]
    Prototype(Prototype),
}

impl Component {
    /// Engine type name, as written in the `type:` key.
    pub fn type_name(&self) -> &'static str {
        match self {
            Component::Sprite2d(_) => "Sprite2dComponent",
            Component::RigidBody2d(_) => "RigidBody2dComponent",
            Component::CollisionShape2d(_) => "CollisionShape2dComponent",
            Component::Transform2d(_) => "Transform2dComponent",
            Component::LayerSetup(_) => "LayerSetupComponent",
            Component::Prototype(_) => "PrototypeComponent",
        }
    }

    pub fn object_id(&self) -> u64 {
        match self {
            Component::Sprite2d(c) => c.object_id,
            Component::RigidBody2d(c) => c.object_id,
            Component::CollisionShape2d(c) => c.object_id,
            Component::Transform2d(c) => c.object_id,
            Component::LayerSetup(c) => c.object_id,
            Component::Prototype(c) => c.object_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprite2d {
    pub object_id: u64,
    pub sprite_id: u64,
    pub material_instance_id: String,
    pub uv: UvRect,
    pub half_size: Vec2,
    pub layer: u32,
    pub visibility_mask: i64,
}

/// Body types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Static = 0,
    Kinematic = 1,
    Dynamic = 2,
}

impl Serialize for BodyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RigidBody2d {
    pub object_id: u64,
    #[serde(rename = "type")]
    pub body_type: BodyType,
}

/// Collision geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { half_extents: Vec2 },
    Circle { radius: f64 },
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Repr {
            #[serde(rename = "type")]
            kind: u8,
            #[serde(skip_serializing_if = "Option::is_none")]
            box_half_extents: Option<Vec2>,
            #[serde(skip_serializing_if = "Option::is_none")]
            circle_radius: Option<f64>,
        }

        let repr = match *self {
            Geometry::Box { half_extents } => Repr {
                kind: 0,
                box_half_extents: Some(half_extents),
                circle_radius: None,
            },
            Geometry::Circle { radius } => Repr {
                kind: 1,
                box_half_extents: None,
                circle_radius: Some(radius),
            },
        };
        repr.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionShape2d {
    pub object_id: u64,
    pub shape_id: u32,
    pub translation: Vec2,
    pub rotation: f64,
    pub geometry: Geometry,
    pub material_id: String,
    #[serde(serialize_with = "flag")]
    pub trigger: bool,
    pub collision_group: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalTransform {
    pub translation: Vec2,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform2d {
    pub object_id: u64,
    pub logical_local_transform: LocalTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSetup {
    pub object_id: u64,
    pub layer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prototype {
    pub object_id: u64,
    pub descriptor_id: String,
    #[serde(serialize_with = "flag")]
    pub request_immediate_fixed_assembly: bool,
    #[serde(serialize_with = "flag")]
    pub request_immediate_normal_assembly: bool,
}

/// `<Name>.declaration.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Declaration {
    pub parent: String,
}

/// `<Instance>.material.instance.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialInstance {
    pub material: String,
}

/// One entry of `<Instance>.uniform.values.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformValue {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub texture_id: String,
}

/// One entry of `ObjectFolderDependencies.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDependency {
    pub relative_path: String,
}

/// Booleans are written as 0/1.
fn flag<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Serialize a descriptor document to YAML text.
pub fn to_yaml<T: Serialize + ?Sized>(document: &T) -> Result<String> {
    serde_yaml::to_string(document).map_err(|e| TilexError::Export {
        message: format!("Failed to serialize descriptor: {}", e),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_component_is_adjacently_tagged() {
        let components = vec![Component::LayerSetup(LayerSetup {
            object_id: 4,
            layer: 2,
        })];
        let yaml = to_yaml(&components).unwrap();
        insta::assert_snapshot!(yaml, @r###"
        - type: LayerSetupComponent
          content:
            objectId: 4
            layer: 2
        "###);
    }

    #[test]
    fn test_prototype_flags_are_numeric() {
        let yaml = to_yaml(&vec![Component::Prototype(Prototype {
            object_id: 1,
            descriptor_id: "Player".into(),
            request_immediate_fixed_assembly: false,
            request_immediate_normal_assembly: true,
        })])
        .unwrap();

        let value = parse(&yaml);
        let content = &value[0]["content"];
        assert_eq!(value[0]["type"], "PrototypeComponent");
        assert_eq!(content["descriptorId"], "Player");
        assert_eq!(content["requestImmediateFixedAssembly"], 0);
        assert_eq!(content["requestImmediateNormalAssembly"], 1);
    }

    #[test]
    fn test_box_geometry() {
        let shape = CollisionShape2d {
            object_id: 0,
            shape_id: 3,
            translation: Vec2::new(0.0, 0.25),
            rotation: 0.0,
            geometry: Geometry::Box {
                half_extents: Vec2::new(0.5, 0.25),
            },
            material_id: "Default".into(),
            trigger: true,
            collision_group: 2,
        };
        let value = parse(&to_yaml(&shape).unwrap());

        assert_eq!(value["geometry"]["type"], 0);
        assert_eq!(value["geometry"]["boxHalfExtents"]["x"], 0.5);
        assert!(value["geometry"].get("circleRadius").is_none());
        assert_eq!(value["trigger"], 1);
        assert_eq!(value["collisionGroup"], 2);
        assert_eq!(value["materialId"], "Default");
    }

    #[test]
    fn test_circle_geometry() {
        let value = parse(&to_yaml(&Geometry::Circle { radius: 8.0 }).unwrap());
        assert_eq!(value["type"], 1);
        assert_eq!(value["circleRadius"], 8.0);
        assert!(value.get("boxHalfExtents").is_none());
    }

    #[test]
    fn test_rigid_body_type() {
        let value = parse(
            &to_yaml(&RigidBody2d {
                object_id: 0,
                body_type: BodyType::Static,
            })
            .unwrap(),
        );
        assert_eq!(value["type"], 0);
        assert_eq!(value["objectId"], 0);
    }

    #[test]
    fn test_uniform_values() {
        let yaml = to_yaml(&vec![UniformValue {
            name: "colorTexture".into(),
            kind: TEXTURE_UNIFORM_TYPE,
            texture_id: "ForestTiles.png".into(),
        }])
        .unwrap();
        insta::assert_snapshot!(yaml, @r###"
        - name: colorTexture
          type: 3
          textureId: ForestTiles.png
        "###);
    }

    #[test]
    fn test_type_name_matches_tag() {
        let component = Component::Transform2d(Transform2d {
            object_id: 9,
            logical_local_transform: LocalTransform {
                translation: Vec2::new(1.5, -0.5),
                rotation: 90.0,
            },
        });
        let value = parse(&to_yaml(&vec![component.clone()]).unwrap());

        assert_eq!(value[0]["type"], component.type_name());
        assert_eq!(component.object_id(), 9);
        let transform = &value[0]["content"]["logicalLocalTransform"];
        assert_eq!(transform["translation"]["x"], 1.5);
        assert_eq!(transform["rotation"], 90.0);
    }
}
