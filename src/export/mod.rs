//! Export of tilesets and maps to engine descriptors.
//!
//! Both exporters write below an export root chosen by pointing at a
//! sentinel file (`EmergenceResourcesRoot.stub` by default) inside it:
//!
//! ```text
//! <root>/MaterialInstances/<image>.material.instance.yaml
//! <root>/MaterialInstances/<image>.uniform.values.yaml
//! <root>/Objects/<tileset>/ObjectFolderDependencies.bin
//! <root>/Objects/<tileset>/<Class>.declaration.yaml
//! <root>/Objects/<tileset>/<Class>.body.yaml
//! <root>/Levels/<map>/ObjectFolderDependencies.yaml
//! <root>/Levels/<map>/<map>.declaration.yaml
//! <root>/Levels/<map>/<map>.body.yaml
//! ```
//!
//! Each export is planned in memory first ([`ExportPlan`]) and committed
//! afterwards, so a rejected target writes nothing.

pub mod descriptor;
pub mod geometry;
pub mod layers;
pub mod map;
pub mod sink;
pub mod tileset;

use std::path::{Path, PathBuf};

use crate::error::{Result, TilexError};

pub use layers::flatten_layers;
pub use map::{export_map, plan_map};
pub use sink::{ExportPlan, OutputFile};
pub use tileset::{export_tileset, plan_tileset};

/// Default name of the file marking the export root.
pub const ROOT_SENTINEL: &str = "EmergenceResourcesRoot.stub";

const MATERIAL_INSTANCES_DIR: &str = "MaterialInstances";
const OBJECTS_DIR: &str = "Objects";
const LEVELS_DIR: &str = "Levels";

/// Name of the per-folder dependency list.
pub const FOLDER_DEPENDENCIES: &str = "ObjectFolderDependencies";

/// Tunables shared by both exporters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Required file name of the export target.
    pub sentinel: String,
    /// UV inset applied to atlas cells.
    pub uv_epsilon: f64,
    /// Material referenced by generated material instances.
    pub material: String,
    /// Uniform receiving the sprite texture.
    pub texture_uniform: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sentinel: ROOT_SENTINEL.to_string(),
            uv_epsilon: geometry::UV_EPSILON,
            material: "Sprite".to_string(),
            texture_uniform: "colorTexture".to_string(),
        }
    }
}

/// A validated export target.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    path: PathBuf,
    root: PathBuf,
}

impl ExportTarget {
    /// Accept `path` only if its file name is `sentinel`.
    pub fn new(path: impl Into<PathBuf>, sentinel: &str) -> Result<Self> {
        let path = path.into();

        if path.file_name().and_then(|n| n.to_str()) != Some(sentinel) {
            return Err(TilexError::Target {
                path,
                sentinel: sentinel.to_string(),
            });
        }

        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { path, root })
    }

    /// The sentinel path as given.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the sentinel.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn material_instances_dir(&self) -> PathBuf {
        self.root.join(MATERIAL_INSTANCES_DIR)
    }

    /// Library folder of a tileset's prototypes.
    pub fn objects_dir(&self, tileset: &str) -> PathBuf {
        self.root.join(OBJECTS_DIR).join(tileset)
    }

    /// Folder of a level.
    pub fn level_dir(&self, map: &str) -> PathBuf {
        self.root.join(LEVELS_DIR).join(map)
    }
}

/// Dependency path of a tileset library, relative to a level folder.
pub fn tileset_dependency_path(tileset: &str) -> String {
    format!("../../{}/{}", OBJECTS_DIR, tileset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_accepts_sentinel() {
        let target = ExportTarget::new("game/Resources/EmergenceResourcesRoot.stub", ROOT_SENTINEL)
            .unwrap();
        assert_eq!(target.root(), Path::new("game/Resources"));
        assert_eq!(
            target.objects_dir("Forest"),
            Path::new("game/Resources/Objects/Forest")
        );
        assert_eq!(
            target.level_dir("Level1"),
            Path::new("game/Resources/Levels/Level1")
        );
    }

    #[test]
    fn test_target_rejects_other_names() {
        for bad in [
            "game/Resources/Root.stub",
            "game/Resources/EmergenceResourcesRoot.stub.bak",
            "game/Resources/",
        ] {
            let err = ExportTarget::new(bad, ROOT_SENTINEL).unwrap_err();
            assert!(matches!(err, TilexError::Target { .. }), "{bad} accepted");
        }
    }

    #[test]
    fn test_target_bare_sentinel_uses_current_dir() {
        let target = ExportTarget::new(ROOT_SENTINEL, ROOT_SENTINEL).unwrap();
        assert_eq!(target.root(), Path::new("."));
    }

    #[test]
    fn test_custom_sentinel() {
        assert!(ExportTarget::new("out/root.marker", "root.marker").is_ok());
        assert!(ExportTarget::new("out/root.marker", ROOT_SENTINEL).is_err());
    }

    #[test]
    fn test_tileset_dependency_path() {
        assert_eq!(tileset_dependency_path("Forest"), "../../Objects/Forest");
    }
}
