//! Project manifest (tilex.yaml) parsing.
//!
//! The manifest names the folders holding Tiled documents, the default
//! export target and the export tunables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TilexError};
use crate::export::ExportSettings;

/// Project manifest loaded from tilex.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directories to scan for `.tsx` and `.tmx` files.
    /// Defaults to the project root if empty.
    pub sources: Vec<String>,

    /// Default export target (the sentinel file inside the resources root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Required file name of the export target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,

    /// UV inset applied to atlas cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_epsilon: Option<f64>,

    /// Material referenced by generated material instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Uniform receiving the sprite texture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_uniform: Option<String>,

    /// Patterns to exclude from discovery.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

impl Manifest {
    /// Load manifest from a tilex.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TilexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TilexError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check tilex.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Get effective source paths, defaulting to the project root.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// Export settings with manifest overrides applied.
    pub fn export_settings(&self) -> ExportSettings {
        let defaults = ExportSettings::default();
        ExportSettings {
            sentinel: self.sentinel.clone().unwrap_or(defaults.sentinel),
            uv_epsilon: self.uv_epsilon.unwrap_or(defaults.uv_epsilon),
            material: self.material.clone().unwrap_or(defaults.material),
            texture_uniform: self
                .texture_uniform
                .clone()
                .unwrap_or(defaults.texture_uniform),
        }
    }
}

/// Simple glob matching: `*.ext`, `dir/*`, `**/dir/*`, or a plain substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix) || path.contains(&format!("/{}", suffix));
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("target: Resources/EmergenceResourcesRoot.stub").unwrap();

        assert_eq!(
            manifest.target,
            Some(PathBuf::from("Resources/EmergenceResourcesRoot.stub"))
        );
        assert!(manifest.sources.is_empty());
        assert!(manifest.sentinel.is_none());
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
sources:
  - tiled/
  - shared/
target: out/root.marker
sentinel: root.marker
uv_epsilon: 0.002
material: Unlit
texture_uniform: mainTexture
excludes:
  - "*.bak.tmx"
  - "**/backup/*"
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.sources, vec!["tiled/", "shared/"]);
        assert_eq!(manifest.target, Some(PathBuf::from("out/root.marker")));
        assert_eq!(manifest.excludes, vec!["*.bak.tmx", "**/backup/*"]);

        let settings = manifest.export_settings();
        assert_eq!(settings.sentinel, "root.marker");
        assert_eq!(settings.uv_epsilon, 0.002);
        assert_eq!(settings.material, "Unlit");
        assert_eq!(settings.texture_uniform, "mainTexture");
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.export_settings(), ExportSettings::default());
    }

    #[test]
    fn test_invalid_manifest() {
        let err = Manifest::parse("sources: 12\nuv_epsilon: [").unwrap_err();
        assert!(matches!(err, TilexError::Parse { .. }));
    }

    #[test]
    fn test_effective_sources() {
        let mut manifest = Manifest::default();
        assert_eq!(manifest.effective_sources(), vec!["."]);

        manifest.sources = vec!["tiled/".to_string()];
        assert_eq!(manifest.effective_sources(), vec!["tiled/"]);
    }

    #[test]
    fn test_is_excluded_extension() {
        let manifest = Manifest {
            excludes: vec!["*.bak.tmx".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("level.bak.tmx")));
        assert!(manifest.is_excluded(Path::new("maps/level.bak.tmx")));
        assert!(!manifest.is_excluded(Path::new("maps/level.tmx")));
    }

    #[test]
    fn test_is_excluded_directory() {
        let manifest = Manifest {
            excludes: vec!["**/backup/*".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("backup/old.tmx")));
        assert!(manifest.is_excluded(Path::new("tiled/backup/old.tsx")));
        assert!(!manifest.is_excluded(Path::new("tiled/forest.tsx")));
    }

    #[test]
    fn test_serialize_skips_unset_keys() {
        let manifest = Manifest {
            sources: vec!["tiled/".to_string()],
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&manifest).unwrap();
        assert_eq!(yaml, "sources:\n- tiled/\n");
    }
}
