//! File system scanner for Tiled documents.
//!
//! Recursively walks source folders collecting tilesets (`.tsx`) and maps
//! (`.tmx`).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// Kind of Tiled document, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Tileset,
    Map,
}

/// Result of scanning for Tiled documents. Paths are sorted per kind.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub tilesets: Vec<PathBuf>,
    pub maps: Vec<PathBuf>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.tilesets.len() + self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Record a single file; unknown extensions are ignored.
    pub fn add(&mut self, path: PathBuf) {
        match detect_document_kind(&path) {
            Some(DocumentKind::Tileset) => self.tilesets.push(path),
            Some(DocumentKind::Map) => self.maps.push(path),
            None => {}
        }
    }

    /// Merge another scan result into this one.
    pub fn merge(&mut self, other: ScanResult) {
        self.tilesets.extend(other.tilesets);
        self.maps.extend(other.maps);
        self.normalize();
    }

    fn normalize(&mut self) {
        self.tilesets.sort();
        self.tilesets.dedup();
        self.maps.sort();
        self.maps.dedup();
    }
}

/// Scan a directory for Tiled documents.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if manifest.is_excluded(relative) {
            continue;
        }
        result.add(entry.path().to_path_buf());
    }

    result.normalize();
    result
}

/// Scan every source path, relative ones against `base_path`.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        result.merge(scan_directory(&source_path, manifest));
    }

    result
}

/// Detect the document kind from a file path based on its extension.
pub fn detect_document_kind(path: &Path) -> Option<DocumentKind> {
    let extension = path.extension()?.to_str()?;

    if extension.eq_ignore_ascii_case("tsx") {
        Some(DocumentKind::Tileset)
    } else if extension.eq_ignore_ascii_case("tmx") {
        Some(DocumentKind::Map)
    } else {
        None
    }
}
