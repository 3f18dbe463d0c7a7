//! Project discovery.
//!
//! Finds the Tiled documents of a project, either by scanning the whole
//! directory or by following the `sources` of a `tilex.yaml` manifest.
//!
//! # Example
//!
//! ```ignore
//! use tilex::project::discover;
//!
//! let project = discover("./game")?;
//! println!("Found {} tilesets", project.scan.tilesets.len());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use manifest::Manifest;
pub use scanner::{detect_document_kind, scan_directory, scan_sources, DocumentKind, ScanResult};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "tilex.yaml";

/// Result of discovering a project.
#[derive(Debug)]
pub struct Project {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no tilex.yaml was found).
    pub manifest: Manifest,

    /// Whether a tilex.yaml manifest was found.
    pub has_manifest: bool,

    pub scan: ScanResult,
}

impl Project {
    /// Export target from the manifest, resolved against the project root.
    pub fn target(&self) -> Option<PathBuf> {
        self.manifest.target.as_ref().map(|t| self.root.join(t))
    }
}

/// Discover Tiled documents in a project directory.
pub fn discover(root: impl AsRef<Path>) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let scan = scan_sources(&manifest.effective_sources(), &root, &manifest);

    Ok(Project {
        root,
        manifest,
        has_manifest,
        scan,
    })
}

/// Load the manifest of the current directory, if there is one.
pub fn local_manifest() -> Result<Option<Manifest>> {
    let path = Path::new(MANIFEST_FILENAME);
    if path.exists() {
        Manifest::load(path).map(Some)
    } else {
        Ok(None)
    }
}
