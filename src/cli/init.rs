//! Init command implementation.
//!
//! Generates a `tilex.yaml` manifest from discovered Tiled documents.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::error::{Result, TilexError};
use crate::export::ROOT_SENTINEL;
use crate::output::{display_path, plural, Printer};
use crate::project::{discover, Manifest, MANIFEST_FILENAME};

/// Initialize a tilex project by generating a tilex.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing tilex.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(TilexError::Export {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let project = discover(&args.path)?;
    let scan = &project.scan;

    // Folders holding documents, relative to the project root.
    let mut source_dirs = BTreeSet::new();
    for file in scan.tilesets.iter().chain(&scan.maps) {
        if let Some(parent) = file.parent() {
            let relative = parent.strip_prefix(&project.root).unwrap_or(parent);
            if relative == Path::new("") {
                source_dirs.insert(".".to_string());
            } else {
                source_dirs.insert(format!("{}/", relative.display()));
            }
        }
    }

    let mut manifest = Manifest {
        target: find_sentinel(&project.root),
        ..Default::default()
    };
    if !(source_dirs.is_empty() || (source_dirs.len() == 1 && source_dirs.contains("."))) {
        manifest.sources = source_dirs.iter().cloned().collect();
    }

    let yaml = serde_yaml::to_string(&manifest).map_err(|e| TilexError::Export {
        message: format!("Failed to serialize manifest: {}", e),
        help: None,
    })?;
    fs::write(&manifest_path, yaml).map_err(|e| TilexError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }
    match &manifest.target {
        Some(target) => printer.info("Target", &target.display().to_string()),
        None => printer.warning(
            "warning",
            &format!("no {} found; set `target` before exporting", ROOT_SENTINEL),
        ),
    }

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(scan.total(), "document", "documents")
        ),
    );

    Ok(())
}

/// First root sentinel below `root`, relative to it.
fn find_sentinel(root: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == ROOT_SENTINEL)
        .and_then(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
}
