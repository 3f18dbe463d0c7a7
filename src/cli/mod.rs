pub mod build;
pub mod completions;
pub mod init;
pub mod map;
pub mod tileset;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::{Result, TilexError};
use crate::export::{ExportPlan, ExportSettings, ExportTarget};
use crate::output::{display_path, plural, Printer};
use crate::project::local_manifest;
use crate::validation::print_diagnostics;

/// tilex - Export Tiled maps and tilesets to engine assembly descriptors
#[derive(Parser, Debug)]
#[command(name = "tilex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export tilesets (.tsx) as prototype libraries
    Tileset(tileset::TilesetArgs),

    /// Export maps (.tmx) as levels
    Map(map::MapArgs),

    /// Export every tileset and map of a project
    Build(build::BuildArgs),

    /// Check tilesets and maps without writing anything
    Validate(validate::ValidateArgs),

    /// Initialize a tilex project (generates tilex.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Resolve the export target of a single-file command: `--target` first,
/// then the `target` of ./tilex.yaml.
pub(crate) fn resolve_export(target: Option<PathBuf>) -> Result<(ExportTarget, ExportSettings)> {
    let manifest = local_manifest()?.unwrap_or_default();
    let settings = manifest.export_settings();
    let target = export_target(target.or_else(|| manifest.target.clone()), &settings)?;
    Ok((target, settings))
}

/// Validate a target path against the configured sentinel.
pub(crate) fn export_target(
    path: Option<PathBuf>,
    settings: &ExportSettings,
) -> Result<ExportTarget> {
    match path {
        Some(path) => ExportTarget::new(path, &settings.sentinel),
        None => Err(missing_target(&settings.sentinel)),
    }
}

fn missing_target(sentinel: &str) -> TilexError {
    TilexError::Export {
        message: "No export target given".to_string(),
        help: Some(format!(
            "Pass --target <resources>/{} or set `target` in tilex.yaml",
            sentinel
        )),
    }
}

/// Print a plan's diagnostics, write its files and report the count.
pub(crate) fn commit_plan(printer: &Printer, source: &Path, plan: &ExportPlan) -> Result<usize> {
    print_diagnostics(printer, &plan.diagnostics);
    let written = plan.commit()?;
    printer.success(
        "Exported",
        &format!(
            "{} ({})",
            display_path(source),
            plural(written, "file", "files")
        ),
    );
    Ok(written)
}

/// Manifest settings for commands that do not take a project directory.
pub(crate) fn local_settings() -> Result<ExportSettings> {
    Ok(local_manifest()?.unwrap_or_default().export_settings())
}
