//! Build command implementation.
//!
//! Discovers a project and exports every tileset, then every map.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{Result, TilexError};
use crate::export::{plan_map, plan_tileset, ExportPlan};
use crate::loader::{load_map, load_tileset};
use crate::output::{display_path, plural, Printer};
use crate::project::discover;

/// Export every tileset and map of a project
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Export target, overriding the manifest's `target`
    #[arg(long, short)]
    pub target: Option<PathBuf>,
}

/// Counts of one build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub exported: usize,
    pub failed: usize,
    pub files: usize,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let summary = build(&args, printer)?;

    if summary.failed > 0 {
        return Err(TilexError::Export {
            message: format!(
                "{} could not be exported",
                plural(summary.failed, "document", "documents")
            ),
            help: Some("See the errors above".to_string()),
        });
    }

    Ok(())
}

/// Export the project; a document that fails to load or plan is reported
/// and skipped.
pub fn build(args: &BuildArgs, printer: &Printer) -> Result<BuildSummary> {
    printer.status("Scanning", &display_path(&args.path));
    let project = discover(&args.path)?;
    let settings = project.manifest.export_settings();
    let target =
        super::export_target(args.target.clone().or_else(|| project.target()), &settings)?;

    let mut summary = BuildSummary::default();

    for file in &project.scan.tilesets {
        let plan = load_tileset(file).and_then(|t| plan_tileset(&t, &target, &settings));
        export_one(printer, file, plan, &mut summary)?;
    }
    for file in &project.scan.maps {
        let plan = load_map(file).and_then(|m| plan_map(&m, &target, &settings));
        export_one(printer, file, plan, &mut summary)?;
    }

    printer.success(
        "Finished",
        &format!(
            "{} and {} into {} ({})",
            plural(project.scan.tilesets.len(), "tileset", "tilesets"),
            plural(project.scan.maps.len(), "map", "maps"),
            display_path(target.root()),
            plural(summary.files, "file", "files")
        ),
    );

    Ok(summary)
}

fn export_one(
    printer: &Printer,
    file: &Path,
    plan: Result<ExportPlan>,
    summary: &mut BuildSummary,
) -> Result<()> {
    printer.status("Exporting", &display_path(file));
    match plan {
        Ok(plan) => {
            summary.files += super::commit_plan(printer, file, &plan)?;
            summary.exported += 1;
        }
        Err(e) => {
            printer.error("error", &e.to_string());
            summary.failed += 1;
        }
    }
    Ok(())
}
