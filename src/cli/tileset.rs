//! Tileset command implementation.
//!
//! Exports each tileset as a prototype library under `Objects/`.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::export::plan_tileset;
use crate::loader::load_tileset;
use crate::output::{display_path, plural, Printer};

/// Export tilesets as prototype libraries
#[derive(Args, Debug)]
pub struct TilesetArgs {
    /// Tileset files (.tsx) to export
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Export target: the root sentinel file of the resources folder
    #[arg(long, short)]
    pub target: Option<PathBuf>,
}

pub fn run(args: TilesetArgs, printer: &Printer) -> Result<()> {
    let (target, settings) = super::resolve_export(args.target)?;

    let mut written = 0;
    for file in &args.files {
        printer.status("Exporting", &display_path(file));
        let tileset = load_tileset(file)?;
        let plan = plan_tileset(&tileset, &target, &settings)?;
        written += super::commit_plan(printer, file, &plan)?;
    }

    printer.success(
        "Finished",
        &format!(
            "{} into {}",
            plural(args.files.len(), "tileset", "tilesets"),
            display_path(target.root())
        ),
    );
    printer.info("Wrote", &plural(written, "file", "files"));

    Ok(())
}
