//! Map command implementation.
//!
//! Exports each map as a level under `Levels/`.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::export::plan_map;
use crate::loader::load_map;
use crate::output::{display_path, plural, Printer};

/// Export maps as levels
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Map files (.tmx) to export
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Export target: the root sentinel file of the resources folder
    #[arg(long, short)]
    pub target: Option<PathBuf>,
}

pub fn run(args: MapArgs, printer: &Printer) -> Result<()> {
    let (target, settings) = super::resolve_export(args.target)?;

    for file in &args.files {
        printer.status("Exporting", &display_path(file));
        let map = load_map(file)?;
        let plan = plan_map(&map, &target, &settings)?;
        super::commit_plan(printer, file, &plan)?;
    }

    printer.success(
        "Finished",
        &format!(
            "{} into {}",
            plural(args.files.len(), "map", "maps"),
            display_path(target.root())
        ),
    );

    Ok(())
}
