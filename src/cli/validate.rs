//! Validate command implementation.
//!
//! Loads each document and plans its export without writing, then reports
//! the checks and every element the export would skip.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::error::{Result, TilexError};
use crate::export::{plan_map, plan_tileset, ExportPlan, ExportSettings, ExportTarget};
use crate::loader::{load_map, load_tileset};
use crate::output::{display_path, plural, Printer};
use crate::project::{detect_document_kind, DocumentKind};
use crate::validation::{print_diagnostics, validate_map, validate_tileset, ValidationResult};

/// Check tilesets and maps without writing anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files to validate (.tsx or .tmx)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print diagnostics as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Diagnostics of one document.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub diagnostics: ValidationResult,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let settings = super::local_settings()?;

    let mut reports = Vec::new();
    for file in &args.files {
        if !args.json {
            printer.status("Checking", &display_path(file));
        }
        let report = check_file(file, &settings)?;
        if !args.json {
            print_diagnostics(printer, &report.diagnostics);
        }
        reports.push(report);
    }

    let errors: usize = reports.iter().map(|r| r.diagnostics.error_count()).sum();
    let warnings: usize = reports.iter().map(|r| r.diagnostics.warning_count()).sum();

    if args.json {
        let json = serde_json::to_string_pretty(&reports).map_err(|e| TilexError::Export {
            message: format!("Failed to serialize diagnostics: {}", e),
            help: None,
        })?;
        println!("{}", json);
    } else {
        printer.info(
            "Checked",
            &format!(
                "{}: {}, {}",
                plural(reports.len(), "file", "files"),
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
        );
    }

    if errors > 0 {
        return Err(TilexError::Validation {
            message: format!("{} found", plural(errors, "error", "errors")),
            help: None,
        });
    }

    Ok(())
}

/// Run the checks of one document and collect the diagnostics of a dry-run export.
pub fn check_file(path: &Path, settings: &ExportSettings) -> Result<FileReport> {
    // Never committed; only the diagnostics of the plan are kept.
    let scratch = ExportTarget::new(&settings.sentinel, &settings.sentinel)?;

    let diagnostics = match detect_document_kind(path) {
        Some(DocumentKind::Tileset) => {
            let tileset = load_tileset(path)?;
            with_plan(
                validate_tileset(&tileset),
                plan_tileset(&tileset, &scratch, settings),
            )?
        }
        Some(DocumentKind::Map) => {
            let map = load_map(path)?;
            with_plan(validate_map(&map), plan_map(&map, &scratch, settings))?
        }
        None => {
            return Err(TilexError::Validation {
                message: format!("{} is not a tileset or a map", path.display()),
                help: Some("Expected a .tsx or .tmx file".to_string()),
            })
        }
    };

    Ok(FileReport {
        file: path.to_path_buf(),
        diagnostics,
    })
}

/// Merge a plan's diagnostics. A failed plan is already covered when the
/// checks reported an error.
fn with_plan(mut checks: ValidationResult, plan: Result<ExportPlan>) -> Result<ValidationResult> {
    match plan {
        Ok(plan) => checks.merge(plan.diagnostics),
        Err(_) if checks.has_errors() => {}
        Err(e) => return Err(e),
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::codes;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_check_file_collects_checks_and_skips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shapes.tsx");
        fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" name="Shapes" tilewidth="32" tileheight="32" tilecount="2" columns="2">
 <image source="shapes.png" width="64" height="32"/>
 <tile id="0" type="Barrel">
  <objectgroup draworder="index" id="2">
   <object id="1" x="0" y="0" width="40" height="30">
    <ellipse/>
   </object>
  </objectgroup>
 </tile>
 <tile id="1" type="Barrel"/>
</tileset>
"#,
        )
        .unwrap();

        let report = check_file(&path, &ExportSettings::default()).unwrap();

        assert_eq!(
            report
                .diagnostics
                .with_code(codes::NON_CIRCULAR_ELLIPSE)
                .count(),
            1
        );
        assert_eq!(report.diagnostics.with_code(codes::DUPLICATE_CLASS).count(), 1);
        assert_eq!(report.diagnostics.error_count(), 1);
        assert_eq!(report.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_check_file_rejects_other_files() {
        let err = check_file(Path::new("notes.txt"), &ExportSettings::default()).unwrap_err();
        assert!(matches!(err, TilexError::Validation { .. }));
    }

    #[test]
    fn test_failed_plan_covered_by_checks() {
        let mut checks = ValidationResult::new();
        checks.error(codes::ATLAS_COLUMNS, "too narrow");
        let plan = Err(TilexError::Validation {
            message: "zero columns".to_string(),
            help: None,
        });

        let merged = with_plan(checks, plan).unwrap();
        assert_eq!(merged.error_count(), 1);

        let plan = Err(TilexError::Validation {
            message: "zero columns".to_string(),
            help: None,
        });
        assert!(with_plan(ValidationResult::new(), plan).is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let mut diagnostics = ValidationResult::new();
        diagnostics.warning(codes::IMAGE_LAYER, "sky skipped");
        let report = FileReport {
            file: PathBuf::from("level.tmx"),
            diagnostics,
        };

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "level.tmx");
        assert_eq!(json["diagnostics"][0]["code"], codes::IMAGE_LAYER);
    }
}
