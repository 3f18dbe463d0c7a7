//! Planned output files and their commit to disk.
//!
//! Exporters compute every file up front into an [`ExportPlan`]. Committing
//! writes the files one at a time, each through a temporary sibling that is
//! renamed over the destination, so a file is either absent, the previous
//! version, or complete.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, TilexError};
use crate::validation::ValidationResult;

/// A file to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    /// Contents as text (lossy for binary files).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Everything one export call will write, plus what it had to skip.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    files: Vec<OutputFile>,
    pub diagnostics: ValidationResult,
}

impl ExportPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a text file. A later file with the same path replaces the earlier one
    /// in place, keeping the original write order.
    pub fn push_text(&mut self, path: impl Into<PathBuf>, text: String) {
        self.push(OutputFile {
            path: path.into(),
            contents: text.into_bytes(),
        });
    }

    /// Plan an empty placeholder file.
    pub fn push_empty(&mut self, path: impl Into<PathBuf>) {
        self.push(OutputFile {
            path: path.into(),
            contents: Vec::new(),
        });
    }

    fn push(&mut self, file: OutputFile) {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every planned file in order. Stops at the first failure; files
    /// committed before it stay in place.
    pub fn commit(&self) -> Result<usize> {
        for file in &self.files {
            commit_file(file)?;
        }
        Ok(self.files.len())
    }
}

fn commit_file(file: &OutputFile) -> Result<()> {
    let dir = match file.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&dir).map_err(|e| TilexError::Io {
        path: dir.clone(),
        message: format!("Failed to create directory: {}", e),
    })?;

    let io_error = |e: std::io::Error| TilexError::Io {
        path: file.path.clone(),
        message: format!("Failed to write file: {}", e),
    };

    let mut temp = NamedTempFile::new_in(&dir).map_err(io_error)?;
    temp.write_all(&file.contents).map_err(io_error)?;
    temp.flush().map_err(io_error)?;
    temp.persist(&file.path).map_err(|e| io_error(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_commit_creates_directories() {
        let dir = tempdir().unwrap();
        let mut plan = ExportPlan::new();
        plan.push_text(dir.path().join("a/b/c.yaml"), "parent: ''\n".to_string());
        plan.push_empty(dir.path().join("a/Deps.bin"));

        assert_eq!(plan.commit().unwrap(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("a/b/c.yaml")).unwrap(),
            "parent: ''\n"
        );
        assert_eq!(fs::metadata(dir.path().join("a/Deps.bin")).unwrap().len(), 0);
    }

    #[test]
    fn test_commit_overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("level.body.yaml");
        fs::write(&path, "stale contents that are longer than the new ones").unwrap();

        let mut plan = ExportPlan::new();
        plan.push_text(&path, "[]\n".to_string());
        plan.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_same_path_replaces_in_place() {
        let mut plan = ExportPlan::new();
        plan.push_text("a.yaml", "1".to_string());
        plan.push_text("b.yaml", "2".to_string());
        plan.push_text("a.yaml", "3".to_string());

        let paths: Vec<&Path> = plan.files().iter().map(|f| f.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("a.yaml"), Path::new("b.yaml")]);
        assert_eq!(plan.file(Path::new("a.yaml")).unwrap().text(), "3");
    }

    #[test]
    fn test_failed_commit_keeps_earlier_files() {
        let dir = tempdir().unwrap();
        // A regular file where a directory is needed makes the second write fail.
        fs::write(dir.path().join("blocker"), "").unwrap();

        let mut plan = ExportPlan::new();
        plan.push_text(dir.path().join("first.yaml"), "ok".to_string());
        plan.push_text(dir.path().join("blocker/second.yaml"), "no".to_string());
        plan.push_text(dir.path().join("third.yaml"), "never".to_string());

        assert!(plan.commit().is_err());
        assert!(dir.path().join("first.yaml").exists());
        assert!(!dir.path().join("third.yaml").exists());
    }
}
