use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tilex operations
#[derive(Error, Diagnostic, Debug)]
pub enum TilexError {
    #[error("IO error: {0}")]
    #[diagnostic(code(tilex::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tilex::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to load {path}: {message}")]
    #[diagnostic(code(tilex::load))]
    Load {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(tilex::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Incorrect save name {path}: {sentinel} file expected")]
    #[diagnostic(
        code(tilex::target),
        help("Export into a file named {sentinel} at the root of the resources folder")
    )]
    Target {
        path: std::path::PathBuf,
        sentinel: String,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(tilex::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Export error: {message}")]
    #[diagnostic(code(tilex::export))]
    Export {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, TilexError>;
