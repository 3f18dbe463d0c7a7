//! Terminal output for the tilex CLI.
//!
//! Status lines follow Cargo: a right-aligned coloured verb, then the
//! message. Everything here goes to stderr so stdout stays free for
//! `validate --json` and shell completions.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::validation::{Diagnostic, Severity};

const VERB_WIDTH: usize = 12;

/// Colour of a status verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Green,
    Cyan,
    Yellow,
    Red,
    Dim,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Green => "\x1b[32m",
            Tone::Cyan => "\x1b[36m",
            Tone::Yellow => "\x1b[33m",
            Tone::Red => "\x1b[31m",
            Tone::Dim => "\x1b[2m",
        }
    }
}

/// Status printer; colour only when stderr is a terminal.
#[derive(Debug)]
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Work in progress, e.g. "   Exporting tiled/forest.tsx".
    pub fn status(&self, verb: &str, message: &str) {
        self.line(Tone::Green, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.line(Tone::Green, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.line(Tone::Cyan, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.line(Tone::Yellow, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.line(Tone::Red, verb, message);
    }

    /// Print one diagnostic, rustc style: `warning[code]: message`.
    pub fn diagnostic(&self, diagnostic: &Diagnostic) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", self.headline(diagnostic));
        if let Some(help) = &diagnostic.help {
            let _ = writeln!(stderr, "  {} {}", self.paint(Tone::Dim, false, "help:"), help);
        }
    }

    fn headline(&self, diagnostic: &Diagnostic) -> String {
        let tone = match diagnostic.severity {
            Severity::Error => Tone::Red,
            Severity::Warning => Tone::Yellow,
        };
        format!(
            "{}[{}]: {}",
            self.paint(tone, true, &diagnostic.severity.to_string()),
            diagnostic.code,
            diagnostic.message
        )
    }

    fn paint(&self, tone: Tone, bold: bool, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let weight = if bold { "\x1b[1m" } else { "" };
        format!("{weight}{}{text}\x1b[0m", tone.code())
    }

    fn line(&self, tone: Tone, verb: &str, message: &str) {
        let verb = self.paint(tone, true, &format!("{verb:>VERB_WIDTH$}"));
        let _ = writeln!(io::stderr().lock(), "{verb} {message}");
    }
}

/// `plural(1, "file", "files")` is "1 file", `plural(3, ...)` is "3 files".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let noun = if n == 1 { singular } else { pluralized };
    format!("{n} {noun}")
}

/// Path relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(r) if r.as_os_str().is_empty() => ".".to_string(),
        Some(r) => r.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::codes;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "map", "maps"), "0 maps");
        assert_eq!(plural(1, "map", "maps"), "1 map");
        assert_eq!(plural(5, "tileset", "tilesets"), "5 tilesets");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/tiled/forest.tsx");
        assert_eq!(display_path(p), "/nonexistent/tiled/forest.tsx");
    }

    #[test]
    fn test_display_path_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd), ".");
        assert_eq!(display_path(&cwd.join("a.tmx")), "a.tmx");
    }

    #[test]
    fn test_plain_headline() {
        let printer = Printer::plain();
        let diagnostic = Diagnostic::warning(codes::IMAGE_LAYER, "layer 'sky' skipped");
        assert_eq!(
            printer.headline(&diagnostic),
            "warning[tilex::export::image-layer]: layer 'sky' skipped"
        );
    }

    #[test]
    fn test_colored_headline() {
        let printer = Printer { color: true };
        let diagnostic = Diagnostic::error(codes::SCALE_DIVIDER, "bad");
        assert_eq!(
            printer.headline(&diagnostic),
            "\x1b[1m\x1b[31merror\x1b[0m[tilex::validate::scale-divider]: bad"
        );
    }
}
