//! Diagnostic renderer with terminal, compact and JSON output

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Diagnostic, LineIndex, Severity};
use crate::console::{Color, Console};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text with a code frame
    #[default]
    Human,
    /// One line per diagnostic: `file:line:col: severity CODE: message`
    Compact,
    /// JSON array for programmatic consumption
    Json,
}

/// A diagnostic resolved against its file, as written in JSON output
#[derive(Debug, Serialize)]
struct LocatedDiagnostic<'a> {
    file: String,
    line: u32,
    column: u32,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

/// Renders diagnostics of one source file
pub struct DiagnosticRenderer {
    console: Console,
    output_format: OutputFormat,
}

impl DiagnosticRenderer {
    /// Human output with automatic terminal detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            output_format: OutputFormat::Human,
        }
    }

    /// Create a renderer with colors disabled
    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            output_format: OutputFormat::Human,
        }
    }

    /// Create a renderer with specific output format
    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Json => Console::no_colors(),
            OutputFormat::Human | OutputFormat::Compact => Console::new(),
        };

        Self {
            console,
            output_format: format,
        }
    }

    /// Disable colors regardless of the terminal
    pub fn without_colors(mut self) -> Self {
        self.console = Console::no_colors();
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.output_format
    }

    /// Render all diagnostics for `path`, whose contents are `source`
    pub fn render(&self, path: &Path, source: &str, diagnostics: &[Diagnostic]) -> String {
        let index = LineIndex::new(source);
        match self.output_format {
            OutputFormat::Human => diagnostics
                .iter()
                .map(|d| self.render_human(path, source, &index, d))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Compact => diagnostics
                .iter()
                .map(|d| self.render_compact(path, &index, d))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => self.render_json(path, &index, diagnostics),
        }
    }

    fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
            Severity::Hint => Color::Dim,
        }
    }

    /// Render the diagnostic header
    fn render_header(&self, diagnostic: &Diagnostic) -> String {
        let severity = format!("{:?}", diagnostic.severity).to_lowercase();
        format!(
            "{}{}: {}",
            self.console
                .colorize(&severity, Self::severity_color(diagnostic.severity)),
            self.console
                .colorize(&format!("[{}]", diagnostic.code.code()), Color::Dim),
            self.console.colorize(&diagnostic.message, Color::Bold)
        )
    }

    fn render_human(
        &self,
        path: &Path,
        source: &str,
        index: &LineIndex,
        diagnostic: &Diagnostic,
    ) -> String {
        let mut output = self.render_header(diagnostic);
        output.push('\n');

        let start = index.line_col(diagnostic.range.start());
        let end = index.line_col(diagnostic.range.end());
        output.push_str(&format!(
            "  {}─[{}:{}:{}]\n",
            self.console.colorize("┌", Color::Blue),
            path.display(),
            start.line + 1,
            start.col + 1
        ));

        let Some(line_text) = index.line_text(source, start.line) else {
            return output;
        };

        let gutter_width = format!("{}", start.line + 1).len();
        let highlight = Self::severity_color(diagnostic.severity);
        output.push_str(&format!(
            "{} {} {}\n",
            self.console.colorize(">", highlight),
            self.console
                .colorize(&format!("{:>gutter_width$}", start.line + 1), Color::Dim),
            line_text
        ));

        let caret_end = if end.line == start.line {
            end.col as usize
        } else {
            line_text.len()
        };
        let padding = char_width(line_text, 0, start.col as usize);
        let caret_len = char_width(line_text, start.col as usize, caret_end).max(1);
        output.push_str(&format!(
            "  {} {}{}\n",
            " ".repeat(gutter_width),
            " ".repeat(padding),
            self.console.colorize(&"^".repeat(caret_len), highlight)
        ));
        output
    }

    fn render_compact(&self, path: &Path, index: &LineIndex, diagnostic: &Diagnostic) -> String {
        let start = index.line_col(diagnostic.range.start());
        let severity = format!("{:?}", diagnostic.severity).to_lowercase();
        format!(
            "{}:{}:{}: {} {}: {}",
            path.display(),
            start.line + 1,
            start.col + 1,
            self.console
                .colorize(&severity, Self::severity_color(diagnostic.severity)),
            diagnostic.code.code(),
            diagnostic.message
        )
    }

    fn render_json(&self, path: &Path, index: &LineIndex, diagnostics: &[Diagnostic]) -> String {
        let located = Self::locate(path, index, diagnostics);
        serde_json::to_string_pretty(&located)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn locate<'d>(
        path: &Path,
        index: &LineIndex,
        diagnostics: &'d [Diagnostic],
    ) -> Vec<LocatedDiagnostic<'d>> {
        diagnostics
            .iter()
            .map(|diagnostic| {
                let start = index.line_col(diagnostic.range.start());
                LocatedDiagnostic {
                    file: path.display().to_string(),
                    line: start.line + 1,
                    column: start.col + 1,
                    diagnostic,
                }
            })
            .collect()
    }

    /// JSON objects for `diagnostics`, for callers that merge several files
    /// into one document
    pub fn json_values(
        path: &Path,
        source: &str,
        diagnostics: &[Diagnostic],
    ) -> Vec<serde_json::Value> {
        let index = LineIndex::new(source);
        Self::locate(path, &index, diagnostics)
            .iter()
            .filter_map(|located| serde_json::to_value(located).ok())
            .collect()
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Characters in `line[from..to]`; byte offsets past the line clamp to it
fn char_width(line: &str, from: usize, to: usize) -> usize {
    let to = to.min(line.len());
    let from = from.min(to);
    line.get(from..to).map_or(to - from, |s| s.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorCode;
    use rowan::TextRange;

    fn semicolon_at(offset: u32) -> Diagnostic {
        Diagnostic::new(
            ErrorCode::SemicolonExpected,
            TextRange::empty(offset.into()),
        )
    }

    #[test]
    fn test_render_compact() {
        let renderer = DiagnosticRenderer {
            console: Console::no_colors(),
            output_format: OutputFormat::Compact,
        };
        let out = renderer.render(Path::new("a.cs"), "int x\nint y;", &[semicolon_at(5)]);
        assert_eq!(out, "a.cs:1:6: error CS1002: ; expected");
    }

    #[test]
    fn test_render_human_code_frame() {
        let renderer = DiagnosticRenderer::no_colors();
        let out = renderer.render(Path::new("a.cs"), "x = (1;\n", &[semicolon_at(6)]);
        assert!(out.starts_with("error[CS1002]: ; expected"));
        assert!(out.contains("┌─[a.cs:1:7]"));
        assert!(out.contains("> 1 x = (1;"));
        assert!(out.contains("      ^"));
    }

    #[test]
    fn test_render_human_after_bare_carriage_return() {
        let renderer = DiagnosticRenderer::no_colors();
        let out = renderer.render(Path::new("a.cs"), "a;\rx = 1\r", &[semicolon_at(8)]);
        assert!(out.contains("┌─[a.cs:2:6]"), "{out}");
        assert!(out.contains("> 2 x = 1\n"), "{out}");
        assert!(!out.contains("a;"), "{out}");
    }

    #[test]
    fn test_render_human_caret_counts_characters() {
        let renderer = DiagnosticRenderer::no_colors();
        let source = "s = \"héllo\" x;";
        let diagnostic = Diagnostic::new(
            ErrorCode::SemicolonExpected,
            TextRange::new(13.into(), 14.into()),
        );
        let out = renderer.render(Path::new("a.cs"), source, &[diagnostic]);
        let caret_line = out.lines().last().unwrap();
        assert_eq!(caret_line, format!("    {}^", " ".repeat(12)));
    }

    #[test]
    fn test_render_json() {
        let renderer = DiagnosticRenderer::with_format(OutputFormat::Json);
        let out = renderer.render(Path::new("b.cs"), "a\nbc", &[semicolon_at(3)]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["file"], "b.cs");
        assert_eq!(value[0]["line"], 2);
        assert_eq!(value[0]["column"], 2);
        assert_eq!(value[0]["code"], "CS1002");
    }
}
