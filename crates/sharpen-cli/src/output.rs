//! Output formatting and reporting

use std::time::Duration;

use sharpen_core::{Color, Console, DiagnosticRenderer, OutputFormat, Severity};

use crate::commands::FileReport;

/// Summary statistics for a parse run
#[derive(Debug, Clone, Default)]
pub struct ParseSummary {
    pub files_parsed: usize,
    pub files_with_errors: usize,
    pub errors: usize,
    pub warnings: usize,
    pub elapsed: Duration,
}

impl ParseSummary {
    pub fn from_reports(reports: &[FileReport], elapsed: Duration) -> Self {
        let mut summary = Self {
            files_parsed: reports.len(),
            elapsed,
            ..Self::default()
        };
        for report in reports {
            let errors = report.count(Severity::Error);
            summary.errors += errors;
            summary.warnings += report.count(Severity::Warning);
            if errors > 0 {
                summary.files_with_errors += 1;
            }
        }
        summary
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    console: Console,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        let console = if use_colors && format != OutputFormat::Json {
            Console::new()
        } else {
            Console::no_colors()
        };
        Self { format, console }
    }

    fn renderer(&self) -> DiagnosticRenderer {
        let renderer = DiagnosticRenderer::with_format(self.format);
        if self.console.is_color_enabled() {
            renderer
        } else {
            renderer.without_colors()
        }
    }

    /// Format and print parse results
    pub fn print_results(
        &self,
        reports: &[FileReport],
        summary: &ParseSummary,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => self.print_human_format(reports, summary),
            OutputFormat::Compact => self.print_compact_format(reports, summary),
            OutputFormat::Json => self.print_json_format(reports, summary),
        }
    }

    fn print_trees(reports: &[FileReport]) {
        for report in reports {
            if let Some(tree) = &report.tree {
                println!("{}", report.path.display());
                print!("{tree}");
            }
        }
    }

    fn print_human_format(
        &self,
        reports: &[FileReport],
        summary: &ParseSummary,
    ) -> anyhow::Result<()> {
        Self::print_trees(reports);

        let renderer = self.renderer();
        for report in reports.iter().filter(|r| !r.diagnostics.is_empty()) {
            println!(
                "{}",
                renderer.render(&report.path, &report.source, &report.diagnostics)
            );
        }

        self.print_summary_human(summary);
        Ok(())
    }

    fn print_summary_human(&self, summary: &ParseSummary) {
        println!("{}", self.console.colorize("Summary:", Color::Bold));
        println!("  Files parsed: {}", summary.files_parsed);

        if summary.has_issues() {
            println!("  Issues found:");
            if summary.errors > 0 {
                println!(
                    "    Errors: {} in {} file(s)",
                    self.console.colorize(&summary.errors.to_string(), Color::Red),
                    summary.files_with_errors
                );
            }
            if summary.warnings > 0 {
                println!(
                    "    Warnings: {}",
                    self.console
                        .colorize(&summary.warnings.to_string(), Color::Yellow)
                );
            }
        } else {
            println!("  {}", self.console.colorize("No issues found", Color::Green));
        }
        println!(
            "  {}",
            self.console.colorize(
                &format!("Finished in {:.2?}", summary.elapsed),
                Color::Dim
            )
        );
    }

    fn print_compact_format(
        &self,
        reports: &[FileReport],
        summary: &ParseSummary,
    ) -> anyhow::Result<()> {
        Self::print_trees(reports);

        let renderer = self.renderer();
        for report in reports.iter().filter(|r| !r.diagnostics.is_empty()) {
            println!(
                "{}",
                renderer.render(&report.path, &report.source, &report.diagnostics)
            );
        }
        println!(
            "{} file(s), {} error(s), {} warning(s)",
            summary.files_parsed, summary.errors, summary.warnings
        );
        Ok(())
    }

    fn print_json_format(
        &self,
        reports: &[FileReport],
        summary: &ParseSummary,
    ) -> anyhow::Result<()> {
        let diagnostics: Vec<serde_json::Value> = reports
            .iter()
            .flat_map(|r| DiagnosticRenderer::json_values(&r.path, &r.source, &r.diagnostics))
            .collect();

        let mut result = serde_json::json!({
            "files_parsed": summary.files_parsed,
            "diagnostics": diagnostics,
            "summary": {
                "errors": summary.errors,
                "warnings": summary.warnings,
                "files_with_errors": summary.files_with_errors,
            }
        });

        let trees: Vec<serde_json::Value> = reports
            .iter()
            .filter_map(|r| {
                r.tree.as_ref().map(|tree| {
                    serde_json::json!({ "file": r.path.display().to_string(), "tree": tree })
                })
            })
            .collect();
        if !trees.is_empty() {
            result["trees"] = serde_json::Value::Array(trees);
        }

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }
}
