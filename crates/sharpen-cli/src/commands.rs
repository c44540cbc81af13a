//! CLI command implementations

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use rayon::prelude::*;
use sharpen_core::cst::lex_with_trivia;
use sharpen_core::{
    ConfigLoader, Diagnostic, FilesConfiguration, LanguageVersion, OutputFormat, Severity,
    SharpenConfig, parse,
};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::output::{OutputFormatter, ParseSummary};

/// Stack size of parser worker threads; deeply nested sources recurse deeply
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Everything `sharpen parse` was asked to do
pub struct ParseArgs {
    pub paths: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub lang_version: Option<LanguageVersion>,
    pub script: bool,
    pub tree: bool,
    pub error_on_warnings: bool,
    pub config_path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub use_colors: bool,
}

/// Result of parsing one file
pub struct FileReport {
    pub path: PathBuf,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    pub tree: Option<String>,
}

impl FileReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Parse command implementation
pub fn parse_command(args: ParseArgs) -> anyhow::Result<i32> {
    debug!("Running parse command on paths: {:?}", args.paths);

    for path in &args.paths {
        if !path.exists() {
            bail!("Path not found: {}", path.display());
        }
    }

    let config = load_config(args.config_path.as_deref(), &args.paths)?;
    let format = args
        .format
        .or(config.output.format)
        .unwrap_or_default();

    let files = discover_files(&args.paths, &config.files)?;
    info!("Parsing {} file(s)", files.len());

    let start_time = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.unwrap_or(0))
        .stack_size(PARSER_STACK_SIZE)
        .build()
        .context("Failed to build thread pool")?;

    let reports = pool.install(|| {
        files
            .par_iter()
            .map(|path| parse_file(path, &config, &args))
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let summary = ParseSummary::from_reports(&reports, start_time.elapsed());
    debug!("Parsed {} file(s) in {:?}", summary.files_parsed, summary.elapsed);

    OutputFormatter::new(format, args.use_colors).print_results(&reports, &summary)?;

    let failed = summary.errors > 0 || (args.error_on_warnings && summary.warnings > 0);
    Ok(if failed { 1 } else { 0 })
}

/// Explicit config path, otherwise discovery from the first input
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> anyhow::Result<SharpenConfig> {
    let start_dir = match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) => path.as_path(),
        None => Path::new("."),
    };
    Ok(ConfigLoader::load(config_path, Some(start_dir))?)
}

/// Files named on the command line are always parsed; directories are walked
/// for source extensions, skipping excluded directory names
pub fn discover_files(
    paths: &[PathBuf],
    files_config: &FilesConfiguration,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !files_config.is_excluded_dir(&entry.file_name().to_string_lossy())
        });
        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to walk directory {}", path.display()))?;
            if entry.file_type().is_file() && files_config.has_source_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn parse_file(path: &Path, config: &SharpenConfig, args: &ParseArgs) -> anyhow::Result<FileReport> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let source = String::from_utf8_lossy(&bytes).into_owned();

    let options = config.parse_options_for(path, args.lang_version, args.script);
    let parse = parse(&source, &options);
    debug!(
        "{}: {} diagnostic(s)",
        path.display(),
        parse.diagnostics().len()
    );

    Ok(FileReport {
        path: path.to_path_buf(),
        diagnostics: parse.diagnostics().to_vec(),
        tree: args.tree.then(|| parse.debug_tree()),
        source,
    })
}

/// Tokens command implementation
pub fn tokens_command(file: &Path) -> anyhow::Result<i32> {
    let source =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (tokens, errors) = lex_with_trivia(&source);

    for token in &tokens {
        println!(
            "{:?}@{}..{} {:?}",
            token.kind,
            token.span.start,
            token.span.end,
            token.text(&source)
        );
    }
    for error in &errors {
        eprintln!(
            "error[{}] at {}..{}: {}",
            error.code.code(),
            error.span.start,
            error.span.end,
            error.code.format(&error.args)
        );
    }
    Ok(0)
}
