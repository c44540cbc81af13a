//! Sharpen CLI
//!
//! Command-line interface for the sharpen C# parser

mod commands;
mod output;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use sharpen_core::LanguageVersion;
use tracing::error;

#[derive(Parser)]
#[command(name = "sharpen")]
#[command(about = "sharpen: resilient, lossless C# parser")]
#[command(version = sharpen_core::VERSION)]
#[command(
    long_about = "sharpen parses C# sources into a full-fidelity syntax tree and reports\n\
syntax diagnostics. Every input produces a tree, however broken the text is.\n\
\n\
Examples:\n  \
sharpen parse src/                   # Parse every .cs file under src/\n  \
sharpen parse Program.cs --tree      # Print the syntax tree\n  \
sharpen parse a.cs --lang-version 7.3\n  \
sharpen tokens Program.cs            # Dump the token stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.sharpenrc.toml/.sharpenrc.json/sharpen.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse C# files and report syntax diagnostics
    #[command(alias = "check")]
    Parse {
        /// Files or directories to parse
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, help = "Output format for diagnostics")]
        format: Option<OutputFormat>,

        /// Language version
        #[arg(
            short = 'l',
            long,
            help = "Language version such as 7.3, latest or preview"
        )]
        lang_version: Option<LanguageVersion>,

        /// Parse as a script
        #[arg(long, help = "Parse sources as scripts (.csx files always are)")]
        script: bool,

        /// Print the syntax tree of each file
        #[arg(long, help = "Print the syntax tree of each file")]
        tree: bool,

        /// Exit with non-zero code on warnings too
        #[arg(long, help = "Exit with non-zero code on warnings too")]
        error_on_warnings: bool,
    },

    /// Print the tokens of a file, trivia included
    Tokens {
        /// File to tokenize
        file: PathBuf,
    },

    /// Show version information
    Version {
        /// Show detailed build information
        #[arg(long)]
        detailed: bool,
    },
}

/// Output formats accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors and a code frame
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// One line per diagnostic
    Compact,
}

impl From<OutputFormat> for sharpen_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => sharpen_core::OutputFormat::Human,
            OutputFormat::Json => sharpen_core::OutputFormat::Json,
            OutputFormat::Compact => sharpen_core::OutputFormat::Compact,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "sharpen=error", // Only errors by default
        1 => "sharpen=warn",
        2 => "sharpen=info",
        3 => "sharpen=debug",
        _ => "sharpen=trace",
    };
    sharpen_core::init_tracing_with(log_level);

    let use_colors = !cli.no_color && std::env::var_os("NO_COLOR").is_none();

    match run_command(cli, use_colors) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("sharpen failed: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

/// Runs the selected command and returns the process exit code
fn run_command(cli: Cli, use_colors: bool) -> anyhow::Result<i32> {
    match cli.command {
        Some(Commands::Parse {
            paths,
            format,
            lang_version,
            script,
            tree,
            error_on_warnings,
        }) => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            commands::parse_command(commands::ParseArgs {
                paths,
                format: format.map(Into::into),
                lang_version,
                script,
                tree,
                error_on_warnings,
                config_path: cli.config,
                threads: cli.threads,
                use_colors,
            })
        }

        Some(Commands::Tokens { file }) => commands::tokens_command(&file),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("sharpen {}", sharpen_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Latest language version: {}", LanguageVersion::LATEST);
            } else {
                println!("{}", sharpen_core::VERSION);
            }
            Ok(0)
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(0)
        }
    }
}
