//! Sharpen Core
//!
//! Resilient, lossless syntax parser for C#.
//! This crate turns any text into a complete concrete syntax tree plus
//! positioned diagnostics: the tree always reproduces the input exactly,
//! missing tokens are synthesized and unexpected ones are kept as skipped
//! trivia.
//!
//! ```
//! use sharpen_core::{ParseOptions, parse};
//!
//! let source = "class C { void M() { var (a, b) = (1, 2) } }";
//! let parse = parse(source, &ParseOptions::default());
//!
//! assert_eq!(parse.full_text(), source);
//! assert_eq!(parse.diagnostics().len(), 1);
//! ```

pub mod config;
pub mod console; // Terminal console utilities for rich output
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod parser;
pub mod result;

// Configuration system
pub use config::{
    ConfigLoader, FilesConfiguration, OutputConfiguration, ParserConfiguration, SharpenConfig,
};
// Console utilities for rich terminal output
pub use console::{Color, Console};
pub use cst::{CSharpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use diagnostics::{
    Diagnostic, DiagnosticRenderer, ErrorCode, LineCol, LineIndex, OutputFormat, Severity,
};
pub use error::{ErrorKind, SharpenError};
pub use options::{Feature, LanguageVersion, ParseOptions, SourceCodeKind};
pub use parser::{CancellationCheck, Parse, parse, parse_with_cancellation};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with("sharpen=info");
}

/// Initialize tracing with `default_filter` unless `RUST_LOG` is set
pub fn init_tracing_with(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
