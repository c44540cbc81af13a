//! Configuration system for sharpen
//!
//! Settings live in a small file next to the sources:
//! - `.sharpenrc.toml` - dotfile config (TOML)
//! - `.sharpenrc.json` - dotfile config (JSON)
//! - `sharpen.toml` - project config (TOML)
//!
//! When no explicit path is given, [`ConfigLoader`] searches from the working
//! directory up to the filesystem root and uses the first file it finds.
//! Every field is optional; command line flags take precedence over file
//! values.
//!
//! ## Example Configuration
//!
//! ```toml
//! [parser]
//! languageVersion = "12"
//! kind = "regular"
//!
//! [files]
//! exclude = ["bin", "obj"]
//!
//! [output]
//! format = "compact"
//! ```

pub mod loader;
mod sharpen_config;

pub use loader::ConfigLoader;
pub use sharpen_config::{
    FilesConfiguration, OutputConfiguration, ParserConfiguration, SharpenConfig,
};
