//! Configuration types for sharpen

use serde::{Deserialize, Serialize};

use crate::diagnostics::OutputFormat;
use crate::options::{LanguageVersion, ParseOptions, SourceCodeKind};

/// Root of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SharpenConfig {
    pub parser: ParserConfiguration,
    pub files: FilesConfiguration,
    pub output: OutputConfiguration,
}

/// How sources are parsed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ParserConfiguration {
    /// Language version such as `"7.3"`, `"latest"` or `"preview"`
    pub language_version: Option<LanguageVersion>,

    /// `"regular"` or `"script"`
    pub kind: Option<SourceCodeKind>,
}

/// Which files a directory walk visits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FilesConfiguration {
    /// File extensions parsed when walking a directory, without the dot
    pub extensions: Vec<String>,

    /// Directory names never descended into
    pub exclude: Vec<String>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            extensions: vec!["cs".to_string(), "csx".to_string()],
            exclude: vec!["bin".to_string(), "obj".to_string(), ".git".to_string()],
        }
    }
}

impl FilesConfiguration {
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }

    pub fn has_source_extension(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// How diagnostics are reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputConfiguration {
    pub format: Option<OutputFormat>,
}

impl SharpenConfig {
    /// Parse options from the file, with `version` and `script` taking
    /// precedence when given
    pub fn parse_options(
        &self,
        version: Option<LanguageVersion>,
        script: bool,
    ) -> ParseOptions {
        let language_version = version
            .or(self.parser.language_version)
            .unwrap_or_default();
        let kind = if script {
            SourceCodeKind::Script
        } else {
            self.parser.kind.unwrap_or_default()
        };
        ParseOptions::new(language_version, kind)
    }

    /// `.csx` files are scripts regardless of the configured kind
    pub fn parse_options_for(
        &self,
        path: &std::path::Path,
        version: Option<LanguageVersion>,
        script: bool,
    ) -> ParseOptions {
        let is_csx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csx"));
        self.parse_options(version, script || is_csx)
    }
}
