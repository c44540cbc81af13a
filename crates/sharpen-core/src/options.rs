//! Parse options: language version and source kind
//!
//! `ParseOptions` is an immutable bundle handed to every parse. The language
//! version gates which productions are recognised at all (a newer construct
//! parsed under an older version still produces its tree shape plus a
//! `FeatureNotAvailable` diagnostic), and the source kind decides what is
//! legal at the top level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SharpenError;

/// A C# language edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageVersion {
    CSharp1,
    CSharp2,
    CSharp3,
    CSharp4,
    CSharp5,
    CSharp6,
    CSharp7,
    CSharp7_1,
    CSharp7_2,
    CSharp7_3,
    CSharp8,
    CSharp9,
    CSharp10,
    CSharp11,
    CSharp12,
    CSharp13,
    CSharp14,
    Preview,
}

impl LanguageVersion {
    /// The newest released edition
    pub const LATEST: LanguageVersion = LanguageVersion::CSharp14;

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageVersion::CSharp1 => "1",
            LanguageVersion::CSharp2 => "2",
            LanguageVersion::CSharp3 => "3",
            LanguageVersion::CSharp4 => "4",
            LanguageVersion::CSharp5 => "5",
            LanguageVersion::CSharp6 => "6",
            LanguageVersion::CSharp7 => "7.0",
            LanguageVersion::CSharp7_1 => "7.1",
            LanguageVersion::CSharp7_2 => "7.2",
            LanguageVersion::CSharp7_3 => "7.3",
            LanguageVersion::CSharp8 => "8.0",
            LanguageVersion::CSharp9 => "9.0",
            LanguageVersion::CSharp10 => "10.0",
            LanguageVersion::CSharp11 => "11.0",
            LanguageVersion::CSharp12 => "12.0",
            LanguageVersion::CSharp13 => "13.0",
            LanguageVersion::CSharp14 => "14.0",
            LanguageVersion::Preview => "preview",
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageVersion {
    type Err = SharpenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let version = match normalized.as_str() {
            "1" | "1.0" | "iso-1" => LanguageVersion::CSharp1,
            "2" | "2.0" | "iso-2" => LanguageVersion::CSharp2,
            "3" | "3.0" => LanguageVersion::CSharp3,
            "4" | "4.0" => LanguageVersion::CSharp4,
            "5" | "5.0" => LanguageVersion::CSharp5,
            "6" | "6.0" => LanguageVersion::CSharp6,
            "7" | "7.0" => LanguageVersion::CSharp7,
            "7.1" => LanguageVersion::CSharp7_1,
            "7.2" => LanguageVersion::CSharp7_2,
            "7.3" => LanguageVersion::CSharp7_3,
            "8" | "8.0" => LanguageVersion::CSharp8,
            "9" | "9.0" => LanguageVersion::CSharp9,
            "10" | "10.0" => LanguageVersion::CSharp10,
            "11" | "11.0" => LanguageVersion::CSharp11,
            "12" | "12.0" => LanguageVersion::CSharp12,
            "13" | "13.0" => LanguageVersion::CSharp13,
            "14" | "14.0" | "latest" | "latestmajor" | "default" => LanguageVersion::CSharp14,
            "preview" => LanguageVersion::Preview,
            _ => return Err(SharpenError::invalid_language_version(s)),
        };
        Ok(version)
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = SharpenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageVersion> for String {
    fn from(version: LanguageVersion) -> Self {
        version.as_str().to_string()
    }
}

/// Whether the text is a regular compilation unit or a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCodeKind {
    #[default]
    Regular,
    Script,
}

/// A language feature gated by [`LanguageVersion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Tuples,
    Deconstruction,
    PatternMatching,
    LocalFunctions,
    OutVariables,
    ThrowExpression,
    DefaultLiteral,
    Ranges,
    SwitchExpression,
    CoalescingAssignment,
    TopLevelStatements,
    Records,
    PatternCombinators,
    RelationalPatterns,
    TargetTypedNew,
    StaticLambdas,
    RecordStructs,
    FileScopedNamespaces,
    GlobalUsing,
    RawStringLiterals,
    ListPatterns,
    CollectionExpressions,
    PrimaryConstructors,
    ExtensionBlocks,
}

impl Feature {
    /// First edition in which the feature is available
    pub fn required_version(self) -> LanguageVersion {
        match self {
            Feature::Tuples
            | Feature::Deconstruction
            | Feature::PatternMatching
            | Feature::LocalFunctions
            | Feature::OutVariables
            | Feature::ThrowExpression => LanguageVersion::CSharp7,
            Feature::DefaultLiteral => LanguageVersion::CSharp7_1,
            Feature::Ranges | Feature::SwitchExpression | Feature::CoalescingAssignment => {
                LanguageVersion::CSharp8
            }
            Feature::TopLevelStatements
            | Feature::Records
            | Feature::PatternCombinators
            | Feature::RelationalPatterns
            | Feature::TargetTypedNew
            | Feature::StaticLambdas => LanguageVersion::CSharp9,
            Feature::RecordStructs | Feature::FileScopedNamespaces | Feature::GlobalUsing => {
                LanguageVersion::CSharp10
            }
            Feature::RawStringLiterals | Feature::ListPatterns => LanguageVersion::CSharp11,
            Feature::CollectionExpressions | Feature::PrimaryConstructors => {
                LanguageVersion::CSharp12
            }
            Feature::ExtensionBlocks => LanguageVersion::CSharp14,
        }
    }

    /// Name used in diagnostic messages
    pub fn display_name(self) -> &'static str {
        match self {
            Feature::Tuples => "tuples",
            Feature::Deconstruction => "deconstruction",
            Feature::PatternMatching => "pattern matching",
            Feature::LocalFunctions => "local functions",
            Feature::OutVariables => "out variable declaration",
            Feature::ThrowExpression => "throw expression",
            Feature::DefaultLiteral => "default literal",
            Feature::Ranges => "ranges",
            Feature::SwitchExpression => "recursive patterns",
            Feature::CoalescingAssignment => "coalescing assignment",
            Feature::TopLevelStatements => "top-level statements",
            Feature::Records => "records",
            Feature::PatternCombinators => "pattern combinators",
            Feature::RelationalPatterns => "relational patterns",
            Feature::TargetTypedNew => "target-typed object creation",
            Feature::StaticLambdas => "static anonymous function",
            Feature::RecordStructs => "record structs",
            Feature::FileScopedNamespaces => "file-scoped namespace",
            Feature::GlobalUsing => "global using directive",
            Feature::RawStringLiterals => "raw string literals",
            Feature::ListPatterns => "list pattern",
            Feature::CollectionExpressions => "collection expressions",
            Feature::PrimaryConstructors => "primary constructors",
            Feature::ExtensionBlocks => "extensions",
        }
    }
}

/// Immutable configuration for a single parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    pub kind: SourceCodeKind,
}

impl ParseOptions {
    pub fn new(language_version: LanguageVersion, kind: SourceCodeKind) -> Self {
        Self {
            language_version,
            kind,
        }
    }

    /// Options for script parsing with the latest language version
    pub fn script() -> Self {
        Self::new(LanguageVersion::LATEST, SourceCodeKind::Script)
    }

    pub fn with_language_version(self, language_version: LanguageVersion) -> Self {
        Self {
            language_version,
            ..self
        }
    }

    pub fn with_kind(self, kind: SourceCodeKind) -> Self {
        Self { kind, ..self }
    }

    pub fn is_script(&self) -> bool {
        self.kind == SourceCodeKind::Script
    }

    pub fn is_feature_available(&self, feature: Feature) -> bool {
        self.language_version >= feature.required_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_strings() {
        assert_eq!("7.3".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp7_3);
        assert_eq!("latest".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp14);
        assert_eq!("Preview".parse::<LanguageVersion>().unwrap(), LanguageVersion::Preview);
        assert_eq!("13".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp13);
        assert!("7.9".parse::<LanguageVersion>().is_err());
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(LanguageVersion::CSharp7_3 < LanguageVersion::CSharp8);
        assert!(LanguageVersion::CSharp14 < LanguageVersion::Preview);
        assert_eq!(LanguageVersion::default(), LanguageVersion::LATEST);
    }

    #[test]
    fn test_feature_gating() {
        let old = ParseOptions::default().with_language_version(LanguageVersion::CSharp13);
        assert!(!old.is_feature_available(Feature::ExtensionBlocks));
        assert!(old.is_feature_available(Feature::CollectionExpressions));

        let preview = ParseOptions::default().with_language_version(LanguageVersion::Preview);
        assert!(preview.is_feature_available(Feature::ExtensionBlocks));
    }

    #[test]
    fn test_options_deserialize() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"languageVersion": "9", "kind": "script"}"#).unwrap();
        assert_eq!(options.language_version, LanguageVersion::CSharp9);
        assert!(options.is_script());

        let defaults: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, ParseOptions::default());
    }

    #[test]
    fn test_version_serializes_as_string() {
        let json = serde_json::to_string(&LanguageVersion::CSharp7_1).unwrap();
        assert_eq!(json, "\"7.1\"");
    }
}
