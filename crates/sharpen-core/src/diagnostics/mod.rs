//! Positioned diagnostics produced by the lexer and parser
//!
//! Every diagnostic carries a stable [`ErrorCode`], a severity, the formatted
//! message, the raw message arguments and a text range into the source.
//! Diagnostics never abort a parse; they are collected in a side table and
//! returned next to the tree, sorted by position.

mod line_index;
mod renderer;

pub use line_index::{LineCol, LineIndex};
pub use renderer::{DiagnosticRenderer, OutputFormat};

use rowan::{TextRange, TextSize};
use serde::{Serialize, Serializer};

use crate::options::{Feature, LanguageVersion};

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

/// Every diagnostic the lexer and parser can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer
    UnexpectedCharacter,
    NewlineInConstant,
    EmptyCharLiteral,
    TooManyCharsInCharLiteral,
    UnterminatedComment,
    UnterminatedStringLiteral,
    UnterminatedRawStringLiteral,
    InvalidNumber,
    BadDirectivePlacement,

    // Expected tokens
    IdentifierExpected,
    IdentifierExpectedKeyword,
    SemicolonExpected,
    SyntaxErrorExpected,
    CloseParenExpected,
    CloseBraceExpected,
    OpenBraceExpected,
    OpenBraceOrSemicolonExpected,
    TypeExpected,
    GetOrSetExpected,
    AddOrRemoveExpected,

    // Invalid constructs
    InvalidExprTerm,
    InvalidMemberDecl,
    EofExpected,
    BadEmbeddedStatement,
    TopLevelStatementAfterNamespaceOrType,
    InsufficientStack,
    TupleTooFewElements,
    BadVarDecl,
    BadArrayDeclarator,
    MemberNeedsType,
    ExpectedCatchOrFinally,

    // Version gating
    FeatureNotAvailable,

    // Extension blocks
    ExtensionDisallowsName,
    ExtensionDisallowsMember,
    ExtensionParameterDisallowsDefaultValue,
    ExtensionKeywordInOlderVersion,
}

impl ErrorCode {
    /// Stable compiler-style code
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "CS1056",
            ErrorCode::NewlineInConstant => "CS1010",
            ErrorCode::EmptyCharLiteral => "CS1011",
            ErrorCode::TooManyCharsInCharLiteral => "CS1012",
            ErrorCode::UnterminatedComment => "CS1035",
            ErrorCode::UnterminatedStringLiteral => "CS1039",
            ErrorCode::UnterminatedRawStringLiteral => "CS8997",
            ErrorCode::InvalidNumber => "CS1013",
            ErrorCode::BadDirectivePlacement => "CS1040",
            ErrorCode::IdentifierExpected => "CS1001",
            ErrorCode::IdentifierExpectedKeyword => "CS1041",
            ErrorCode::SemicolonExpected => "CS1002",
            ErrorCode::SyntaxErrorExpected => "CS1003",
            ErrorCode::CloseParenExpected => "CS1026",
            ErrorCode::CloseBraceExpected => "CS1513",
            ErrorCode::OpenBraceExpected => "CS1514",
            ErrorCode::OpenBraceOrSemicolonExpected => "CS1043",
            ErrorCode::TypeExpected => "CS1031",
            ErrorCode::GetOrSetExpected => "CS1014",
            ErrorCode::AddOrRemoveExpected => "CS1055",
            ErrorCode::InvalidExprTerm => "CS1525",
            ErrorCode::InvalidMemberDecl => "CS1519",
            ErrorCode::EofExpected => "CS1022",
            ErrorCode::BadEmbeddedStatement => "CS1023",
            ErrorCode::TopLevelStatementAfterNamespaceOrType => "CS8803",
            ErrorCode::InsufficientStack => "CS8078",
            ErrorCode::TupleTooFewElements => "CS8124",
            ErrorCode::BadVarDecl => "CS1528",
            ErrorCode::BadArrayDeclarator => "CS0650",
            ErrorCode::MemberNeedsType => "CS1520",
            ErrorCode::ExpectedCatchOrFinally => "CS1524",
            ErrorCode::FeatureNotAvailable => "CS8107",
            ErrorCode::ExtensionDisallowsName => "CS9281",
            ErrorCode::ExtensionDisallowsMember => "CS9282",
            ErrorCode::ExtensionParameterDisallowsDefaultValue => "CS9283",
            ErrorCode::ExtensionKeywordInOlderVersion => "CS9284",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorCode::ExtensionKeywordInOlderVersion => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message template with `{0}`, `{1}`, ... placeholders
    pub fn template(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "Unexpected character '{0}'",
            ErrorCode::NewlineInConstant => "Newline in constant",
            ErrorCode::EmptyCharLiteral => "Empty character literal",
            ErrorCode::TooManyCharsInCharLiteral => "Too many characters in character literal",
            ErrorCode::UnterminatedComment => "End-of-file found, '*/' expected",
            ErrorCode::UnterminatedStringLiteral => "Unterminated string literal",
            ErrorCode::UnterminatedRawStringLiteral => "Unterminated raw string literal",
            ErrorCode::InvalidNumber => "Invalid number",
            ErrorCode::BadDirectivePlacement => {
                "Preprocessor directives must appear as the first non-whitespace character on a line"
            }
            ErrorCode::IdentifierExpected => "Identifier expected",
            ErrorCode::IdentifierExpectedKeyword => "Identifier expected; '{0}' is a keyword",
            ErrorCode::SemicolonExpected => "; expected",
            ErrorCode::SyntaxErrorExpected => "Syntax error, '{0}' expected",
            ErrorCode::CloseParenExpected => ") expected",
            ErrorCode::CloseBraceExpected => "} expected",
            ErrorCode::OpenBraceExpected => "{ expected",
            ErrorCode::OpenBraceOrSemicolonExpected => "{ or ; expected",
            ErrorCode::TypeExpected => "Type expected",
            ErrorCode::GetOrSetExpected => "A get or set accessor expected",
            ErrorCode::AddOrRemoveExpected => "An add or remove accessor expected",
            ErrorCode::InvalidExprTerm => "Invalid expression term '{0}'",
            ErrorCode::InvalidMemberDecl => {
                "Invalid token '{0}' in a member declaration"
            }
            ErrorCode::EofExpected => "Type or namespace definition, or end-of-file expected",
            ErrorCode::BadEmbeddedStatement => {
                "Embedded statement cannot be a declaration or labeled statement"
            }
            ErrorCode::TopLevelStatementAfterNamespaceOrType => {
                "Top-level statements must precede namespace and type declarations"
            }
            ErrorCode::InsufficientStack => "An expression is too long or complex to parse",
            ErrorCode::TupleTooFewElements => "Tuple must contain at least two elements",
            ErrorCode::BadVarDecl => {
                "Expected ; or = (cannot specify constructor arguments in declaration)"
            }
            ErrorCode::BadArrayDeclarator => {
                "Bad array declarator: the rank specifier precedes the variable's identifier"
            }
            ErrorCode::MemberNeedsType => "Method must have a return type",
            ErrorCode::ExpectedCatchOrFinally => "Expected catch or finally",
            ErrorCode::FeatureNotAvailable => {
                "Feature '{0}' is not available in C# {1}. Please use language version {2} or greater"
            }
            ErrorCode::ExtensionDisallowsName => "Extension declarations may not have a name",
            ErrorCode::ExtensionDisallowsMember => {
                "Extension declarations can include only methods or properties, not '{0}'"
            }
            ErrorCode::ExtensionParameterDisallowsDefaultValue => {
                "The receiver parameter of an extension cannot have a default value"
            }
            ErrorCode::ExtensionKeywordInOlderVersion => {
                "'extension' declares an extension block starting in C# 14; it is parsed as a member name here"
            }
        }
    }

    /// Substitute `args` into the message template
    pub fn format(self, args: &[String]) -> String {
        let mut message = self.template().to_string();
        for (index, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), arg);
        }
        message
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A positioned lexer or parser diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub args: Vec<String>,
    #[serde(serialize_with = "serialize_range")]
    pub range: TextRange,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, range: TextRange) -> Self {
        Self::with_args(code, range, Vec::new())
    }

    pub fn with_args(code: ErrorCode, range: TextRange, args: Vec<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: code.format(&args),
            args,
            range,
        }
    }

    /// `FeatureNotAvailable` with the feature name, current and required version
    pub fn feature_not_available(
        feature: Feature,
        current: LanguageVersion,
        range: TextRange,
    ) -> Self {
        Self::with_args(
            ErrorCode::FeatureNotAvailable,
            range,
            vec![
                feature.display_name().to_string(),
                current.to_string(),
                feature.required_version().to_string(),
            ],
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn start(&self) -> TextSize {
        self.range.start()
    }
}

fn serialize_range<S: Serializer>(range: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("TextRange", 2)?;
    state.serialize_field("start", &u32::from(range.start()))?;
    state.serialize_field("end", &u32::from(range.end()))?;
    state.end()
}

/// Sort diagnostics by position, keeping emission order for ties
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.range.start(), d.range.end()));
}
