//! Rowan language implementation for C#
//!
//! This module implements the `rowan::Language` trait, which connects our
//! [`SyntaxKind`] enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Language implementation for C#
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CSharpLanguage;

impl Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Raw kinds only ever come from `kind_to_raw`, so the lookup cannot miss
        // for trees built by this crate.
        SyntaxKind::from_raw(raw.0).unwrap_or(SyntaxKind::Unknown)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Red tree node over the C# grammar
pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
/// Red tree token over the C# grammar
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;
