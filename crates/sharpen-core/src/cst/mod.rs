//! Concrete Syntax Tree (CST) for C#
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! preprocessor lines and skipped tokens, so that
//! `parse(source).syntax().text() == source` for every input.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia
//!   - Cheap to clone (uses Arc internally)
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal
//!   - Wrapped by the typed API in [`ast`]
//!
//! ## Trivia Handling
//!
//! Trivia is attached to tokens:
//! - **Leading trivia**: Everything before a token not claimed by the
//!   previous token
//! - **Trailing trivia**: Everything up to and including the next line break
//!
//! The end-of-file token owns whatever trivia remains after the last
//! significant token.
//!
//! ## Missing tokens
//!
//! A token the source lacks is present in the tree as a zero-width token of
//! the expected kind. [`is_missing`] tells such tokens apart.
//!
//! ## Example
//!
//! ```rust
//! use sharpen_core::cst::SyntaxKind;
//! use sharpen_core::{ParseOptions, parse};
//!
//! let parse = parse("class C { } // done\n", &ParseOptions::default());
//! let root = parse.syntax();
//!
//! assert_eq!(root.text().to_string(), "class C { } // done\n");
//! assert!(root.descendants_with_tokens().any(|e| e.kind() == SyntaxKind::SingleLineComment));
//! ```

mod builder;
mod language;
mod lexer;
mod syntax_kind;

pub mod ast;
pub mod printer;

pub(crate) use builder::{Checkpoint, CstBuilder};
pub use language::{CSharpLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use printer::debug_tree;
pub use syntax_kind::SyntaxKind;

/// Is `token` a zero-width stand-in for a token the source lacks?
pub fn is_missing(token: &SyntaxToken) -> bool {
    token.text().is_empty() && token.kind() != SyntaxKind::EndOfFile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, parse};

    #[test]
    fn test_tree_text_equals_source() {
        let sources = [
            "",
            "class C { void M() { int x = 1; } }",
            "  // only a comment\n",
            "#region r\nclass C {}\n#endregion\n",
            "void M( { x = ; } ) ]",
            "var s = \"unterminated\n",
        ];
        for source in sources {
            let parse = parse(source, &ParseOptions::default());
            assert_eq!(parse.syntax().text().to_string(), source);
        }
    }

    #[test]
    fn test_missing_token_is_zero_width() {
        let parse = parse("class C { int x }", &ParseOptions::default());
        let missing: Vec<_> = parse
            .syntax()
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(is_missing)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].kind(), SyntaxKind::Semicolon);
    }

    #[test]
    fn test_end_of_file_is_not_missing() {
        let parse = parse("", &ParseOptions::default());
        let eof = parse.syntax().last_token().unwrap();
        assert_eq!(eof.kind(), SyntaxKind::EndOfFile);
        assert!(!is_missing(&eof));
    }
}
