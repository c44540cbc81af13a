//! Contextual keyword classifier
//!
//! Words such as `var`, `extension`, `async` or `record` are ordinary
//! identifiers to the lexer. Whether one introduces a construct is decided
//! here, once per call site, from a fixed peek at the following tokens and
//! the language version. No call site repeats this lookahead.

use tracing::trace;

use super::Parser;
use super::scan::ScanMode;
use crate::cst::SyntaxKind;
use crate::options::Feature;

/// What a contextual word at a given position introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contextual {
    /// Not a keyword here
    Identifier,
    /// `var (a, b) = ...`
    VarDeconstruction,
    /// `extension(...)` or `extension<T>(...)`
    ExtensionBlock,
    /// `extension Name(...)`, parsed as an extension block and flagged
    NamedExtensionBlock,
    /// An extension block shape under a version without extension blocks
    ExtensionInOlderVersion,
    AsyncModifier,
    PartialModifier,
    RequiredModifier,
    FileModifier,
    ScopedModifier,
    AwaitExpression,
    YieldStatement,
    RecordDeclaration,
}

/// Syntactic position of the word being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Statement,
    Member,
    Expression,
}

impl Parser<'_> {
    /// Classify the identifier at absolute index `at`
    pub(crate) fn classify_contextual(&self, at: usize, position: Position) -> Contextual {
        if self.kind_at(at) != SyntaxKind::Ident {
            return Contextual::Identifier;
        }
        let next = self.kind_at(at + 1);
        let result = match (self.text_at(at), position) {
            ("var", Position::Statement) if self.scan_deconstruction(at, false) => {
                Contextual::VarDeconstruction
            }
            ("extension", Position::Member) => self.classify_extension(at),
            ("async", Position::Expression) if self.starts_async_lambda(at + 1) => {
                Contextual::AsyncModifier
            }
            ("async", Position::Member | Position::Statement)
                if self.continues_declaration(at + 1) =>
            {
                Contextual::AsyncModifier
            }
            ("partial", Position::Member) if self.continues_declaration(at + 1) => {
                Contextual::PartialModifier
            }
            ("required", Position::Member) if self.continues_declaration(at + 1) => {
                Contextual::RequiredModifier
            }
            ("file", Position::Member)
                if self.continues_declaration(at + 1) || is_type_keyword(next) =>
            {
                Contextual::FileModifier
            }
            ("scoped", Position::Statement | Position::Member)
                if next == SyntaxKind::RefKw
                    || (self.scan_type(at + 1, ScanMode::Normal).is_some_and(|(_, end)| {
                        self.kind_at(end) == SyntaxKind::Ident
                    })) =>
            {
                Contextual::ScopedModifier
            }
            ("await", Position::Statement)
                if matches!(next, SyntaxKind::ForeachKw | SyntaxKind::UsingKw) =>
            {
                Contextual::AwaitExpression
            }
            ("await", Position::Statement | Position::Expression)
                if self.starts_await_operand(at + 1) =>
            {
                Contextual::AwaitExpression
            }
            ("yield", Position::Statement)
                if matches!(next, SyntaxKind::ReturnKw | SyntaxKind::BreakKw) =>
            {
                Contextual::YieldStatement
            }
            ("record", Position::Member) if self.starts_record(at + 1) => {
                Contextual::RecordDeclaration
            }
            _ => Contextual::Identifier,
        };
        if result != Contextual::Identifier {
            trace!(at, ?result, "contextual keyword");
        }
        result
    }

    fn classify_extension(&self, at: usize) -> Contextual {
        let next = self.kind_at(at + 1);
        let named = next == SyntaxKind::Ident
            && matches!(self.kind_at(at + 2), SyntaxKind::LParen | SyntaxKind::Lt);
        if !named && !matches!(next, SyntaxKind::LParen | SyntaxKind::Lt) {
            return Contextual::Identifier;
        }
        if !self.options().is_feature_available(Feature::ExtensionBlocks) {
            return if self.scan_complete_extension_header(at) {
                Contextual::ExtensionInOlderVersion
            } else {
                Contextual::Identifier
            };
        }
        if named {
            Contextual::NamedExtensionBlock
        } else {
            Contextual::ExtensionBlock
        }
    }

    /// `extension` name? type-parameters? `(` ... `)` `{`
    fn scan_complete_extension_header(&self, at: usize) -> bool {
        let mut i = at + 1;
        if self.kind_at(i) == SyntaxKind::Ident {
            i += 1;
        }
        if self.kind_at(i) == SyntaxKind::Lt {
            match self.scan_type_parameter_list(i) {
                Some(end) => i = end,
                None => return false,
            }
        }
        if self.kind_at(i) != SyntaxKind::LParen {
            return false;
        }
        self.matching_close(i)
            .is_some_and(|close| self.kind_at(close + 1) == SyntaxKind::LBrace)
    }

    /// The tokens from `index` on can continue a member or local declaration
    /// after a modifier
    fn continues_declaration(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        if kind.is_modifier_keyword() || kind.is_predefined_type() || is_type_keyword(kind) {
            return true;
        }
        match kind {
            SyntaxKind::Ident => {
                if matches!(
                    self.text_at(index),
                    "partial" | "async" | "required" | "file" | "record"
                ) {
                    return true;
                }
                self.scan_type(index, ScanMode::Normal)
                    .is_some_and(|(_, end)| self.kind_at(end) == SyntaxKind::Ident)
            }
            SyntaxKind::LParen => self
                .scan_type(index, ScanMode::Normal)
                .is_some_and(|(_, end)| self.kind_at(end) == SyntaxKind::Ident),
            _ => false,
        }
    }

    fn starts_async_lambda(&self, index: usize) -> bool {
        match self.kind_at(index) {
            SyntaxKind::DelegateKw => true,
            SyntaxKind::Ident => self.kind_at(index + 1) == SyntaxKind::FatArrow,
            SyntaxKind::LParen => self.scan_parenthesized_lambda(index),
            SyntaxKind::StaticKw => self.starts_async_lambda(index + 1),
            _ => false,
        }
    }

    fn starts_await_operand(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        match kind {
            SyntaxKind::Ident
            | SyntaxKind::LParen
            | SyntaxKind::LBracket
            | SyntaxKind::NewKw
            | SyntaxKind::ThisKw
            | SyntaxKind::BaseKw
            | SyntaxKind::TypeofKw
            | SyntaxKind::DefaultKw
            | SyntaxKind::CheckedKw
            | SyntaxKind::UncheckedKw
            | SyntaxKind::SizeofKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw
            | SyntaxKind::Bang
            | SyntaxKind::Tilde => true,
            _ => kind.is_literal() || kind.is_predefined_type(),
        }
    }

    fn starts_record(&self, index: usize) -> bool {
        match self.kind_at(index) {
            SyntaxKind::ClassKw | SyntaxKind::StructKw => true,
            SyntaxKind::Ident => matches!(
                self.kind_at(index + 1),
                SyntaxKind::LParen
                    | SyntaxKind::LBrace
                    | SyntaxKind::Lt
                    | SyntaxKind::Colon
                    | SyntaxKind::Semicolon
            ) || self.is_contextual_at(index + 1, "where"),
            _ => false,
        }
    }
}

/// Keywords that start a type declaration
pub(crate) fn is_type_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ClassKw
            | SyntaxKind::StructKw
            | SyntaxKind::InterfaceKw
            | SyntaxKind::EnumKw
            | SyntaxKind::DelegateKw
    )
}
