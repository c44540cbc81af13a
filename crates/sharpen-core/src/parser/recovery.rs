//! Resynchronisation helpers shared by the statement and member parsers
//!
//! Unexpected tokens are never dropped. They are consumed into a
//! `SkippedTokensTrivia` node at the position they occur, with a single
//! diagnostic for the whole run.

use tracing::trace;

use super::Parser;
use super::contextual::is_type_keyword;
use crate::cst::SyntaxKind;
use crate::diagnostics::ErrorCode;

impl Parser<'_> {
    /// Parse `element (, element)*` up to `close`, which is left unconsumed
    ///
    /// A missing comma between two elements is synthesized when the next
    /// token can start an expression. With `allow_trailing`, a comma right
    /// before `close` ends the list; otherwise another element is expected.
    /// Returns the number of elements parsed.
    pub(crate) fn parse_separated(
        &mut self,
        close: SyntaxKind,
        allow_trailing: bool,
        mut element: impl FnMut(&mut Self),
    ) -> usize {
        let mut count = 0;
        let mut after_comma = false;
        loop {
            let at_close = self.at(close) || self.at_end();
            if at_close && (!after_comma || allow_trailing) {
                break;
            }
            let before = self.pos();
            element(self);
            count += 1;
            if self.eat(SyntaxKind::Comma) {
                after_comma = true;
                continue;
            }
            if self.pos() == before || self.at(close) || self.at_end() {
                break;
            }
            if self.can_start_expression_at(self.pos()) {
                self.missing_with(
                    SyntaxKind::Comma,
                    ErrorCode::SyntaxErrorExpected,
                    vec![",".to_string()],
                );
                after_comma = true;
                continue;
            }
            break;
        }
        count
    }

    /// Skip the current token and every following one for which `skip`
    /// holds, reporting `code` once on the first of them
    ///
    /// Always consumes at least one token unless at end of file.
    pub(crate) fn skip_tokens(
        &mut self,
        code: ErrorCode,
        args: Vec<String>,
        mut skip: impl FnMut(&Self) -> bool,
    ) {
        if self.at_end() {
            return;
        }
        let start = self.pos();
        self.error_here(code, args);
        self.start_node(SyntaxKind::SkippedTokensTrivia);
        self.bump();
        while !self.at_end() && skip(self) {
            self.bump();
        }
        self.finish_node();
        trace!(start, end = self.pos(), ?code, "skipped tokens");
    }

    /// Skip a single unexpected token
    pub(crate) fn skip_token(&mut self, code: ErrorCode, args: Vec<String>) {
        self.skip_tokens(code, args, |_| false);
    }

    /// Skip the bracketed group opening at the cursor, up to and including
    /// its closing bracket, without a diagnostic
    ///
    /// An unbalanced group stops at the end of the statement.
    pub(crate) fn skip_balanced(&mut self) {
        let open = self.current();
        let close = match open {
            SyntaxKind::LParen => SyntaxKind::RParen,
            SyntaxKind::LBracket => SyntaxKind::RBracket,
            SyntaxKind::LBrace => SyntaxKind::RBrace,
            _ => return,
        };
        self.start_node(SyntaxKind::SkippedTokensTrivia);
        let mut depth = 0usize;
        while !self.at_end() {
            let kind = self.current();
            if depth == 1 && open != SyntaxKind::LBrace && kind == SyntaxKind::Semicolon {
                break;
            }
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        self.finish_node();
    }

    /// Can the current token begin a statement?
    pub(crate) fn at_statement_start(&self) -> bool {
        let kind = self.current();
        match kind {
            SyntaxKind::LBrace
            | SyntaxKind::Semicolon
            | SyntaxKind::IfKw
            | SyntaxKind::WhileKw
            | SyntaxKind::DoKw
            | SyntaxKind::ForKw
            | SyntaxKind::ForeachKw
            | SyntaxKind::ReturnKw
            | SyntaxKind::BreakKw
            | SyntaxKind::ContinueKw
            | SyntaxKind::GotoKw
            | SyntaxKind::TryKw
            | SyntaxKind::UsingKw
            | SyntaxKind::LockKw
            | SyntaxKind::SwitchKw
            | SyntaxKind::ConstKw
            | SyntaxKind::FixedKw
            | SyntaxKind::UnsafeKw => true,
            _ => kind.is_modifier_keyword() || self.can_start_expression_at(self.pos()),
        }
    }

    /// Can the current token begin a member or type declaration?
    pub(crate) fn at_member_start(&self) -> bool {
        let kind = self.current();
        kind.is_modifier_keyword()
            || kind.is_predefined_type()
            || is_type_keyword(kind)
            || matches!(
                kind,
                SyntaxKind::Ident
                    | SyntaxKind::LBracket
                    | SyntaxKind::LParen
                    | SyntaxKind::Tilde
                    | SyntaxKind::ConstKw
                    | SyntaxKind::EventKw
                    | SyntaxKind::ImplicitKw
                    | SyntaxKind::ExplicitKw
                    | SyntaxKind::OperatorKw
                    | SyntaxKind::NamespaceKw
                    | SyntaxKind::UsingKw
            )
    }
}
