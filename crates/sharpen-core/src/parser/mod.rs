//! Recursive-descent parser for C#
//!
//! The parser is a single forward pass over the [`TokenStream`] that records
//! tree events into a [`CstBuilder`]. Ambiguous prefixes are resolved by
//! side-effect-free scanners in `scan` and by the contextual keyword
//! classifier in `contextual`; the few productions that have to be tried
//! speculatively do so under a [`Snapshot`] that rolls back the cursor, the
//! events and the diagnostics together.
//!
//! Parsing is total. Missing tokens are synthesized as zero-width tokens,
//! unexpected tokens end up in `SkippedTokensTrivia` nodes, and every
//! problem becomes a [`Diagnostic`] next to the tree.
//!
//! The grammar is split over one `impl Parser` block per category:
//! `types`, `expressions`, `patterns`, `statements` and `members`, with
//! `recovery` holding the shared resynchronisation helpers.

mod contextual;
mod expressions;
mod members;
mod patterns;
mod recovery;
mod scan;
mod statements;
pub(crate) mod stream;
mod types;

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use rowan::{GreenNode, TextRange, TextSize};
use tracing::{debug, trace};

pub(crate) use stream::TokenStream;

use crate::cst::{CstBuilder, Checkpoint, SyntaxKind, SyntaxNode, debug_tree, lex_with_trivia};
use crate::diagnostics::{Diagnostic, ErrorCode, sort_diagnostics};
use crate::options::{Feature, ParseOptions};
use crate::{Result, SharpenError};

/// Nesting limit for expressions, statements and types
pub(crate) const MAX_DEPTH: usize = 100;

/// Caller-supplied cancellation signal, polled once per statement and member
pub trait CancellationCheck {
    fn is_cancelled(&self) -> bool;
}

impl CancellationCheck for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F: Fn() -> bool> CancellationCheck for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Result of parsing one compilation unit: the tree and its diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Red tree rooted at the `CompilationUnit`
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Diagnostics ordered by position
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Text of the whole tree, trivia included
    pub fn full_text(&self) -> String {
        self.syntax().text().to_string()
    }

    /// Indented dump of every node and token
    pub fn debug_tree(&self) -> String {
        debug_tree(&self.syntax())
    }
}

/// Parse `text` as a C# compilation unit
pub fn parse(text: &str, options: &ParseOptions) -> Parse {
    let (parse, _) = Parser::new(text, *options, None).run();
    parse
}

/// Parse `text`, polling `cancellation` once per statement and member
///
/// Returns [`SharpenError::Cancelled`] instead of a partial tree when the
/// check trips.
pub fn parse_with_cancellation(
    text: &str,
    options: &ParseOptions,
    cancellation: &dyn CancellationCheck,
) -> Result<Parse> {
    let (parse, cancelled) = Parser::new(text, *options, Some(cancellation)).run();
    if cancelled {
        debug!("parse cancelled");
        return Err(SharpenError::Cancelled);
    }
    Ok(parse)
}

/// Saved parser state for speculative parsing
///
/// Snapshots are restored in LIFO order. A node must never be started at a
/// checkpoint older than a snapshot that may still be restored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    pos: usize,
    events: usize,
    diagnostics: usize,
    depth_reported: bool,
}

pub(crate) struct Parser<'a> {
    stream: TokenStream<'a>,
    builder: CstBuilder,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
    cancellation: Option<&'a dyn CancellationCheck>,
    cancelled: bool,
    depth: usize,
    depth_reported: bool,
    /// Recursion depth of the lookahead scanners
    scan_depth: Cell<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(
        text: &'a str,
        options: ParseOptions,
        cancellation: Option<&'a dyn CancellationCheck>,
    ) -> Self {
        let (raw, lexer_errors) = lex_with_trivia(text);
        let diagnostics = lexer_errors
            .into_iter()
            .map(|e| Diagnostic::with_args(e.code, span_range(e.span.start, e.span.end), e.args))
            .collect();
        Self {
            stream: TokenStream::new(text, raw),
            builder: CstBuilder::new(),
            diagnostics,
            options,
            cancellation,
            cancelled: false,
            depth: 0,
            depth_reported: false,
            scan_depth: Cell::new(0),
        }
    }

    /// Parse the compilation unit; the flag reports a tripped cancellation
    pub fn run(mut self) -> (Parse, bool) {
        self.parse_compilation_unit();
        self.finish()
    }

    fn finish(self) -> (Parse, bool) {
        let Parser {
            stream,
            builder,
            mut diagnostics,
            cancelled,
            ..
        } = self;

        let green = builder.finish(&stream);
        sort_diagnostics(&mut diagnostics);
        debug!(
            tokens = stream.len(),
            diagnostics = diagnostics.len(),
            "parsed compilation unit"
        );
        (Parse { green, diagnostics }, cancelled)
    }

    // Cursor

    pub(crate) fn current(&self) -> SyntaxKind {
        self.stream.peek(0)
    }

    pub(crate) fn nth(&self, offset: usize) -> SyntaxKind {
        self.stream.peek(offset)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.stream.at_end()
    }

    pub(crate) fn pos(&self) -> usize {
        self.stream.pos()
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.stream.text(self.stream.pos())
    }

    pub(crate) fn nth_text(&self, offset: usize) -> &'a str {
        self.stream.text(self.stream.pos() + offset)
    }

    /// Kind of the token at an absolute index
    pub(crate) fn kind_at(&self, index: usize) -> SyntaxKind {
        self.stream.kind(index)
    }

    pub(crate) fn text_at(&self, index: usize) -> &'a str {
        self.stream.text(index)
    }

    /// The current token is the identifier `word`
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.nth_is_contextual(0, word)
    }

    pub(crate) fn nth_is_contextual(&self, offset: usize, word: &str) -> bool {
        self.nth(offset) == SyntaxKind::Ident && self.nth_text(offset) == word
    }

    pub(crate) fn is_contextual_at(&self, index: usize, word: &str) -> bool {
        self.kind_at(index) == SyntaxKind::Ident && self.text_at(index) == word
    }

    // Events

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind);
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    pub(crate) fn unwrap_node_at(&mut self, checkpoint: Checkpoint) {
        self.builder.unwrap_node_at(checkpoint);
    }

    /// Consume the current token into the tree
    ///
    /// The end-of-file token is only consumed by [`Parser::bump_eof`].
    pub(crate) fn bump(&mut self) {
        if self.at_end() {
            return;
        }
        self.builder.token(self.stream.pos());
        self.stream.advance();
    }

    pub(crate) fn bump_eof(&mut self) {
        if self.at_end() {
            self.builder.token(self.stream.pos());
        }
    }

    /// Consume `count` adjacent tokens as one token of `kind`
    pub(crate) fn bump_compound(&mut self, count: usize, kind: SyntaxKind) {
        if count <= 1 {
            self.bump();
            return;
        }
        self.builder.compound(self.stream.pos(), count, kind);
        for _ in 0..count {
            self.stream.advance();
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_contextual(&mut self, word: &str) -> bool {
        if self.at_contextual(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or synthesize it and report the matching diagnostic
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let (code, args) = self.expected_error(kind);
        self.missing_with(kind, code, args);
        false
    }

    /// Insert a zero-width `kind` token and report `code`
    pub(crate) fn missing_with(&mut self, kind: SyntaxKind, code: ErrorCode, args: Vec<String>) {
        let range = self.missing_range();
        trace!(?kind, ?code, "synthesized missing token");
        self.builder.missing(kind);
        self.error_at(range, code, args);
    }

    /// Insert a zero-width `kind` token without a diagnostic
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.builder.missing(kind);
    }

    fn expected_error(&self, kind: SyntaxKind) -> (ErrorCode, Vec<String>) {
        match kind {
            SyntaxKind::Semicolon => (ErrorCode::SemicolonExpected, Vec::new()),
            SyntaxKind::RParen => (ErrorCode::CloseParenExpected, Vec::new()),
            SyntaxKind::RBrace => (ErrorCode::CloseBraceExpected, Vec::new()),
            SyntaxKind::LBrace => (ErrorCode::OpenBraceExpected, Vec::new()),
            SyntaxKind::Ident => self.identifier_expected(),
            _ => (
                ErrorCode::SyntaxErrorExpected,
                vec![kind.display_name().to_string()],
            ),
        }
    }

    pub(crate) fn identifier_expected(&self) -> (ErrorCode, Vec<String>) {
        if self.current().is_keyword() {
            (
                ErrorCode::IdentifierExpectedKeyword,
                vec![self.current_text().to_string()],
            )
        } else {
            (ErrorCode::IdentifierExpected, Vec::new())
        }
    }

    /// Where a token missing before the current one is reported
    ///
    /// When the previous token ends its line the error sits right after it,
    /// otherwise it covers the current token.
    pub(crate) fn missing_range(&self) -> TextRange {
        if self.stream.previous_has_trailing_newline() {
            let end = self.stream.previous_end();
            return span_range(end, end);
        }
        self.token_range(self.pos())
    }

    // Diagnostics

    pub(crate) fn token_range(&self, index: usize) -> TextRange {
        let span = self.stream.token(index).span.clone();
        span_range(span.start, span.end)
    }

    /// Range of the tokens consumed since `start`
    pub(crate) fn token_range_from(&self, start: usize) -> TextRange {
        let pos = self.pos();
        if pos <= start {
            let at = self.stream.token(start).span.start;
            return span_range(at, at);
        }
        let first = self.stream.token(start).span.start;
        let last = self.stream.token(pos - 1).span.end;
        span_range(first, last)
    }

    pub(crate) fn error_at(&mut self, range: TextRange, code: ErrorCode, args: Vec<String>) {
        self.diagnostics.push(Diagnostic::with_args(code, range, args));
    }

    /// Report `code` on the current token
    pub(crate) fn error_here(&mut self, code: ErrorCode, args: Vec<String>) {
        let range = self.token_range(self.pos());
        self.error_at(range, code, args);
    }

    /// Report `FeatureNotAvailable` when `feature` is newer than the options allow
    pub(crate) fn check_feature(&mut self, feature: Feature, range: TextRange) {
        if !self.options.is_feature_available(feature) {
            self.diagnostics.push(Diagnostic::feature_not_available(
                feature,
                self.options.language_version,
                range,
            ));
        }
    }

    pub(crate) fn check_feature_here(&mut self, feature: Feature) {
        let range = self.token_range(self.pos());
        self.check_feature(feature, range);
    }

    pub(crate) fn options(&self) -> &ParseOptions {
        &self.options
    }

    // Speculation

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.stream.pos(),
            events: self.builder.len(),
            diagnostics: self.diagnostics.len(),
            depth_reported: self.depth_reported,
        }
    }

    pub(crate) fn rewind(&mut self, snapshot: Snapshot) {
        trace!(pos = snapshot.pos, "rewind");
        self.stream.reset(snapshot.pos);
        self.builder.truncate(snapshot.events);
        self.diagnostics.truncate(snapshot.diagnostics);
        self.depth_reported = snapshot.depth_reported;
    }

    // Resource limits

    /// Enter a nested production; `false` once the nesting limit is reached
    ///
    /// The limit is reported once. A `true` result must be paired with
    /// [`Parser::exit`].
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            if !self.depth_reported {
                self.depth_reported = true;
                self.error_here(ErrorCode::InsufficientStack, Vec::new());
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Poll the cancellation check; sticky once tripped
    pub(crate) fn is_cancelled(&mut self) -> bool {
        if !self.cancelled
            && let Some(check) = self.cancellation
            && check.is_cancelled()
        {
            debug!(pos = self.pos(), "cancellation requested");
            self.cancelled = true;
        }
        self.cancelled
    }

    // Composed operators

    /// Operator starting at the cursor, composing adjacent `>` and `=` tokens
    ///
    /// Returns the operator kind and the number of tokens it spans.
    pub(crate) fn composed_operator(&self) -> (SyntaxKind, usize) {
        let pos = self.pos();
        if self.current() != SyntaxKind::Gt {
            return (self.current(), 1);
        }
        let adjacent = |offset: usize, kind: SyntaxKind| {
            self.stream.is_adjacent(pos + offset - 1) && self.kind_at(pos + offset) == kind
        };
        if adjacent(1, SyntaxKind::Gt) {
            if adjacent(2, SyntaxKind::Gt) {
                if adjacent(3, SyntaxKind::Eq) {
                    return (SyntaxKind::GtGtGtEq, 4);
                }
                return (SyntaxKind::GtGtGt, 3);
            }
            if adjacent(2, SyntaxKind::Eq) {
                return (SyntaxKind::GtGtEq, 3);
            }
            return (SyntaxKind::GtGt, 2);
        }
        if adjacent(1, SyntaxKind::Eq) {
            return (SyntaxKind::GtEq, 2);
        }
        (SyntaxKind::Gt, 1)
    }
}

pub(crate) fn span_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Run `f` inside a bare `CompilationUnit` and keep whatever it leaves over
#[cfg(test)]
pub(crate) fn parse_fragment(text: &str, f: impl FnOnce(&mut Parser<'_>)) -> Parse {
    let mut parser = Parser::new(text, ParseOptions::default(), None);
    parser.start_node(SyntaxKind::CompilationUnit);
    f(&mut parser);
    while !parser.at_end() {
        parser.bump();
    }
    parser.bump_eof();
    parser.finish_node();
    parser.finish().0
}

/// Node kinds of `node` and its descendants in preorder
#[cfg(test)]
pub(crate) fn node_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.descendants().map(|n| n.kind()).collect()
}
