//! Rewindable CST builder
//!
//! The parser records events instead of writing straight into a rowan
//! builder. Speculative parses are undone by truncating the event list, and
//! a node can be wrapped around already parsed children by inserting a start
//! event at an earlier checkpoint. [`CstBuilder::finish`] replays the events
//! into a green tree, attaching every token's leading and trailing trivia so
//! the tree text equals the source.

use rowan::{GreenNode, GreenNodeBuilder};

use super::SyntaxKind;
use crate::parser::TokenStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Start(SyntaxKind),
    Finish,
    /// A significant token, by index into the token stream
    Token(usize),
    /// `count` adjacent tokens merged into one token of `kind` (`>>`, `>=`, ...)
    Compound {
        first: usize,
        count: usize,
        kind: SyntaxKind,
    },
    /// Zero-width token standing in for one the source lacks
    Missing(SyntaxKind),
}

/// Position in the event list a node can later be started at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint(usize);

/// Event recorder for the C# parser
#[derive(Debug, Default)]
pub(crate) struct CstBuilder {
    events: Vec<Event>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Start(kind));
    }

    pub fn finish_node(&mut self) {
        self.events.push(Event::Finish);
    }

    pub fn token(&mut self, index: usize) {
        self.events.push(Event::Token(index));
    }

    pub fn compound(&mut self, first: usize, count: usize, kind: SyntaxKind) {
        self.events.push(Event::Compound { first, count, kind });
    }

    pub fn missing(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing(kind));
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.events.len())
    }

    /// Start a node that will contain everything recorded since `checkpoint`
    ///
    /// The checkpoint must not be older than any snapshot still in use.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let at = checkpoint.0.min(self.events.len());
        self.events.insert(at, Event::Start(kind));
    }

    /// Remove the node started at `checkpoint`, keeping its children in place
    ///
    /// Does nothing when no node starts there.
    pub fn unwrap_node_at(&mut self, checkpoint: Checkpoint) {
        let at = checkpoint.0;
        if !matches!(self.events.get(at), Some(Event::Start(_))) {
            return;
        }
        let mut depth = 0usize;
        let mut finish = None;
        for (index, event) in self.events.iter().enumerate().skip(at) {
            match event {
                Event::Start(_) => depth += 1,
                Event::Finish => {
                    depth -= 1;
                    if depth == 0 {
                        finish = Some(index);
                        break;
                    }
                }
                _ => {}
            }
        }
        if let Some(finish) = finish {
            self.events.remove(finish);
        }
        self.events.remove(at);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop every event recorded after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    /// Replay the events into a green tree
    ///
    /// Unbalanced events are tolerated: stray finishes are ignored and open
    /// nodes are closed at the end.
    pub fn finish(self, stream: &TokenStream<'_>) -> GreenNode {
        let source = stream.source();
        let raw = stream.raw();
        let tokens = stream.tokens();
        let mut builder = GreenNodeBuilder::new();
        let mut depth = 0usize;

        let trivia = |builder: &mut GreenNodeBuilder<'_>, range: std::ops::Range<usize>| {
            for piece in &raw[range] {
                builder.token(piece.kind.into(), piece.text(source));
            }
        };

        if !matches!(self.events.first(), Some(Event::Start(_))) {
            builder.start_node(SyntaxKind::CompilationUnit.into());
            depth += 1;
        }

        for event in self.events {
            match event {
                Event::Start(kind) => {
                    builder.start_node(kind.into());
                    depth += 1;
                }
                Event::Finish => {
                    // The root stays open until every event is replayed
                    if depth > 1 {
                        builder.finish_node();
                        depth -= 1;
                    }
                }
                Event::Token(index) => {
                    let Some(token) = tokens.get(index) else {
                        continue;
                    };
                    trivia(&mut builder, token.leading.clone());
                    builder.token(token.kind.into(), &source[token.span.clone()]);
                    trivia(&mut builder, token.trailing.clone());
                }
                Event::Compound { first, count, kind } => {
                    let last = first + count.max(1) - 1;
                    let (Some(head), Some(tail)) = (tokens.get(first), tokens.get(last)) else {
                        continue;
                    };
                    trivia(&mut builder, head.leading.clone());
                    builder.token(kind.into(), &source[head.span.start..tail.span.end]);
                    trivia(&mut builder, tail.trailing.clone());
                }
                Event::Missing(kind) => builder.token(kind.into(), ""),
            }
        }

        while depth > 0 {
            builder.finish_node();
            depth -= 1;
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{SyntaxNode, lex_with_trivia};

    fn build(source: &str, record: impl FnOnce(&mut CstBuilder)) -> SyntaxNode {
        let (raw, _) = lex_with_trivia(source);
        let stream = TokenStream::new(source, raw);
        let mut builder = CstBuilder::new();
        record(&mut builder);
        SyntaxNode::new_root(builder.finish(&stream))
    }

    #[test]
    fn test_tokens_carry_trivia() {
        let node = build("a  ;\n", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            b.token(0);
            b.token(1);
            b.token(2);
            b.finish_node();
        });
        assert_eq!(node.text().to_string(), "a  ;\n");
        assert_eq!(node.kind(), SyntaxKind::CompilationUnit);
    }

    #[test]
    fn test_start_node_at_wraps_children() {
        let node = build("a+b", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            let checkpoint = b.checkpoint();
            b.token(0);
            b.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
            b.token(1);
            b.token(2);
            b.finish_node();
            b.token(3);
            b.finish_node();
        });
        let binary = node.first_child().unwrap();
        assert_eq!(binary.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(binary.text().to_string(), "a+b");
    }

    #[test]
    fn test_compound_token_merges_adjacent_text() {
        let node = build("x>>=1", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            b.token(0);
            b.compound(1, 3, SyntaxKind::GtGtEq);
            b.token(4);
            b.token(5);
            b.finish_node();
        });
        let kinds: Vec<_> = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect();
        assert_eq!(kinds[1], (SyntaxKind::GtGtEq, ">>=".to_string()));
        assert_eq!(node.text().to_string(), "x>>=1");
    }

    #[test]
    fn test_unwrap_node_keeps_children() {
        let node = build("a", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            let checkpoint = b.checkpoint();
            b.start_node(SyntaxKind::ConstantPattern);
            b.start_node(SyntaxKind::IdentifierName);
            b.token(0);
            b.finish_node();
            b.finish_node();
            b.unwrap_node_at(checkpoint);
            b.token(1);
            b.finish_node();
        });
        let child = node.first_child().unwrap();
        assert_eq!(child.kind(), SyntaxKind::IdentifierName);
        assert!(child.first_child().is_none());
    }

    #[test]
    fn test_truncate_discards_speculation() {
        let node = build("a", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            let len = b.len();
            b.start_node(SyntaxKind::Block);
            b.missing(SyntaxKind::LBrace);
            b.truncate(len);
            b.token(0);
            b.token(1);
            b.finish_node();
        });
        assert!(node.first_child().is_none());
        assert_eq!(node.text().to_string(), "a");
    }

    #[test]
    fn test_missing_token_is_zero_width() {
        let node = build("", |b| {
            b.start_node(SyntaxKind::CompilationUnit);
            b.missing(SyntaxKind::Semicolon);
            b.token(0);
            b.finish_node();
        });
        let first = node.first_token().unwrap();
        assert_eq!(first.kind(), SyntaxKind::Semicolon);
        assert!(first.text().is_empty());
    }
}
