//! Token stream adapter
//!
//! Groups the lexer's flat token list into parser tokens that carry their
//! leading and trailing trivia, and offers random access by offset. Trailing
//! trivia runs up to and including the first end of line; everything else
//! is leading trivia of the following token. A synthetic end-of-file token
//! owns whatever trivia is left at the end.

use std::ops::Range;

use crate::cst::{CstToken, SyntaxKind};

/// A significant token with its trivia, as seen by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: SyntaxKind,
    /// Byte range of the token text, without trivia
    pub span: Range<usize>,
    /// Indices into the raw lexer tokens
    pub leading: Range<usize>,
    pub trailing: Range<usize>,
}

impl Token {
    pub fn has_trailing_newline(&self, raw: &[CstToken]) -> bool {
        raw[self.trailing.clone()]
            .iter()
            .any(|t| t.kind == SyntaxKind::EndOfLine)
    }
}

pub(crate) struct TokenStream<'a> {
    source: &'a str,
    raw: Vec<CstToken>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str, raw: Vec<CstToken>) -> Self {
        let mut tokens = Vec::new();
        let mut i = 0;
        let mut leading_start = 0;

        while i < raw.len() {
            if raw[i].kind.is_trivia() {
                i += 1;
                continue;
            }

            let index = i;
            i += 1;
            let trailing_start = i;
            while i < raw.len() {
                match raw[i].kind {
                    SyntaxKind::Whitespace
                    | SyntaxKind::SingleLineComment
                    | SyntaxKind::MultiLineComment => i += 1,
                    SyntaxKind::EndOfLine => {
                        i += 1;
                        break;
                    }
                    _ => break,
                }
            }

            tokens.push(Token {
                kind: raw[index].kind,
                span: raw[index].span.clone(),
                leading: leading_start..index,
                trailing: trailing_start..i,
            });
            leading_start = i;
        }

        tokens.push(Token {
            kind: SyntaxKind::EndOfFile,
            span: source.len()..source.len(),
            leading: leading_start..raw.len(),
            trailing: raw.len()..raw.len(),
        });

        Self {
            source,
            raw,
            tokens,
            pos: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn raw(&self) -> &[CstToken] {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of significant tokens, end of file included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len() - 1);
    }

    /// Token at an absolute index; indices past the end yield end of file
    pub fn token(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn kind(&self, index: usize) -> SyntaxKind {
        self.token(index).kind
    }

    pub fn text(&self, index: usize) -> &'a str {
        let span = self.token(index).span.clone();
        &self.source[span]
    }

    /// Kind of the token `offset` positions ahead of the cursor
    pub fn peek(&self, offset: usize) -> SyntaxKind {
        self.kind(self.pos + offset)
    }

    pub fn at_end(&self) -> bool {
        self.peek(0) == SyntaxKind::EndOfFile
    }

    /// Consume the current token; the end-of-file token is never passed
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// No trivia between token `index` and the one after it
    pub fn is_adjacent(&self, index: usize) -> bool {
        let next = index + 1;
        next < self.tokens.len() && self.token(index).span.end == self.token(next).span.start
    }

    /// The previous significant token ends its line
    pub fn previous_has_trailing_newline(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].has_trailing_newline(&self.raw)
    }

    /// End of the previous token's text (before its trailing trivia)
    pub fn previous_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }
}
