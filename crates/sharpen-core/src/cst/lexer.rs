//! CST-aware lexer that preserves all trivia (whitespace, comments, directives)
//!
//! The lexer never fails: every byte of the input ends up in exactly one
//! token, so concatenating the token texts reproduces the source. Problems
//! such as unterminated literals are reported as [`LexerError`]s next to the
//! token stream.
//!
//! `>` is always lexed as a single [`SyntaxKind::Gt`]. The parser composes
//! `>=`, `>>`, `>>=`, `>>>` and `>>>=` from adjacent tokens, which lets a
//! nested generic closer such as `List<List<int>>` close one list per `>`.

use std::ops::Range;

use crate::cst::SyntaxKind;
use crate::diagnostics::ErrorCode;

/// Simple span representing a byte range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub code: ErrorCode,
    pub args: Vec<String>,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(code: ErrorCode, span: CstSpan) -> Self {
        Self {
            code,
            args: Vec::new(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: SyntaxKind,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: SyntaxKind, span: CstSpan) -> Self {
        Self { kind, span }
    }

    /// The token's text within `source`
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// No end-of-file token is produced; the token stream adds it.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer {
        input,
        pos: 0,
        at_line_start: true,
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Only whitespace seen since the last line break
    at_line_start: bool,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        while let Some(current) = self.peek_char(0) {
            let start = self.pos;
            let kind = self.lex_one(current);
            debug_assert!(self.pos > start, "lexer must always make progress");
            self.at_line_start = match kind {
                SyntaxKind::EndOfLine => true,
                SyntaxKind::Whitespace => self.at_line_start,
                _ => false,
            };
            self.tokens.push(CstToken::new(kind, start..self.pos));
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Character `n` characters ahead of the cursor
    fn peek_char(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char(0)?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_str(&mut self, s: &str) {
        self.pos += s.len();
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char(0) {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&mut self, code: ErrorCode, span: CstSpan) {
        self.errors.push(LexerError::new(code, span));
    }

    fn lex_one(&mut self, current: char) -> SyntaxKind {
        let start = self.pos;
        match current {
            '\n' => {
                self.bump();
                SyntaxKind::EndOfLine
            }
            '\r' => {
                self.bump();
                if self.peek_char(0) == Some('\n') {
                    self.bump();
                }
                SyntaxKind::EndOfLine
            }
            c if is_newline(c) => {
                self.bump();
                SyntaxKind::EndOfLine
            }
            c if is_whitespace(c) => {
                self.bump_while(is_whitespace);
                SyntaxKind::Whitespace
            }
            '/' if self.starts_with("//") => {
                let doc = self.starts_with("///") && !self.starts_with("////");
                self.bump_while(|c| !is_newline(c));
                if doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::SingleLineComment
                }
            }
            '/' if self.starts_with("/*") => {
                self.bump_str("/*");
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => {
                        self.pos = self.input.len();
                        self.error(ErrorCode::UnterminatedComment, start..self.pos);
                    }
                }
                SyntaxKind::MultiLineComment
            }
            '#' if self.at_line_start => {
                self.bump_while(|c| !is_newline(c));
                SyntaxKind::PreprocessorDirective
            }
            '@' if matches!(self.peek_char(1), Some(c) if is_ident_start(c)) => {
                self.bump();
                self.bump_while(is_ident_continue);
                SyntaxKind::Ident
            }
            '@' if self.starts_with("@\"") => {
                self.bump();
                self.lex_verbatim_string(start);
                SyntaxKind::StringLiteral
            }
            '@' if self.starts_with("@$\"") => {
                self.bump_str("@$");
                self.lex_interpolated_string(start, true);
                SyntaxKind::InterpolatedStringLiteral
            }
            '$' => self.lex_dollar(start),
            '"' if self.starts_with("\"\"\"") => {
                self.lex_raw_string(start, 0);
                SyntaxKind::RawStringLiteral
            }
            '"' => {
                self.lex_regular_string(start);
                SyntaxKind::StringLiteral
            }
            '\'' => {
                self.lex_char_literal(start);
                SyntaxKind::CharLiteral
            }
            c if c.is_ascii_digit() => {
                self.lex_number(start);
                SyntaxKind::NumericLiteral
            }
            '.' if matches!(self.peek_char(1), Some(c) if c.is_ascii_digit()) => {
                self.lex_number(start);
                SyntaxKind::NumericLiteral
            }
            c if is_ident_start(c) => {
                self.bump_while(is_ident_continue);
                SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(SyntaxKind::Ident)
            }
            _ => self.lex_punctuation(current, start),
        }
    }

    fn lex_punctuation(&mut self, current: char, start: usize) -> SyntaxKind {
        // Longest match first; `>` is deliberately absent from the compound table.
        const COMPOUND: &[(&str, SyntaxKind)] = &[
            ("??=", SyntaxKind::QuestionQuestionEq),
            ("<<=", SyntaxKind::LtLtEq),
            ("??", SyntaxKind::QuestionQuestion),
            ("::", SyntaxKind::ColonColon),
            ("&&", SyntaxKind::AmpAmp),
            ("||", SyntaxKind::PipePipe),
            ("++", SyntaxKind::PlusPlus),
            ("--", SyntaxKind::MinusMinus),
            ("==", SyntaxKind::EqEq),
            ("!=", SyntaxKind::BangEq),
            ("<=", SyntaxKind::LtEq),
            ("+=", SyntaxKind::PlusEq),
            ("-=", SyntaxKind::MinusEq),
            ("*=", SyntaxKind::StarEq),
            ("/=", SyntaxKind::SlashEq),
            ("%=", SyntaxKind::PercentEq),
            ("&=", SyntaxKind::AmpEq),
            ("|=", SyntaxKind::PipeEq),
            ("^=", SyntaxKind::CaretEq),
            ("<<", SyntaxKind::LtLt),
            ("=>", SyntaxKind::FatArrow),
            ("->", SyntaxKind::Arrow),
            ("..", SyntaxKind::DotDot),
        ];

        for (text, kind) in COMPOUND {
            if self.starts_with(text) {
                self.bump_str(text);
                return *kind;
            }
        }

        let kind = match current {
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '.' => SyntaxKind::Dot,
            ',' => SyntaxKind::Comma,
            ':' => SyntaxKind::Colon,
            ';' => SyntaxKind::Semicolon,
            '~' => SyntaxKind::Tilde,
            '!' => SyntaxKind::Bang,
            '=' => SyntaxKind::Eq,
            '<' => SyntaxKind::Lt,
            '>' => SyntaxKind::Gt,
            '?' => SyntaxKind::Question,
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '*' => SyntaxKind::Star,
            '/' => SyntaxKind::Slash,
            '%' => SyntaxKind::Percent,
            '&' => SyntaxKind::Amp,
            '|' => SyntaxKind::Pipe,
            '^' => SyntaxKind::Caret,
            _ => {
                self.bump();
                let code = if current == '#' {
                    ErrorCode::BadDirectivePlacement
                } else {
                    ErrorCode::UnexpectedCharacter
                };
                self.errors.push(LexerError {
                    code,
                    args: vec![current.to_string()],
                    span: start..self.pos,
                });
                return SyntaxKind::Unknown;
            }
        };
        self.bump();
        kind
    }

    /// `$"`, `$@"`, `$"""` and `$$"""...` prefixes
    fn lex_dollar(&mut self, start: usize) -> SyntaxKind {
        let dollars = self.rest().chars().take_while(|&c| c == '$').count();
        let after = &self.rest()[dollars..];
        if after.starts_with("\"\"\"") {
            self.pos += dollars;
            self.lex_raw_string(start, dollars);
            SyntaxKind::InterpolatedStringLiteral
        } else if dollars == 1 && after.starts_with('"') {
            self.bump();
            self.lex_interpolated_string(start, false);
            SyntaxKind::InterpolatedStringLiteral
        } else if dollars == 1 && after.starts_with("@\"") {
            self.bump_str("$@");
            self.lex_interpolated_string(start, true);
            SyntaxKind::InterpolatedStringLiteral
        } else {
            self.bump();
            self.errors.push(LexerError {
                code: ErrorCode::UnexpectedCharacter,
                args: vec!["$".to_string()],
                span: start..self.pos,
            });
            SyntaxKind::Unknown
        }
    }

    /// Cursor on the opening `"`
    fn lex_regular_string(&mut self, start: usize) {
        self.bump();
        loop {
            match self.peek_char(0) {
                None => {
                    self.error(ErrorCode::NewlineInConstant, start..self.pos);
                    return;
                }
                Some(c) if is_newline(c) => {
                    self.error(ErrorCode::NewlineInConstant, start..self.pos);
                    return;
                }
                Some('\\') => {
                    self.bump();
                    if matches!(self.peek_char(0), Some(c) if !is_newline(c)) {
                        self.bump();
                    }
                }
                Some('"') => {
                    self.bump();
                    return;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Cursor on the opening `"` of `@"..."`
    fn lex_verbatim_string(&mut self, start: usize) {
        self.bump();
        loop {
            match self.bump() {
                None => {
                    self.error(ErrorCode::UnterminatedStringLiteral, start..self.pos);
                    return;
                }
                Some('"') if self.peek_char(0) == Some('"') => {
                    self.bump();
                }
                Some('"') => return,
                Some(_) => {}
            }
        }
    }

    /// Cursor on the opening `"`; holes may contain nested strings and braces
    fn lex_interpolated_string(&mut self, start: usize, verbatim: bool) {
        self.bump();
        loop {
            match self.peek_char(0) {
                None => {
                    self.error(ErrorCode::UnterminatedStringLiteral, start..self.pos);
                    return;
                }
                Some(c) if is_newline(c) && !verbatim => {
                    self.error(ErrorCode::NewlineInConstant, start..self.pos);
                    return;
                }
                Some('\\') if !verbatim => {
                    self.bump();
                    if matches!(self.peek_char(0), Some(c) if !is_newline(c)) {
                        self.bump();
                    }
                }
                Some('"') if verbatim && self.peek_char(1) == Some('"') => {
                    self.bump_str("\"\"");
                }
                Some('"') => {
                    self.bump();
                    return;
                }
                Some('{') if self.peek_char(1) == Some('{') => {
                    self.bump_str("{{");
                }
                Some('{') => {
                    self.bump();
                    self.skip_interpolation_hole();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Skip an interpolation hole up to and including its closing `}`
    fn skip_interpolation_hole(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek_char(0) {
            let nested_start = self.pos;
            match c {
                '{' | '(' | '[' => {
                    depth += 1;
                    self.bump();
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                '}' if depth == 0 => {
                    self.bump();
                    return;
                }
                '}' => {
                    depth -= 1;
                    self.bump();
                }
                '"' if self.starts_with("\"\"\"") => self.lex_raw_string(nested_start, 0),
                '"' => self.lex_regular_string(nested_start),
                '@' if self.starts_with("@\"") => {
                    self.bump();
                    self.lex_verbatim_string(nested_start);
                }
                '$' if self.starts_with("$\"") => {
                    self.bump();
                    self.lex_interpolated_string(nested_start, false);
                }
                '\'' => self.lex_char_literal(nested_start),
                // Unbalanced holes end at the enclosing string's terminator
                c if is_newline(c) => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Cursor on the first of three or more quotes, `$` prefix already consumed
    fn lex_raw_string(&mut self, start: usize, dollars: usize) {
        let quotes = self.rest().chars().take_while(|&c| c == '"').count();
        self.pos += quotes;
        let delimiter = "\"".repeat(quotes);
        let mut brace_depth = 0usize;
        loop {
            if self.starts_with(&delimiter) {
                self.pos += quotes;
                // Extra quotes after the delimiter belong to the literal
                self.bump_while(|c| c == '"');
                return;
            }
            match self.bump() {
                None => {
                    self.error(ErrorCode::UnterminatedRawStringLiteral, start..self.pos);
                    return;
                }
                Some('{') if dollars > 0 => brace_depth += 1,
                Some('}') if dollars > 0 => brace_depth = brace_depth.saturating_sub(1),
                Some('"') if dollars > 0 && brace_depth >= dollars => {
                    // A nested string inside an interpolation hole
                    self.pos -= 1;
                    let nested_start = self.pos;
                    self.lex_regular_string(nested_start);
                }
                Some(_) => {}
            }
        }
    }

    /// Cursor on the opening `'`
    fn lex_char_literal(&mut self, start: usize) {
        self.bump();
        let mut chars = 0usize;
        loop {
            match self.peek_char(0) {
                None => {
                    self.error(ErrorCode::NewlineInConstant, start..self.pos);
                    return;
                }
                Some(c) if is_newline(c) => {
                    self.error(ErrorCode::NewlineInConstant, start..self.pos);
                    return;
                }
                Some('\'') => {
                    self.bump();
                    match chars {
                        0 => self.error(ErrorCode::EmptyCharLiteral, start..self.pos),
                        1 => {}
                        _ => self.error(ErrorCode::TooManyCharsInCharLiteral, start..self.pos),
                    }
                    return;
                }
                Some('\\') => {
                    self.bump();
                    chars += 1;
                    match self.peek_char(0) {
                        Some('u') | Some('x') | Some('U') => {
                            self.bump();
                            self.bump_while(|c| c.is_ascii_hexdigit());
                        }
                        Some(c) if !is_newline(c) => {
                            self.bump();
                        }
                        _ => {}
                    }
                }
                Some(_) => {
                    self.bump();
                    chars += 1;
                }
            }
        }
    }

    fn lex_number(&mut self, start: usize) {
        let radix_prefix = self.starts_with("0x")
            || self.starts_with("0X")
            || self.starts_with("0b")
            || self.starts_with("0B");
        if radix_prefix {
            let hex = matches!(self.peek_char(1), Some('x') | Some('X'));
            self.bump_str("0x");
            let digits_start = self.pos;
            if hex {
                self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
            } else {
                self.bump_while(|c| c == '0' || c == '1' || c == '_');
            }
            if self.pos == digits_start {
                self.error(ErrorCode::InvalidNumber, start..self.pos);
            }
        } else {
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
            // `1..2` is a range, not a real literal
            if self.peek_char(0) == Some('.')
                && matches!(self.peek_char(1), Some(c) if c.is_ascii_digit())
            {
                self.bump();
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek_char(0), Some('e') | Some('E')) {
                let sign = matches!(self.peek_char(1), Some('+') | Some('-'));
                let digit_at = if sign { 2 } else { 1 };
                if matches!(self.peek_char(digit_at), Some(c) if c.is_ascii_digit()) {
                    self.pos += digit_at;
                    self.bump_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        }
        // Suffixes (`u`, `L`, `UL`, `f`, `d`, `m`) and anything glued to the literal
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
    }
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_newline(c)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        lex_with_trivia(source).0.into_iter().map(|t| t.kind).collect()
    }

    fn non_trivia(source: &str) -> Vec<(SyntaxKind, &str)> {
        let (tokens, _) = lex_with_trivia(source);
        tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    fn assert_lossless(source: &str) {
        let (tokens, _) = lex_with_trivia(source);
        let rebuilt: String = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_lex_keywords_and_identifiers() {
        assert_eq!(
            non_trivia("class var @class extension"),
            vec![
                (SyntaxKind::ClassKw, "class"),
                (SyntaxKind::Ident, "var"),
                (SyntaxKind::Ident, "@class"),
                (SyntaxKind::Ident, "extension"),
            ]
        );
    }

    #[test]
    fn test_gt_is_never_combined() {
        assert_eq!(
            kinds("a>>=b"),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Gt,
                SyntaxKind::Gt,
                SyntaxKind::Eq,
                SyntaxKind::Ident
            ]
        );
        assert_eq!(kinds("<<="), vec![SyntaxKind::LtLtEq]);
    }

    #[test]
    fn test_lex_trivia_kinds() {
        assert_eq!(
            kinds("// c\r\n/// doc\n/* m */ #x"),
            vec![
                SyntaxKind::SingleLineComment,
                SyntaxKind::EndOfLine,
                SyntaxKind::DocComment,
                SyntaxKind::EndOfLine,
                SyntaxKind::MultiLineComment,
                SyntaxKind::Whitespace,
                SyntaxKind::Unknown,
                SyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn test_directive_at_line_start() {
        assert_eq!(
            kinds("  #region R\nx"),
            vec![
                SyntaxKind::Whitespace,
                SyntaxKind::PreprocessorDirective,
                SyntaxKind::EndOfLine,
                SyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            non_trivia("1..2 0xFF_u 1.5e-3f .5m 10UL"),
            vec![
                (SyntaxKind::NumericLiteral, "1"),
                (SyntaxKind::DotDot, ".."),
                (SyntaxKind::NumericLiteral, "2"),
                (SyntaxKind::NumericLiteral, "0xFF_u"),
                (SyntaxKind::NumericLiteral, "1.5e-3f"),
                (SyntaxKind::NumericLiteral, ".5m"),
                (SyntaxKind::NumericLiteral, "10UL"),
            ]
        );
    }

    #[test]
    fn test_lex_strings() {
        let source = r#""a\"b" @"x""y" $"v={a["k"]}" $@"{x}
line" 'c' '\n'"#;
        assert_eq!(
            non_trivia(source)
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            vec![
                SyntaxKind::StringLiteral,
                SyntaxKind::StringLiteral,
                SyntaxKind::InterpolatedStringLiteral,
                SyntaxKind::InterpolatedStringLiteral,
                SyntaxKind::CharLiteral,
                SyntaxKind::CharLiteral,
            ]
        );
        assert!(lex_with_trivia(source).1.is_empty());
    }

    #[test]
    fn test_lex_raw_strings() {
        let source = "\"\"\"\n  a \"quoted\" word\n  \"\"\" $$\"\"\"{{x}}\"\"\"";
        assert_eq!(
            non_trivia(source)
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            vec![
                SyntaxKind::RawStringLiteral,
                SyntaxKind::InterpolatedStringLiteral
            ]
        );
        assert!(lex_with_trivia(source).1.is_empty());
    }

    #[test]
    fn test_lexer_errors() {
        let (_, errors) = lex_with_trivia("\"abc\nx");
        assert_eq!(errors[0].code, ErrorCode::NewlineInConstant);

        let (_, errors) = lex_with_trivia("/* open");
        assert_eq!(errors[0].code, ErrorCode::UnterminatedComment);

        let (_, errors) = lex_with_trivia("''");
        assert_eq!(errors[0].code, ErrorCode::EmptyCharLiteral);

        let (tokens, errors) = lex_with_trivia("a ` b");
        assert_eq!(errors[0].code, ErrorCode::UnexpectedCharacter);
        assert_eq!(errors[0].args, vec!["`"]);
        assert_eq!(tokens[2].kind, SyntaxKind::Unknown);
    }

    #[test]
    fn test_lossless_lexing() {
        for source in [
            "",
            "class C { void M() { var (a, b) = (1, 2); } }",
            "\"unterminated",
            "/* unterminated",
            "x = $\"{(a ? \"b\" : \"c\")}\";\r\n",
            "'\\u0041' @\"multi\nline\"",
            "é = 1; // ünïcode",
        ] {
            assert_lossless(source);
        }
    }
}
