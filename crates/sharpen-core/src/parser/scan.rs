//! Side-effect-free lookahead scanners
//!
//! Every scanner works on absolute token indices and only reads the stream,
//! so callers can ask "what would this be" without a snapshot. The parsing
//! functions then commit to the production the scan picked.

use tracing::trace;

use super::{MAX_DEPTH, Parser};
use crate::cst::SyntaxKind;

/// How certain a scanned prefix is to be a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeScan {
    /// Only a type can look like this (`int`, `List<int>`, `T[]`)
    MustBeType,
    /// A parenthesized list of at least two types
    TupleType,
    /// A type followed by `?`
    NullableType,
    /// A type followed by `*`
    PointerOrMultiplication,
    /// A name with a possible type argument list
    GenericTypeOrExpression,
    /// A plain (possibly qualified) name
    NonGenericTypeOrExpression,
}

impl TypeScan {
    pub fn is_definite(self) -> bool {
        matches!(self, TypeScan::MustBeType | TypeScan::TupleType)
    }
}

/// Result of scanning a `<` that might open a type argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeArgScan {
    /// Contains something only a type can be, or omitted arguments
    Definite(usize),
    /// Type-shaped; the token after `>` has to confirm it
    Possible(usize),
    NotTypeArgumentList,
}

/// Where a type is being scanned; patterns restrict `?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanMode {
    Normal,
    Pattern,
}

impl Parser<'_> {
    /// Scan a type starting at `index`; returns its classification and the
    /// index just past it
    pub(crate) fn scan_type(&self, index: usize, mode: ScanMode) -> Option<(TypeScan, usize)> {
        self.scan_nested(|| self.scan_type_unguarded(index, mode))
    }

    /// Run a recursive scanner one level deeper; gives up past [`MAX_DEPTH`]
    fn scan_nested<R>(&self, scan: impl FnOnce() -> Option<R>) -> Option<R> {
        let depth = self.scan_depth.get();
        if depth >= MAX_DEPTH {
            return None;
        }
        self.scan_depth.set(depth + 1);
        let result = scan();
        self.scan_depth.set(depth);
        result
    }

    fn scan_type_unguarded(&self, index: usize, mode: ScanMode) -> Option<(TypeScan, usize)> {
        let (mut result, mut i) = match self.kind_at(index) {
            SyntaxKind::RefKw => {
                let mut i = index + 1;
                if self.kind_at(i) == SyntaxKind::ReadonlyKw {
                    i += 1;
                }
                let (_, end) = self.scan_type(i, mode)?;
                return Some((TypeScan::MustBeType, end));
            }
            SyntaxKind::LParen => {
                let end = self.scan_tuple_type(index)?;
                (TypeScan::TupleType, end)
            }
            kind if kind.is_predefined_type() => (TypeScan::MustBeType, index + 1),
            SyntaxKind::Ident => self.scan_named_type(index)?,
            _ => return None,
        };

        if self.kind_at(i) == SyntaxKind::Question && self.nullable_suffix_allowed(i, mode) {
            result = TypeScan::NullableType;
            i += 1;
        }

        loop {
            match self.kind_at(i) {
                SyntaxKind::Star if mode == ScanMode::Normal => {
                    if result != TypeScan::MustBeType {
                        result = TypeScan::PointerOrMultiplication;
                    }
                    i += 1;
                }
                SyntaxKind::LBracket
                    if matches!(
                        self.kind_at(i + 1),
                        SyntaxKind::Comma | SyntaxKind::RBracket
                    ) =>
                {
                    i = self.scan_rank_specifier(i)?;
                    result = TypeScan::MustBeType;
                }
                _ => break,
            }
        }

        Some((result, i))
    }

    pub(crate) fn nullable_suffix_allowed(&self, question: usize, mode: ScanMode) -> bool {
        match mode {
            ScanMode::Normal => true,
            ScanMode::Pattern => matches!(
                self.kind_at(question + 1),
                SyntaxKind::RParen
                    | SyntaxKind::Comma
                    | SyntaxKind::RBracket
                    | SyntaxKind::RBrace
                    | SyntaxKind::Semicolon
                    | SyntaxKind::FatArrow
                    | SyntaxKind::Colon
                    | SyntaxKind::EndOfFile
            ),
        }
    }

    /// `[` `,`* `]`
    fn scan_rank_specifier(&self, index: usize) -> Option<usize> {
        let mut i = index + 1;
        while self.kind_at(i) == SyntaxKind::Comma {
            i += 1;
        }
        (self.kind_at(i) == SyntaxKind::RBracket).then_some(i + 1)
    }

    /// `alias::`? `Name<...>`? (`.` `Name<...>`?)*
    fn scan_named_type(&self, index: usize) -> Option<(TypeScan, usize)> {
        let mut i = index;
        let mut result = TypeScan::NonGenericTypeOrExpression;

        if self.kind_at(i) == SyntaxKind::Ident && self.kind_at(i + 1) == SyntaxKind::ColonColon {
            i += 2;
        }

        loop {
            if self.kind_at(i) != SyntaxKind::Ident {
                return None;
            }
            i += 1;

            if self.kind_at(i) == SyntaxKind::Lt {
                match self.scan_type_argument_list(i) {
                    TypeArgScan::Definite(end) => {
                        result = TypeScan::MustBeType;
                        i = end;
                    }
                    TypeArgScan::Possible(end) => {
                        if result != TypeScan::MustBeType {
                            result = TypeScan::GenericTypeOrExpression;
                        }
                        i = end;
                    }
                    TypeArgScan::NotTypeArgumentList => return Some((result, i)),
                }
            }

            if self.kind_at(i) == SyntaxKind::Dot && self.kind_at(i + 1) == SyntaxKind::Ident {
                i += 1;
                continue;
            }
            return Some((result, i));
        }
    }

    /// Scan `<` ... `>` at `index`
    ///
    /// Each `>` is its own token, so a nested list closes exactly one level
    /// per `>` and `>>` needs no splitting.
    pub(crate) fn scan_type_argument_list(&self, index: usize) -> TypeArgScan {
        let mut i = index + 1;

        if matches!(self.kind_at(i), SyntaxKind::Comma | SyntaxKind::Gt) {
            while self.kind_at(i) == SyntaxKind::Comma {
                i += 1;
            }
            return if self.kind_at(i) == SyntaxKind::Gt {
                TypeArgScan::Definite(i + 1)
            } else {
                TypeArgScan::NotTypeArgumentList
            };
        }

        let mut definite = false;
        loop {
            let Some((kind, end)) = self.scan_type(i, ScanMode::Normal) else {
                return TypeArgScan::NotTypeArgumentList;
            };
            i = end;
            match kind {
                TypeScan::MustBeType | TypeScan::TupleType => definite = true,
                TypeScan::NullableType
                    if matches!(self.kind_at(i), SyntaxKind::Comma | SyntaxKind::Gt) =>
                {
                    definite = true
                }
                _ => {}
            }
            match self.kind_at(i) {
                SyntaxKind::Comma => i += 1,
                SyntaxKind::Gt => {
                    return if definite {
                        TypeArgScan::Definite(i + 1)
                    } else {
                        TypeArgScan::Possible(i + 1)
                    };
                }
                _ => return TypeArgScan::NotTypeArgumentList,
            }
        }
    }

    /// Can the token at `index` follow a type argument list in an expression?
    pub(crate) fn can_follow_type_argument_list(&self, index: usize) -> bool {
        matches!(
            self.kind_at(index),
            SyntaxKind::LParen
                | SyntaxKind::RParen
                | SyntaxKind::RBracket
                | SyntaxKind::RBrace
                | SyntaxKind::Colon
                | SyntaxKind::Semicolon
                | SyntaxKind::Comma
                | SyntaxKind::Dot
                | SyntaxKind::Question
                | SyntaxKind::EqEq
                | SyntaxKind::BangEq
                | SyntaxKind::Pipe
                | SyntaxKind::Caret
                | SyntaxKind::AmpAmp
                | SyntaxKind::PipePipe
                | SyntaxKind::Amp
                | SyntaxKind::LBracket
                | SyntaxKind::Ident
                | SyntaxKind::FatArrow
                | SyntaxKind::EndOfFile
        )
    }

    /// `(` type name? (`,` type name?)+ `)` with at least two elements
    pub(crate) fn scan_tuple_type(&self, index: usize) -> Option<usize> {
        let mut i = index + 1;
        let mut count = 0;
        loop {
            let (_, end) = self.scan_type(i, ScanMode::Normal)?;
            i = end;
            if self.kind_at(i) == SyntaxKind::Ident {
                i += 1;
            }
            count += 1;
            match self.kind_at(i) {
                SyntaxKind::Comma => i += 1,
                SyntaxKind::RParen => break,
                _ => return None,
            }
        }
        (count >= 2).then_some(i + 1)
    }

    /// Index of the `)` or `]` closing the bracket at `index`
    ///
    /// Stops at statement boundaries, so an unbalanced bracket yields `None`.
    pub(crate) fn matching_close(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SyntaxKind::LParen | SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                SyntaxKind::Semicolon
                | SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::EndOfFile => return None,
                _ => {}
            }
            i += 1;
        }
    }

    /// Number of top-level commas between the bracket at `open` and `close`
    pub(crate) fn top_level_commas(&self, open: usize, close: usize) -> usize {
        let mut depth = 0usize;
        let mut commas = 0;
        for i in open + 1..close {
            match self.kind_at(i) {
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                SyntaxKind::Comma if depth == 0 => commas += 1,
                _ => {}
            }
        }
        commas
    }

    /// `(` ... `)` `=>` at `index`
    pub(crate) fn scan_parenthesized_lambda(&self, index: usize) -> bool {
        self.matching_close(index)
            .is_some_and(|close| self.kind_at(close + 1) == SyntaxKind::FatArrow)
    }

    /// Does the `(` at `index` open a cast?
    ///
    /// The parenthesized type must be followed by something that starts a
    /// unary expression. Unless only a type fits inside the parentheses,
    /// the operators `+ - * & ++ --` and contextual words that continue an
    /// expression (`with`, `and`, `or`, `when`) rule a cast out.
    pub(crate) fn scan_cast(&self, index: usize) -> bool {
        let Some((kind, end)) = self.scan_type(index + 1, ScanMode::Normal) else {
            return false;
        };
        if self.kind_at(end) != SyntaxKind::RParen {
            return false;
        }
        let follow = end + 1;
        let decision = if kind.is_definite() {
            self.can_start_expression_at(follow)
        } else {
            self.can_follow_non_definite_cast(follow)
        };
        trace!(index, ?kind, decision, "cast scan");
        decision
    }

    fn can_follow_non_definite_cast(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        match kind {
            SyntaxKind::Ident => !matches!(self.text_at(index), "with" | "and" | "or" | "when"),
            SyntaxKind::LParen | SyntaxKind::Tilde | SyntaxKind::Bang => true,
            SyntaxKind::ThisKw
            | SyntaxKind::BaseKw
            | SyntaxKind::NewKw
            | SyntaxKind::TypeofKw
            | SyntaxKind::DefaultKw
            | SyntaxKind::CheckedKw
            | SyntaxKind::UncheckedKw
            | SyntaxKind::SizeofKw
            | SyntaxKind::DelegateKw
            | SyntaxKind::StackallocKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw => true,
            _ => kind.is_literal() || kind.is_predefined_type(),
        }
    }

    /// Can the token at `index` begin an expression?
    pub(crate) fn can_start_expression_at(&self, index: usize) -> bool {
        let kind = self.kind_at(index);
        match kind {
            SyntaxKind::Ident
            | SyntaxKind::LParen
            | SyntaxKind::LBracket
            | SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Amp
            | SyntaxKind::Star
            | SyntaxKind::Caret
            | SyntaxKind::DotDot
            | SyntaxKind::ThisKw
            | SyntaxKind::BaseKw
            | SyntaxKind::NewKw
            | SyntaxKind::TypeofKw
            | SyntaxKind::SizeofKw
            | SyntaxKind::DefaultKw
            | SyntaxKind::CheckedKw
            | SyntaxKind::UncheckedKw
            | SyntaxKind::DelegateKw
            | SyntaxKind::StackallocKw
            | SyntaxKind::ThrowKw
            | SyntaxKind::RefKw
            | SyntaxKind::StaticKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw => true,
            _ => kind.is_literal() || kind.is_predefined_type(),
        }
    }

    /// Does a deconstruction declaration start at `index`?
    ///
    /// Accepts `(` components `)` and `var (` designations `)` followed by
    /// `=`, or by `in` when `for_each` is set. Every component is typed
    /// (`T x`), nested, or `var (...)`; each parenthesized level needs at
    /// least two of them.
    pub(crate) fn scan_deconstruction(&self, index: usize, for_each: bool) -> bool {
        let end = match self.kind_at(index) {
            SyntaxKind::LParen => self.scan_component_list(index),
            SyntaxKind::Ident
                if self.text_at(index) == "var" && self.kind_at(index + 1) == SyntaxKind::LParen =>
            {
                self.scan_designation_list(index + 1)
            }
            _ => None,
        };
        let Some(end) = end else {
            return false;
        };
        let follow = self.kind_at(end);
        let decision = if for_each {
            follow == SyntaxKind::InKw
        } else {
            follow == SyntaxKind::Eq
        };
        trace!(index, decision, "deconstruction scan");
        decision
    }

    fn scan_component_list(&self, index: usize) -> Option<usize> {
        self.scan_nested(|| self.scan_component_list_unguarded(index))
    }

    fn scan_component_list_unguarded(&self, index: usize) -> Option<usize> {
        let mut i = index + 1;
        let mut count = 0;
        loop {
            i = self.scan_component(i)?;
            count += 1;
            match self.kind_at(i) {
                SyntaxKind::Comma => i += 1,
                SyntaxKind::RParen => break,
                _ => return None,
            }
        }
        (count >= 2).then_some(i + 1)
    }

    fn scan_component(&self, index: usize) -> Option<usize> {
        match self.kind_at(index) {
            SyntaxKind::LParen => self.scan_component_list(index),
            SyntaxKind::Ident
                if self.text_at(index) == "var" && self.kind_at(index + 1) == SyntaxKind::LParen =>
            {
                self.scan_designation_list(index + 1)
            }
            _ => {
                let (_, end) = self.scan_type(index, ScanMode::Normal)?;
                (self.kind_at(end) == SyntaxKind::Ident).then_some(end + 1)
            }
        }
    }

    /// `(` designation (`,` designation)+ `)` where a designation is a name
    /// or a nested list
    pub(crate) fn scan_designation_list(&self, index: usize) -> Option<usize> {
        self.scan_nested(|| self.scan_designation_list_unguarded(index))
    }

    fn scan_designation_list_unguarded(&self, index: usize) -> Option<usize> {
        let mut i = index + 1;
        let mut count = 0;
        loop {
            match self.kind_at(i) {
                SyntaxKind::Ident => i += 1,
                SyntaxKind::LParen => i = self.scan_designation_list(i)?,
                _ => return None,
            }
            count += 1;
            match self.kind_at(i) {
                SyntaxKind::Comma => i += 1,
                SyntaxKind::RParen => break,
                _ => return None,
            }
        }
        (count >= 2).then_some(i + 1)
    }

    /// Skip a type parameter list `<` ... `>` starting at `index`
    pub(crate) fn scan_type_parameter_list(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SyntaxKind::Lt => depth += 1,
                SyntaxKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SyntaxKind::Ident
                | SyntaxKind::Comma
                | SyntaxKind::Dot
                | SyntaxKind::InKw
                | SyntaxKind::OutKw
                | SyntaxKind::LBracket
                | SyntaxKind::RBracket => {}
                _ => return None,
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    fn with_parser<R>(text: &str, f: impl FnOnce(&Parser<'_>) -> R) -> R {
        let parser = Parser::new(text, ParseOptions::default(), None);
        f(&parser)
    }

    #[test]
    fn test_scan_type_classification() {
        with_parser("int x", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Normal), Some((TypeScan::MustBeType, 1)));
        });
        with_parser("a.b.c x", |p| {
            assert_eq!(
                p.scan_type(0, ScanMode::Normal),
                Some((TypeScan::NonGenericTypeOrExpression, 5))
            );
        });
        with_parser("T? x", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Normal), Some((TypeScan::NullableType, 2)));
        });
        with_parser("a * b", |p| {
            assert_eq!(
                p.scan_type(0, ScanMode::Normal),
                Some((TypeScan::PointerOrMultiplication, 2))
            );
        });
        with_parser("A[,] x", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Normal), Some((TypeScan::MustBeType, 4)));
        });
    }

    #[test]
    fn test_scan_tuple_type_needs_two_elements() {
        with_parser("(T, T) x", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Normal), Some((TypeScan::TupleType, 5)));
        });
        with_parser("(T) x", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Normal), None);
        });
    }

    #[test]
    fn test_type_argument_list_results() {
        with_parser("A<int> x", |p| {
            assert_eq!(p.scan_type_argument_list(1), TypeArgScan::Definite(4));
        });
        with_parser("A<,> x", |p| {
            assert_eq!(p.scan_type_argument_list(1), TypeArgScan::Definite(4));
        });
        with_parser("A<B> x", |p| {
            assert_eq!(p.scan_type_argument_list(1), TypeArgScan::Possible(4));
        });
        with_parser("a < b + c", |p| {
            assert_eq!(p.scan_type_argument_list(1), TypeArgScan::NotTypeArgumentList);
        });
    }

    #[test]
    fn test_generic_commit_depends_on_follow() {
        with_parser("F<T>(x)", |p| assert!(p.can_follow_type_argument_list(4)));
        with_parser("a < b > c", |p| assert!(p.can_follow_type_argument_list(4)));
        with_parser("a < b > 2", |p| assert!(!p.can_follow_type_argument_list(4)));
        with_parser("U<T<S>>> 2", |p| assert!(!p.can_follow_type_argument_list(7)));
    }

    #[test]
    fn test_pattern_mode_restricts_nullable() {
        with_parser("int ? a : b", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Pattern), Some((TypeScan::MustBeType, 1)));
        });
        with_parser("int? )", |p| {
            assert_eq!(p.scan_type(0, ScanMode::Pattern), Some((TypeScan::NullableType, 2)));
        });
    }

    #[test]
    fn test_cast_scan() {
        with_parser("(int)-1", |p| assert!(p.scan_cast(0)));
        with_parser("(x)-1", |p| assert!(!p.scan_cast(0)));
        with_parser("(x)y", |p| assert!(p.scan_cast(0)));
        with_parser("(x).ToString()", |p| assert!(!p.scan_cast(0)));
        with_parser("(x) with { }", |p| assert!(!p.scan_cast(0)));
    }

    #[test]
    fn test_deconstruction_scan() {
        with_parser("(int a, int b) = x;", |p| assert!(p.scan_deconstruction(0, false)));
        with_parser("((Int32 a, Int64 b), Int32 c) = foo;", |p| {
            assert!(p.scan_deconstruction(0, false))
        });
        with_parser("var (a, b) = foo;", |p| assert!(p.scan_deconstruction(0, false)));
        with_parser("(x, y) = e;", |p| assert!(!p.scan_deconstruction(0, false)));
        with_parser("(int a, int b) in e", |p| assert!(p.scan_deconstruction(0, true)));
        with_parser("(int a) = x;", |p| assert!(!p.scan_deconstruction(0, false)));
    }

    #[test]
    fn test_lambda_scan() {
        with_parser("(a, b) => a", |p| assert!(p.scan_parenthesized_lambda(0)));
        with_parser("(a, b) + c", |p| assert!(!p.scan_parenthesized_lambda(0)));
    }
}
