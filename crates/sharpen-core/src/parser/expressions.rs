//! Expression parsing
//!
//! Binary operators go through precedence climbing over [`Precedence`].
//! Prefix operators, casts, lambdas and `throw` are decided at the term
//! level; member access, invocation, indexing and `?.` form the postfix
//! chain of a primary expression.

use tracing::trace;

use super::Parser;
use super::contextual::{Contextual, Position};
use super::scan::{ScanMode, TypeArgScan};
use super::types::TypeMode;
use crate::cst::{Checkpoint, SyntaxKind};
use crate::diagnostics::ErrorCode;
use crate::options::Feature;

/// Binding strength, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Expression,
    Assignment,
    Lambda,
    Conditional,
    Coalescing,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Switch,
    Range,
    Unary,
    Primary,
}

impl Precedence {
    /// The next tighter level, used for the right operand of a
    /// left-associative operator
    fn next(self) -> Precedence {
        match self {
            Precedence::Expression => Precedence::Assignment,
            Precedence::Assignment => Precedence::Lambda,
            Precedence::Lambda => Precedence::Conditional,
            Precedence::Conditional => Precedence::Coalescing,
            Precedence::Coalescing => Precedence::ConditionalOr,
            Precedence::ConditionalOr => Precedence::ConditionalAnd,
            Precedence::ConditionalAnd => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalXor,
            Precedence::LogicalXor => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Switch,
            Precedence::Switch => Precedence::Range,
            Precedence::Range => Precedence::Unary,
            Precedence::Unary | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Precedence of a left-associative binary operator
fn binary_precedence(kind: SyntaxKind) -> Option<Precedence> {
    let precedence = match kind {
        SyntaxKind::PipePipe => Precedence::ConditionalOr,
        SyntaxKind::AmpAmp => Precedence::ConditionalAnd,
        SyntaxKind::Pipe => Precedence::LogicalOr,
        SyntaxKind::Caret => Precedence::LogicalXor,
        SyntaxKind::Amp => Precedence::LogicalAnd,
        SyntaxKind::EqEq | SyntaxKind::BangEq => Precedence::Equality,
        SyntaxKind::Lt | SyntaxKind::Gt | SyntaxKind::LtEq | SyntaxKind::GtEq => {
            Precedence::Relational
        }
        SyntaxKind::LtLt | SyntaxKind::GtGt | SyntaxKind::GtGtGt => Precedence::Shift,
        SyntaxKind::Plus | SyntaxKind::Minus => Precedence::Additive,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => Precedence::Multiplicative,
        _ => return None,
    };
    Some(precedence)
}

fn is_prefix_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Amp
            | SyntaxKind::Star
            | SyntaxKind::Caret
    )
}

impl Parser<'_> {
    /// Parse a full expression
    pub(crate) fn parse_expression(&mut self) {
        self.parse_sub_expression(Precedence::Expression);
    }

    /// Parse an expression whose operators bind at least as tightly as `min`
    pub(crate) fn parse_sub_expression(&mut self, min: Precedence) {
        if !self.enter() {
            self.missing_name();
            return;
        }
        let checkpoint = self.checkpoint();
        if self.parse_term() {
            self.parse_binary_operators(checkpoint, min);
        }
        self.exit();
    }

    /// Returns `false` when the term already ends the expression (lambdas,
    /// `throw`)
    fn parse_term(&mut self) -> bool {
        let kind = self.current();
        if kind == SyntaxKind::ThrowKw {
            let start = self.pos();
            self.start_node(SyntaxKind::ThrowExpression);
            self.bump();
            self.check_feature(Feature::ThrowExpression, self.token_range(start));
            self.parse_sub_expression(Precedence::Coalescing);
            self.finish_node();
            return false;
        }
        if self.at_lambda_start() {
            self.parse_lambda();
            return false;
        }

        match kind {
            SyntaxKind::LParen if self.scan_cast(self.pos()) => self.parse_cast(),
            SyntaxKind::DotDot => {
                let start = self.pos();
                self.start_node(SyntaxKind::RangeExpression);
                self.bump();
                self.check_feature(Feature::Ranges, self.token_range(start));
                if self.can_start_expression_at(self.pos()) {
                    self.parse_sub_expression(Precedence::Range.next());
                }
                self.finish_node();
            }
            SyntaxKind::RefKw => {
                self.start_node(SyntaxKind::RefExpression);
                self.bump();
                self.parse_sub_expression(Precedence::Unary);
                self.finish_node();
            }
            kind if is_prefix_operator(kind) => {
                if kind == SyntaxKind::Caret {
                    self.check_feature_here(Feature::Ranges);
                }
                self.start_node(SyntaxKind::PrefixUnaryExpression);
                self.bump();
                self.parse_sub_expression(Precedence::Unary);
                self.finish_node();
            }
            SyntaxKind::Ident
                if self.classify_contextual(self.pos(), Position::Expression)
                    == Contextual::AwaitExpression =>
            {
                self.start_node(SyntaxKind::AwaitExpression);
                self.bump();
                self.parse_sub_expression(Precedence::Unary);
                self.finish_node();
            }
            _ => self.parse_primary_expression(),
        }
        true
    }

    fn parse_binary_operators(&mut self, checkpoint: Checkpoint, min: Precedence) {
        loop {
            let (op, count) = self.composed_operator();

            if op.is_assignment_operator() {
                if min > Precedence::Assignment {
                    break;
                }
                if op == SyntaxKind::QuestionQuestionEq {
                    self.check_feature_here(Feature::CoalescingAssignment);
                }
                self.start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
                self.bump_compound(count, op);
                self.parse_sub_expression(Precedence::Assignment);
                self.finish_node();
                continue;
            }

            match op {
                SyntaxKind::Question => {
                    if min > Precedence::Conditional {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::ConditionalExpression);
                    self.bump();
                    self.parse_expression();
                    self.expect(SyntaxKind::Colon);
                    self.parse_expression();
                    self.finish_node();
                }
                SyntaxKind::QuestionQuestion => {
                    if min > Precedence::Coalescing {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump();
                    self.parse_sub_expression(Precedence::Coalescing);
                    self.finish_node();
                }
                SyntaxKind::IsKw => {
                    if min > Precedence::Relational {
                        break;
                    }
                    self.parse_is_operator(checkpoint);
                }
                SyntaxKind::AsKw => {
                    if min > Precedence::Relational {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump();
                    self.parse_type(TypeMode::Pattern);
                    self.finish_node();
                }
                SyntaxKind::SwitchKw => {
                    if min > Precedence::Switch {
                        break;
                    }
                    self.parse_switch_expression(checkpoint);
                }
                SyntaxKind::Ident if self.at_contextual("with") && self.nth(1) == SyntaxKind::LBrace => {
                    if min > Precedence::Switch {
                        break;
                    }
                    let start = self.pos();
                    self.start_node_at(checkpoint, SyntaxKind::WithExpression);
                    self.bump();
                    self.check_feature(Feature::Records, self.token_range(start));
                    self.parse_initializer();
                    self.finish_node();
                }
                SyntaxKind::DotDot => {
                    if min > Precedence::Range {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::RangeExpression);
                    self.check_feature_here(Feature::Ranges);
                    self.bump();
                    if self.can_start_expression_at(self.pos()) {
                        self.parse_sub_expression(Precedence::Range.next());
                    }
                    self.finish_node();
                }
                _ => {
                    let Some(precedence) = binary_precedence(op) else {
                        break;
                    };
                    if precedence < min {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump_compound(count, op);
                    self.parse_sub_expression(precedence.next());
                    self.finish_node();
                }
            }
        }
    }

    /// `x is Type` stays a binary expression; anything else is a pattern
    fn parse_is_operator(&mut self, checkpoint: Checkpoint) {
        if self.is_type_after_is(self.pos() + 1) {
            self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
            self.bump();
            self.parse_type(TypeMode::Pattern);
            self.finish_node();
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::IsPatternExpression);
        self.bump();
        let start = self.pos();
        self.parse_pattern();
        self.check_feature(Feature::PatternMatching, self.token_range_from(start));
        self.finish_node();
    }

    fn is_type_after_is(&self, index: usize) -> bool {
        if self.is_contextual_at(index, "not") && self.can_start_pattern_at(index + 1) {
            return false;
        }
        let Some((_, end)) = self.scan_type(index, ScanMode::Pattern) else {
            return false;
        };
        !matches!(
            self.kind_at(end),
            SyntaxKind::Ident
                | SyntaxKind::LParen
                | SyntaxKind::LBrace
                | SyntaxKind::LBracket
                | SyntaxKind::Dot
                | SyntaxKind::ColonColon
        )
    }

    fn parse_switch_expression(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::SwitchExpression);
        self.check_feature_here(Feature::SwitchExpression);
        self.bump();
        self.expect(SyntaxKind::LBrace);
        self.parse_separated(SyntaxKind::RBrace, true, |p| p.parse_switch_expression_arm());
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_switch_expression_arm(&mut self) {
        self.start_node(SyntaxKind::SwitchExpressionArm);
        self.parse_case_pattern();
        if self.at_contextual("when") {
            self.parse_when_clause();
        }
        self.expect(SyntaxKind::FatArrow);
        self.parse_expression();
        self.finish_node();
    }

    fn parse_cast(&mut self) {
        self.start_node(SyntaxKind::CastExpression);
        self.bump();
        self.parse_type(TypeMode::Normal);
        self.expect(SyntaxKind::RParen);
        self.parse_sub_expression(Precedence::Unary);
        self.finish_node();
    }

    // Lambdas

    /// Index just past `static`/`async` lambda modifiers starting at `index`
    fn lambda_modifiers_end(&self, index: usize) -> usize {
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SyntaxKind::StaticKw => i += 1,
                SyntaxKind::Ident
                    if self.classify_contextual(i, Position::Expression)
                        == Contextual::AsyncModifier =>
                {
                    i += 1
                }
                _ => return i,
            }
        }
    }

    fn at_lambda_start(&self) -> bool {
        let pos = self.pos();
        let i = self.lambda_modifiers_end(pos);
        match self.kind_at(i) {
            SyntaxKind::Ident => self.kind_at(i + 1) == SyntaxKind::FatArrow,
            SyntaxKind::LParen => self.scan_parenthesized_lambda(i),
            SyntaxKind::DelegateKw => i > pos,
            _ => false,
        }
    }

    fn parse_lambda(&mut self) {
        let modifiers_end = self.lambda_modifiers_end(self.pos());
        let kind = match self.kind_at(modifiers_end) {
            SyntaxKind::Ident => SyntaxKind::SimpleLambdaExpression,
            SyntaxKind::LParen => SyntaxKind::ParenthesizedLambdaExpression,
            _ => SyntaxKind::AnonymousMethodExpression,
        };
        self.start_node(kind);
        while self.pos() < modifiers_end {
            if self.at(SyntaxKind::StaticKw) {
                self.check_feature_here(Feature::StaticLambdas);
            }
            self.bump();
        }
        match kind {
            SyntaxKind::SimpleLambdaExpression => {
                self.start_node(SyntaxKind::Parameter);
                self.bump();
                self.finish_node();
                self.expect(SyntaxKind::FatArrow);
                self.parse_lambda_body();
            }
            SyntaxKind::ParenthesizedLambdaExpression => {
                self.parse_parameter_list(super::members::ParameterContext::Lambda);
                self.expect(SyntaxKind::FatArrow);
                self.parse_lambda_body();
            }
            _ => self.parse_anonymous_method_tail(),
        }
        self.finish_node();
    }

    fn parse_lambda_body(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression();
        }
    }

    /// `delegate` parameter-list? block
    fn parse_anonymous_method_tail(&mut self) {
        self.expect(SyntaxKind::DelegateKw);
        if self.at(SyntaxKind::LParen) {
            self.parse_parameter_list(super::members::ParameterContext::Declaration);
        }
        self.parse_block();
    }

    // Primary expressions

    fn parse_primary_expression(&mut self) {
        let checkpoint = self.checkpoint();
        if self.parse_primary() {
            self.parse_postfix(checkpoint);
        }
    }

    /// Returns `false` when nothing could be parsed and a placeholder was
    /// inserted instead
    fn parse_primary(&mut self) -> bool {
        let kind = self.current();
        match kind {
            SyntaxKind::TrueKw | SyntaxKind::FalseKw | SyntaxKind::NullKw => {
                self.literal();
            }
            kind if kind.is_literal() => {
                if kind == SyntaxKind::RawStringLiteral {
                    self.check_feature_here(Feature::RawStringLiterals);
                }
                self.literal();
            }
            SyntaxKind::DefaultKw => {
                if self.nth(1) == SyntaxKind::LParen {
                    self.parenthesized_type_operator(SyntaxKind::DefaultExpression);
                } else {
                    self.check_feature_here(Feature::DefaultLiteral);
                    self.literal();
                }
            }
            SyntaxKind::ThisKw => self.single_token_node(SyntaxKind::ThisExpression),
            SyntaxKind::BaseKw => self.single_token_node(SyntaxKind::BaseExpression),
            SyntaxKind::TypeofKw => self.parenthesized_type_operator(SyntaxKind::TypeOfExpression),
            SyntaxKind::SizeofKw => self.parenthesized_type_operator(SyntaxKind::SizeOfExpression),
            SyntaxKind::CheckedKw | SyntaxKind::UncheckedKw => {
                self.start_node(SyntaxKind::CheckedExpression);
                self.bump();
                self.expect(SyntaxKind::LParen);
                self.parse_expression();
                self.expect(SyntaxKind::RParen);
                self.finish_node();
            }
            SyntaxKind::NewKw => self.parse_new_expression(),
            SyntaxKind::StackallocKw => self.parse_stackalloc(),
            SyntaxKind::DelegateKw => {
                self.start_node(SyntaxKind::AnonymousMethodExpression);
                self.parse_anonymous_method_tail();
                self.finish_node();
            }
            SyntaxKind::LParen => self.parse_parenthesized_or_tuple(),
            SyntaxKind::LBracket => self.parse_collection_expression(),
            kind if kind.is_predefined_type() => {
                self.single_token_node(SyntaxKind::PredefinedType);
            }
            SyntaxKind::Ident => self.parse_name_expression(),
            _ => {
                self.missing_expression();
                return false;
            }
        }
        true
    }

    fn literal(&mut self) {
        self.single_token_node(SyntaxKind::LiteralExpression);
    }

    fn single_token_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `typeof(T)`, `sizeof(T)`, `default(T)`
    fn parenthesized_type_operator(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect(SyntaxKind::LParen);
        self.parse_type(TypeMode::Normal);
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    /// Placeholder for an expression the source lacks
    ///
    /// Nothing is consumed; the caller decides whether to skip the token.
    pub(crate) fn missing_expression(&mut self) {
        let range = self.missing_range();
        let (code, args) = if self.at_end() {
            (ErrorCode::IdentifierExpected, Vec::new())
        } else {
            (ErrorCode::InvalidExprTerm, vec![self.current_text().to_string()])
        };
        self.missing_name();
        self.error_at(range, code, args);
    }

    fn parse_name_expression(&mut self) {
        if self.nth(1) == SyntaxKind::ColonColon {
            self.start_node(SyntaxKind::AliasQualifiedName);
            self.parse_identifier_name();
            self.bump();
            self.parse_simple_name_in_expression();
            self.finish_node();
        } else {
            self.parse_simple_name_in_expression();
        }
    }

    /// A name whose `<` only opens a type argument list when the lookahead
    /// says so
    ///
    /// A list that only may be type arguments is parsed speculatively and
    /// kept when the token after it can follow a generic name. Otherwise the
    /// attempt is rolled back and `<` is left to the binary operator loop.
    pub(crate) fn parse_simple_name_in_expression(&mut self) {
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Lt {
            match self.scan_type_argument_list(self.pos() + 1) {
                TypeArgScan::Definite(_) => {
                    self.parse_generic_name();
                    return;
                }
                TypeArgScan::Possible(_) => {
                    let snapshot = self.snapshot();
                    self.parse_generic_name();
                    if self.can_follow_type_argument_list(self.pos()) {
                        return;
                    }
                    trace!(pos = self.pos(), "not a generic name");
                    self.rewind(snapshot);
                }
                TypeArgScan::NotTypeArgumentList => {}
            }
        }
        self.parse_identifier_name();
    }

    fn parse_generic_name(&mut self) {
        self.start_node(SyntaxKind::GenericName);
        self.bump();
        self.parse_type_argument_list();
        self.finish_node();
    }

    fn parse_postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.current() {
                SyntaxKind::Dot | SyntaxKind::Arrow => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.parse_simple_name_in_expression();
                    self.finish_node();
                }
                SyntaxKind::LParen => {
                    self.start_node_at(checkpoint, SyntaxKind::InvocationExpression);
                    self.parse_argument_list();
                    self.finish_node();
                }
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::ElementAccessExpression);
                    self.parse_bracketed_argument_list();
                    self.finish_node();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus | SyntaxKind::Bang => {
                    self.start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::Question if self.at_conditional_access() => {
                    self.start_node_at(checkpoint, SyntaxKind::ConditionalAccessExpression);
                    self.bump();
                    let binding = self.checkpoint();
                    if self.at(SyntaxKind::Dot) {
                        self.start_node(SyntaxKind::MemberBindingExpression);
                        self.bump();
                        self.parse_simple_name_in_expression();
                    } else {
                        self.start_node(SyntaxKind::ElementBindingExpression);
                        self.parse_bracketed_argument_list();
                    }
                    self.finish_node();
                    self.parse_postfix(binding);
                    self.finish_node();
                    return;
                }
                _ => return,
            }
        }
    }

    /// `?.` always; `?[` only when adjacent and not the start of a
    /// conditional whose branch is a collection expression
    fn at_conditional_access(&self) -> bool {
        let pos = self.pos();
        match self.nth(1) {
            SyntaxKind::Dot => true,
            SyntaxKind::LBracket => {
                self.stream.is_adjacent(pos)
                    && !self
                        .matching_close(pos + 1)
                        .is_some_and(|close| self.kind_at(close + 1) == SyntaxKind::Colon)
            }
            _ => false,
        }
    }

    // Arguments

    pub(crate) fn parse_argument_list(&mut self) {
        self.parse_arguments(SyntaxKind::ArgumentList, SyntaxKind::LParen, SyntaxKind::RParen);
    }

    pub(crate) fn parse_bracketed_argument_list(&mut self) {
        self.parse_arguments(
            SyntaxKind::BracketedArgumentList,
            SyntaxKind::LBracket,
            SyntaxKind::RBracket,
        );
    }

    fn parse_arguments(&mut self, kind: SyntaxKind, open: SyntaxKind, close: SyntaxKind) {
        self.start_node(kind);
        self.expect(open);
        self.parse_separated(close, false, |p| p.parse_argument());
        self.expect(close);
        self.finish_node();
    }

    fn parse_argument(&mut self) {
        self.start_node(SyntaxKind::Argument);
        self.parse_name_colon();
        if matches!(
            self.current(),
            SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw
        ) {
            let is_out = self.at(SyntaxKind::OutKw);
            self.bump();
            if self.is_declaration_expression_at(self.pos()) {
                if is_out {
                    self.check_feature_here(Feature::OutVariables);
                }
                self.parse_declaration_expression();
            } else {
                self.parse_expression();
            }
        } else {
            self.parse_expression();
        }
        self.finish_node();
    }

    /// `name:` before an argument, tuple element or subpattern
    pub(crate) fn parse_name_colon(&mut self) {
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Colon {
            self.start_node(SyntaxKind::NameColon);
            self.parse_identifier_name();
            self.bump();
            self.finish_node();
        }
    }

    /// `T x`, `var x`, `var (a, b)` where an expression is expected
    pub(crate) fn is_declaration_expression_at(&self, index: usize) -> bool {
        if self.is_contextual_at(index, "var") && self.kind_at(index + 1) == SyntaxKind::LParen {
            return self.scan_designation_list(index + 1).is_some();
        }
        let Some((_, end)) = self.scan_type(index, ScanMode::Normal) else {
            return false;
        };
        self.kind_at(end) == SyntaxKind::Ident
            && matches!(
                self.kind_at(end + 1),
                SyntaxKind::Comma | SyntaxKind::RParen | SyntaxKind::RBracket
            )
    }

    pub(crate) fn parse_declaration_expression(&mut self) {
        self.start_node(SyntaxKind::DeclarationExpression);
        self.parse_type(TypeMode::Normal);
        self.parse_designation();
        self.finish_node();
    }

    // Parentheses, tuples, collections

    /// `(e)` or a tuple literal; the first element decides once it is parsed
    fn parse_parenthesized_or_tuple(&mut self) {
        let start = self.pos();
        let checkpoint = self.checkpoint();
        let tuple_first = (self.nth(1) == SyntaxKind::Ident && self.nth(2) == SyntaxKind::Colon)
            || self.is_declaration_expression_at(start + 1);
        self.bump();

        if !tuple_first {
            let element = self.checkpoint();
            self.parse_expression();
            if !self.at(SyntaxKind::Comma) {
                self.start_node_at(checkpoint, SyntaxKind::ParenthesizedExpression);
                self.expect(SyntaxKind::RParen);
                self.finish_node();
                return;
            }
            self.start_node_at(element, SyntaxKind::Argument);
            self.finish_node();
            self.bump();
        }

        let mut count = usize::from(!tuple_first);
        count += self.parse_separated(SyntaxKind::RParen, false, |p| p.parse_tuple_element());
        self.expect(SyntaxKind::RParen);
        self.start_node_at(checkpoint, SyntaxKind::TupleExpression);
        self.finish_node();

        let range = self.token_range_from(start);
        self.check_feature(Feature::Tuples, range);
        if count < 2 {
            self.error_at(range, ErrorCode::TupleTooFewElements, Vec::new());
        }
    }

    fn parse_tuple_element(&mut self) {
        self.start_node(SyntaxKind::Argument);
        self.parse_name_colon();
        if self.is_declaration_expression_at(self.pos()) {
            self.parse_declaration_expression();
        } else {
            self.parse_expression();
        }
        self.finish_node();
    }

    /// `[a, ..b]`
    fn parse_collection_expression(&mut self) {
        let start = self.pos();
        self.start_node(SyntaxKind::CollectionExpression);
        self.bump();
        self.parse_separated(SyntaxKind::RBracket, true, |p| {
            if p.at(SyntaxKind::DotDot) {
                p.start_node(SyntaxKind::SpreadElement);
                p.bump();
                p.parse_expression();
            } else {
                p.start_node(SyntaxKind::ExpressionElement);
                p.parse_expression();
            }
            p.finish_node();
        });
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
        self.check_feature(Feature::CollectionExpressions, self.token_range_from(start));
    }

    /// `{ a, { b }, X = c }`
    pub(crate) fn parse_initializer(&mut self) {
        self.start_node(SyntaxKind::InitializerExpression);
        self.expect(SyntaxKind::LBrace);
        self.parse_separated(SyntaxKind::RBrace, true, |p| {
            if p.at(SyntaxKind::LBrace) {
                p.parse_initializer();
            } else {
                p.parse_expression();
            }
        });
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    // Creation expressions

    fn parse_new_expression(&mut self) {
        let start = self.pos();
        let checkpoint = self.checkpoint();
        match self.nth(1) {
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ImplicitObjectCreationExpression);
                self.bump();
                self.check_feature(Feature::TargetTypedNew, self.token_range(start));
                self.parse_argument_list();
                if self.at(SyntaxKind::LBrace) {
                    self.parse_initializer();
                }
                self.finish_node();
            }
            SyntaxKind::LBracket => {
                self.start_node(SyntaxKind::ImplicitArrayCreationExpression);
                self.bump();
                self.bump();
                while self.eat(SyntaxKind::Comma) {}
                self.expect(SyntaxKind::RBracket);
                self.parse_initializer();
                self.finish_node();
            }
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::AnonymousObjectCreationExpression);
                self.bump();
                self.bump();
                self.parse_separated(SyntaxKind::RBrace, true, |p| {
                    p.start_node(SyntaxKind::AnonymousObjectMemberDeclarator);
                    if p.at(SyntaxKind::Ident) && p.nth(1) == SyntaxKind::Eq {
                        p.parse_name_equals();
                    }
                    p.parse_expression();
                    p.finish_node();
                });
                self.expect(SyntaxKind::RBrace);
                self.finish_node();
            }
            _ => {
                self.bump();
                let type_start = self.checkpoint();
                self.parse_type(TypeMode::NewExpression);
                if self.at(SyntaxKind::LBracket) {
                    self.start_node_at(type_start, SyntaxKind::ArrayType);
                    while self.at(SyntaxKind::LBracket) {
                        self.parse_sized_rank_specifier();
                    }
                    self.finish_node();
                    self.start_node_at(checkpoint, SyntaxKind::ArrayCreationExpression);
                    if self.at(SyntaxKind::LBrace) {
                        self.parse_initializer();
                    }
                    self.finish_node();
                    return;
                }

                self.start_node_at(checkpoint, SyntaxKind::ObjectCreationExpression);
                match self.current() {
                    SyntaxKind::LParen => {
                        self.parse_argument_list();
                        if self.at(SyntaxKind::LBrace) {
                            self.parse_initializer();
                        }
                    }
                    SyntaxKind::LBrace => self.parse_initializer(),
                    _ => {
                        self.start_node(SyntaxKind::ArgumentList);
                        self.expect(SyntaxKind::LParen);
                        self.missing(SyntaxKind::RParen);
                        self.finish_node();
                    }
                }
                self.finish_node();
            }
        }
    }

    /// `name =` in anonymous objects, attribute arguments and using aliases
    pub(crate) fn parse_name_equals(&mut self) {
        self.start_node(SyntaxKind::NameEquals);
        self.parse_identifier_name();
        self.expect(SyntaxKind::Eq);
        self.finish_node();
    }

    /// `[` size? (`,` size?)* `]`
    fn parse_sized_rank_specifier(&mut self) {
        self.start_node(SyntaxKind::ArrayRankSpecifier);
        self.expect(SyntaxKind::LBracket);
        loop {
            if matches!(self.current(), SyntaxKind::Comma | SyntaxKind::RBracket) {
                self.omitted_node(SyntaxKind::OmittedArraySizeExpression);
            } else {
                self.parse_expression();
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
    }

    fn parse_stackalloc(&mut self) {
        self.start_node(SyntaxKind::StackAllocArrayCreationExpression);
        self.bump();
        if self.at(SyntaxKind::LBracket) {
            self.bump();
            self.expect(SyntaxKind::RBracket);
        } else {
            let type_start = self.checkpoint();
            self.parse_type(TypeMode::NewExpression);
            self.start_node_at(type_start, SyntaxKind::ArrayType);
            loop {
                self.parse_sized_rank_specifier();
                if !self.at(SyntaxKind::LBracket) {
                    break;
                }
            }
            self.finish_node();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_initializer();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxNode;
    use crate::parser::{Parse, node_kinds, parse_fragment};

    fn expr(text: &str) -> Parse {
        parse_fragment(text, |p| p.parse_expression())
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        node_kinds(&expr(text).syntax()).into_iter().skip(1).collect()
    }

    fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
        node.descendants_with_tokens().any(|e| e.kind() == kind)
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            kinds("a + b * c"),
            vec![
                SyntaxKind::BinaryExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::BinaryExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::IdentifierName,
            ]
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(
            kinds("a = b = c"),
            vec![
                SyntaxKind::AssignmentExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::AssignmentExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::IdentifierName,
            ]
        );
    }

    #[test]
    fn test_parenthesized_receiver() {
        assert_eq!(
            kinds("(x).ToString()"),
            vec![
                SyntaxKind::InvocationExpression,
                SyntaxKind::MemberAccessExpression,
                SyntaxKind::ParenthesizedExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::IdentifierName,
                SyntaxKind::ArgumentList,
            ]
        );
    }

    #[test]
    fn test_tuple_receiver() {
        let parse = expr("(x, y).Foo()");
        assert_eq!(
            node_kinds(&parse.syntax())[1..4],
            [
                SyntaxKind::InvocationExpression,
                SyntaxKind::MemberAccessExpression,
                SyntaxKind::TupleExpression,
            ]
        );
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_named_single_element_tuple_is_flagged() {
        let parse = expr("(a: 1)");
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::TupleTooFewElements);
    }

    #[test]
    fn test_generic_invocation() {
        assert_eq!(
            kinds("F<T>(x)")[..3],
            [
                SyntaxKind::InvocationExpression,
                SyntaxKind::GenericName,
                SyntaxKind::TypeArgumentList,
            ]
        );
    }

    #[test]
    fn test_abandoned_generic_becomes_shift() {
        let parse = expr("U<T<S>>> 2");
        let root = parse.syntax();
        assert_eq!(node_kinds(&root)[1], SyntaxKind::BinaryExpression);
        assert!(has_token(&root, SyntaxKind::GtGtGt));
        assert!(!node_kinds(&root).contains(&SyntaxKind::GenericName));
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_abandoned_generic_keeps_comparison() {
        let parse = expr("a < b > 2");
        let root = parse.syntax();
        assert_eq!(
            node_kinds(&root)[1..],
            [
                SyntaxKind::BinaryExpression,
                SyntaxKind::BinaryExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::IdentifierName,
                SyntaxKind::LiteralExpression,
            ]
        );
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_cast_of_negation() {
        assert_eq!(
            kinds("(int)-1"),
            vec![
                SyntaxKind::CastExpression,
                SyntaxKind::PredefinedType,
                SyntaxKind::PrefixUnaryExpression,
                SyntaxKind::LiteralExpression,
            ]
        );
    }

    #[test]
    fn test_parenthesized_minus_is_subtraction() {
        assert_eq!(kinds("(x)-1")[0], SyntaxKind::BinaryExpression);
    }

    #[test]
    fn test_simple_lambda_body() {
        assert_eq!(
            kinds("x => x + 1"),
            vec![
                SyntaxKind::SimpleLambdaExpression,
                SyntaxKind::Parameter,
                SyntaxKind::BinaryExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::LiteralExpression,
            ]
        );
    }

    #[test]
    fn test_async_parenthesized_lambda() {
        let kinds = kinds("async (a, b) => { }");
        assert_eq!(kinds[0], SyntaxKind::ParenthesizedLambdaExpression);
        assert!(kinds.contains(&SyntaxKind::Block));
    }

    #[test]
    fn test_conditional_access_chain() {
        let kinds = kinds("a?.b[0]");
        assert_eq!(kinds[0], SyntaxKind::ConditionalAccessExpression);
        assert!(kinds.contains(&SyntaxKind::MemberBindingExpression));
        assert!(kinds.contains(&SyntaxKind::ElementAccessExpression));
    }

    #[test]
    fn test_conditional_expression() {
        assert_eq!(kinds("c ? a : b")[0], SyntaxKind::ConditionalExpression);
    }

    #[test]
    fn test_is_type_and_is_pattern() {
        assert_eq!(
            kinds("x is string"),
            vec![
                SyntaxKind::BinaryExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::PredefinedType,
            ]
        );
        assert_eq!(
            kinds("x is int i"),
            vec![
                SyntaxKind::IsPatternExpression,
                SyntaxKind::IdentifierName,
                SyntaxKind::DeclarationPattern,
                SyntaxKind::PredefinedType,
                SyntaxKind::SingleVariableDesignation,
            ]
        );
    }

    #[test]
    fn test_object_creation_with_initializer() {
        assert_eq!(
            kinds("new List<int> { 1, 2 }"),
            vec![
                SyntaxKind::ObjectCreationExpression,
                SyntaxKind::GenericName,
                SyntaxKind::TypeArgumentList,
                SyntaxKind::PredefinedType,
                SyntaxKind::InitializerExpression,
                SyntaxKind::LiteralExpression,
                SyntaxKind::LiteralExpression,
            ]
        );
    }

    #[test]
    fn test_array_creation_with_size() {
        assert_eq!(
            kinds("new int[3]"),
            vec![
                SyntaxKind::ArrayCreationExpression,
                SyntaxKind::ArrayType,
                SyntaxKind::PredefinedType,
                SyntaxKind::ArrayRankSpecifier,
                SyntaxKind::LiteralExpression,
            ]
        );
    }

    #[test]
    fn test_collection_expression_with_spread() {
        assert_eq!(
            kinds("[1, ..xs]"),
            vec![
                SyntaxKind::CollectionExpression,
                SyntaxKind::ExpressionElement,
                SyntaxKind::LiteralExpression,
                SyntaxKind::SpreadElement,
                SyntaxKind::IdentifierName,
            ]
        );
    }

    #[test]
    fn test_out_var_argument() {
        let kinds = kinds("M(out var x)");
        assert!(kinds.contains(&SyntaxKind::DeclarationExpression));
        assert!(kinds.contains(&SyntaxKind::SingleVariableDesignation));
    }

    #[test]
    fn test_missing_operand_is_placeholder() {
        let parse = expr("x = )");
        let diag = &parse.diagnostics()[0];
        assert_eq!(diag.code, ErrorCode::InvalidExprTerm);
        assert_eq!(diag.args, vec![")"]);
        assert_eq!(parse.full_text(), "x = )");
    }

    #[test]
    fn test_missing_comma_between_arguments() {
        let parse = expr("f(a b)");
        let diag = &parse.diagnostics()[0];
        assert_eq!(diag.code, ErrorCode::SyntaxErrorExpected);
        assert_eq!(diag.args, vec![","]);
    }

    #[test]
    fn test_switch_expression_arms() {
        let kinds = kinds("x switch { 1 => a, _ => b }");
        assert_eq!(kinds[0], SyntaxKind::SwitchExpression);
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::SwitchExpressionArm)
                .count(),
            2
        );
        assert!(kinds.contains(&SyntaxKind::DiscardPattern));
    }

    #[test]
    fn test_deep_nesting_reports_once() {
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let text = format!("{}x{}", "(".repeat(300), ")".repeat(300));
                let parse = expr(&text);
                let reported = parse
                    .diagnostics()
                    .iter()
                    .filter(|d| d.code == ErrorCode::InsufficientStack)
                    .count();
                (reported, parse.full_text() == text)
            })
            .unwrap();
        let (reported, round_trip) = handle.join().unwrap();
        assert_eq!(reported, 1);
        assert!(round_trip);
    }
}
