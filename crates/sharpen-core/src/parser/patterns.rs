//! Patterns for `is`, `case` labels and switch expression arms

use super::Parser;
use super::expressions::Precedence;
use super::scan::{ScanMode, TypeScan};
use super::types::TypeMode;
use crate::cst::SyntaxKind;
use crate::options::Feature;

impl Parser<'_> {
    /// Pattern after `is`; constants stop before relational operators
    ///
    /// Returns the kind of the outermost pattern node.
    pub(crate) fn parse_pattern(&mut self) -> SyntaxKind {
        self.parse_pattern_with(Precedence::Shift)
    }

    /// Pattern in a `case` label, a switch arm or inside a pattern's
    /// delimiters, where constants may use the bitwise and logical operators
    pub(crate) fn parse_case_pattern(&mut self) -> SyntaxKind {
        self.parse_pattern_with(Precedence::ConditionalOr)
    }

    fn parse_pattern_with(&mut self, constant: Precedence) -> SyntaxKind {
        if !self.enter() {
            self.missing_name();
            return SyntaxKind::IdentifierName;
        }
        let kind = self.parse_or_pattern(constant);
        self.exit();
        kind
    }

    fn parse_or_pattern(&mut self, constant: Precedence) -> SyntaxKind {
        let checkpoint = self.checkpoint();
        let mut kind = self.parse_and_pattern(constant);
        while self.at_pattern_combinator("or") {
            self.start_node_at(checkpoint, SyntaxKind::BinaryPattern);
            self.check_feature_here(Feature::PatternCombinators);
            self.bump();
            self.parse_and_pattern(constant);
            self.finish_node();
            kind = SyntaxKind::BinaryPattern;
        }
        kind
    }

    fn parse_and_pattern(&mut self, constant: Precedence) -> SyntaxKind {
        let checkpoint = self.checkpoint();
        let mut kind = self.parse_not_pattern(constant);
        while self.at_pattern_combinator("and") {
            self.start_node_at(checkpoint, SyntaxKind::BinaryPattern);
            self.check_feature_here(Feature::PatternCombinators);
            self.bump();
            self.parse_not_pattern(constant);
            self.finish_node();
            kind = SyntaxKind::BinaryPattern;
        }
        kind
    }

    fn parse_not_pattern(&mut self, constant: Precedence) -> SyntaxKind {
        if !self.at_pattern_combinator("not") {
            return self.parse_primary_pattern(constant);
        }
        if !self.enter() {
            self.missing_name();
            return SyntaxKind::IdentifierName;
        }
        self.start_node(SyntaxKind::UnaryPattern);
        self.check_feature_here(Feature::PatternCombinators);
        self.bump();
        self.parse_not_pattern(constant);
        self.finish_node();
        self.exit();
        SyntaxKind::UnaryPattern
    }

    /// `and`, `or` and `not` only combine when a pattern follows them
    fn at_pattern_combinator(&self, word: &str) -> bool {
        self.at_contextual(word) && self.can_start_pattern_at(self.pos() + 1)
    }

    pub(crate) fn can_start_pattern_at(&self, index: usize) -> bool {
        matches!(
            self.kind_at(index),
            SyntaxKind::LBrace
                | SyntaxKind::Lt
                | SyntaxKind::LtEq
                | SyntaxKind::Gt
                | SyntaxKind::GtEq
        ) || self.can_start_expression_at(index)
    }

    /// Tokens that end a pattern, so a type right before them is a type
    /// pattern rather than a constant
    fn is_pattern_terminator(&self, index: usize) -> bool {
        match self.kind_at(index) {
            SyntaxKind::RParen
            | SyntaxKind::RBracket
            | SyntaxKind::RBrace
            | SyntaxKind::Comma
            | SyntaxKind::Semicolon
            | SyntaxKind::Colon
            | SyntaxKind::FatArrow
            | SyntaxKind::Question
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Amp
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
            | SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::EndOfFile => true,
            SyntaxKind::Ident => matches!(self.text_at(index), "and" | "or" | "when"),
            _ => false,
        }
    }

    /// An identifier at `index` that names a designation, not a combinator
    fn is_designation_word(&self, index: usize) -> bool {
        self.kind_at(index) == SyntaxKind::Ident
            && !matches!(self.text_at(index), "and" | "or" | "when")
    }

    fn parse_primary_pattern(&mut self, constant: Precedence) -> SyntaxKind {
        let pos = self.pos();
        match self.current() {
            SyntaxKind::LParen => return self.parse_parenthesized_pattern(),
            SyntaxKind::LBracket => return self.parse_list_pattern(),
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::RecursivePattern);
                self.parse_property_pattern_clause();
                self.parse_optional_designation();
                self.finish_node();
                return SyntaxKind::RecursivePattern;
            }
            SyntaxKind::Lt | SyntaxKind::LtEq | SyntaxKind::Gt => {
                self.start_node(SyntaxKind::RelationalPattern);
                self.check_feature_here(Feature::RelationalPatterns);
                let (op, count) = self.composed_operator();
                self.bump_compound(count, op);
                self.parse_sub_expression(Precedence::Shift);
                self.finish_node();
                return SyntaxKind::RelationalPattern;
            }
            SyntaxKind::Ident
                if self.at_contextual("var")
                    && (self.kind_at(pos + 1) == SyntaxKind::Ident
                        || (self.kind_at(pos + 1) == SyntaxKind::LParen
                            && self.scan_designation_list(pos + 1).is_some())) =>
            {
                self.start_node(SyntaxKind::VarPattern);
                self.bump();
                self.parse_designation();
                self.finish_node();
                return SyntaxKind::VarPattern;
            }
            SyntaxKind::Ident if self.at_contextual("_") && self.is_pattern_terminator(pos + 1) => {
                self.start_node(SyntaxKind::DiscardPattern);
                self.bump();
                self.finish_node();
                return SyntaxKind::DiscardPattern;
            }
            _ => {}
        }

        if let Some((scan, end)) = self.scan_type(pos, ScanMode::Pattern) {
            let follow = self.kind_at(end);
            if self.is_designation_word(end) {
                self.start_node(SyntaxKind::DeclarationPattern);
                self.parse_type(TypeMode::Pattern);
                self.parse_designation();
                self.finish_node();
                return SyntaxKind::DeclarationPattern;
            }
            if matches!(follow, SyntaxKind::LBrace | SyntaxKind::LParen) {
                self.start_node(SyntaxKind::RecursivePattern);
                self.parse_type(TypeMode::Pattern);
                if self.at(SyntaxKind::LParen) {
                    self.parse_positional_pattern_clause();
                }
                if self.at(SyntaxKind::LBrace) {
                    self.parse_property_pattern_clause();
                }
                self.parse_optional_designation();
                self.finish_node();
                return SyntaxKind::RecursivePattern;
            }
            let type_like = scan.is_definite()
                || matches!(
                    scan,
                    TypeScan::NullableType | TypeScan::GenericTypeOrExpression
                );
            if type_like && self.is_pattern_terminator(end) {
                self.start_node(SyntaxKind::TypePattern);
                self.parse_type(TypeMode::Pattern);
                self.finish_node();
                return SyntaxKind::TypePattern;
            }
        }

        self.start_node(SyntaxKind::ConstantPattern);
        self.parse_sub_expression(constant);
        self.finish_node();
        SyntaxKind::ConstantPattern
    }

    /// `(p)` or a positional recursive pattern `(a, b) { ... } name`
    fn parse_parenthesized_pattern(&mut self) -> SyntaxKind {
        let open = self.pos();
        let positional = match self.matching_close(open) {
            Some(close) => {
                close == open + 1
                    || self.top_level_commas(open, close) > 0
                    || (self.kind_at(open + 1) == SyntaxKind::Ident
                        && self.kind_at(open + 2) == SyntaxKind::Colon)
                    || self.kind_at(close + 1) == SyntaxKind::LBrace
                    || self.is_designation_word(close + 1)
            }
            None => false,
        };

        if !positional {
            self.start_node(SyntaxKind::ParenthesizedPattern);
            self.bump();
            self.parse_case_pattern();
            self.expect(SyntaxKind::RParen);
            self.finish_node();
            return SyntaxKind::ParenthesizedPattern;
        }

        self.start_node(SyntaxKind::RecursivePattern);
        self.parse_positional_pattern_clause();
        if self.at(SyntaxKind::LBrace) {
            self.parse_property_pattern_clause();
        }
        self.parse_optional_designation();
        self.finish_node();
        SyntaxKind::RecursivePattern
    }

    fn parse_positional_pattern_clause(&mut self) {
        self.start_node(SyntaxKind::PositionalPatternClause);
        self.bump();
        self.parse_separated(SyntaxKind::RParen, false, |p| p.parse_subpattern());
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    fn parse_property_pattern_clause(&mut self) {
        self.start_node(SyntaxKind::PropertyPatternClause);
        self.expect(SyntaxKind::LBrace);
        self.parse_separated(SyntaxKind::RBrace, true, |p| p.parse_subpattern());
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_subpattern(&mut self) {
        self.start_node(SyntaxKind::Subpattern);
        self.parse_name_colon();
        self.parse_case_pattern();
        self.finish_node();
    }

    /// `[p, .., q] name`
    fn parse_list_pattern(&mut self) -> SyntaxKind {
        let start = self.pos();
        self.start_node(SyntaxKind::ListPattern);
        self.bump();
        self.parse_separated(SyntaxKind::RBracket, true, |p| {
            if p.at(SyntaxKind::DotDot) {
                p.start_node(SyntaxKind::SlicePattern);
                p.bump();
                let next = p.pos();
                if !matches!(p.kind_at(next), SyntaxKind::Comma | SyntaxKind::RBracket) {
                    p.parse_case_pattern();
                }
                p.finish_node();
            } else {
                p.parse_case_pattern();
            }
        });
        self.expect(SyntaxKind::RBracket);
        self.check_feature(Feature::ListPatterns, self.token_range_from(start));
        self.parse_optional_designation();
        self.finish_node();
        SyntaxKind::ListPattern
    }

    fn parse_optional_designation(&mut self) {
        if self.is_designation_word(self.pos()) {
            self.parse_designation();
        }
    }

    /// `x`, `_` or `(a, (b, c))`
    pub(crate) fn parse_designation(&mut self) {
        match self.current() {
            SyntaxKind::LParen => {
                if !self.enter() {
                    self.missing_name();
                    return;
                }
                self.start_node(SyntaxKind::ParenthesizedVariableDesignation);
                self.bump();
                self.parse_separated(SyntaxKind::RParen, false, |p| p.parse_designation());
                self.expect(SyntaxKind::RParen);
                self.finish_node();
                self.exit();
            }
            SyntaxKind::Ident if self.at_contextual("_") => {
                self.start_node(SyntaxKind::DiscardDesignation);
                self.bump();
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::SingleVariableDesignation);
                self.expect(SyntaxKind::Ident);
                self.finish_node();
            }
        }
    }

    /// `when` condition
    pub(crate) fn parse_when_clause(&mut self) {
        self.start_node(SyntaxKind::WhenClause);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }

    /// `case` or `default` label inside a switch section
    ///
    /// A plain constant without `when` gives a `CaseSwitchLabel` holding the
    /// expression itself; every other pattern gives a
    /// `CasePatternSwitchLabel`.
    pub(crate) fn parse_switch_label(&mut self) {
        if self.at(SyntaxKind::DefaultKw) {
            self.start_node(SyntaxKind::DefaultSwitchLabel);
            self.bump();
            self.expect(SyntaxKind::Colon);
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        self.expect(SyntaxKind::CaseKw);
        let pattern = self.checkpoint();
        let start = self.pos();
        let kind = self.parse_case_pattern();
        let label = if kind == SyntaxKind::ConstantPattern && !self.at_contextual("when") {
            self.unwrap_node_at(pattern);
            SyntaxKind::CaseSwitchLabel
        } else {
            self.check_feature(Feature::PatternMatching, self.token_range_from(start));
            SyntaxKind::CasePatternSwitchLabel
        };
        self.start_node_at(checkpoint, label);
        if self.at_contextual("when") {
            self.parse_when_clause();
        }
        self.expect(SyntaxKind::Colon);
        self.finish_node();
    }
}
