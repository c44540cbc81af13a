//! Statements, local declarations and deconstruction

use tracing::trace;

use super::Parser;
use super::contextual::{Contextual, Position};
use super::members::ParameterContext;
use super::scan::{ScanMode, TypeScan};
use super::types::TypeMode;
use crate::cst::SyntaxKind;
use crate::diagnostics::ErrorCode;
use crate::options::Feature;

/// Where a statement list ends besides `}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementList {
    Block,
    SwitchSection,
}

impl Parser<'_> {
    pub(crate) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace);
        self.parse_statements(StatementList::Block);
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_statements(&mut self, list: StatementList) {
        loop {
            if self.at(SyntaxKind::RBrace) || self.at_end() || self.at_block_boundary() {
                break;
            }
            if list == StatementList::SwitchSection && self.at_switch_label() {
                break;
            }
            if self.is_cancelled() {
                break;
            }
            if !self.at_statement_start() {
                let text = self.current_text().to_string();
                self.skip_tokens(ErrorCode::InvalidExprTerm, vec![text], |p| {
                    !p.at_statement_start() && !p.at(SyntaxKind::RBrace) && !p.at_block_boundary()
                });
                continue;
            }
            let before = self.pos();
            self.parse_statement();
            if self.pos() == before {
                let text = self.current_text().to_string();
                self.skip_token(ErrorCode::InvalidExprTerm, vec![text]);
            }
        }
    }

    /// Tokens that end every enclosing statement list so the member parser
    /// can take over
    fn at_block_boundary(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::NamespaceKw
                | SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::ClassKw
                | SyntaxKind::StructKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::EnumKw
        )
    }

    fn at_switch_label(&self) -> bool {
        self.at(SyntaxKind::CaseKw)
            || (self.at(SyntaxKind::DefaultKw) && self.nth(1) == SyntaxKind::Colon)
    }

    /// Parse one statement; returns the kind of the node produced
    pub(crate) fn parse_statement(&mut self) -> SyntaxKind {
        if !self.enter() {
            self.start_node(SyntaxKind::EmptyStatement);
            if matches!(
                self.current(),
                SyntaxKind::LBrace | SyntaxKind::LParen | SyntaxKind::LBracket
            ) {
                self.skip_balanced();
            }
            self.missing(SyntaxKind::Semicolon);
            self.finish_node();
            return SyntaxKind::EmptyStatement;
        }
        let kind = self.parse_statement_core();
        self.exit();
        kind
    }

    fn parse_statement_core(&mut self) -> SyntaxKind {
        match self.current() {
            SyntaxKind::LBrace => {
                self.parse_block();
                SyntaxKind::Block
            }
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish_node();
                SyntaxKind::EmptyStatement
            }
            SyntaxKind::IfKw => self.parse_if_statement(),
            SyntaxKind::WhileKw => self.parse_while_statement(),
            SyntaxKind::DoKw => self.parse_do_statement(),
            SyntaxKind::ForKw => self.parse_for_statement(),
            SyntaxKind::ForeachKw => self.parse_foreach_statement(),
            SyntaxKind::ReturnKw => self.parse_keyword_with_expression(SyntaxKind::ReturnStatement),
            SyntaxKind::ThrowKw => self.parse_keyword_with_expression(SyntaxKind::ThrowStatement),
            SyntaxKind::BreakKw => self.parse_keyword_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ContinueKw => self.parse_keyword_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::GotoKw => self.parse_goto_statement(),
            SyntaxKind::TryKw => self.parse_try_statement(),
            SyntaxKind::LockKw => self.parse_lock_statement(),
            SyntaxKind::SwitchKw => self.parse_switch_statement(),
            SyntaxKind::UsingKw => self.parse_using_statement(),
            SyntaxKind::CheckedKw | SyntaxKind::UncheckedKw if self.nth(1) == SyntaxKind::LBrace => {
                self.parse_keyword_block(SyntaxKind::CheckedStatement)
            }
            SyntaxKind::UnsafeKw if self.nth(1) == SyntaxKind::LBrace => {
                self.parse_keyword_block(SyntaxKind::UnsafeStatement)
            }
            SyntaxKind::FixedKw if self.nth(1) == SyntaxKind::LParen => self.parse_fixed_statement(),
            SyntaxKind::ConstKw => {
                self.start_node(SyntaxKind::LocalDeclarationStatement);
                self.bump();
                self.parse_variable_declaration();
                self.expect(SyntaxKind::Semicolon);
                self.finish_node();
                SyntaxKind::LocalDeclarationStatement
            }
            SyntaxKind::Ident => self.parse_identifier_statement(),
            _ => self.parse_declaration_or_expression(),
        }
    }

    /// Statements that start with an identifier: contextual keywords,
    /// labels, declarations and expressions
    fn parse_identifier_statement(&mut self) -> SyntaxKind {
        if self.at_contextual("await") {
            match self.nth(1) {
                SyntaxKind::ForeachKw => return self.parse_foreach_statement(),
                SyntaxKind::UsingKw => return self.parse_using_statement(),
                _ => {}
            }
        }
        match self.classify_contextual(self.pos(), Position::Statement) {
            Contextual::YieldStatement => return self.parse_yield_statement(),
            Contextual::VarDeconstruction => return self.parse_deconstruction_declaration(),
            _ => {}
        }
        if self.nth(1) == SyntaxKind::Colon {
            self.start_node(SyntaxKind::LabeledStatement);
            self.bump();
            self.bump();
            self.parse_statement();
            self.finish_node();
            return SyntaxKind::LabeledStatement;
        }
        self.parse_declaration_or_expression()
    }

    fn parse_declaration_or_expression(&mut self) -> SyntaxKind {
        let pos = self.pos();
        let modifiers_end = self.local_modifiers_end(pos);

        if modifiers_end == pos
            && self.at(SyntaxKind::LParen)
            && self.scan_deconstruction(pos, false)
        {
            return self.parse_deconstruction_declaration();
        }
        if self.is_local_function(modifiers_end) {
            return self.parse_local_function(modifiers_end);
        }
        if modifiers_end > pos || self.is_local_declaration(modifiers_end) {
            self.start_node(SyntaxKind::LocalDeclarationStatement);
            while self.pos() < modifiers_end {
                self.bump();
            }
            self.parse_variable_declaration();
            self.expect(SyntaxKind::Semicolon);
            self.finish_node();
            return SyntaxKind::LocalDeclarationStatement;
        }
        self.parse_expression_statement()
    }

    /// Index past `static`, `unsafe`, `extern`, `async` and `scoped` before a
    /// local function or declaration
    pub(crate) fn local_modifiers_end(&self, index: usize) -> usize {
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SyntaxKind::StaticKw | SyntaxKind::UnsafeKw | SyntaxKind::ExternKw
                    if self.kind_at(i + 1) != SyntaxKind::LBrace =>
                {
                    i += 1
                }
                SyntaxKind::Ident
                    if matches!(
                        self.classify_contextual(i, Position::Statement),
                        Contextual::AsyncModifier | Contextual::ScopedModifier
                    ) =>
                {
                    i += 1
                }
                _ => return i,
            }
        }
    }

    /// `T Name<...>(...)` followed by a body or constraints
    pub(crate) fn is_local_function(&self, index: usize) -> bool {
        let Some((scan, end)) = self.scan_type(index, ScanMode::Normal) else {
            return false;
        };
        if self.kind_at(end) != SyntaxKind::Ident {
            return false;
        }
        let mut open = end + 1;
        if self.kind_at(open) == SyntaxKind::Lt {
            match self.scan_type_parameter_list(open) {
                Some(next) => open = next,
                None => return false,
            }
        }
        if self.kind_at(open) != SyntaxKind::LParen {
            return false;
        }
        let Some(close) = self.matching_close(open) else {
            return scan.is_definite();
        };
        matches!(
            self.kind_at(close + 1),
            SyntaxKind::LBrace | SyntaxKind::FatArrow
        ) || self.is_contextual_at(close + 1, "where")
            || scan.is_definite()
    }

    /// Does a local variable declaration start at `index`?
    ///
    /// The token after the declared name decides for types that could also
    /// be expressions. A nullable type directly followed by `=` or `;` is a
    /// declaration whose name is missing.
    pub(crate) fn is_local_declaration(&self, index: usize) -> bool {
        let Some((scan, end)) = self.scan_type(index, ScanMode::Normal) else {
            return false;
        };
        let name = self.kind_at(end) == SyntaxKind::Ident;
        let follow = self.kind_at(end + 1);
        let decision = match scan {
            TypeScan::MustBeType | TypeScan::TupleType => name,
            TypeScan::NullableType => {
                (name
                    && matches!(
                        follow,
                        SyntaxKind::Semicolon
                            | SyntaxKind::Eq
                            | SyntaxKind::Comma
                            | SyntaxKind::RParen
                            | SyntaxKind::InKw
                    ))
                    || matches!(self.kind_at(end), SyntaxKind::Eq | SyntaxKind::Semicolon)
            }
            TypeScan::PointerOrMultiplication
            | TypeScan::GenericTypeOrExpression
            | TypeScan::NonGenericTypeOrExpression => {
                name && matches!(
                    follow,
                    SyntaxKind::Semicolon
                        | SyntaxKind::Eq
                        | SyntaxKind::Comma
                        | SyntaxKind::LBracket
                        | SyntaxKind::RParen
                        | SyntaxKind::RBrace
                        | SyntaxKind::InKw
                        | SyntaxKind::EndOfFile
                )
            }
        };
        trace!(index, ?scan, decision, "local declaration scan");
        decision
    }

    /// Type followed by comma-separated declarators
    pub(crate) fn parse_variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VariableDeclaration);
        self.parse_type(TypeMode::Normal);
        loop {
            self.parse_variable_declarator(false);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    /// `name`, `name = value`, `name[size]` (fixed buffers only)
    pub(crate) fn parse_variable_declarator(&mut self, fixed_buffer: bool) {
        self.start_node(SyntaxKind::VariableDeclarator);
        self.expect(SyntaxKind::Ident);
        match self.current() {
            SyntaxKind::LParen => {
                let start = self.pos();
                self.skip_balanced();
                let range = self.token_range_from(start);
                self.error_at(range, ErrorCode::BadVarDecl, Vec::new());
            }
            SyntaxKind::LBracket => {
                let start = self.pos();
                self.parse_bracketed_argument_list();
                if !fixed_buffer {
                    let range = self.token_range_from(start);
                    self.error_at(range, ErrorCode::BadArrayDeclarator, Vec::new());
                }
            }
            _ => {}
        }
        match self.current() {
            SyntaxKind::Eq => {
                self.start_node(SyntaxKind::EqualsValueClause);
                self.bump();
                if self.at(SyntaxKind::LBrace) {
                    self.parse_initializer();
                } else {
                    self.parse_expression();
                }
                self.finish_node();
            }
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::EqualsValueClause);
                self.missing_with(
                    SyntaxKind::Eq,
                    ErrorCode::SyntaxErrorExpected,
                    vec!["=".to_string()],
                );
                self.parse_initializer();
                self.finish_node();
            }
            _ => {}
        }
        self.finish_node();
    }

    fn parse_expression_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::ExpressionStatement);
        self.parse_expression();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        SyntaxKind::ExpressionStatement
    }

    /// Body of `if`, `while`, `for`, ...; declarations and labels are
    /// parsed but flagged
    pub(crate) fn parse_embedded_statement(&mut self) {
        let start = self.pos();
        let kind = self.parse_statement();
        if matches!(
            kind,
            SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::LabeledStatement
                | SyntaxKind::LocalFunctionStatement
        ) {
            let range = self.token_range_from(start);
            self.error_at(range, ErrorCode::BadEmbeddedStatement, Vec::new());
        }
    }

    fn parse_local_function(&mut self, modifiers_end: usize) -> SyntaxKind {
        self.start_node(SyntaxKind::LocalFunctionStatement);
        while self.pos() < modifiers_end {
            self.bump();
        }
        self.parse_type(TypeMode::Normal);
        self.check_feature_here(Feature::LocalFunctions);
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_constraint_clauses();
        self.parse_method_body();
        self.finish_node();
        SyntaxKind::LocalFunctionStatement
    }

    // Deconstruction

    fn parse_deconstruction_declaration(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::DeconstructionDeclaration);
        self.parse_variable_component_assignment();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        SyntaxKind::DeconstructionDeclaration
    }

    /// component `=` expression
    fn parse_variable_component_assignment(&mut self) {
        let start = self.pos();
        self.start_node(SyntaxKind::VariableComponentAssignment);
        self.parse_variable_component();
        self.check_feature(Feature::Deconstruction, self.token_range_from(start));
        self.expect(SyntaxKind::Eq);
        self.parse_expression();
        self.finish_node();
    }

    /// `T x`, `var (a, b)` or a parenthesized list of components
    fn parse_variable_component(&mut self) {
        if self.at(SyntaxKind::LParen) {
            if !self.enter() {
                self.missing_name();
                return;
            }
            self.start_node(SyntaxKind::ParenthesizedVariableComponent);
            self.bump();
            self.parse_separated(SyntaxKind::RParen, false, |p| p.parse_variable_component());
            self.expect(SyntaxKind::RParen);
            self.finish_node();
            self.exit();
            return;
        }
        self.start_node(SyntaxKind::TypedVariableComponent);
        if self.at_contextual("var") && self.nth(1) == SyntaxKind::LParen {
            self.parse_identifier_name();
        } else {
            self.parse_type(TypeMode::Normal);
        }
        self.parse_designation();
        self.finish_node();
    }

    // Control flow

    fn parse_if_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_embedded_statement();
        if self.at(SyntaxKind::ElseKw) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_embedded_statement();
            self.finish_node();
        }
        self.finish_node();
        SyntaxKind::IfStatement
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::LParen);
        self.parse_expression();
        self.expect(SyntaxKind::RParen);
    }

    fn parse_while_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::WhileStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_embedded_statement();
        self.finish_node();
        SyntaxKind::WhileStatement
    }

    fn parse_do_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::DoStatement);
        self.bump();
        self.parse_embedded_statement();
        self.expect(SyntaxKind::WhileKw);
        self.parse_parenthesized_condition();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        SyntaxKind::DoStatement
    }

    fn parse_for_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::ForStatement);
        self.bump();
        self.expect(SyntaxKind::LParen);

        if !self.at(SyntaxKind::Semicolon) {
            let pos = self.pos();
            if self.scan_deconstruction(pos, false) {
                self.parse_variable_component_assignment();
            } else if self.at(SyntaxKind::RefKw) || self.is_local_declaration(pos) {
                self.parse_variable_declaration();
            } else {
                self.parse_expression_list(SyntaxKind::Semicolon);
            }
        }
        self.expect(SyntaxKind::Semicolon);
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon);
        if !self.at(SyntaxKind::RParen) {
            self.parse_expression_list(SyntaxKind::RParen);
        }
        self.expect(SyntaxKind::RParen);
        self.parse_embedded_statement();
        self.finish_node();
        SyntaxKind::ForStatement
    }

    fn parse_expression_list(&mut self, close: SyntaxKind) {
        self.parse_separated(close, false, |p| p.parse_expression());
    }

    /// `foreach (T x in e)` or `foreach (component in e)`, optionally
    /// preceded by `await`
    fn parse_foreach_statement(&mut self) -> SyntaxKind {
        let header = self.pos() + usize::from(self.at_contextual("await")) + 2;
        let component = self.scan_deconstruction(header, true)
            || (self.kind_at(header) == SyntaxKind::LParen && !self.is_foreach_variable(header));
        let kind = if component {
            SyntaxKind::ForEachComponentStatement
        } else {
            SyntaxKind::ForEachStatement
        };

        self.start_node(kind);
        self.eat_contextual("await");
        self.expect(SyntaxKind::ForeachKw);
        self.expect(SyntaxKind::LParen);
        if component {
            let start = self.pos();
            if self.scan_deconstruction(self.pos(), true) {
                self.parse_variable_component();
            } else {
                self.parse_expression();
            }
            self.check_feature(Feature::Deconstruction, self.token_range_from(start));
        } else {
            self.parse_type(TypeMode::Normal);
            self.expect(SyntaxKind::Ident);
        }
        self.expect(SyntaxKind::InKw);
        self.parse_expression();
        self.expect(SyntaxKind::RParen);
        self.parse_embedded_statement();
        self.finish_node();
        kind
    }

    /// `T x in` at `index`
    fn is_foreach_variable(&self, index: usize) -> bool {
        self.scan_type(index, ScanMode::Normal).is_some_and(|(_, end)| {
            self.kind_at(end) == SyntaxKind::Ident && self.kind_at(end + 1) == SyntaxKind::InKw
        })
    }

    fn parse_keyword_statement(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.start_node(kind);
        self.bump();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        kind
    }

    /// `return e?;` and `throw e?;`
    fn parse_keyword_with_expression(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.start_node(kind);
        self.bump();
        if !matches!(self.current(), SyntaxKind::Semicolon | SyntaxKind::RBrace) && !self.at_end() {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        kind
    }

    fn parse_goto_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::GotoStatement);
        self.bump();
        match self.current() {
            SyntaxKind::CaseKw => {
                self.bump();
                self.parse_expression();
            }
            SyntaxKind::DefaultKw => self.bump(),
            _ => {
                self.parse_identifier_name();
            }
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        SyntaxKind::GotoStatement
    }

    fn parse_yield_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::YieldStatement);
        self.bump();
        if self.eat(SyntaxKind::ReturnKw) {
            self.parse_expression();
        } else {
            self.expect(SyntaxKind::BreakKw);
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
        SyntaxKind::YieldStatement
    }

    fn parse_try_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::TryStatement);
        self.bump();
        self.parse_block();

        let mut handlers = 0;
        while self.at(SyntaxKind::CatchKw) {
            self.parse_catch_clause();
            handlers += 1;
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.parse_block();
            self.finish_node();
            handlers += 1;
        }
        if handlers == 0 {
            let range = self.missing_range();
            self.error_at(range, ErrorCode::ExpectedCatchOrFinally, Vec::new());
        }
        self.finish_node();
        SyntaxKind::TryStatement
    }

    /// `catch (T e) when (cond) { }`
    fn parse_catch_clause(&mut self) {
        self.start_node(SyntaxKind::CatchClause);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.start_node(SyntaxKind::CatchDeclaration);
            self.bump();
            self.parse_type(TypeMode::Normal);
            self.eat(SyntaxKind::Ident);
            self.expect(SyntaxKind::RParen);
            self.finish_node();
        }
        if self.at_contextual("when") {
            self.start_node(SyntaxKind::CatchFilterClause);
            self.bump();
            self.parse_parenthesized_condition();
            self.finish_node();
        }
        self.parse_block();
        self.finish_node();
    }

    fn parse_lock_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::LockStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_embedded_statement();
        self.finish_node();
        SyntaxKind::LockStatement
    }

    /// `using (resource) statement` or a `using` local declaration
    fn parse_using_statement(&mut self) -> SyntaxKind {
        let using = self.pos() + usize::from(self.at_contextual("await"));
        if self.kind_at(using + 1) != SyntaxKind::LParen {
            self.start_node(SyntaxKind::LocalDeclarationStatement);
            self.eat_contextual("await");
            self.bump();
            self.parse_variable_declaration();
            self.expect(SyntaxKind::Semicolon);
            self.finish_node();
            return SyntaxKind::LocalDeclarationStatement;
        }

        self.start_node(SyntaxKind::UsingStatement);
        self.eat_contextual("await");
        self.bump();
        self.bump();
        if self.is_local_declaration(self.pos()) {
            self.parse_variable_declaration();
        } else {
            self.parse_expression();
        }
        self.expect(SyntaxKind::RParen);
        self.parse_embedded_statement();
        self.finish_node();
        SyntaxKind::UsingStatement
    }

    fn parse_fixed_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::FixedStatement);
        self.bump();
        self.bump();
        self.parse_variable_declaration();
        self.expect(SyntaxKind::RParen);
        self.parse_embedded_statement();
        self.finish_node();
        SyntaxKind::FixedStatement
    }

    /// `checked { }`, `unchecked { }`, `unsafe { }`
    fn parse_keyword_block(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.start_node(kind);
        self.bump();
        self.parse_block();
        self.finish_node();
        kind
    }

    /// `switch (e) { sections }`; a tuple governs the switch without extra
    /// parentheses
    fn parse_switch_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::SwitchStatement);
        self.bump();
        let open = self.pos();
        let tuple = self.at(SyntaxKind::LParen)
            && self
                .matching_close(open)
                .is_some_and(|close| self.top_level_commas(open, close) > 0);
        if tuple {
            self.parse_expression();
        } else {
            self.parse_parenthesized_condition();
        }
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at_end() && !self.at_block_boundary() {
            if self.is_cancelled() {
                break;
            }
            if self.at_switch_label() {
                self.parse_switch_section();
            } else {
                self.skip_tokens(
                    ErrorCode::SyntaxErrorExpected,
                    vec!["case".to_string()],
                    |p| !p.at_switch_label() && !p.at(SyntaxKind::RBrace),
                );
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
        SyntaxKind::SwitchStatement
    }

    fn parse_switch_section(&mut self) {
        self.start_node(SyntaxKind::SwitchSection);
        while self.at_switch_label() {
            self.parse_switch_label();
        }
        self.parse_statements(StatementList::SwitchSection);
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parse, node_kinds, parse_fragment, span_range};

    fn statement(text: &str) -> Parse {
        parse_fragment(text, |p| {
            p.parse_statement();
        })
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        node_kinds(&statement(text).syntax()).into_iter().skip(1).collect()
    }

    #[test]
    fn test_parenthesized_receiver_statement() {
        assert_eq!(
            kinds("(x).ToString();"),
            vec![
                SyntaxKind::ExpressionStatement,
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
    fn test_var_deconstruction() {
        assert_eq!(
            kinds("var (a, b) = foo;"),
            vec![
                SyntaxKind::DeconstructionDeclaration,
                SyntaxKind::VariableComponentAssignment,
                SyntaxKind::TypedVariableComponent,
                SyntaxKind::IdentifierName,
                SyntaxKind::ParenthesizedVariableDesignation,
                SyntaxKind::SingleVariableDesignation,
                SyntaxKind::SingleVariableDesignation,
                SyntaxKind::IdentifierName,
            ]
        );
    }

    #[test]
    fn test_nested_typed_deconstruction() {
        let kinds = kinds("((Int32 a, Int64 b), Int32 c) = foo;");
        assert_eq!(
            kinds[..4],
            [
                SyntaxKind::DeconstructionDeclaration,
                SyntaxKind::VariableComponentAssignment,
                SyntaxKind::ParenthesizedVariableComponent,
                SyntaxKind::ParenthesizedVariableComponent,
            ]
        );
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::TypedVariableComponent)
                .count(),
            3
        );
    }

    #[test]
    fn test_tuple_type_local() {
        let parse = statement("(T, T) x;");
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(
            kinds[1..4],
            [
                SyntaxKind::LocalDeclarationStatement,
                SyntaxKind::VariableDeclaration,
                SyntaxKind::TupleType,
            ]
        );
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_tuple_assignment() {
        assert_eq!(
            kinds("(x, y) = e;")[..3],
            [
                SyntaxKind::ExpressionStatement,
                SyntaxKind::AssignmentExpression,
                SyntaxKind::TupleExpression,
            ]
        );
    }

    #[test]
    fn test_nullable_tuple_missing_name() {
        let parse = statement("(x, y)? = M();");
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(kinds[1], SyntaxKind::LocalDeclarationStatement);
        assert!(kinds.contains(&SyntaxKind::NullableType));
        assert_eq!(parse.diagnostics().len(), 1);
        let diag = &parse.diagnostics()[0];
        assert_eq!(diag.code, ErrorCode::IdentifierExpected);
        assert_eq!(diag.range, span_range(8, 9));
        assert_eq!(parse.full_text(), "(x, y)? = M();");
    }

    #[test]
    fn test_generic_local_declaration() {
        let kinds = kinds("ImmutableDictionary<string, IImmutableDictionary<X, Y>> d;");
        assert_eq!(kinds[0], SyntaxKind::LocalDeclarationStatement);
        assert_eq!(kinds[2], SyntaxKind::GenericName);
    }

    #[test]
    fn test_for_with_deconstruction() {
        let kinds = kinds("for ((int a, int b) = e; ; ) { }");
        assert_eq!(kinds[0], SyntaxKind::ForStatement);
        assert_eq!(kinds[1], SyntaxKind::VariableComponentAssignment);
    }

    #[test]
    fn test_foreach_forms() {
        assert_eq!(
            kinds("foreach ((int a, int b) in e) { }")[..2],
            [
                SyntaxKind::ForEachComponentStatement,
                SyntaxKind::ParenthesizedVariableComponent,
            ]
        );
        assert_eq!(kinds("foreach (var x in xs) ;")[0], SyntaxKind::ForEachStatement);
        assert_eq!(
            kinds("await foreach (var x in xs) { }")[0],
            SyntaxKind::ForEachStatement
        );
    }

    #[test]
    fn test_try_without_handler() {
        let parse = statement("try { }");
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::ExpectedCatchOrFinally);
    }

    #[test]
    fn test_try_catch_filter_finally() {
        let kinds = kinds("try { } catch (Exception e) when (e != null) { } finally { }");
        assert!(kinds.contains(&SyntaxKind::CatchDeclaration));
        assert!(kinds.contains(&SyntaxKind::CatchFilterClause));
        assert!(kinds.contains(&SyntaxKind::FinallyClause));
    }

    #[test]
    fn test_declaration_as_embedded_statement() {
        let parse = statement("if (x) int y = 1;");
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::BadEmbeddedStatement);
    }

    #[test]
    fn test_local_function() {
        let parse = statement("int Add(int a, int b) => a + b;");
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(kinds[1], SyntaxKind::LocalFunctionStatement);
        assert!(kinds.contains(&SyntaxKind::ArrowExpressionClause));
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_switch_on_tuple() {
        let parse = statement("switch (a, b) { case (1, 2): break; default: break; }");
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(kinds[1], SyntaxKind::SwitchStatement);
        assert_eq!(kinds[2], SyntaxKind::TupleExpression);
        assert!(kinds.contains(&SyntaxKind::CasePatternSwitchLabel));
        assert!(kinds.contains(&SyntaxKind::DefaultSwitchLabel));
        assert!(parse.diagnostics().is_empty());
    }

    #[test]
    fn test_garbage_in_block_is_skipped_once() {
        let parse = statement("{ ) ) x; }");
        let diags = parse.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::InvalidExprTerm);
        assert!(node_kinds(&parse.syntax()).contains(&SyntaxKind::SkippedTokensTrivia));
        assert_eq!(parse.full_text(), "{ ) ) x; }");
    }

    #[test]
    fn test_missing_initializer_equals() {
        let parse = statement("int[] a { 1, 2 };");
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::SyntaxErrorExpected);
        assert_eq!(parse.diagnostics()[0].args, vec!["="]);
        assert!(node_kinds(&parse.syntax()).contains(&SyntaxKind::InitializerExpression));
    }

    #[test]
    fn test_labeled_and_yield() {
        assert_eq!(kinds("done: return;")[0], SyntaxKind::LabeledStatement);
        assert_eq!(kinds("yield return 1;")[0], SyntaxKind::YieldStatement);
    }

    #[test]
    fn test_using_forms() {
        assert_eq!(kinds("using (var f = Open()) { }")[0], SyntaxKind::UsingStatement);
        assert_eq!(
            kinds("using var f = Open();")[0],
            SyntaxKind::LocalDeclarationStatement
        );
    }
}
