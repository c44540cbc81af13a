//! Compilation units, namespaces, type declarations and their members

use tracing::trace;

use super::Parser;
use super::contextual::{Contextual, Position, is_type_keyword};
use super::scan::{ScanMode, TypeArgScan};
use super::types::TypeMode;
use crate::cst::SyntaxKind;
use crate::diagnostics::ErrorCode;
use crate::options::Feature;

/// Where a parameter list appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterContext {
    Declaration,
    /// Types may be omitted: `(a, b) => ...`
    Lambda,
    /// The receiver of an extension block: the name is optional and a
    /// default value is flagged
    ExtensionReceiver,
}

/// Container a member is parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberContext {
    CompilationUnit,
    Namespace,
    TypeBody,
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessorOwner {
    Property,
    Event,
}

impl AccessorOwner {
    fn keywords(self) -> &'static [&'static str] {
        match self {
            AccessorOwner::Property => &["get", "set", "init"],
            AccessorOwner::Event => &["add", "remove"],
        }
    }

    fn error(self) -> ErrorCode {
        match self {
            AccessorOwner::Property => ErrorCode::GetOrSetExpected,
            AccessorOwner::Event => ErrorCode::AddOrRemoveExpected,
        }
    }
}

/// Modifiers that change how the rest of a member is parsed
#[derive(Debug, Clone, Copy, Default)]
struct Modifiers {
    fixed: bool,
}

/// Ordering state of the top level of a compilation unit
#[derive(Debug, Default)]
struct TopLevel {
    seen_global_statement: bool,
    seen_declaration: bool,
    reported_order: bool,
}

/// Name of a member kind an extension block cannot contain
fn disallowed_in_extension(kind: SyntaxKind) -> Option<&'static str> {
    let name = match kind {
        SyntaxKind::ConstructorDeclaration => "constructor",
        SyntaxKind::FieldDeclaration => "field",
        SyntaxKind::EventFieldDeclaration | SyntaxKind::EventDeclaration => "event",
        SyntaxKind::DestructorDeclaration => "destructor",
        SyntaxKind::ConversionOperatorDeclaration => "conversion operator",
        SyntaxKind::ExtensionBlockDeclaration => "extension",
        SyntaxKind::ClassDeclaration
        | SyntaxKind::StructDeclaration
        | SyntaxKind::InterfaceDeclaration
        | SyntaxKind::RecordDeclaration
        | SyntaxKind::EnumDeclaration
        | SyntaxKind::DelegateDeclaration => "nested type",
        _ => return None,
    };
    Some(name)
}

fn is_type_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::RecordDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::DelegateDeclaration
            | SyntaxKind::ExtensionBlockDeclaration
    )
}

impl Parser<'_> {
    pub(crate) fn parse_compilation_unit(&mut self) {
        self.start_node(SyntaxKind::CompilationUnit);
        self.parse_namespace_body(MemberContext::CompilationUnit);
        self.bump_eof();
        self.finish_node();
    }

    /// Directives, namespaces and members up to `}` or end of file; at the
    /// top level also global statements, and a stray `}` is skipped
    fn parse_namespace_body(&mut self, context: MemberContext) {
        let mut top = TopLevel::default();
        loop {
            if self.at_end() || self.is_cancelled() {
                break;
            }
            if self.at(SyntaxKind::RBrace) {
                if context != MemberContext::CompilationUnit {
                    break;
                }
                self.skip_tokens(ErrorCode::EofExpected, Vec::new(), |p| {
                    p.at(SyntaxKind::RBrace)
                });
                continue;
            }

            let before = self.pos();
            match self.current() {
                SyntaxKind::ExternKw if self.nth_is_contextual(1, "alias") => {
                    self.parse_extern_alias();
                }
                SyntaxKind::UsingKw if self.is_using_directive(context) => {
                    self.parse_using_directive();
                }
                SyntaxKind::Ident
                    if self.at_contextual("global") && self.nth(1) == SyntaxKind::UsingKw =>
                {
                    self.parse_using_directive();
                }
                SyntaxKind::NamespaceKw => {
                    self.parse_namespace();
                    top.seen_declaration = true;
                }
                SyntaxKind::LBracket if self.at_global_attribute() => {
                    self.parse_attribute_list();
                }
                _ if context == MemberContext::CompilationUnit
                    && self.is_global_statement_start() =>
                {
                    self.parse_global_statement(&mut top);
                }
                _ if self.at_member_start() => {
                    let kind = self.parse_member(MemberContext::Namespace);
                    if is_type_declaration(kind) {
                        top.seen_declaration = true;
                    }
                }
                _ => {
                    self.skip_tokens(ErrorCode::EofExpected, Vec::new(), |p| {
                        !p.at_member_start() && !p.at(SyntaxKind::RBrace)
                    });
                }
            }
            if self.pos() == before {
                self.skip_token(ErrorCode::EofExpected, Vec::new());
            }
        }
    }

    fn parse_global_statement(&mut self, top: &mut TopLevel) {
        if !self.options().is_script() {
            if !top.seen_global_statement {
                self.check_feature_here(Feature::TopLevelStatements);
            }
            if top.seen_declaration && !top.reported_order {
                top.reported_order = true;
                self.error_here(ErrorCode::TopLevelStatementAfterNamespaceOrType, Vec::new());
            }
        }
        top.seen_global_statement = true;
        self.start_node(SyntaxKind::GlobalStatement);
        self.parse_statement();
        self.finish_node();
    }

    /// Does a statement rather than a member start at the top level?
    ///
    /// Type declarations and members with member-only modifiers or shapes
    /// stay members. In scripts, local declarations and functions are
    /// members too.
    fn is_global_statement_start(&self) -> bool {
        let pos = self.pos();
        if matches!(
            self.classify_contextual(pos, Position::Member),
            Contextual::RecordDeclaration
                | Contextual::ExtensionBlock
                | Contextual::NamedExtensionBlock
                | Contextual::PartialModifier
                | Contextual::RequiredModifier
                | Contextual::FileModifier
        ) {
            return false;
        }
        let i = self.local_modifiers_end(pos);
        let kind = self.kind_at(i);
        let member_modifier = match kind {
            SyntaxKind::NewKw | SyntaxKind::UnsafeKw => false,
            SyntaxKind::RefKw => is_type_keyword(self.kind_at(i + 1)),
            SyntaxKind::FixedKw => self.kind_at(i + 1) != SyntaxKind::LParen,
            kind => kind.is_modifier_keyword(),
        };
        if member_modifier {
            return false;
        }
        if is_type_keyword(kind) {
            return kind == SyntaxKind::DelegateKw
                && matches!(self.kind_at(i + 1), SyntaxKind::LParen | SyntaxKind::LBrace);
        }
        if matches!(
            kind,
            SyntaxKind::EventKw
                | SyntaxKind::ImplicitKw
                | SyntaxKind::ExplicitKw
                | SyntaxKind::OperatorKw
                | SyntaxKind::Tilde
                | SyntaxKind::LBracket
        ) {
            return false;
        }
        if i > pos
            && matches!(
                self.classify_contextual(i, Position::Member),
                Contextual::PartialModifier | Contextual::RecordDeclaration
            )
        {
            return false;
        }
        if self.is_member_only_shape(i) {
            return false;
        }
        if self.options().is_script()
            && (kind == SyntaxKind::ConstKw
                || self.is_local_function(i)
                || self.is_local_declaration(i))
        {
            return false;
        }
        true
    }

    /// Properties, indexers and operators never parse as statements
    fn is_member_only_shape(&self, index: usize) -> bool {
        let Some((_, end)) = self.scan_type(index, ScanMode::Normal) else {
            return false;
        };
        match self.kind_at(end) {
            SyntaxKind::ThisKw => self.kind_at(end + 1) == SyntaxKind::LBracket,
            SyntaxKind::OperatorKw => true,
            SyntaxKind::Ident => matches!(
                self.kind_at(end + 1),
                SyntaxKind::LBrace | SyntaxKind::FatArrow
            ),
            _ => false,
        }
    }

    fn is_using_directive(&self, context: MemberContext) -> bool {
        if self.nth(1) == SyntaxKind::LParen {
            return false;
        }
        context != MemberContext::CompilationUnit || !self.is_local_declaration(self.pos() + 1)
    }

    fn at_global_attribute(&self) -> bool {
        (self.nth_is_contextual(1, "assembly") || self.nth_is_contextual(1, "module"))
            && self.nth(2) == SyntaxKind::Colon
    }

    /// `extern alias Name;`
    fn parse_extern_alias(&mut self) {
        self.start_node(SyntaxKind::ExternAliasDirective);
        self.bump();
        self.bump();
        self.expect(SyntaxKind::Ident);
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `global? using static? (Alias =)? Name;`
    fn parse_using_directive(&mut self) {
        self.start_node(SyntaxKind::UsingDirective);
        if self.at_contextual("global") {
            self.check_feature_here(Feature::GlobalUsing);
            self.bump();
        }
        self.expect(SyntaxKind::UsingKw);
        self.eat(SyntaxKind::StaticKw);
        self.eat(SyntaxKind::UnsafeKw);
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Eq {
            self.parse_name_equals();
        }
        self.parse_type(TypeMode::Normal);
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// Block or file-scoped namespace
    fn parse_namespace(&mut self) {
        let checkpoint = self.checkpoint();
        let start = self.pos();
        self.bump();
        self.parse_qualified_name();
        if self.at(SyntaxKind::Semicolon) {
            self.start_node_at(checkpoint, SyntaxKind::FileScopedNamespaceDeclaration);
            self.check_feature(Feature::FileScopedNamespaces, self.token_range(start));
            self.bump();
            self.parse_namespace_body(MemberContext::Namespace);
        } else {
            self.start_node_at(checkpoint, SyntaxKind::NamespaceDeclaration);
            self.expect(SyntaxKind::LBrace);
            self.parse_namespace_body(MemberContext::Namespace);
            self.expect(SyntaxKind::RBrace);
            self.eat(SyntaxKind::Semicolon);
        }
        self.finish_node();
    }

    // Members

    /// Parse one member and wrap it in a node of the kind it turned out to be
    pub(crate) fn parse_member(&mut self, context: MemberContext) -> SyntaxKind {
        let checkpoint = self.checkpoint();
        let start = self.pos();
        if !self.enter() {
            self.start_node(SyntaxKind::IncompleteMember);
            if matches!(
                self.current(),
                SyntaxKind::LBrace | SyntaxKind::LParen | SyntaxKind::LBracket
            ) {
                self.skip_balanced();
            } else {
                self.bump();
            }
            self.finish_node();
            return SyntaxKind::IncompleteMember;
        }
        let kind = self.parse_member_core();
        self.exit();
        self.start_node_at(checkpoint, kind);
        self.finish_node();

        if context == MemberContext::Extension
            && let Some(name) = disallowed_in_extension(kind)
        {
            let range = self.token_range_from(start);
            self.error_at(range, ErrorCode::ExtensionDisallowsMember, vec![name.to_string()]);
        }
        trace!(?kind, start, "member");
        kind
    }

    fn parse_member_core(&mut self) -> SyntaxKind {
        self.parse_attribute_lists();
        let modifiers = self.parse_member_modifiers();

        match self.current() {
            SyntaxKind::ClassKw | SyntaxKind::StructKw | SyntaxKind::InterfaceKw => {
                return self.parse_type_declaration();
            }
            SyntaxKind::EnumKw => return self.parse_enum_declaration(),
            SyntaxKind::DelegateKw => return self.parse_delegate_declaration(),
            SyntaxKind::Tilde => return self.parse_destructor(),
            SyntaxKind::EventKw => return self.parse_event(),
            SyntaxKind::ImplicitKw | SyntaxKind::ExplicitKw => {
                return self.parse_conversion_operator();
            }
            SyntaxKind::ConstKw => {
                self.bump();
                self.parse_variable_declaration();
                self.expect(SyntaxKind::Semicolon);
                return SyntaxKind::FieldDeclaration;
            }
            SyntaxKind::Ident => match self.classify_contextual(self.pos(), Position::Member) {
                Contextual::RecordDeclaration => return self.parse_type_declaration(),
                Contextual::ExtensionBlock => return self.parse_extension_block(false),
                Contextual::NamedExtensionBlock => return self.parse_extension_block(true),
                Contextual::ExtensionInOlderVersion => {
                    self.error_here(ErrorCode::ExtensionKeywordInOlderVersion, Vec::new());
                }
                _ => {}
            },
            _ => {}
        }

        if self.at(SyntaxKind::Ident) {
            if self.nth(1) == SyntaxKind::LParen {
                return self.parse_constructor();
            }
            if self.nth(1) == SyntaxKind::Lt
                && self
                    .scan_type_parameter_list(self.pos() + 1)
                    .is_some_and(|end| self.kind_at(end) == SyntaxKind::LParen)
            {
                return self.parse_method_without_type();
            }
        }
        self.parse_member_with_type(modifiers)
    }

    fn parse_member_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            let kind = self.current();
            if kind == SyntaxKind::RefKw
                && !(self.nth(1) == SyntaxKind::StructKw || self.nth_is_contextual(1, "partial"))
            {
                break;
            }
            if kind.is_modifier_keyword() {
                modifiers.fixed |= kind == SyntaxKind::FixedKw;
                self.bump();
                continue;
            }
            if kind == SyntaxKind::Ident
                && matches!(
                    self.classify_contextual(self.pos(), Position::Member),
                    Contextual::AsyncModifier
                        | Contextual::PartialModifier
                        | Contextual::RequiredModifier
                        | Contextual::FileModifier
                        | Contextual::ScopedModifier
                )
            {
                self.bump();
                continue;
            }
            return modifiers;
        }
        modifiers
    }

    /// Members that start with a type: methods, properties, indexers,
    /// operators and fields
    fn parse_member_with_type(&mut self, modifiers: Modifiers) -> SyntaxKind {
        let type_checkpoint = self.checkpoint();
        self.parse_type(TypeMode::Normal);
        let explicit = match self.explicit_interface_end() {
            Some(dot) => {
                self.parse_explicit_interface_specifier(dot);
                true
            }
            None => false,
        };

        match self.current() {
            SyntaxKind::OperatorKw => self.parse_operator_tail(),
            SyntaxKind::ThisKw => {
                self.bump();
                self.parse_bracketed_parameter_list();
                self.parse_property_body();
                SyntaxKind::IndexerDeclaration
            }
            SyntaxKind::Ident => match self.nth(1) {
                SyntaxKind::LParen | SyntaxKind::Lt => {
                    self.bump();
                    self.parse_method_tail();
                    SyntaxKind::MethodDeclaration
                }
                SyntaxKind::LBrace | SyntaxKind::FatArrow => {
                    self.bump();
                    self.parse_property_body();
                    SyntaxKind::PropertyDeclaration
                }
                _ if explicit => {
                    self.bump();
                    self.parse_property_body();
                    SyntaxKind::PropertyDeclaration
                }
                _ => {
                    self.start_node_at(type_checkpoint, SyntaxKind::VariableDeclaration);
                    loop {
                        self.parse_variable_declarator(modifiers.fixed);
                        if !self.eat(SyntaxKind::Comma) {
                            break;
                        }
                    }
                    self.finish_node();
                    self.expect(SyntaxKind::Semicolon);
                    SyntaxKind::FieldDeclaration
                }
            },
            _ => {
                let (code, args) = self.identifier_expected();
                let range = self.missing_range();
                self.error_at(range, code, args);
                SyntaxKind::IncompleteMember
            }
        }
    }

    /// Index of the last `.` in `I.J<T>.` before a member name
    fn explicit_interface_end(&self) -> Option<usize> {
        let mut i = self.pos();
        let mut last_dot = None;
        while self.kind_at(i) == SyntaxKind::Ident {
            i += 1;
            if self.kind_at(i) == SyntaxKind::ColonColon {
                i += 1;
                continue;
            }
            if self.kind_at(i) == SyntaxKind::Lt {
                match self.scan_type_argument_list(i) {
                    TypeArgScan::Definite(end) | TypeArgScan::Possible(end) => i = end,
                    TypeArgScan::NotTypeArgumentList => break,
                }
            }
            if self.kind_at(i) != SyntaxKind::Dot {
                break;
            }
            last_dot = Some(i);
            i += 1;
        }
        last_dot
    }

    fn parse_explicit_interface_specifier(&mut self, last_dot: usize) {
        self.start_node(SyntaxKind::ExplicitInterfaceSpecifier);
        let checkpoint = self.checkpoint();
        if self.nth(1) == SyntaxKind::ColonColon {
            self.start_node(SyntaxKind::AliasQualifiedName);
            self.parse_identifier_name();
            self.bump();
            self.parse_simple_name();
            self.finish_node();
        } else {
            self.parse_simple_name();
        }
        while self.pos() < last_dot && self.at(SyntaxKind::Dot) {
            self.start_node_at(checkpoint, SyntaxKind::QualifiedName);
            self.bump();
            self.parse_simple_name();
            self.finish_node();
        }
        self.expect(SyntaxKind::Dot);
        self.finish_node();
    }

    /// Type parameters, parameters, constraints and body after a method name
    fn parse_method_tail(&mut self) {
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_constraint_clauses();
        self.parse_method_body();
    }

    /// `M<T>(...)` with no return type
    fn parse_method_without_type(&mut self) -> SyntaxKind {
        self.error_here(ErrorCode::MemberNeedsType, Vec::new());
        self.missing_name();
        self.bump();
        self.parse_method_tail();
        SyntaxKind::MethodDeclaration
    }

    fn parse_constructor(&mut self) -> SyntaxKind {
        self.bump();
        self.parse_parameter_list(ParameterContext::Declaration);
        if self.at(SyntaxKind::Colon) {
            self.start_node(SyntaxKind::ConstructorInitializer);
            self.bump();
            if !self.eat(SyntaxKind::BaseKw) {
                self.expect(SyntaxKind::ThisKw);
            }
            self.parse_argument_list();
            self.finish_node();
        }
        self.parse_method_body();
        SyntaxKind::ConstructorDeclaration
    }

    fn parse_destructor(&mut self) -> SyntaxKind {
        self.bump();
        self.expect(SyntaxKind::Ident);
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_method_body();
        SyntaxKind::DestructorDeclaration
    }

    /// `operator op (...)` after the return type
    fn parse_operator_tail(&mut self) -> SyntaxKind {
        self.bump();
        self.eat(SyntaxKind::CheckedKw);
        let kind = self.current();
        if kind == SyntaxKind::Gt {
            let (composed, count) = self.composed_operator();
            if count > 1 {
                self.bump_compound(count, composed);
            } else {
                self.bump();
            }
        } else if (kind.is_punctuation() && kind != SyntaxKind::LParen)
            || matches!(kind, SyntaxKind::TrueKw | SyntaxKind::FalseKw)
        {
            self.bump();
        } else {
            let range = self.missing_range();
            self.error_at(range, ErrorCode::SyntaxErrorExpected, vec!["operator".to_string()]);
        }
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_method_body();
        SyntaxKind::OperatorDeclaration
    }

    /// `implicit|explicit operator checked? T (...)`
    fn parse_conversion_operator(&mut self) -> SyntaxKind {
        self.bump();
        self.expect(SyntaxKind::OperatorKw);
        self.eat(SyntaxKind::CheckedKw);
        self.parse_type(TypeMode::Normal);
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_method_body();
        SyntaxKind::ConversionOperatorDeclaration
    }

    fn parse_event(&mut self) -> SyntaxKind {
        self.bump();
        let type_checkpoint = self.checkpoint();
        self.parse_type(TypeMode::Normal);
        let explicit = match self.explicit_interface_end() {
            Some(dot) => {
                self.parse_explicit_interface_specifier(dot);
                true
            }
            None => false,
        };
        if explicit || (self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::LBrace) {
            self.expect(SyntaxKind::Ident);
            self.parse_accessor_list(AccessorOwner::Event);
            return SyntaxKind::EventDeclaration;
        }
        self.start_node_at(type_checkpoint, SyntaxKind::VariableDeclaration);
        loop {
            self.parse_variable_declarator(false);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
        self.expect(SyntaxKind::Semicolon);
        SyntaxKind::EventFieldDeclaration
    }

    /// Accessor list with an optional initializer, or an expression body
    fn parse_property_body(&mut self) {
        if self.at(SyntaxKind::FatArrow) {
            self.parse_arrow_expression_clause();
            self.expect(SyntaxKind::Semicolon);
            return;
        }
        self.parse_accessor_list(AccessorOwner::Property);
        if self.at(SyntaxKind::Eq) {
            self.start_node(SyntaxKind::EqualsValueClause);
            self.bump();
            if self.at(SyntaxKind::LBrace) {
                self.parse_initializer();
            } else {
                self.parse_expression();
            }
            self.finish_node();
            self.expect(SyntaxKind::Semicolon);
        }
    }

    fn at_accessor_start(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::Ident
                | SyntaxKind::LBracket
                | SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::ReadonlyKw
        )
    }

    fn parse_accessor_list(&mut self, owner: AccessorOwner) {
        self.start_node(SyntaxKind::AccessorList);
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at_end() {
            if self.is_cancelled() {
                break;
            }
            let before = self.pos();
            if self.at_accessor_start() {
                self.parse_accessor(owner);
            } else {
                self.skip_tokens(owner.error(), Vec::new(), |p| {
                    !p.at_accessor_start() && !p.at(SyntaxKind::RBrace)
                });
            }
            if self.pos() == before {
                self.skip_token(owner.error(), Vec::new());
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_accessor(&mut self, owner: AccessorOwner) {
        self.start_node(SyntaxKind::AccessorDeclaration);
        self.parse_attribute_lists();
        while matches!(
            self.current(),
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::ReadonlyKw
        ) {
            self.bump();
        }
        if self.at(SyntaxKind::Ident) {
            if !owner.keywords().contains(&self.current_text()) {
                self.error_here(owner.error(), Vec::new());
            }
            self.bump();
        } else {
            self.missing_with(SyntaxKind::Ident, owner.error(), Vec::new());
        }
        self.parse_method_body();
        self.finish_node();
    }

    /// Block, `=> expr;`, or `;`
    pub(crate) fn parse_method_body(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::FatArrow => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::Semicolon);
            }
            SyntaxKind::Semicolon => self.bump(),
            _ => self.missing_with(
                SyntaxKind::Semicolon,
                ErrorCode::OpenBraceOrSemicolonExpected,
                Vec::new(),
            ),
        }
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.start_node(SyntaxKind::ArrowExpressionClause);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }

    // Type declarations

    /// `class`, `struct`, `interface` and `record` declarations
    fn parse_type_declaration(&mut self) -> SyntaxKind {
        let kind = match self.current() {
            SyntaxKind::ClassKw => SyntaxKind::ClassDeclaration,
            SyntaxKind::StructKw => SyntaxKind::StructDeclaration,
            SyntaxKind::InterfaceKw => SyntaxKind::InterfaceDeclaration,
            _ => SyntaxKind::RecordDeclaration,
        };
        if kind == SyntaxKind::RecordDeclaration {
            self.check_feature_here(Feature::Records);
            self.bump();
            if self.at(SyntaxKind::StructKw) {
                self.check_feature_here(Feature::RecordStructs);
                self.bump();
            } else {
                self.eat(SyntaxKind::ClassKw);
            }
        } else {
            self.bump();
        }
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::LParen) {
            if kind != SyntaxKind::RecordDeclaration {
                self.check_feature_here(Feature::PrimaryConstructors);
            }
            self.parse_parameter_list(ParameterContext::Declaration);
        }
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        self.parse_constraint_clauses();
        self.parse_type_body(MemberContext::TypeBody);
        kind
    }

    /// `{ members }` with an optional trailing `;`, or just `;`
    fn parse_type_body(&mut self, context: MemberContext) {
        if self.eat(SyntaxKind::Semicolon) {
            return;
        }
        self.expect(SyntaxKind::LBrace);
        self.parse_type_members(context);
        self.expect(SyntaxKind::RBrace);
        self.eat(SyntaxKind::Semicolon);
    }

    fn parse_type_members(&mut self, context: MemberContext) {
        loop {
            if self.at(SyntaxKind::RBrace) || self.at_end() || self.is_cancelled() {
                break;
            }
            let before = self.pos();
            match self.current() {
                SyntaxKind::NamespaceKw => self.parse_namespace(),
                SyntaxKind::UsingKw => self.parse_using_directive(),
                _ if self.at_member_start() => {
                    self.parse_member(context);
                }
                _ => {
                    let text = self.current_text().to_string();
                    self.skip_tokens(ErrorCode::InvalidMemberDecl, vec![text], |p| {
                        !p.at_member_start() && !p.at(SyntaxKind::RBrace)
                    });
                }
            }
            if self.pos() == before {
                let text = self.current_text().to_string();
                self.skip_token(ErrorCode::InvalidMemberDecl, vec![text]);
            }
        }
    }

    /// `: Base, IFace, Base(args)`
    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BaseList);
        self.bump();
        loop {
            let checkpoint = self.checkpoint();
            self.parse_type(TypeMode::Normal);
            if self.at(SyntaxKind::LParen) {
                self.start_node_at(checkpoint, SyntaxKind::PrimaryConstructorBaseType);
                self.parse_argument_list();
            } else {
                self.start_node_at(checkpoint, SyntaxKind::SimpleBaseType);
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_enum_declaration(&mut self) -> SyntaxKind {
        self.bump();
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        if self.expect(SyntaxKind::LBrace) {
            self.parse_separated(SyntaxKind::RBrace, true, |p| p.parse_enum_member());
            if !self.at(SyntaxKind::RBrace) && !self.at_end() {
                let text = self.current_text().to_string();
                self.skip_tokens(ErrorCode::InvalidMemberDecl, vec![text], |p| {
                    let kind = p.current();
                    kind != SyntaxKind::RBrace
                        && !is_type_keyword(kind)
                        && !kind.is_modifier_keyword()
                });
            }
            self.expect(SyntaxKind::RBrace);
        }
        self.eat(SyntaxKind::Semicolon);
        SyntaxKind::EnumDeclaration
    }

    fn parse_enum_member(&mut self) {
        self.start_node(SyntaxKind::EnumMemberDeclaration);
        self.parse_attribute_lists();
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Eq) {
            self.start_node(SyntaxKind::EqualsValueClause);
            self.bump();
            self.parse_expression();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_delegate_declaration(&mut self) -> SyntaxKind {
        self.bump();
        self.parse_type(TypeMode::Normal);
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list(ParameterContext::Declaration);
        self.parse_constraint_clauses();
        self.expect(SyntaxKind::Semicolon);
        SyntaxKind::DelegateDeclaration
    }

    /// `extension<T>(Receiver r) where ... { members }`
    fn parse_extension_block(&mut self, named: bool) -> SyntaxKind {
        self.bump();
        if named {
            self.error_here(ErrorCode::ExtensionDisallowsName, Vec::new());
            self.bump();
        }
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list(ParameterContext::ExtensionReceiver);
        self.parse_constraint_clauses();
        self.parse_type_body(MemberContext::Extension);
        SyntaxKind::ExtensionBlockDeclaration
    }

    // Parameters and type parameters

    /// `(` parameters `)`
    pub(crate) fn parse_parameter_list(&mut self, context: ParameterContext) {
        self.start_node(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::LParen);
        self.parse_separated(SyntaxKind::RParen, false, |p| p.parse_parameter(context));
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    /// `[` parameters `]` of an indexer
    fn parse_bracketed_parameter_list(&mut self) {
        self.start_node(SyntaxKind::BracketedParameterList);
        self.expect(SyntaxKind::LBracket);
        self.parse_separated(SyntaxKind::RBracket, false, |p| {
            p.parse_parameter(ParameterContext::Declaration)
        });
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
    }

    fn parse_parameter(&mut self, context: ParameterContext) {
        self.start_node(SyntaxKind::Parameter);
        self.parse_attribute_lists();
        loop {
            match self.current() {
                SyntaxKind::RefKw
                | SyntaxKind::OutKw
                | SyntaxKind::InKw
                | SyntaxKind::ParamsKw
                | SyntaxKind::ThisKw
                | SyntaxKind::ReadonlyKw => self.bump(),
                SyntaxKind::Ident
                    if self.classify_contextual(self.pos(), Position::Statement)
                        == Contextual::ScopedModifier =>
                {
                    self.bump()
                }
                _ => break,
            }
        }

        if context == ParameterContext::Lambda
            && self.at(SyntaxKind::Ident)
            && matches!(self.nth(1), SyntaxKind::Comma | SyntaxKind::RParen)
        {
            self.bump();
        } else {
            self.parse_type(TypeMode::Normal);
            if context == ParameterContext::ExtensionReceiver {
                self.eat(SyntaxKind::Ident);
            } else {
                self.expect(SyntaxKind::Ident);
            }
        }

        if self.at(SyntaxKind::Eq) {
            let start = self.pos();
            self.start_node(SyntaxKind::EqualsValueClause);
            self.bump();
            self.parse_expression();
            self.finish_node();
            if context == ParameterContext::ExtensionReceiver {
                let range = self.token_range_from(start);
                self.error_at(
                    range,
                    ErrorCode::ExtensionParameterDisallowsDefaultValue,
                    Vec::new(),
                );
            }
        }
        self.finish_node();
    }

    /// `<` (`in`|`out`)? T, ... `>`
    pub(crate) fn parse_type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TypeParameterList);
        self.bump();
        self.parse_separated(SyntaxKind::Gt, false, |p| {
            p.start_node(SyntaxKind::TypeParameter);
            p.parse_attribute_lists();
            if matches!(p.current(), SyntaxKind::InKw | SyntaxKind::OutKw) {
                p.bump();
            }
            p.expect(SyntaxKind::Ident);
            p.finish_node();
        });
        self.expect(SyntaxKind::Gt);
        self.finish_node();
    }

    /// `where T : constraint, ...` clauses
    pub(crate) fn parse_constraint_clauses(&mut self) {
        while self.at_contextual("where") && self.nth(1) == SyntaxKind::Ident {
            self.start_node(SyntaxKind::TypeParameterConstraintClause);
            self.bump();
            self.parse_identifier_name();
            self.expect(SyntaxKind::Colon);
            loop {
                self.parse_type_constraint();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            self.finish_node();
        }
    }

    fn parse_type_constraint(&mut self) {
        match self.current() {
            SyntaxKind::ClassKw | SyntaxKind::StructKw => {
                self.start_node(SyntaxKind::ClassOrStructConstraint);
                self.bump();
                self.eat(SyntaxKind::Question);
            }
            SyntaxKind::NewKw => {
                self.start_node(SyntaxKind::ConstructorConstraint);
                self.bump();
                self.expect(SyntaxKind::LParen);
                self.expect(SyntaxKind::RParen);
            }
            SyntaxKind::DefaultKw => {
                self.start_node(SyntaxKind::DefaultConstraint);
                self.bump();
            }
            _ => {
                self.start_node(SyntaxKind::TypeConstraint);
                self.parse_type(TypeMode::Normal);
            }
        }
        self.finish_node();
    }

    // Attributes

    pub(crate) fn parse_attribute_lists(&mut self) {
        while self.at(SyntaxKind::LBracket) {
            self.parse_attribute_list();
        }
    }

    /// `[target: Attr(args), ...]`
    fn parse_attribute_list(&mut self) {
        self.start_node(SyntaxKind::AttributeList);
        self.bump();
        if (self.at(SyntaxKind::Ident) || self.current().is_keyword())
            && self.nth(1) == SyntaxKind::Colon
        {
            self.start_node(SyntaxKind::AttributeTargetSpecifier);
            self.bump();
            self.bump();
            self.finish_node();
        }
        self.parse_separated(SyntaxKind::RBracket, true, |p| p.parse_attribute());
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
    }

    fn parse_attribute(&mut self) {
        self.start_node(SyntaxKind::Attribute);
        self.parse_qualified_name();
        if self.at(SyntaxKind::LParen) {
            self.start_node(SyntaxKind::AttributeArgumentList);
            self.bump();
            self.parse_separated(SyntaxKind::RParen, false, |p| {
                p.start_node(SyntaxKind::AttributeArgument);
                if p.at(SyntaxKind::Ident) && p.nth(1) == SyntaxKind::Eq {
                    p.parse_name_equals();
                } else {
                    p.parse_name_colon();
                }
                p.parse_expression();
                p.finish_node();
            });
            self.expect(SyntaxKind::RParen);
            self.finish_node();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{LanguageVersion, ParseOptions};
    use crate::parser::{Parse, node_kinds, parse};

    fn parse_latest(text: &str) -> Parse {
        parse(text, &ParseOptions::default())
    }

    fn codes(parse: &Parse) -> Vec<ErrorCode> {
        parse.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_class_members() {
        let text = "class C : Base, IFoo {\n\
                    private int x = 1, y;\n\
                    public int P { get; private set; } = 3;\n\
                    public string Name => x.ToString();\n\
                    public C(int a) : base(a) { }\n\
                    ~C() { }\n\
                    void M<T>(T t) where T : class, new() { }\n\
                    public int this[int i] => i;\n\
                    }";
        let parse = parse_latest(text);
        assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
        let kinds = node_kinds(&parse.syntax());
        for kind in [
            SyntaxKind::ClassDeclaration,
            SyntaxKind::BaseList,
            SyntaxKind::FieldDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::AccessorList,
            SyntaxKind::ConstructorInitializer,
            SyntaxKind::DestructorDeclaration,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::TypeParameterConstraintClause,
            SyntaxKind::ConstructorConstraint,
            SyntaxKind::IndexerDeclaration,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?}");
        }
        assert_eq!(parse.full_text(), text);
    }

    #[test]
    fn test_extension_block() {
        let parse = parse_latest("static class E { extension(object o) { public void M() { } } }");
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::ExtensionBlockDeclaration));
        assert!(!kinds.contains(&SyntaxKind::ConstructorDeclaration));
    }

    #[test]
    fn test_extension_in_older_version_is_constructor() {
        let options = ParseOptions::default().with_language_version(LanguageVersion::CSharp13);
        let parse = parse("class C { extension(object o) { } }", &options);
        let kinds = node_kinds(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::ConstructorDeclaration));
        assert!(!kinds.contains(&SyntaxKind::ExtensionBlockDeclaration));
        assert_eq!(codes(&parse), vec![ErrorCode::ExtensionKeywordInOlderVersion]);
        assert!(!parse.has_errors());
    }

    #[test]
    fn test_extension_disallows_members() {
        let parse = parse_latest("static class E { extension(object o) { public E() { } int f; } }");
        let args: Vec<_> = parse
            .diagnostics()
            .iter()
            .filter(|d| d.code == ErrorCode::ExtensionDisallowsMember)
            .map(|d| d.args[0].clone())
            .collect();
        assert_eq!(args, vec!["constructor", "field"]);
    }

    #[test]
    fn test_extension_name_and_receiver_default() {
        let parse = parse_latest("static class E { extension Name(object o = null) { } }");
        let codes = codes(&parse);
        assert!(codes.contains(&ErrorCode::ExtensionDisallowsName));
        assert!(codes.contains(&ErrorCode::ExtensionParameterDisallowsDefaultValue));
        assert!(node_kinds(&parse.syntax()).contains(&SyntaxKind::ExtensionBlockDeclaration));
    }

    #[test]
    fn test_const_extension_is_a_field() {
        let text = "class C { const extension(Type) { } }";
        let parse = parse_latest(text);
        let kinds = node_kinds(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::FieldDeclaration));
        assert!(kinds.contains(&SyntaxKind::InitializerExpression));
        assert!(!kinds.contains(&SyntaxKind::ExtensionBlockDeclaration));
        assert!(codes(&parse).contains(&ErrorCode::BadVarDecl));
        assert_eq!(parse.full_text(), text);
    }

    #[test]
    fn test_global_statements_before_types() {
        let parse = parse_latest("System.Console.WriteLine(1);\nclass C { }\n");
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(kinds[1], SyntaxKind::GlobalStatement);
        assert!(kinds.contains(&SyntaxKind::ClassDeclaration));
    }

    #[test]
    fn test_global_statement_after_type_reported_once() {
        let parse = parse_latest("class C { }\nx();\ny();\n");
        assert_eq!(
            codes(&parse),
            vec![ErrorCode::TopLevelStatementAfterNamespaceOrType]
        );
    }

    #[test]
    fn test_top_level_declaration_depends_on_kind() {
        let regular = parse_latest("int x = 1;");
        assert_eq!(
            node_kinds(&regular.syntax())[1..3],
            [
                SyntaxKind::GlobalStatement,
                SyntaxKind::LocalDeclarationStatement
            ]
        );
        let script = parse("int x = 1;", &ParseOptions::script());
        assert_eq!(node_kinds(&script.syntax())[1], SyntaxKind::FieldDeclaration);
    }

    #[test]
    fn test_top_level_statements_gated() {
        let options = ParseOptions::default().with_language_version(LanguageVersion::CSharp8);
        let parse = parse("a();\nb();", &options);
        assert_eq!(codes(&parse), vec![ErrorCode::FeatureNotAvailable]);
    }

    #[test]
    fn test_stray_close_brace() {
        let parse = parse_latest("class C { } }");
        assert_eq!(codes(&parse), vec![ErrorCode::EofExpected]);
        assert_eq!(parse.full_text(), "class C { } }");
    }

    #[test]
    fn test_bad_accessor() {
        let parse = parse_latest("class C { int P { get; foo; } }");
        assert_eq!(codes(&parse), vec![ErrorCode::GetOrSetExpected]);
    }

    #[test]
    fn test_directives_and_file_scoped_namespace() {
        let parse = parse_latest(
            "global using System;\nusing static System.Math;\nusing A = B.C;\nnamespace N;\nclass C { }\n",
        );
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::UsingDirective)
                .count(),
            3
        );
        assert!(kinds.contains(&SyntaxKind::NameEquals));
        assert!(kinds.contains(&SyntaxKind::FileScopedNamespaceDeclaration));
    }

    #[test]
    fn test_record_declarations() {
        let parse = parse_latest("record Point(int X, int Y);\nrecord struct S { }");
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::RecordDeclaration)
                .count(),
            2
        );

        let options = ParseOptions::default().with_language_version(LanguageVersion::CSharp8);
        let old = crate::parser::parse("record Point(int X, int Y);", &options);
        assert_eq!(codes(&old), vec![ErrorCode::FeatureNotAvailable]);
    }

    #[test]
    fn test_missing_method_body() {
        let parse = parse_latest("class C { void M() }");
        assert_eq!(codes(&parse), vec![ErrorCode::OpenBraceOrSemicolonExpected]);
    }

    #[test]
    fn test_operators() {
        let parse = parse_latest(
            "class C { public static C operator +(C a, C b) => a; \
             public static C operator >>(C a, int b) => a; \
             public static implicit operator int(C c) => 0; }",
        );
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::OperatorDeclaration)
                .count(),
            2
        );
        assert!(kinds.contains(&SyntaxKind::ConversionOperatorDeclaration));
    }

    #[test]
    fn test_invalid_member_token_skipped() {
        let parse = parse_latest("class C { int x; ) ) void M() { } }");
        assert_eq!(codes(&parse), vec![ErrorCode::InvalidMemberDecl]);
        assert!(node_kinds(&parse.syntax()).contains(&SyntaxKind::MethodDeclaration));
    }

    #[test]
    fn test_enum_and_delegate() {
        let parse = parse_latest("enum E : byte { A = 1, B, }\ndelegate void D(int x);");
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == SyntaxKind::EnumMemberDeclaration)
                .count(),
            2
        );
        assert!(kinds.contains(&SyntaxKind::DelegateDeclaration));
    }

    #[test]
    fn test_explicit_interface_and_events() {
        let parse = parse_latest(
            "class C : I { void I.M() { } event EventHandler E; \
             event EventHandler F { add { } remove { } } }",
        );
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::ExplicitInterfaceSpecifier));
        assert!(kinds.contains(&SyntaxKind::EventFieldDeclaration));
        assert!(kinds.contains(&SyntaxKind::EventDeclaration));
    }

    #[test]
    fn test_attributes() {
        let parse = parse_latest("[assembly: Foo]\n[Obsolete(\"x\", Error = true)]\nclass C { }");
        assert!(parse.diagnostics().is_empty());
        let kinds = node_kinds(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::AttributeTargetSpecifier));
        assert!(kinds.contains(&SyntaxKind::AttributeArgument));
    }
}
