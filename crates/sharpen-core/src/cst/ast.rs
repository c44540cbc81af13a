//! Typed AST layer over CST
//!
//! This module provides ergonomic, type-safe wrappers over the raw CST nodes.
//! Each wrapper implements a `cast()` method to safely convert from CST nodes.
//! Accessors return `None` when the part is absent from the source, which
//! includes zero-width tokens the parser synthesized during recovery.
//!
//! # Example
//!
//! ```
//! use sharpen_core::cst::ast::{AstNode, CompilationUnit};
//! use sharpen_core::{ParseOptions, parse};
//!
//! let parse = parse("class Point { int X() => 1; }", &ParseOptions::default());
//! let unit = CompilationUnit::cast(parse.syntax()).unwrap();
//! let class = unit.type_declarations().next().unwrap();
//!
//! assert_eq!(class.name().unwrap(), "Point");
//! assert_eq!(class.methods().next().unwrap().name().unwrap(), "X");
//! ```

use super::{SyntaxKind, SyntaxNode, SyntaxToken, is_missing};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first token of a specific kind
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Text of the node's own identifier token, unless it was synthesized
fn get_ident_text(node: &SyntaxNode) -> Option<String> {
    token_of_kind(node, SyntaxKind::Ident)
        .filter(|t| !is_missing(t))
        .map(|t| t.text().to_string())
}

/// Text of the first real identifier anywhere below `node`
fn descendant_ident_text(node: &SyntaxNode) -> Option<String> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::Ident && !is_missing(t))
        .map(|t| t.text().to_string())
}

/// Does `kind` head a type syntax?
pub fn is_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IdentifierName
            | SyntaxKind::GenericName
            | SyntaxKind::QualifiedName
            | SyntaxKind::AliasQualifiedName
            | SyntaxKind::PredefinedType
            | SyntaxKind::ArrayType
            | SyntaxKind::NullableType
            | SyntaxKind::PointerType
            | SyntaxKind::TupleType
            | SyntaxKind::RefType
    )
}

/// Does `kind` head a member or type declaration?
pub fn is_member(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NamespaceDeclaration
            | SyntaxKind::FileScopedNamespaceDeclaration
            | SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::RecordDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::DelegateDeclaration
            | SyntaxKind::ExtensionBlockDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::DestructorDeclaration
            | SyntaxKind::FieldDeclaration
            | SyntaxKind::EventFieldDeclaration
            | SyntaxKind::EventDeclaration
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::IndexerDeclaration
            | SyntaxKind::OperatorDeclaration
            | SyntaxKind::ConversionOperatorDeclaration
            | SyntaxKind::IncompleteMember
    )
}

// ============================================================================
// Compilation unit
// ============================================================================

/// Root of every parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    syntax: SyntaxNode,
}

impl AstNode for CompilationUnit {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::CompilationUnit
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> {
        self.syntax.children().filter_map(UsingDirective::cast)
    }

    pub fn global_statements(&self) -> impl Iterator<Item = GlobalStatement> {
        self.syntax.children().filter_map(GlobalStatement::cast)
    }

    /// Top-level members and namespaces, in source order
    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|n| is_member(n.kind()))
    }

    /// Classes, structs, interfaces and records declared at the top level
    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> {
        self.syntax.children().filter_map(TypeDeclaration::cast)
    }

    pub fn end_of_file(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::EndOfFile)
    }
}

/// `using` directive, including `global using`, `using static` and aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    syntax: SyntaxNode,
}

impl AstNode for UsingDirective {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::UsingDirective
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl UsingDirective {
    pub fn is_global(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::Ident).is_some_and(|t| t.text() == "global")
    }

    pub fn is_static(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::StaticKw).is_some()
    }

    /// Alias introduced by `using A = ...;`
    pub fn alias(&self) -> Option<String> {
        child_of_kind(&self.syntax, SyntaxKind::NameEquals).and_then(|n| descendant_ident_text(&n))
    }

    /// The imported name or type, without trivia
    pub fn target(&self) -> Option<String> {
        self.syntax
            .children()
            .find(|n| is_type(n.kind()))
            .map(|n| n.text().to_string().trim().to_string())
    }
}

/// Statement written directly in the compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStatement {
    syntax: SyntaxNode,
}

impl AstNode for GlobalStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::GlobalStatement
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl GlobalStatement {
    pub fn statement(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

// ============================================================================
// Type declarations
// ============================================================================

/// Class, struct, interface or record declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for TypeDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::RecordDeclaration
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl TypeDeclaration {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn name(&self) -> Option<String> {
        get_ident_text(&self.syntax)
    }

    /// Primary constructor or record parameters
    pub fn parameter_list(&self) -> Option<ParameterList> {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList).and_then(ParameterList::cast)
    }

    /// Types named in the base list, without trivia
    pub fn base_types(&self) -> Vec<String> {
        child_of_kind(&self.syntax, SyntaxKind::BaseList)
            .map(|list| {
                list.children()
                    .filter_map(|base| base.children().find(|n| is_type(n.kind())))
                    .map(|ty| ty.text().to_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|n| is_member(n.kind()))
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDeclaration> {
        self.syntax.children().filter_map(MethodDeclaration::cast)
    }

    pub fn extension_blocks(&self) -> impl Iterator<Item = ExtensionBlockDeclaration> {
        self.syntax
            .children()
            .filter_map(ExtensionBlockDeclaration::cast)
    }
}

/// `extension<T>(Receiver r) { members }` inside a static class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBlockDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for ExtensionBlockDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ExtensionBlockDeclaration
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ExtensionBlockDeclaration {
    /// The single receiver parameter
    pub fn receiver(&self) -> Option<Parameter> {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList)
            .and_then(ParameterList::cast)
            .and_then(|list| list.parameters().next())
    }

    pub fn type_parameters(&self) -> Vec<String> {
        child_of_kind(&self.syntax, SyntaxKind::TypeParameterList)
            .map(|list| {
                list.children()
                    .filter_map(|p| get_ident_text(&p))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|n| is_member(n.kind()))
    }
}

// ============================================================================
// Methods and parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for MethodDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::MethodDeclaration
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl MethodDeclaration {
    pub fn name(&self) -> Option<String> {
        get_ident_text(&self.syntax)
    }

    /// Return type; absent when the declaration lacks one
    pub fn return_type(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| is_type(n.kind()))
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList).and_then(ParameterList::cast)
    }

    pub fn body(&self) -> Option<Block> {
        child_of_kind(&self.syntax, SyntaxKind::Block).and_then(Block::cast)
    }

    /// The `=> expr` body
    pub fn expression_body(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::ArrowExpressionClause)
            .and_then(|clause| clause.first_child())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    syntax: SyntaxNode,
}

impl AstNode for ParameterList {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ParameterList | SyntaxKind::BracketedParameterList
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.syntax.children().filter_map(Parameter::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    syntax: SyntaxNode,
}

impl AstNode for Parameter {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Parameter
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Parameter {
    pub fn name(&self) -> Option<String> {
        get_ident_text(&self.syntax)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| is_type(n.kind()))
    }

    /// Modifier keywords such as `ref`, `this` or `params`
    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .filter(|kind| {
                matches!(
                    kind,
                    SyntaxKind::RefKw
                        | SyntaxKind::OutKw
                        | SyntaxKind::InKw
                        | SyntaxKind::ParamsKw
                        | SyntaxKind::ThisKw
                        | SyntaxKind::ReadonlyKw
                )
            })
            .collect()
    }

    pub fn default_value(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::EqualsValueClause).and_then(|c| c.first_child())
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    syntax: SyntaxNode,
}

impl AstNode for Block {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Block
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Block {
    /// Statements in order; skipped tokens are not statements
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::SkippedTokensTrivia)
    }
}

/// `T x = e, y;` as a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDeclarationStatement {
    syntax: SyntaxNode,
}

impl AstNode for LocalDeclarationStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LocalDeclarationStatement
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child_of_kind(&self.syntax, SyntaxKind::VariableDeclaration)
            .and_then(VariableDeclaration::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for VariableDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::VariableDeclaration
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl VariableDeclaration {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| is_type(n.kind()))
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> {
        self.syntax.children().filter_map(VariableDeclarator::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarator {
    syntax: SyntaxNode,
}

impl AstNode for VariableDeclarator {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::VariableDeclarator
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl VariableDeclarator {
    pub fn name(&self) -> Option<String> {
        get_ident_text(&self.syntax)
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::EqualsValueClause).and_then(|c| c.first_child())
    }
}

// ============================================================================
// Deconstruction
// ============================================================================

/// `var (a, b) = e;` or `(int a, var b) = e;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeconstructionDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for DeconstructionDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::DeconstructionDeclaration
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl DeconstructionDeclaration {
    pub fn assignment(&self) -> Option<VariableComponentAssignment> {
        child_of_kind(&self.syntax, SyntaxKind::VariableComponentAssignment)
            .and_then(VariableComponentAssignment::cast)
    }
}

/// component `=` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableComponentAssignment {
    syntax: SyntaxNode,
}

impl AstNode for VariableComponentAssignment {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::VariableComponentAssignment
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl VariableComponentAssignment {
    pub fn component(&self) -> Option<VariableComponent> {
        self.syntax.children().find_map(VariableComponent::cast)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .skip_while(|n| !VariableComponent::can_cast(n.kind()))
            .nth(1)
    }
}

/// Left-hand side of a deconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableComponent {
    /// `T designation`, where `T` may be `var`
    Typed(SyntaxNode),
    /// `(component, component, ...)`
    Parenthesized(SyntaxNode),
}

impl VariableComponent {
    pub fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::TypedVariableComponent | SyntaxKind::ParenthesizedVariableComponent
        )
    }

    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TypedVariableComponent => Some(Self::Typed(node)),
            SyntaxKind::ParenthesizedVariableComponent => Some(Self::Parenthesized(node)),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Typed(node) | Self::Parenthesized(node) => node,
        }
    }

    /// Declared type of a typed component
    pub fn ty(&self) -> Option<SyntaxNode> {
        match self {
            Self::Typed(node) => node.children().find(|n| is_type(n.kind())),
            Self::Parenthesized(_) => None,
        }
    }

    pub fn designation(&self) -> Option<VariableDesignation> {
        match self {
            Self::Typed(node) => node.children().find_map(VariableDesignation::cast),
            Self::Parenthesized(_) => None,
        }
    }

    /// Nested components of a parenthesized component
    pub fn components(&self) -> Vec<VariableComponent> {
        match self {
            Self::Parenthesized(node) => node.children().filter_map(Self::cast).collect(),
            Self::Typed(_) => Vec::new(),
        }
    }

    /// Every variable declared, left to right; discards are skipped
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        match self {
            Self::Typed(_) => {
                if let Some(designation) = self.designation() {
                    designation.collect_names(&mut names);
                }
            }
            Self::Parenthesized(_) => {
                for component in self.components() {
                    names.extend(component.variables());
                }
            }
        }
        names
    }
}

/// Name part of a declaration pattern or deconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableDesignation {
    Single(SyntaxNode),
    Parenthesized(SyntaxNode),
    Discard(SyntaxNode),
}

impl VariableDesignation {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SingleVariableDesignation => Some(Self::Single(node)),
            SyntaxKind::ParenthesizedVariableDesignation => Some(Self::Parenthesized(node)),
            SyntaxKind::DiscardDesignation => Some(Self::Discard(node)),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Single(node) | Self::Parenthesized(node) | Self::Discard(node) => node,
        }
    }

    fn collect_names(&self, names: &mut Vec<String>) {
        match self {
            Self::Single(node) => names.extend(get_ident_text(node)),
            Self::Parenthesized(node) => {
                for inner in node.children().filter_map(Self::cast) {
                    inner.collect_names(names);
                }
            }
            Self::Discard(_) => {}
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// `(a, b)` or `(x: 1, y: 2)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleExpression {
    syntax: SyntaxNode,
}

impl AstNode for TupleExpression {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::TupleExpression
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl TupleExpression {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> {
        self.syntax.children().filter_map(Argument::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    syntax: SyntaxNode,
}

impl AstNode for Argument {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Argument
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Argument {
    /// Element or parameter name given with `name:`
    pub fn name(&self) -> Option<String> {
        child_of_kind(&self.syntax, SyntaxKind::NameColon).and_then(|n| descendant_ident_text(&n))
    }

    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() != SyntaxKind::NameColon)
    }
}
