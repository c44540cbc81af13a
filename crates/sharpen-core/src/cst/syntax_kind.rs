//! Syntax kinds for C# tokens, trivia and nodes
//!
//! A single enum covers every element that can appear in the CST. Rowan only
//! stores the raw `u16`, so the declaration order defines the raw value and
//! [`SyntaxKind::ALL`] maps it back.

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        /// Kind of a token, trivia piece or node in the C# syntax tree
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$meta])* $name),*
        }

        impl SyntaxKind {
            /// All kinds in declaration order, indexed by raw value
            pub(crate) const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name),*];
        }
    };
}

syntax_kinds! {
    // Trivia
    Whitespace,
    EndOfLine,
    SingleLineComment,
    DocComment,
    MultiLineComment,
    PreprocessorDirective,

    // Special tokens
    EndOfFile,
    /// A character the lexer could not classify
    Unknown,

    // Identifiers and literals
    Ident,
    NumericLiteral,
    CharLiteral,
    StringLiteral,
    InterpolatedStringLiteral,
    RawStringLiteral,

    // Punctuation and operators
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Colon,
    Semicolon,
    Tilde,
    Bang,
    Eq,
    Lt,
    Gt,
    Question,
    QuestionQuestion,
    QuestionQuestionEq,
    ColonColon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,
    EqEq,
    BangEq,
    LtEq,
    GtEq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LtLt,
    LtLtEq,
    /// Composed by the parser from two adjacent `>` tokens
    GtGt,
    GtGtEq,
    GtGtGt,
    GtGtGtEq,
    FatArrow,
    Arrow,
    DotDot,

    // Reserved keywords
    AbstractKw,
    AsKw,
    BaseKw,
    BoolKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    CheckedKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DecimalKw,
    DefaultKw,
    DelegateKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    EventKw,
    ExplicitKw,
    ExternKw,
    FalseKw,
    FinallyKw,
    FixedKw,
    FloatKw,
    ForKw,
    ForeachKw,
    GotoKw,
    IfKw,
    ImplicitKw,
    InKw,
    IntKw,
    InterfaceKw,
    InternalKw,
    IsKw,
    LockKw,
    LongKw,
    NamespaceKw,
    NewKw,
    NullKw,
    ObjectKw,
    OperatorKw,
    OutKw,
    OverrideKw,
    ParamsKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    RefKw,
    ReturnKw,
    SbyteKw,
    SealedKw,
    ShortKw,
    SizeofKw,
    StackallocKw,
    StaticKw,
    StringKw,
    StructKw,
    SwitchKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypeofKw,
    UintKw,
    UlongKw,
    UncheckedKw,
    UnsafeKw,
    UshortKw,
    UsingKw,
    VirtualKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // Compilation unit and directives
    CompilationUnit,
    ExternAliasDirective,
    UsingDirective,
    NameEquals,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    GlobalStatement,
    IncompleteMember,
    /// Tokens the parser skipped during recovery, kept for round trip
    SkippedTokensTrivia,

    // Attributes
    AttributeList,
    AttributeTargetSpecifier,
    Attribute,
    AttributeArgumentList,
    AttributeArgument,

    // Type declarations
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    RecordDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    DelegateDeclaration,
    ExtensionBlockDeclaration,
    BaseList,
    SimpleBaseType,
    PrimaryConstructorBaseType,
    TypeParameterList,
    TypeParameter,
    TypeParameterConstraintClause,
    TypeConstraint,
    ClassOrStructConstraint,
    ConstructorConstraint,
    DefaultConstraint,

    // Members
    MethodDeclaration,
    ConstructorDeclaration,
    ConstructorInitializer,
    DestructorDeclaration,
    FieldDeclaration,
    EventFieldDeclaration,
    EventDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    OperatorDeclaration,
    ConversionOperatorDeclaration,
    AccessorList,
    AccessorDeclaration,
    ExplicitInterfaceSpecifier,
    ArrowExpressionClause,
    EqualsValueClause,
    ParameterList,
    BracketedParameterList,
    Parameter,

    // Types
    IdentifierName,
    GenericName,
    TypeArgumentList,
    OmittedTypeArgument,
    QualifiedName,
    AliasQualifiedName,
    PredefinedType,
    ArrayType,
    ArrayRankSpecifier,
    OmittedArraySizeExpression,
    NullableType,
    PointerType,
    TupleType,
    TupleElement,
    RefType,

    // Statements
    Block,
    LocalDeclarationStatement,
    VariableDeclaration,
    VariableDeclarator,
    LocalFunctionStatement,
    DeconstructionDeclaration,
    VariableComponentAssignment,
    TypedVariableComponent,
    ParenthesizedVariableComponent,
    ExpressionStatement,
    EmptyStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    ForEachComponentStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    GotoStatement,
    LabeledStatement,
    YieldStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,
    UsingStatement,
    LockStatement,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    CasePatternSwitchLabel,
    DefaultSwitchLabel,
    WhenClause,
    CheckedStatement,
    UnsafeStatement,
    FixedStatement,

    // Variable designations
    SingleVariableDesignation,
    ParenthesizedVariableDesignation,
    DiscardDesignation,

    // Expressions
    LiteralExpression,
    ParenthesizedExpression,
    TupleExpression,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    NameColon,
    CastExpression,
    ParenthesizedLambdaExpression,
    SimpleLambdaExpression,
    AnonymousMethodExpression,
    BinaryExpression,
    AssignmentExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    ConditionalExpression,
    MemberAccessExpression,
    ConditionalAccessExpression,
    MemberBindingExpression,
    ElementBindingExpression,
    InvocationExpression,
    ElementAccessExpression,
    ThisExpression,
    BaseExpression,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    AnonymousObjectCreationExpression,
    AnonymousObjectMemberDeclarator,
    ArrayCreationExpression,
    ImplicitArrayCreationExpression,
    StackAllocArrayCreationExpression,
    InitializerExpression,
    CollectionExpression,
    ExpressionElement,
    SpreadElement,
    TypeOfExpression,
    SizeOfExpression,
    DefaultExpression,
    CheckedExpression,
    IsPatternExpression,
    AwaitExpression,
    ThrowExpression,
    RefExpression,
    RangeExpression,
    DeclarationExpression,
    SwitchExpression,
    SwitchExpressionArm,
    WithExpression,

    // Patterns
    ConstantPattern,
    DeclarationPattern,
    VarPattern,
    DiscardPattern,
    TypePattern,
    RelationalPattern,
    UnaryPattern,
    BinaryPattern,
    ParenthesizedPattern,
    RecursivePattern,
    PositionalPatternClause,
    PropertyPatternClause,
    Subpattern,
    ListPattern,
    SlicePattern,
}

impl SyntaxKind {
    /// Map a raw rowan kind back to a `SyntaxKind`
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::EndOfLine
                | SyntaxKind::SingleLineComment
                | SyntaxKind::DocComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::PreprocessorDirective
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::SingleLineComment | SyntaxKind::DocComment | SyntaxKind::MultiLineComment
        )
    }

    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::AbstractKw && self <= SyntaxKind::WhileKw
    }

    pub fn is_punctuation(self) -> bool {
        self >= SyntaxKind::LBrace && self <= SyntaxKind::DotDot
    }

    /// Token kinds (as opposed to trivia and nodes)
    pub fn is_token(self) -> bool {
        self >= SyntaxKind::EndOfFile && self <= SyntaxKind::WhileKw
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::InterpolatedStringLiteral
                | SyntaxKind::RawStringLiteral
        )
    }

    /// `int`, `string`, `object`, ... (`void` included)
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BoolKw
                | SyntaxKind::ByteKw
                | SyntaxKind::SbyteKw
                | SyntaxKind::ShortKw
                | SyntaxKind::UshortKw
                | SyntaxKind::IntKw
                | SyntaxKind::UintKw
                | SyntaxKind::LongKw
                | SyntaxKind::UlongKw
                | SyntaxKind::CharKw
                | SyntaxKind::FloatKw
                | SyntaxKind::DoubleKw
                | SyntaxKind::DecimalKw
                | SyntaxKind::StringKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::VoidKw
        )
    }

    /// Modifiers that are reserved keywords
    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::VirtualKw
                | SyntaxKind::OverrideKw
                | SyntaxKind::SealedKw
                | SyntaxKind::ReadonlyKw
                | SyntaxKind::ExternKw
                | SyntaxKind::UnsafeKw
                | SyntaxKind::VolatileKw
                | SyntaxKind::NewKw
                | SyntaxKind::FixedKw
                | SyntaxKind::RefKw
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AmpEq
                | SyntaxKind::PipeEq
                | SyntaxKind::CaretEq
                | SyntaxKind::LtLtEq
                | SyntaxKind::GtGtEq
                | SyntaxKind::GtGtGtEq
                | SyntaxKind::QuestionQuestionEq
        )
    }

    /// Look up a reserved keyword by its source text
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "abstract" => SyntaxKind::AbstractKw,
            "as" => SyntaxKind::AsKw,
            "base" => SyntaxKind::BaseKw,
            "bool" => SyntaxKind::BoolKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "checked" => SyntaxKind::CheckedKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "decimal" => SyntaxKind::DecimalKw,
            "default" => SyntaxKind::DefaultKw,
            "delegate" => SyntaxKind::DelegateKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "event" => SyntaxKind::EventKw,
            "explicit" => SyntaxKind::ExplicitKw,
            "extern" => SyntaxKind::ExternKw,
            "false" => SyntaxKind::FalseKw,
            "finally" => SyntaxKind::FinallyKw,
            "fixed" => SyntaxKind::FixedKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "foreach" => SyntaxKind::ForeachKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "implicit" => SyntaxKind::ImplicitKw,
            "in" => SyntaxKind::InKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "internal" => SyntaxKind::InternalKw,
            "is" => SyntaxKind::IsKw,
            "lock" => SyntaxKind::LockKw,
            "long" => SyntaxKind::LongKw,
            "namespace" => SyntaxKind::NamespaceKw,
            "new" => SyntaxKind::NewKw,
            "null" => SyntaxKind::NullKw,
            "object" => SyntaxKind::ObjectKw,
            "operator" => SyntaxKind::OperatorKw,
            "out" => SyntaxKind::OutKw,
            "override" => SyntaxKind::OverrideKw,
            "params" => SyntaxKind::ParamsKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "readonly" => SyntaxKind::ReadonlyKw,
            "ref" => SyntaxKind::RefKw,
            "return" => SyntaxKind::ReturnKw,
            "sbyte" => SyntaxKind::SbyteKw,
            "sealed" => SyntaxKind::SealedKw,
            "short" => SyntaxKind::ShortKw,
            "sizeof" => SyntaxKind::SizeofKw,
            "stackalloc" => SyntaxKind::StackallocKw,
            "static" => SyntaxKind::StaticKw,
            "string" => SyntaxKind::StringKw,
            "struct" => SyntaxKind::StructKw,
            "switch" => SyntaxKind::SwitchKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "true" => SyntaxKind::TrueKw,
            "try" => SyntaxKind::TryKw,
            "typeof" => SyntaxKind::TypeofKw,
            "uint" => SyntaxKind::UintKw,
            "ulong" => SyntaxKind::UlongKw,
            "unchecked" => SyntaxKind::UncheckedKw,
            "unsafe" => SyntaxKind::UnsafeKw,
            "ushort" => SyntaxKind::UshortKw,
            "using" => SyntaxKind::UsingKw,
            "virtual" => SyntaxKind::VirtualKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed source text of punctuation and keyword kinds
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Dot => ".",
            SyntaxKind::Comma => ",",
            SyntaxKind::Colon => ":",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Bang => "!",
            SyntaxKind::Eq => "=",
            SyntaxKind::Lt => "<",
            SyntaxKind::Gt => ">",
            SyntaxKind::Question => "?",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::QuestionQuestionEq => "??=",
            SyntaxKind::ColonColon => "::",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::Amp => "&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::AmpAmp => "&&",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::EqEq => "==",
            SyntaxKind::BangEq => "!=",
            SyntaxKind::LtEq => "<=",
            SyntaxKind::GtEq => ">=",
            SyntaxKind::PlusEq => "+=",
            SyntaxKind::MinusEq => "-=",
            SyntaxKind::StarEq => "*=",
            SyntaxKind::SlashEq => "/=",
            SyntaxKind::PercentEq => "%=",
            SyntaxKind::AmpEq => "&=",
            SyntaxKind::PipeEq => "|=",
            SyntaxKind::CaretEq => "^=",
            SyntaxKind::LtLt => "<<",
            SyntaxKind::LtLtEq => "<<=",
            SyntaxKind::GtGt => ">>",
            SyntaxKind::GtGtEq => ">>=",
            SyntaxKind::GtGtGt => ">>>",
            SyntaxKind::GtGtGtEq => ">>>=",
            SyntaxKind::FatArrow => "=>",
            SyntaxKind::Arrow => "->",
            SyntaxKind::DotDot => "..",
            SyntaxKind::AbstractKw => "abstract",
            SyntaxKind::AsKw => "as",
            SyntaxKind::BaseKw => "base",
            SyntaxKind::BoolKw => "bool",
            SyntaxKind::BreakKw => "break",
            SyntaxKind::ByteKw => "byte",
            SyntaxKind::CaseKw => "case",
            SyntaxKind::CatchKw => "catch",
            SyntaxKind::CharKw => "char",
            SyntaxKind::CheckedKw => "checked",
            SyntaxKind::ClassKw => "class",
            SyntaxKind::ConstKw => "const",
            SyntaxKind::ContinueKw => "continue",
            SyntaxKind::DecimalKw => "decimal",
            SyntaxKind::DefaultKw => "default",
            SyntaxKind::DelegateKw => "delegate",
            SyntaxKind::DoKw => "do",
            SyntaxKind::DoubleKw => "double",
            SyntaxKind::ElseKw => "else",
            SyntaxKind::EnumKw => "enum",
            SyntaxKind::EventKw => "event",
            SyntaxKind::ExplicitKw => "explicit",
            SyntaxKind::ExternKw => "extern",
            SyntaxKind::FalseKw => "false",
            SyntaxKind::FinallyKw => "finally",
            SyntaxKind::FixedKw => "fixed",
            SyntaxKind::FloatKw => "float",
            SyntaxKind::ForKw => "for",
            SyntaxKind::ForeachKw => "foreach",
            SyntaxKind::GotoKw => "goto",
            SyntaxKind::IfKw => "if",
            SyntaxKind::ImplicitKw => "implicit",
            SyntaxKind::InKw => "in",
            SyntaxKind::IntKw => "int",
            SyntaxKind::InterfaceKw => "interface",
            SyntaxKind::InternalKw => "internal",
            SyntaxKind::IsKw => "is",
            SyntaxKind::LockKw => "lock",
            SyntaxKind::LongKw => "long",
            SyntaxKind::NamespaceKw => "namespace",
            SyntaxKind::NewKw => "new",
            SyntaxKind::NullKw => "null",
            SyntaxKind::ObjectKw => "object",
            SyntaxKind::OperatorKw => "operator",
            SyntaxKind::OutKw => "out",
            SyntaxKind::OverrideKw => "override",
            SyntaxKind::ParamsKw => "params",
            SyntaxKind::PrivateKw => "private",
            SyntaxKind::ProtectedKw => "protected",
            SyntaxKind::PublicKw => "public",
            SyntaxKind::ReadonlyKw => "readonly",
            SyntaxKind::RefKw => "ref",
            SyntaxKind::ReturnKw => "return",
            SyntaxKind::SbyteKw => "sbyte",
            SyntaxKind::SealedKw => "sealed",
            SyntaxKind::ShortKw => "short",
            SyntaxKind::SizeofKw => "sizeof",
            SyntaxKind::StackallocKw => "stackalloc",
            SyntaxKind::StaticKw => "static",
            SyntaxKind::StringKw => "string",
            SyntaxKind::StructKw => "struct",
            SyntaxKind::SwitchKw => "switch",
            SyntaxKind::ThisKw => "this",
            SyntaxKind::ThrowKw => "throw",
            SyntaxKind::TrueKw => "true",
            SyntaxKind::TryKw => "try",
            SyntaxKind::TypeofKw => "typeof",
            SyntaxKind::UintKw => "uint",
            SyntaxKind::UlongKw => "ulong",
            SyntaxKind::UncheckedKw => "unchecked",
            SyntaxKind::UnsafeKw => "unsafe",
            SyntaxKind::UshortKw => "ushort",
            SyntaxKind::UsingKw => "using",
            SyntaxKind::VirtualKw => "virtual",
            SyntaxKind::VoidKw => "void",
            SyntaxKind::VolatileKw => "volatile",
            SyntaxKind::WhileKw => "while",
            _ => return None,
        };
        Some(text)
    }

    /// Human readable name used in diagnostics (`;`, `identifier`, ...)
    pub fn display_name(self) -> &'static str {
        if let Some(text) = self.text() {
            return text;
        }
        match self {
            SyntaxKind::Ident => "identifier",
            SyntaxKind::EndOfFile => "end of file",
            SyntaxKind::NumericLiteral => "numeric literal",
            SyntaxKind::CharLiteral => "character literal",
            SyntaxKind::StringLiteral
            | SyntaxKind::InterpolatedStringLiteral
            | SyntaxKind::RawStringLiteral => "string literal",
            _ => "token",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
