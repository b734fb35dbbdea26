use std::fmt;

use crate::symbols::{MethodHandle, TypeReference};

/// Java modifiers as they appear on emitted declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Strictfp,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
        };
        write!(f, "{keyword}")
    }
}

/// Position of a node inside its parent
///
/// Children form one ordered sibling list; the role tags what each child is
/// to the parent, so structural edits (insert a comment before an argument,
/// append a member) stay local link updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Not attached to any parent yet
    Detached,
    /// Member of a compilation unit or type declaration
    Member,
    /// Statement inside a block
    Statement,
    /// Receiver of a call or field access, or assignment target
    Target,
    /// Call argument
    Argument,
    /// Field or variable initializer expression
    Initializer,
    /// Assigned value, or the expression of an expression statement
    Value,
    /// Method or catch clause body
    Body,
    /// The guarded block of a try statement
    TryBlock,
    /// Catch clause of a try statement
    CatchClause,
    Comment,
}

#[derive(Debug, Clone)]
pub struct TypeDeclarationData {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    /// Symbolic reference to the declared type. Transforms that synthesize
    /// members need it to build class literals; `None` means the enclosing
    /// context could not be resolved and synthesis must back off.
    pub reference: Option<TypeReference>,
}

#[derive(Debug, Clone)]
pub struct FieldDeclarationData {
    pub modifiers: Vec<Modifier>,
    pub field_type: TypeReference,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ParameterData {
    pub param_type: TypeReference,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MethodDeclarationData {
    pub modifiers: Vec<Modifier>,
    /// `None` for constructors and static initializers
    pub return_type: Option<TypeReference>,
    pub name: String,
    pub parameters: Vec<ParameterData>,
    pub is_static_initializer: bool,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarationData {
    pub is_final: bool,
    pub var_type: TypeReference,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CatchClauseData {
    pub is_final: bool,
    pub exception_type: TypeReference,
    pub variable: String,
}

#[derive(Debug, Clone)]
pub struct CommentData {
    pub text: String,
    pub multiline: bool,
}

/// Every node kind the decompiled output tree can hold
///
/// One tagged union, matched exhaustively - node classification never relies
/// on downcasting.
#[derive(Debug, Clone)]
pub enum NodeKind {
    CompilationUnit,
    TypeDeclaration(TypeDeclarationData),
    FieldDeclaration(FieldDeclarationData),
    MethodDeclaration(MethodDeclarationData),
    Block,
    VariableDeclaration(VariableDeclarationData),
    ExpressionStatement,
    Assignment,
    TryCatch,
    CatchClause(CatchClauseData),
    Identifier(String),
    /// A type used in expression position, e.g. the receiver of a static call
    TypeExpr(TypeReference),
    /// Member access; receiver is the `Target` child, absent for simple names
    FieldAccess(String),
    /// Method invocation; optional `Target` child plus `Argument` children
    MethodCall(String),
    ClassLiteral(TypeReference),
    StringLiteral(String),
    IntegerLiteral(i64),
    NullLiteral,
    Comment(CommentData),
    /// A method-handle constant the decoder could not express in source form;
    /// the rewriter replaces these with references to synthesized helpers
    HandlePlaceholder(MethodHandle),
}
