//! Declaration definitions for the AST

use super::*;

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Function declaration
    Function(FunctionDecl),

    /// Class declaration
    Class(ClassDecl),
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Node<Ident>,
    pub params: Vec<Param>,
    pub body: Node<BlockStmt>,
    pub is_async: bool,
    pub is_generator: bool,
    /// Decorator syntax parses here but is not a supported placement.
    pub decorators: Vec<Node<Expr>>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Node<Pattern>,
}

/// Binding pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Plain binding: name
    Ident(Ident),

    /// Default value: target = default
    Assign {
        target: Box<Node<Pattern>>,
        default: Box<Node<Expr>>,
    },

    /// Rest binding: ...target
    Rest(Box<Node<Pattern>>),
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Node<Ident>,
    pub extends: Option<Box<Node<Expr>>>,
    pub members: Vec<Node<ClassMember>>,
    pub decorators: Vec<Node<Expr>>,
}

/// Class expression. Same shape as a declaration except the name is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpr {
    pub name: Option<Node<Ident>>,
    pub extends: Option<Box<Node<Expr>>>,
    pub members: Vec<Node<ClassMember>>,
    pub decorators: Vec<Node<Expr>>,
}

/// Class member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Constructor
    Constructor {
        params: Vec<Param>,
        body: Node<BlockStmt>,
    },

    /// Method
    Method {
        key: PropertyName,
        params: Vec<Param>,
        body: Node<BlockStmt>,
        is_static: bool,
        is_async: bool,
        is_generator: bool,
        decorators: Vec<Node<Expr>>,
    },

    /// Getter
    Getter {
        key: PropertyName,
        body: Node<BlockStmt>,
        is_static: bool,
        decorators: Vec<Node<Expr>>,
    },

    /// Setter
    Setter {
        key: PropertyName,
        param: Param,
        body: Node<BlockStmt>,
        is_static: bool,
        decorators: Vec<Node<Expr>>,
    },

    /// Property/field
    Property {
        key: PropertyName,
        init: Option<Node<Expr>>,
        is_static: bool,
        decorators: Vec<Node<Expr>>,
    },
}

impl ClassMember {
    /// The decorators attached to this member. Constructors cannot carry any.
    pub fn decorators(&self) -> &[Node<Expr>] {
        match self {
            ClassMember::Constructor { .. } => &[],
            ClassMember::Method { decorators, .. }
            | ClassMember::Getter { decorators, .. }
            | ClassMember::Setter { decorators, .. }
            | ClassMember::Property { decorators, .. } => decorators,
        }
    }
}
