//! Statement definitions for the AST

use super::*;

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement
    Expr(Node<Expr>),

    /// Block statement: { stmts }
    Block(BlockStmt),

    /// Return statement
    Return(Option<Node<Expr>>),
}

/// Block statement body. Method and function bodies are carried through the
/// rewrite opaquely; the pass never looks inside them.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub stmts: Vec<Node<Stmt>>,
}
