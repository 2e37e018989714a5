//! The traversal contract between the host compiler and a rewrite pass.
//!
//! The host walks the tree and invokes one callback per node type, once per
//! declaration; it makes no other ordering promises. A pass advertises the
//! syntax extensions it needs through [`Pass::required_syntax`], and the host
//! refuses to run it against a parser that cannot produce those shapes.

use super::*;

/// Syntax extensions a host parser can be asked to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxExtension {
    /// `@expr` annotations on classes, class members, and object properties.
    Decorators,
}

/// Per-node-type callbacks a host traversal drives a pass through.
///
/// Every callback defaults to a no-op so a pass only implements the node
/// types it cares about. `class_declaration` returns statements the host
/// inserts immediately after the declaration; the other callbacks edit the
/// node in place or fail.
pub trait Pass {
    type Error;

    fn required_syntax(&self) -> &'static [SyntaxExtension] {
        &[]
    }

    fn class_declaration(
        &mut self,
        _class: &mut Node<ClassDecl>,
    ) -> Result<Vec<Node<Stmt>>, Self::Error> {
        Ok(Vec::new())
    }

    fn class_expression(&mut self, _class: &mut Node<ClassExpr>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn object_expression(&mut self, _object: &mut Node<Expr>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn function_declaration(
        &mut self,
        _function: &mut Node<FunctionDecl>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
