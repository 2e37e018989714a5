//! # Deco Transform
//!
//! Compile-time half of the decorator lowering: recognizes decorator
//! annotations on class members, whole classes, and object-literal
//! properties, and rewrites the declaration into an equivalent one plus a
//! call against the runtime protocol (see `deco-protocol`).
//!
//! The pass is driven by the host traversal through the
//! [`deco_ast::visit::Pass`] callbacks, one declaration at a time, and
//! requires the host parser's decorator syntax extension. Declarations
//! without decorators are left untouched.

use deco_ast::visit::{Pass, SyntaxExtension};
use deco_ast::{ClassDecl, ClassExpr, Expr, FunctionDecl, Node, ObjectProperty, Stmt};

mod class;
mod coalesce;
pub mod diagnostics;
mod error;
mod object;
mod synth;

pub use class::transform_class_declaration;
pub use error::{TransformError, TransformErrorKind};
pub use object::transform_object_expression;

/// A class has decorators when the declaration itself or any direct member
/// is annotated.
pub fn class_has_decorators(class: &ClassDecl) -> bool {
    !class.decorators.is_empty()
        || class
            .members
            .iter()
            .any(|member| !member.value.decorators().is_empty())
}

fn class_expression_has_decorators(class: &ClassExpr) -> bool {
    !class.decorators.is_empty()
        || class
            .members
            .iter()
            .any(|member| !member.value.decorators().is_empty())
}

/// An object literal has decorators when any direct property is annotated.
pub fn object_has_decorators(properties: &[ObjectProperty]) -> bool {
    properties
        .iter()
        .any(|property| !property.decorators().is_empty())
}

/// The decorator lowering pass.
pub struct DecoratorLowering;

impl Pass for DecoratorLowering {
    type Error = TransformError;

    fn required_syntax(&self) -> &'static [SyntaxExtension] {
        &[SyntaxExtension::Decorators]
    }

    fn class_declaration(
        &mut self,
        class: &mut Node<ClassDecl>,
    ) -> Result<Vec<Node<Stmt>>, TransformError> {
        transform_class_declaration(class)
    }

    fn class_expression(&mut self, class: &mut Node<ClassExpr>) -> Result<(), TransformError> {
        if class_expression_has_decorators(&class.value) {
            return Err(TransformError::new(
                TransformErrorKind::NotImplemented("decorated class expressions"),
                class.span,
            ));
        }
        Ok(())
    }

    fn object_expression(&mut self, object: &mut Node<Expr>) -> Result<(), TransformError> {
        transform_object_expression(object).map(|_| ())
    }

    fn function_declaration(
        &mut self,
        function: &mut Node<FunctionDecl>,
    ) -> Result<(), TransformError> {
        if let Some(decorator) = function.value.decorators.first() {
            return Err(TransformError::new(
                TransformErrorKind::NotImplemented("decorated function declarations"),
                decorator.span,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deco_ast::{BlockStmt, Ident, PropertyName, Span};

    fn dummy_span() -> Span {
        Span::new(0, 0, 0)
    }

    fn plain_method(name: &str) -> Node<deco_ast::ClassMember> {
        Node::new(
            deco_ast::ClassMember::Method {
                key: PropertyName::Ident(Node::new(Ident::new(name), dummy_span())),
                params: vec![],
                body: Node::new(BlockStmt { stmts: vec![] }, dummy_span()),
                is_static: false,
                is_async: false,
                is_generator: false,
                decorators: vec![],
            },
            dummy_span(),
        )
    }

    fn plain_class(name: &str) -> Node<ClassDecl> {
        Node::new(
            ClassDecl {
                name: Node::new(Ident::new(name), dummy_span()),
                extends: None,
                members: vec![plain_method("run")],
                decorators: vec![],
            },
            dummy_span(),
        )
    }

    #[test]
    fn test_undecorated_class_is_untouched() {
        let mut class = plain_class("X");
        let original = class.clone();
        let inserted = DecoratorLowering.class_declaration(&mut class).unwrap();
        assert!(inserted.is_empty());
        assert_eq!(class, original);
    }

    #[test]
    fn test_detection_sees_member_decorators() {
        let mut class = plain_class("X");
        if let deco_ast::ClassMember::Method { decorators, .. } =
            &mut class.value.members[0].value
        {
            decorators.push(Node::new(Expr::Ident(Ident::new("d")), dummy_span()));
        }
        assert!(class_has_decorators(&class.value));
    }

    #[test]
    fn test_required_syntax() {
        assert_eq!(
            DecoratorLowering.required_syntax(),
            &[SyntaxExtension::Decorators]
        );
    }

    #[test]
    fn test_decorated_class_expression_is_rejected() {
        let mut class = Node::new(
            ClassExpr {
                name: None,
                extends: None,
                members: vec![],
                decorators: vec![Node::new(Expr::Ident(Ident::new("d")), dummy_span())],
            },
            dummy_span(),
        );
        let err = DecoratorLowering.class_expression(&mut class).unwrap_err();
        assert_eq!(
            err.kind,
            TransformErrorKind::NotImplemented("decorated class expressions")
        );
    }

    #[test]
    fn test_decorated_function_declaration_is_rejected() {
        let mut function = Node::new(
            FunctionDecl {
                name: Node::new(Ident::new("f"), dummy_span()),
                params: vec![],
                body: Node::new(BlockStmt { stmts: vec![] }, dummy_span()),
                is_async: false,
                is_generator: false,
                decorators: vec![Node::new(Expr::Ident(Ident::new("d")), dummy_span())],
            },
            dummy_span(),
        );
        let err = DecoratorLowering
            .function_declaration(&mut function)
            .unwrap_err();
        assert_eq!(
            err.kind,
            TransformErrorKind::NotImplemented("decorated function declarations")
        );
    }

    #[test]
    fn test_undecorated_object_is_untouched() {
        let mut object = deco_ast::build::object(
            vec![deco_ast::build::property(
                "a",
                deco_ast::build::number(1.0, dummy_span()),
                dummy_span(),
            )],
            dummy_span(),
        );
        let original = object.clone();
        DecoratorLowering.object_expression(&mut object).unwrap();
        assert_eq!(object, original);
    }
}
