//! Node constructors for synthesized output.
//!
//! The rewrite manufactures literal descriptor records and the runtime call
//! wrapping them; these helpers keep that construction readable. Synthesized
//! nodes reuse the span of the source node they were derived from.

use super::*;

pub fn string(value: impl Into<String>, span: Span) -> Node<Expr> {
    Node::new(Expr::Literal(Literal::String(value.into())), span)
}

pub fn number(value: f64, span: Span) -> Node<Expr> {
    Node::new(Expr::Literal(Literal::Number(value)), span)
}

pub fn boolean(value: bool, span: Span) -> Node<Expr> {
    Node::new(Expr::Literal(Literal::Boolean(value)), span)
}

pub fn null(span: Span) -> Node<Expr> {
    Node::new(Expr::Literal(Literal::Null), span)
}

pub fn ident(name: impl Into<String>, span: Span) -> Node<Expr> {
    Node::new(Expr::Ident(Ident::new(name)), span)
}

pub fn array(elements: Vec<Node<Expr>>, span: Span) -> Node<Expr> {
    Node::new(Expr::Array(elements.into_iter().map(Some).collect()), span)
}

pub fn object(properties: Vec<ObjectProperty>, span: Span) -> Node<Expr> {
    Node::new(Expr::Object(properties), span)
}

/// A non-computed `name: value` property with no decorators.
pub fn property(name: impl Into<String>, value: Node<Expr>, span: Span) -> ObjectProperty {
    ObjectProperty::Property {
        key: PropertyName::Ident(Node::new(Ident::new(name), span)),
        value,
        shorthand: false,
        decorators: vec![],
    }
}

pub fn call(callee: Node<Expr>, args: Vec<Node<Expr>>, span: Span) -> Node<Expr> {
    Node::new(
        Expr::Call {
            callee: Box::new(callee),
            args,
        },
        span,
    )
}

pub fn assign(target: Node<Expr>, value: Node<Expr>, span: Span) -> Node<Expr> {
    Node::new(
        Expr::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        },
        span,
    )
}

pub fn function(
    name: Option<Node<Ident>>,
    params: Vec<Param>,
    body: Node<BlockStmt>,
    is_async: bool,
    is_generator: bool,
    span: Span,
) -> Node<Expr> {
    Node::new(
        Expr::Function {
            name,
            params,
            body,
            is_async,
            is_generator,
        },
        span,
    )
}

pub fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
    let span = expr.span;
    Node::new(Stmt::Expr(expr), span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_span() -> Span {
        Span::new(0, 0, 0)
    }

    #[test]
    fn test_array_wraps_elements() {
        let arr = array(vec![number(1.0, dummy_span())], dummy_span());
        if let Expr::Array(items) = arr.value {
            assert_eq!(items.len(), 1);
            assert!(items[0].is_some());
        } else {
            panic!("Expected array expression");
        }
    }

    #[test]
    fn test_property_key_is_identifier() {
        let prop = property("kind", string("property", dummy_span()), dummy_span());
        if let ObjectProperty::Property { key, decorators, .. } = prop {
            assert!(matches!(key, PropertyName::Ident(ref id) if id.value.name == "kind"));
            assert!(decorators.is_empty());
        } else {
            panic!("Expected key/value property");
        }
    }

    #[test]
    fn test_expr_stmt_keeps_span() {
        let span = Span::new(3, 9, 1);
        let stmt = expr_stmt(null(span));
        assert_eq!(stmt.span, span);
    }
}
