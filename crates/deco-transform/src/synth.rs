//! Element-descriptor literal synthesis.
//!
//! Turns a resolved element into the object-literal expression the runtime
//! call carries. Field names, kind tags, and defaults come from
//! `deco-protocol`; the applier reads the same constants.

use deco_ast::{build, Expr, Node, PropertyName, Span};
use deco_protocol::{defaults, fields, kinds};

use crate::coalesce::{ElementPayload, MemberFn, PendingElement};

pub(crate) fn element_expr(
    element: PendingElement,
    include_static: bool,
    enumerable: bool,
) -> Node<Expr> {
    let span = element.span;
    let mut properties = vec![build::property(
        fields::KIND,
        build::string(kinds::PROPERTY, span),
        span,
    )];
    if include_static {
        properties.push(build::property(
            fields::IS_STATIC,
            build::boolean(element.is_static, span),
            span,
        ));
    }
    properties.push(build::property(
        fields::KEY,
        key_expr(element.key, span),
        span,
    ));
    properties.push(build::property(
        fields::DECORATORS,
        decorators_array(element.decorators, span),
        span,
    ));
    properties.push(build::property(
        fields::DESCRIPTOR,
        descriptor_expr(element.payload, enumerable, span),
        span,
    ));
    build::object(properties, span)
}

/// Named keys become string/number literals; computed keys keep their
/// original expression.
fn key_expr(key: PropertyName, span: Span) -> Node<Expr> {
    match key {
        PropertyName::Ident(id) => build::string(id.value.name, id.span),
        PropertyName::String(s) => build::string(s, span),
        PropertyName::Number(n) => build::number(n, span),
        PropertyName::Computed(expr) => *expr,
    }
}

/// Decorator expressions print in reverse declaration order, so the
/// applier's front-to-back fold runs closest-to-the-member first.
fn decorators_array(mut decorators: Vec<Node<Expr>>, span: Span) -> Node<Expr> {
    decorators.reverse();
    build::array(decorators, span)
}

fn descriptor_expr(payload: ElementPayload, enumerable: bool, span: Span) -> Node<Expr> {
    let mut properties = vec![
        build::property(fields::WRITABLE, build::boolean(defaults::WRITABLE, span), span),
        build::property(fields::ENUMERABLE, build::boolean(enumerable, span), span),
        build::property(
            fields::CONFIGURABLE,
            build::boolean(defaults::CONFIGURABLE, span),
            span,
        ),
    ];
    match payload {
        ElementPayload::Value(value) => {
            properties.push(build::property(fields::VALUE, value, span));
        }
        ElementPayload::Method(func) => {
            properties.push(build::property(fields::VALUE, fn_expr(func, span), span));
        }
        ElementPayload::Accessor { get, set } => {
            if let Some(func) = get {
                properties.push(build::property(fields::GET, fn_expr(func, span), span));
            }
            if let Some(func) = set {
                properties.push(build::property(fields::SET, fn_expr(func, span), span));
            }
        }
    }
    build::object(properties, span)
}

fn fn_expr(func: MemberFn, span: Span) -> Node<Expr> {
    build::function(
        func.name,
        func.params,
        func.body,
        func.is_async,
        func.is_generator,
        span,
    )
}
