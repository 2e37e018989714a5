//! Object literal rewrite.

use deco_ast::{build, Expr, Node, ObjectProperty};
use deco_protocol::{defaults, APPLY_HELPER};

use crate::coalesce::{fn_name, property_span, Coalescer, FnPiece, MemberFn};
use crate::error::{TransformError, TransformErrorKind};
use crate::{object_has_decorators, synth};

/// Lower a decorated object literal in place.
///
/// Every property becomes an element of the runtime call, in source order,
/// so the final object keeps the literal's property order. Returns whether
/// the node was rewritten; literals without decorated properties are left
/// untouched.
pub fn transform_object_expression(expr: &mut Node<Expr>) -> Result<bool, TransformError> {
    let span = expr.span;
    let Expr::Object(properties) = &mut expr.value else {
        return Ok(false);
    };
    if !object_has_decorators(properties) {
        return Ok(false);
    }

    let properties = std::mem::take(properties);
    let mut coalescer = Coalescer::new();

    for property in properties {
        match property {
            ObjectProperty::Property {
                key,
                value,
                shorthand: _,
                decorators,
            } => {
                if let Expr::Object(inner) = &value.value {
                    if object_has_decorators(inner) {
                        return Err(TransformError::new(
                            TransformErrorKind::NotImplemented("decorated nested object literals"),
                            value.span,
                        ));
                    }
                }
                let piece_span = property_span(&key, value.span);
                coalescer.value(key, piece_span, decorators, value);
            }
            ObjectProperty::Method {
                key,
                params,
                body,
                is_async,
                is_generator,
                decorators,
            } => {
                let piece_span = property_span(&key, body.span);
                let name = fn_name(&key);
                coalescer.method(FnPiece {
                    key,
                    is_static: false,
                    span: piece_span,
                    decorators,
                    func: MemberFn {
                        name,
                        params,
                        body,
                        is_async,
                        is_generator,
                    },
                });
            }
            ObjectProperty::Getter {
                key,
                body,
                decorators,
            } => {
                let piece_span = property_span(&key, body.span);
                let name = fn_name(&key);
                coalescer.getter(FnPiece {
                    key,
                    is_static: false,
                    span: piece_span,
                    decorators,
                    func: MemberFn {
                        name,
                        params: vec![],
                        body,
                        is_async: false,
                        is_generator: false,
                    },
                });
            }
            ObjectProperty::Setter {
                key,
                param,
                body,
                decorators,
            } => {
                let piece_span = property_span(&key, body.span);
                let name = fn_name(&key);
                coalescer.setter(FnPiece {
                    key,
                    is_static: false,
                    span: piece_span,
                    decorators,
                    func: MemberFn {
                        name,
                        params: vec![param],
                        body,
                        is_async: false,
                        is_generator: false,
                    },
                });
            }
            ObjectProperty::Spread(inner) => {
                return Err(TransformError::new(
                    TransformErrorKind::NotImplemented(
                        "spread properties in decorated object literals",
                    ),
                    inner.span,
                ));
            }
        }
    }

    let elements: Vec<_> = coalescer
        .finish()?
        .into_iter()
        .map(|element| synth::element_expr(element, false, defaults::OBJECT_PROPERTY_ENUMERABLE))
        .collect();

    *expr = build::call(
        build::ident(APPLY_HELPER, span),
        vec![
            build::null(span),
            build::object(vec![], span),
            build::array(elements, span),
            build::array(vec![], span),
        ],
        span,
    );
    Ok(true)
}
