//! Class declaration rewrite.

use deco_ast::{build, ClassDecl, ClassMember, Node, Stmt};
use deco_protocol::{defaults, APPLY_HELPER};

use crate::coalesce::{fn_name, Coalescer, FnPiece, MemberFn};
use crate::error::{TransformError, TransformErrorKind};
use crate::{class_has_decorators, synth};

/// Lower a decorated class declaration.
///
/// Methods and accessors move out of the declaration into element
/// descriptors; the constructor and undecorated fields stay. Returns the
/// statements to insert after the declaration: an assignment of the class
/// binding to the runtime call, or nothing when the class carries no
/// decorators at all.
pub fn transform_class_declaration(
    class: &mut Node<ClassDecl>,
) -> Result<Vec<Node<Stmt>>, TransformError> {
    if !class_has_decorators(&class.value) {
        return Ok(Vec::new());
    }

    let span = class.span;
    let members = std::mem::take(&mut class.value.members);
    let mut kept = Vec::with_capacity(members.len());
    let mut coalescer = Coalescer::new();

    for member in members {
        let member_span = member.span;
        match member.value {
            ClassMember::Method {
                key,
                params,
                body,
                is_static,
                is_async,
                is_generator,
                decorators,
            } => {
                let name = fn_name(&key);
                coalescer.method(FnPiece {
                    key,
                    is_static,
                    span: member_span,
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
            ClassMember::Getter {
                key,
                body,
                is_static,
                decorators,
            } => {
                let name = fn_name(&key);
                coalescer.getter(FnPiece {
                    key,
                    is_static,
                    span: member_span,
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
            ClassMember::Setter {
                key,
                param,
                body,
                is_static,
                decorators,
            } => {
                let name = fn_name(&key);
                coalescer.setter(FnPiece {
                    key,
                    is_static,
                    span: member_span,
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
            ClassMember::Property {
                key,
                init,
                is_static,
                decorators,
            } => {
                if !decorators.is_empty() {
                    return Err(TransformError::new(
                        TransformErrorKind::NotImplemented("decorated class fields"),
                        member_span,
                    ));
                }
                kept.push(Node::new(
                    ClassMember::Property {
                        key,
                        init,
                        is_static,
                        decorators,
                    },
                    member_span,
                ));
            }
            ClassMember::Constructor { params, body } => {
                kept.push(Node::new(ClassMember::Constructor { params, body }, member_span));
            }
        }
    }

    class.value.members = kept;

    let elements: Vec<_> = coalescer
        .finish()?
        .into_iter()
        .map(|element| synth::element_expr(element, true, defaults::CLASS_MEMBER_ENUMERABLE))
        .collect();

    let mut class_decorators = std::mem::take(&mut class.value.decorators);
    if elements.is_empty() && class_decorators.is_empty() {
        return Ok(Vec::new());
    }
    // Closest-declared first, matching the applier's fold order.
    class_decorators.reverse();

    let name = class.value.name.value.name.clone();
    let name_span = class.value.name.span;
    let call = build::call(
        build::ident(APPLY_HELPER, span),
        vec![
            build::ident(name.clone(), name_span),
            build::null(span),
            build::array(elements, span),
            build::array(class_decorators, span),
        ],
        span,
    );
    let assignment = build::assign(build::ident(name, name_span), call, span);
    Ok(vec![build::expr_stmt(assignment)])
}
