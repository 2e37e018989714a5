//! Member classification and accessor coalescing.
//!
//! Members are removed from the declaration in source order and bucketed; a
//! getter and setter for the same property merge into one bucket when they
//! are adjacent (a method between them breaks adjacency, a plain field does
//! not). One bucket becomes one element of the runtime call.

use deco_ast::{BlockStmt, Expr, Ident, Node, Param, PropertyName, Span};

use crate::error::{TransformError, TransformErrorKind};

/// Function payload lifted out of a removed member.
#[derive(Debug)]
pub(crate) struct MemberFn {
    pub name: Option<Node<Ident>>,
    pub params: Vec<Param>,
    pub body: Node<BlockStmt>,
    pub is_async: bool,
    pub is_generator: bool,
}

/// One removed method or accessor half.
pub(crate) struct FnPiece {
    pub key: PropertyName,
    pub is_static: bool,
    pub span: Span,
    pub decorators: Vec<Node<Expr>>,
    pub func: MemberFn,
}

/// Payload of a resolved element.
#[derive(Debug)]
pub(crate) enum ElementPayload {
    Method(MemberFn),
    Value(Node<Expr>),
    Accessor {
        get: Option<MemberFn>,
        set: Option<MemberFn>,
    },
}

/// A resolved element, ready for descriptor synthesis. Decorators are kept
/// in declaration order; synthesis reverses them.
#[derive(Debug)]
pub(crate) struct PendingElement {
    pub key: PropertyName,
    pub is_static: bool,
    pub span: Span,
    pub decorators: Vec<Node<Expr>>,
    pub payload: ElementPayload,
}

enum Bucket {
    Method(FnPiece),
    Value {
        key: PropertyName,
        span: Span,
        decorators: Vec<Node<Expr>>,
        value: Node<Expr>,
    },
    Accessor {
        getter: Option<FnPiece>,
        setter: Option<FnPiece>,
    },
}

/// Function-expression name for a member: the key identifier when there is
/// one, nothing for computed keys.
pub(crate) fn fn_name(key: &PropertyName) -> Option<Node<Ident>> {
    match key {
        PropertyName::Ident(id) => Some(id.clone()),
        _ => None,
    }
}

/// Span a property-level error should point at: the key when it carries a
/// position, otherwise the given fallback.
pub(crate) fn property_span(key: &PropertyName, fallback: Span) -> Span {
    match key {
        PropertyName::Ident(id) => id.span,
        PropertyName::Computed(expr) => expr.span,
        _ => fallback,
    }
}

/// Alias identifying "same property, same staticness". Computed keys have no
/// compile-time alias and never merge here; the runtime merges them if their
/// evaluated keys collide.
fn member_alias(key: &PropertyName, is_static: bool) -> Option<String> {
    let alias = match key {
        PropertyName::Ident(id) => id.value.name.clone(),
        PropertyName::String(s) => s.clone(),
        PropertyName::Number(n) => n.to_string(),
        PropertyName::Computed(_) => return None,
    };
    if is_static {
        Some(format!("static:{}", alias))
    } else {
        Some(alias)
    }
}

fn later_span(a: Span, b: Span) -> Span {
    if b.start > a.start {
        b
    } else {
        a
    }
}

/// Single-pass, order-preserving bucket builder.
pub(crate) struct Coalescer {
    buckets: Vec<Bucket>,
    /// Alias and bucket position of the most recent accessor half.
    last_accessor: Option<(String, usize)>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            last_accessor: None,
        }
    }

    pub fn method(&mut self, piece: FnPiece) {
        self.last_accessor = None;
        self.buckets.push(Bucket::Method(piece));
    }

    /// A plain key/value property (object literals only). Does not break
    /// accessor adjacency, matching how class fields behave between halves.
    pub fn value(
        &mut self,
        key: PropertyName,
        span: Span,
        decorators: Vec<Node<Expr>>,
        value: Node<Expr>,
    ) {
        self.buckets.push(Bucket::Value {
            key,
            span,
            decorators,
            value,
        });
    }

    pub fn getter(&mut self, piece: FnPiece) {
        self.accessor_half(piece, true);
    }

    pub fn setter(&mut self, piece: FnPiece) {
        self.accessor_half(piece, false);
    }

    fn accessor_half(&mut self, piece: FnPiece, is_getter: bool) {
        let alias = member_alias(&piece.key, piece.is_static);
        if let (Some(alias), Some((last_alias, pos))) = (&alias, &self.last_accessor) {
            if alias == last_alias {
                if let Bucket::Accessor { getter, setter } = &mut self.buckets[*pos] {
                    // Duplicate halves keep the later one, like duplicate
                    // members everywhere else.
                    if is_getter {
                        *getter = Some(piece);
                    } else {
                        *setter = Some(piece);
                    }
                    return;
                }
            }
        }
        let pos = self.buckets.len();
        self.buckets.push(if is_getter {
            Bucket::Accessor {
                getter: Some(piece),
                setter: None,
            }
        } else {
            Bucket::Accessor {
                getter: None,
                setter: Some(piece),
            }
        });
        self.last_accessor = alias.map(|alias| (alias, pos));
    }

    /// Resolve buckets into elements, rejecting pairs decorated on both
    /// halves.
    pub fn finish(self) -> Result<Vec<PendingElement>, TransformError> {
        let mut elements = Vec::with_capacity(self.buckets.len());
        for bucket in self.buckets {
            elements.push(match bucket {
                Bucket::Method(piece) => PendingElement {
                    key: piece.key,
                    is_static: piece.is_static,
                    span: piece.span,
                    decorators: piece.decorators,
                    payload: ElementPayload::Method(piece.func),
                },
                Bucket::Value {
                    key,
                    span,
                    decorators,
                    value,
                } => PendingElement {
                    key,
                    is_static: false,
                    span,
                    decorators,
                    payload: ElementPayload::Value(value),
                },
                Bucket::Accessor {
                    getter: Some(getter),
                    setter: Some(setter),
                } => {
                    let getter_decorated = !getter.decorators.is_empty();
                    let setter_decorated = !setter.decorators.is_empty();
                    if getter_decorated && setter_decorated {
                        return Err(TransformError::new(
                            TransformErrorKind::AccessorPairDecorated,
                            later_span(getter.span, setter.span),
                        ));
                    }
                    // The decorated half names the element; with neither
                    // decorated the setter does, as the later declaration.
                    let (key, is_static, span, decorators) = if getter_decorated {
                        (
                            getter.key.clone(),
                            getter.is_static,
                            getter.span,
                            getter.decorators.clone(),
                        )
                    } else {
                        (
                            setter.key.clone(),
                            setter.is_static,
                            setter.span,
                            setter.decorators.clone(),
                        )
                    };
                    PendingElement {
                        key,
                        is_static,
                        span,
                        decorators,
                        payload: ElementPayload::Accessor {
                            get: Some(getter.func),
                            set: Some(setter.func),
                        },
                    }
                }
                Bucket::Accessor {
                    getter: Some(getter),
                    setter: None,
                } => PendingElement {
                    key: getter.key,
                    is_static: getter.is_static,
                    span: getter.span,
                    decorators: getter.decorators,
                    payload: ElementPayload::Accessor {
                        get: Some(getter.func),
                        set: None,
                    },
                },
                Bucket::Accessor {
                    getter: None,
                    setter: Some(setter),
                } => PendingElement {
                    key: setter.key,
                    is_static: setter.is_static,
                    span: setter.span,
                    decorators: setter.decorators,
                    payload: ElementPayload::Accessor {
                        get: None,
                        set: Some(setter.func),
                    },
                },
                // Accessor buckets are built with at least one half.
                Bucket::Accessor {
                    getter: None,
                    setter: None,
                } => continue,
            });
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_span() -> Span {
        Span::new(0, 0, 0)
    }

    fn at(start: usize) -> Span {
        Span::new(start, start + 1, 0)
    }

    fn piece(name: &str, is_static: bool, span: Span, decorated: bool) -> FnPiece {
        let key = PropertyName::Ident(Node::new(Ident::new(name), span));
        FnPiece {
            func: MemberFn {
                name: fn_name(&key),
                params: vec![],
                body: Node::new(BlockStmt { stmts: vec![] }, span),
                is_async: false,
                is_generator: false,
            },
            key,
            is_static,
            span,
            decorators: if decorated {
                vec![Node::new(Expr::Ident(Ident::new("d")), span)]
            } else {
                vec![]
            },
        }
    }

    #[test]
    fn test_adjacent_pair_merges() {
        let mut coalescer = Coalescer::new();
        coalescer.getter(piece("a", false, dummy_span(), false));
        coalescer.setter(piece("a", false, dummy_span(), false));
        let elements = coalescer.finish().unwrap();
        assert_eq!(elements.len(), 1);
        assert!(matches!(
            elements[0].payload,
            ElementPayload::Accessor {
                get: Some(_),
                set: Some(_)
            }
        ));
    }

    #[test]
    fn test_method_breaks_adjacency() {
        let mut coalescer = Coalescer::new();
        coalescer.getter(piece("a", false, dummy_span(), false));
        coalescer.method(piece("m", false, dummy_span(), false));
        coalescer.setter(piece("a", false, dummy_span(), false));
        let elements = coalescer.finish().unwrap();
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_value_does_not_break_adjacency() {
        let mut coalescer = Coalescer::new();
        coalescer.getter(piece("a", false, dummy_span(), false));
        coalescer.value(
            PropertyName::Ident(Node::new(Ident::new("b"), dummy_span())),
            dummy_span(),
            vec![],
            Node::new(Expr::Literal(deco_ast::Literal::Number(1.0)), dummy_span()),
        );
        coalescer.setter(piece("a", false, dummy_span(), false));
        let elements = coalescer.finish().unwrap();
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_staticness_splits_alias() {
        let mut coalescer = Coalescer::new();
        coalescer.getter(piece("a", false, dummy_span(), false));
        coalescer.setter(piece("a", true, dummy_span(), false));
        let elements = coalescer.finish().unwrap();
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_both_halves_decorated_points_at_later() {
        let mut coalescer = Coalescer::new();
        coalescer.getter(piece("a", false, at(10), true));
        coalescer.setter(piece("a", false, at(40), true));
        let err = coalescer.finish().unwrap_err();
        assert_eq!(err.kind, TransformErrorKind::AccessorPairDecorated);
        assert_eq!(err.span.start, 40);
    }

    #[test]
    fn test_computed_keys_never_merge() {
        let computed = || {
            PropertyName::Computed(Box::new(Node::new(
                Expr::Ident(Ident::new("k")),
                dummy_span(),
            )))
        };
        let mut coalescer = Coalescer::new();
        let mut getter_piece = piece("ignored", false, dummy_span(), false);
        getter_piece.key = computed();
        let mut setter_piece = piece("ignored", false, dummy_span(), false);
        setter_piece.key = computed();
        coalescer.getter(getter_piece);
        coalescer.setter(setter_piece);
        let elements = coalescer.finish().unwrap();
        assert_eq!(elements.len(), 2);
    }
}
