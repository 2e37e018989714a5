//! Element and class descriptors, decorator function types, and the closed
//! set of decoration outcomes.
//!
//! An element descriptor is the unit exchanged between the compile-time
//! rewrite and this runtime: one per property/method/accessor slot. Decorator
//! results are modeled as [`ElementOutcome`]/[`ClassOutcome`] rather than
//! optional fields probed off a returned object, so each hop's contract is
//! checked by the compiler.

use std::fmt;
use std::rc::Rc;

use deco_protocol::kinds;

use crate::error::RuntimeError;
use crate::property::PropertyDescriptor;
use crate::value::{FunctionRef, Value};

/// Descriptor kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Property,
    Class,
}

impl DescriptorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DescriptorKind::Property => kinds::PROPERTY,
            DescriptorKind::Class => kinds::CLASS,
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member-level decorator: receives a cleaned element descriptor, returns
/// an outcome. Failures propagate unchanged.
pub type ElementDecorator = Rc<dyn Fn(ElementDescriptor) -> Result<ElementOutcome, RuntimeError>>;

/// A class-level decorator: receives the class descriptor, returns an outcome
/// whose descriptor must keep the kind and the constructor identity.
pub type ClassDecorator = Rc<dyn Fn(ClassDescriptor) -> Result<ClassOutcome, RuntimeError>>;

/// Invoked once after all properties are defined, with the final
/// constructor/object. `FnOnce` because the protocol promises exactly one
/// call.
pub type Finisher = Box<dyn FnOnce(Value) -> Result<(), RuntimeError>>;

/// One class member or object property, as data.
#[derive(Clone)]
pub struct ElementDescriptor {
    pub kind: DescriptorKind,
    pub is_static: bool,
    pub key: String,
    pub descriptor: PropertyDescriptor,
    /// Pending decorators, deepest-declared first. Empty once cleaned.
    pub decorators: Vec<ElementDecorator>,
}

impl ElementDescriptor {
    fn property(key: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        Self {
            kind: DescriptorKind::Property,
            is_static: false,
            key: key.into(),
            descriptor,
            decorators: vec![],
        }
    }

    /// Instance method slot.
    pub fn method(key: impl Into<String>, func: FunctionRef) -> Self {
        Self::property(key, PropertyDescriptor::data(Value::Function(func)))
    }

    /// Plain data slot.
    pub fn value(key: impl Into<String>, value: Value) -> Self {
        Self::property(key, PropertyDescriptor::data(value))
    }

    /// Accessor slot from either or both halves.
    pub fn accessor(
        key: impl Into<String>,
        get: Option<FunctionRef>,
        set: Option<FunctionRef>,
    ) -> Self {
        Self::property(key, PropertyDescriptor::accessor(get, set))
    }

    pub fn getter(key: impl Into<String>, get: FunctionRef) -> Self {
        Self::accessor(key, Some(get), None)
    }

    pub fn setter(key: impl Into<String>, set: FunctionRef) -> Self {
        Self::accessor(key, None, Some(set))
    }

    /// Mark the element as belonging to the constructor itself.
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.descriptor.enumerable = enumerable;
        self
    }

    /// Append a decorator. Builders push in reverse declaration order, the
    /// order the fold applies them in.
    pub fn decorated(mut self, decorator: ElementDecorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Validate the kind tag and the property descriptor, and drop everything
    /// a decorator must not see: the result carries no decorators.
    pub fn clean(&self) -> Result<ElementDescriptor, RuntimeError> {
        if self.kind != DescriptorKind::Property {
            return Err(RuntimeError::UnsupportedElementKind {
                found: self.kind.as_str().to_string(),
            });
        }
        let descriptor = self
            .descriptor
            .normalized()
            .ok_or_else(|| RuntimeError::UnusableDescriptor {
                key: self.key.clone(),
            })?;
        Ok(ElementDescriptor {
            kind: self.kind,
            is_static: self.is_static,
            key: self.key.clone(),
            descriptor,
            decorators: vec![],
        })
    }
}

impl fmt::Debug for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDescriptor")
            .field("kind", &self.kind)
            .field("is_static", &self.is_static)
            .field("key", &self.key)
            .field("descriptor", &self.descriptor)
            .field("decorators", &self.decorators.len())
            .finish()
    }
}

/// What a member-level decorator hands back: the (possibly replaced) element,
/// at most one finisher, and any extra elements to splice in after it.
pub struct ElementOutcome {
    pub element: ElementDescriptor,
    pub finisher: Option<Finisher>,
    pub extras: Vec<ElementDescriptor>,
}

impl ElementOutcome {
    /// Covers both the unchanged and the replaced-descriptor cases: pass the
    /// received element back, modified or not.
    pub fn of(element: ElementDescriptor) -> Self {
        Self {
            element,
            finisher: None,
            extras: vec![],
        }
    }

    pub fn with_finisher(
        mut self,
        finisher: impl FnOnce(Value) -> Result<(), RuntimeError> + 'static,
    ) -> Self {
        self.finisher = Some(Box::new(finisher));
        self
    }

    pub fn with_extras(mut self, extras: Vec<ElementDescriptor>) -> Self {
        self.extras = extras;
        self
    }
}

/// The record threaded through class-level decorators.
pub struct ClassDescriptor {
    pub kind: DescriptorKind,
    pub constructor: FunctionRef,
    pub parent: Option<FunctionRef>,
    pub members: Vec<ElementDescriptor>,
}

/// What a class-level decorator hands back.
pub struct ClassOutcome {
    pub descriptor: ClassDescriptor,
    pub finisher: Option<Finisher>,
}

impl ClassOutcome {
    pub fn of(descriptor: ClassDescriptor) -> Self {
        Self {
            descriptor,
            finisher: None,
        }
    }

    pub fn with_finisher(
        mut self,
        finisher: impl FnOnce(Value) -> Result<(), RuntimeError> + 'static,
    ) -> Self {
        self.finisher = Some(Box::new(finisher));
        self
    }
}
