//! # Deco Runtime
//!
//! Load-time half of the decorator lowering: the applier that interprets the
//! element-descriptor protocol emitted by `deco-transform` and materializes
//! the decorated class or object.
//!
//! The whole run is synchronous and keeps no state beyond one call's working
//! lists; decorator functions and finishers are ordinary calls. See
//! [`apply`] for the algorithm and `deco-protocol` for the shared contract.

pub mod apply;
pub mod descriptor;
pub mod error;
pub mod property;
pub mod value;

pub use apply::apply;
pub use descriptor::{
    ClassDecorator, ClassDescriptor, ClassOutcome, DescriptorKind, ElementDecorator,
    ElementDescriptor, ElementOutcome, Finisher,
};
pub use error::RuntimeError;
pub use property::PropertyDescriptor;
pub use value::{
    instance_of, CallFn, ConstructFn, FunctionRef, JsFunction, JsObject, ObjectRef, Value,
};
