//! Runtime error types.
//!
//! Every failure here is fatal for the declaration being decorated: the
//! applier never retries and never exposes a partially decorated result.
//! Errors raised inside user decorator and finisher code travel through the
//! [`RuntimeError::Decorator`] variant and are propagated unchanged.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("element descriptor kind must be \"property\", found \"{found}\"")]
    UnsupportedElementKind { found: String },

    #[error("descriptor for \"{key}\" has neither a value nor an accessor")]
    UnusableDescriptor { key: String },

    #[error("Cannot decorate both getter and setter for the same property \"{key}\"")]
    BothAccessorsDecorated { key: String },

    #[error("class descriptor kind must be \"class\", found \"{found}\"")]
    ClassKindChanged { found: String },

    #[error("class decorator replaced the constructor of \"{name}\"; constructor substitution is not implemented")]
    ConstructorReplaced { name: String },

    #[error("static element \"{key}\" cannot be defined on an object literal")]
    StaticElementOnObject { key: String },

    #[error("decoration requires a constructor or a target object")]
    MissingSubject,

    #[error("class decorators require a constructor")]
    ClassDecoratorsWithoutConstructor,

    #[error("class constructor \"{name}\" cannot be invoked without new")]
    ClassConstructorWithoutNew { name: String },

    #[error("\"{name}\" is not a constructor")]
    NotConstructable { name: String },

    #[error("cannot assign to read-only property \"{key}\"")]
    ReadOnlyProperty { key: String },

    #[error("cannot set property \"{key}\" which has only a getter")]
    NoSetter { key: String },

    /// Failure raised by user decorator or finisher code.
    #[error("{0}")]
    Decorator(String),
}
