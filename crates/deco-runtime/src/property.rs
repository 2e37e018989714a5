//! Property descriptors and the cleaning step.

use deco_protocol::defaults;

use crate::value::{FunctionRef, Value};

/// A property descriptor as decorators see it: the recognized fields of the
/// protocol and nothing else. Data and accessor forms share the struct; the
/// cleaning step resolves which form a descriptor is in.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
    pub get: Option<FunctionRef>,
    pub set: Option<FunctionRef>,
}

impl PropertyDescriptor {
    /// Data descriptor with class-member defaults. Object-literal synthesis
    /// flips enumerability with [`with_enumerable`](Self::with_enumerable).
    pub fn data(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: defaults::WRITABLE,
            enumerable: defaults::CLASS_MEMBER_ENUMERABLE,
            configurable: defaults::CONFIGURABLE,
            get: None,
            set: None,
        }
    }

    /// Accessor descriptor with class-member defaults.
    pub fn accessor(get: Option<FunctionRef>, set: Option<FunctionRef>) -> Self {
        Self {
            value: None,
            writable: false,
            enumerable: defaults::CLASS_MEMBER_ENUMERABLE,
            configurable: defaults::CONFIGURABLE,
            get,
            set,
        }
    }

    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// An accessor descriptor is one with no value and at least one half.
    pub fn is_accessor(&self) -> bool {
        self.value.is_none() && (self.get.is_some() || self.set.is_some())
    }

    /// The cleaning step of the protocol: a present value wins and drops the
    /// accessor halves; otherwise the accessor halves survive and `writable`
    /// is meaningless. `None` means the descriptor describes nothing.
    ///
    /// Cleaning is idempotent: a cleaned descriptor cleans to itself.
    pub fn normalized(&self) -> Option<PropertyDescriptor> {
        if self.value.is_some() {
            return Some(PropertyDescriptor {
                value: self.value.clone(),
                writable: self.writable,
                enumerable: self.enumerable,
                configurable: self.configurable,
                get: None,
                set: None,
            });
        }
        if self.get.is_some() || self.set.is_some() {
            return Some(PropertyDescriptor {
                value: None,
                writable: false,
                enumerable: self.enumerable,
                configurable: self.configurable,
                get: self.get.clone(),
                set: self.set.clone(),
            });
        }
        None
    }
}
