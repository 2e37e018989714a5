//! Value and object model.
//!
//! Just enough of a JavaScript object model to host the properties the
//! applier defines: objects with insertion-ordered property tables and a
//! prototype link, and functions with a static-property table, a `.prototype`
//! object, an optional parent constructor, and interior-mutable behavior.
//!
//! Behavior being swappable is what lets a finisher wrap construction (log,
//! then delegate) without changing the constructor's identity; identity, the
//! `.prototype` object, the statics table, and the name all live outside the
//! behavior and survive the swap.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::property::PropertyDescriptor;

pub type ObjectRef = Rc<JsObject>;
pub type FunctionRef = Rc<JsFunction>;

/// Call behavior: `(this, args) -> result`.
pub type CallFn = Rc<dyn Fn(Value, &[Value]) -> Result<Value, RuntimeError>>;

/// Construct behavior: `(args, new_target) -> instance`.
///
/// `new_target` is the constructor the `new` expression originally named, so
/// a parent reached through a construction chain allocates off the most
/// derived prototype.
pub type ConstructFn = Rc<dyn Fn(&[Value], &FunctionRef) -> Result<Value, RuntimeError>>;

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Object(ObjectRef),
    Function(FunctionRef),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Object(_) => write!(f, "[object]"),
            Value::Function(func) => write!(f, "[function {}]", func.name()),
        }
    }
}

/// Heap object: ordered property table plus a prototype link.
pub struct JsObject {
    properties: RefCell<IndexMap<String, PropertyDescriptor>>,
    prototype: RefCell<Option<ObjectRef>>,
}

impl JsObject {
    pub fn new() -> ObjectRef {
        Rc::new(JsObject {
            properties: RefCell::new(IndexMap::new()),
            prototype: RefCell::new(None),
        })
    }

    pub fn with_prototype(proto: ObjectRef) -> ObjectRef {
        let obj = JsObject::new();
        *obj.prototype.borrow_mut() = Some(proto);
        obj
    }

    pub fn proto(&self) -> Option<ObjectRef> {
        self.prototype.borrow().clone()
    }

    pub fn set_proto(&self, proto: Option<ObjectRef>) {
        *self.prototype.borrow_mut() = proto;
    }

    /// Define or redefine an own property. Redefinition keeps the original
    /// insertion position, like `Object.defineProperty`.
    pub fn define_property(&self, key: impl Into<String>, descriptor: PropertyDescriptor) {
        self.properties.borrow_mut().insert(key.into(), descriptor);
    }

    pub fn own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        self.properties.borrow().get(key).cloned()
    }

    /// Own property or the nearest one up the prototype chain.
    pub fn lookup(&self, key: &str) -> Option<PropertyDescriptor> {
        if let Some(descriptor) = self.own_property(key) {
            return Some(descriptor);
        }
        let mut current = self.proto();
        while let Some(obj) = current {
            if let Some(descriptor) = obj.own_property(key) {
                return Some(descriptor);
            }
            current = obj.proto();
        }
        None
    }

    /// Property read, invoking a getter with `this` bound to the receiver.
    pub fn get(receiver: &ObjectRef, key: &str) -> Result<Value, RuntimeError> {
        match receiver.lookup(key) {
            None => Ok(Value::Undefined),
            Some(descriptor) => {
                if let Some(value) = descriptor.value {
                    return Ok(value);
                }
                match descriptor.get {
                    Some(getter) => getter.call(Value::Object(receiver.clone()), &[]),
                    None => Ok(Value::Undefined),
                }
            }
        }
    }

    /// Property write, invoking a setter with `this` bound to the receiver.
    pub fn set(receiver: &ObjectRef, key: &str, value: Value) -> Result<(), RuntimeError> {
        if let Some(descriptor) = receiver.lookup(key) {
            if descriptor.is_accessor() {
                return match descriptor.set {
                    Some(setter) => {
                        setter.call(Value::Object(receiver.clone()), &[value])?;
                        Ok(())
                    }
                    None => Err(RuntimeError::NoSetter { key: key.to_string() }),
                };
            }
            if !descriptor.writable {
                return Err(RuntimeError::ReadOnlyProperty { key: key.to_string() });
            }
            if let Some(mut own) = receiver.own_property(key) {
                own.value = Some(value);
                receiver.define_property(key, own);
                return Ok(());
            }
        }
        receiver.define_property(
            key,
            PropertyDescriptor::data(value).with_enumerable(true),
        );
        Ok(())
    }

    /// Enumerable own keys in insertion order (`Object.keys`).
    pub fn own_keys(&self) -> Vec<String> {
        self.properties
            .borrow()
            .iter()
            .filter(|(_, descriptor)| descriptor.enumerable)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsObject({} properties)", self.properties.borrow().len())
    }
}

struct FunctionBehavior {
    call: CallFn,
    construct: ConstructFn,
}

/// Function object: callable, possibly constructable, with statics and a
/// `.prototype` object.
pub struct JsFunction {
    name: String,
    is_class_constructor: bool,
    behavior: RefCell<FunctionBehavior>,
    statics: RefCell<IndexMap<String, PropertyDescriptor>>,
    prototype: ObjectRef,
    parent: Option<FunctionRef>,
}

impl JsFunction {
    /// A plain callable function. Constructing it fails.
    pub fn native(name: impl Into<String>, call: CallFn) -> FunctionRef {
        let name = name.into();
        let not_constructable = name.clone();
        Rc::new(JsFunction {
            name,
            is_class_constructor: false,
            behavior: RefCell::new(FunctionBehavior {
                call,
                construct: Rc::new(move |_, _| {
                    Err(RuntimeError::NotConstructable {
                        name: not_constructable.clone(),
                    })
                }),
            }),
            statics: RefCell::new(IndexMap::new()),
            prototype: JsObject::new(),
            parent: None,
        })
    }

    /// A class constructor. Calling it without `new` fails; its `.prototype`
    /// chains to the parent's when one is given.
    pub fn class_constructor(
        name: impl Into<String>,
        parent: Option<FunctionRef>,
        construct: ConstructFn,
    ) -> FunctionRef {
        let name = name.into();
        let prototype = JsObject::new();
        if let Some(parent) = &parent {
            prototype.set_proto(Some(parent.prototype()));
        }
        let without_new = name.clone();
        Rc::new(JsFunction {
            name,
            is_class_constructor: true,
            behavior: RefCell::new(FunctionBehavior {
                call: Rc::new(move |_, _| {
                    Err(RuntimeError::ClassConstructorWithoutNew {
                        name: without_new.clone(),
                    })
                }),
                construct,
            }),
            statics: RefCell::new(IndexMap::new()),
            prototype,
            parent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prototype(&self) -> ObjectRef {
        self.prototype.clone()
    }

    pub fn parent(&self) -> Option<FunctionRef> {
        self.parent.clone()
    }

    pub fn call(&self, this: Value, args: &[Value]) -> Result<Value, RuntimeError> {
        if self.is_class_constructor {
            return Err(RuntimeError::ClassConstructorWithoutNew {
                name: self.name.clone(),
            });
        }
        let call = self.behavior.borrow().call.clone();
        call(this, args)
    }

    /// `new target(args)`.
    pub fn construct(target: &FunctionRef, args: &[Value]) -> Result<Value, RuntimeError> {
        JsFunction::construct_with_target(target, args, target)
    }

    /// `Reflect.construct(target, args, new_target)`.
    pub fn construct_with_target(
        target: &FunctionRef,
        args: &[Value],
        new_target: &FunctionRef,
    ) -> Result<Value, RuntimeError> {
        let construct = target.behavior.borrow().construct.clone();
        construct(args, new_target)
    }

    /// Current construct behavior. Wrapping finishers capture this before
    /// installing a replacement.
    pub fn construct_fn(&self) -> ConstructFn {
        self.behavior.borrow().construct.clone()
    }

    /// Replace construct behavior in place; identity, name, statics, and the
    /// `.prototype` object are untouched.
    pub fn set_construct(&self, construct: ConstructFn) {
        self.behavior.borrow_mut().construct = construct;
    }

    pub fn define_static(&self, key: impl Into<String>, descriptor: PropertyDescriptor) {
        self.statics.borrow_mut().insert(key.into(), descriptor);
    }

    pub fn own_static(&self, key: &str) -> Option<PropertyDescriptor> {
        self.statics.borrow().get(key).cloned()
    }

    /// Static property read, walking the parent-constructor chain the way
    /// class statics are inherited.
    pub fn get_static(receiver: &FunctionRef, key: &str) -> Result<Value, RuntimeError> {
        let mut current = Some(receiver.clone());
        while let Some(func) = current {
            if let Some(descriptor) = func.own_static(key) {
                if let Some(value) = descriptor.value {
                    return Ok(value);
                }
                return match descriptor.get {
                    Some(getter) => getter.call(Value::Function(receiver.clone()), &[]),
                    None => Ok(Value::Undefined),
                };
            }
            current = func.parent();
        }
        Ok(Value::Undefined)
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsFunction({})", self.name)
    }
}

/// `value instanceof ctor`: walks the prototype chain against the
/// constructor's current `.prototype` object.
pub fn instance_of(value: &Value, ctor: &FunctionRef) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let target = ctor.prototype();
    let mut current = obj.proto();
    while let Some(proto) = current {
        if Rc::ptr_eq(&proto, &target) {
            return true;
        }
        current = proto.proto();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn getter_returning(value: Value) -> FunctionRef {
        JsFunction::native("get", Rc::new(move |_, _| Ok(value.clone())))
    }

    #[test]
    fn test_define_keeps_insertion_order() {
        let obj = JsObject::new();
        JsObject::set(&obj, "a", Value::Number(1.0)).unwrap();
        JsObject::set(&obj, "b", Value::Number(2.0)).unwrap();
        JsObject::set(&obj, "a", Value::Number(3.0)).unwrap();
        assert_eq!(obj.own_keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(JsObject::get(&obj, "a").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_getter_receives_receiver() {
        let obj = JsObject::new();
        let getter = JsFunction::native(
            "get",
            Rc::new(|this, _| {
                let receiver = this.as_object().cloned().expect("getter needs this");
                JsObject::get(&receiver, "backing")
            }),
        );
        JsObject::set(&obj, "backing", Value::string("foo")).unwrap();
        obj.define_property("front", PropertyDescriptor::accessor(Some(getter), None));
        assert_eq!(JsObject::get(&obj, "front").unwrap(), Value::string("foo"));
    }

    #[test]
    fn test_set_without_setter_fails() {
        let obj = JsObject::new();
        obj.define_property(
            "x",
            PropertyDescriptor::accessor(Some(getter_returning(Value::Null)), None),
        );
        let err = JsObject::set(&obj, "x", Value::Number(1.0)).unwrap_err();
        assert_eq!(err, RuntimeError::NoSetter { key: "x".to_string() });
    }

    #[test]
    fn test_prototype_lookup() {
        let proto = JsObject::new();
        proto.define_property(
            "shared",
            PropertyDescriptor::data(Value::Number(7.0)).with_enumerable(true),
        );
        let obj = JsObject::with_prototype(proto);
        assert_eq!(JsObject::get(&obj, "shared").unwrap(), Value::Number(7.0));
        assert!(obj.own_keys().is_empty());
    }

    #[test]
    fn test_class_constructor_rejects_plain_call() {
        let ctor = JsFunction::class_constructor(
            "X",
            None,
            Rc::new(|_, new_target| {
                Ok(Value::Object(JsObject::with_prototype(new_target.prototype())))
            }),
        );
        let err = ctor.call(Value::Undefined, &[]).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ClassConstructorWithoutNew { name: "X".to_string() }
        );
    }

    #[test]
    fn test_instance_of_walks_chain() {
        let base = JsFunction::class_constructor(
            "Base",
            None,
            Rc::new(|_, new_target| {
                Ok(Value::Object(JsObject::with_prototype(new_target.prototype())))
            }),
        );
        let base_for_derived = base.clone();
        let derived = JsFunction::class_constructor(
            "Derived",
            Some(base.clone()),
            Rc::new(move |args, new_target| {
                JsFunction::construct_with_target(&base_for_derived, args, new_target)
            }),
        );
        let instance = JsFunction::construct(&derived, &[]).unwrap();
        assert!(instance_of(&instance, &derived));
        assert!(instance_of(&instance, &base));
        assert!(!instance_of(&Value::Number(1.0), &base));
    }

    #[test]
    fn test_static_inheritance() {
        let base = JsFunction::class_constructor(
            "Base",
            None,
            Rc::new(|_, new_target| {
                Ok(Value::Object(JsObject::with_prototype(new_target.prototype())))
            }),
        );
        base.define_static("tag", PropertyDescriptor::data(Value::string("base")));
        let base_for_derived = base.clone();
        let derived = JsFunction::class_constructor(
            "Derived",
            Some(base.clone()),
            Rc::new(move |args, new_target| {
                JsFunction::construct_with_target(&base_for_derived, args, new_target)
            }),
        );
        assert_eq!(
            JsFunction::get_static(&derived, "tag").unwrap(),
            Value::string("base")
        );
    }

    #[test]
    fn test_behavior_swap_preserves_identity() {
        let ctor = JsFunction::class_constructor(
            "X",
            None,
            Rc::new(|_, new_target| {
                Ok(Value::Object(JsObject::with_prototype(new_target.prototype())))
            }),
        );
        let before = ctor.prototype();
        let prev = ctor.construct_fn();
        ctor.set_construct(Rc::new(move |args, new_target| prev(args, new_target)));
        assert_eq!(ctor.name(), "X");
        assert!(Rc::ptr_eq(&before, &ctor.prototype()));
        let instance = JsFunction::construct(&ctor, &[]).unwrap();
        assert!(instance_of(&instance, &ctor));
    }
}
