//! # Deco Protocol
//!
//! The data contract shared between the compile-time rewrite (`deco-transform`)
//! and the load-time applier (`deco-runtime`).
//!
//! The transform bakes element descriptors into the rewritten program as plain
//! object literals; the applier consumes descriptors of the same shape when the
//! program runs. Both sides read the field names, kind tags, and descriptor
//! defaults from this crate, so the two phases cannot drift apart.

/// Name of the runtime helper the rewrite emits calls to.
///
/// A decorated class `X` compiles to the original (stripped) declaration
/// followed by `X = __applyDecorators(X, null, [elements], [classDecorators]);`
/// a decorated object literal compiles to
/// `__applyDecorators(null, {}, [elements], []);` in place.
pub const APPLY_HELPER: &str = "__applyDecorators";

/// Field names of the emitted descriptor records.
pub mod fields {
    // Element descriptor fields.
    pub const KIND: &str = "kind";
    pub const IS_STATIC: &str = "isStatic";
    pub const KEY: &str = "key";
    pub const DECORATORS: &str = "decorators";
    pub const DESCRIPTOR: &str = "descriptor";

    // Property descriptor fields.
    pub const VALUE: &str = "value";
    pub const GET: &str = "get";
    pub const SET: &str = "set";
    pub const WRITABLE: &str = "writable";
    pub const ENUMERABLE: &str = "enumerable";
    pub const CONFIGURABLE: &str = "configurable";

    // Fields a decorator may attach to its result. Never emitted by the
    // transform; recognized (and stripped) by the applier.
    pub const FINISHER: &str = "finisher";
    pub const EXTRAS: &str = "extras";

    // Class descriptor fields.
    pub const CONSTRUCTOR: &str = "constructor";
    pub const PARENT: &str = "parent";
    pub const MEMBERS: &str = "members";
}

/// Kind tags carried by descriptors.
pub mod kinds {
    /// The only element kind currently supported.
    pub const PROPERTY: &str = "property";

    /// The kind of the descriptor threaded through class-level decorators.
    pub const CLASS: &str = "class";
}

/// Property descriptor defaults used at first synthesis.
pub mod defaults {
    pub const WRITABLE: bool = true;
    pub const CONFIGURABLE: bool = true;

    /// Class members are non-enumerable, matching class semantics.
    pub const CLASS_MEMBER_ENUMERABLE: bool = false;

    /// Object-literal properties are enumerable, matching literal semantics.
    pub const OBJECT_PROPERTY_ENUMERABLE: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_distinct() {
        assert_ne!(kinds::PROPERTY, kinds::CLASS);
    }

    #[test]
    fn element_fields_are_unique() {
        let names = [
            fields::KIND,
            fields::IS_STATIC,
            fields::KEY,
            fields::DECORATORS,
            fields::DESCRIPTOR,
            fields::FINISHER,
            fields::EXTRAS,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn enumerable_defaults_differ_by_target() {
        assert!(!defaults::CLASS_MEMBER_ENUMERABLE);
        assert!(defaults::OBJECT_PROPERTY_ENUMERABLE);
    }

    // The emitted field names are the wire format; renaming a constant must
    // not silently change what rewritten programs carry.
    #[test]
    fn wire_names_are_frozen() {
        assert_eq!(fields::KIND, "kind");
        assert_eq!(fields::IS_STATIC, "isStatic");
        assert_eq!(fields::KEY, "key");
        assert_eq!(fields::DECORATORS, "decorators");
        assert_eq!(fields::DESCRIPTOR, "descriptor");
        assert_eq!(fields::FINISHER, "finisher");
        assert_eq!(fields::EXTRAS, "extras");
        assert_eq!(kinds::PROPERTY, "property");
        assert_eq!(kinds::CLASS, "class");
        assert_eq!(APPLY_HELPER, "__applyDecorators");
    }
}
