//! The decoration algorithm.
//!
//! `apply` is what the rewritten program calls once per decorated
//! declaration. It runs five ordered steps: coalesce accessor halves,
//! fold every element through its decorators (splicing extras in as they
//! appear), fold the class decorators, define the resolved properties, then
//! run the collected finishers.

use std::collections::HashMap;
use std::rc::Rc;

use crate::descriptor::{
    ClassDecorator, ClassDescriptor, DescriptorKind, ElementDescriptor, Finisher,
};
use crate::error::RuntimeError;
use crate::value::{FunctionRef, ObjectRef, Value};

/// Identity of an element slot: staticness plus key.
type ElementKey = (bool, String);

fn element_key(element: &ElementDescriptor) -> ElementKey {
    (element.is_static, element.key.clone())
}

/// Working state for one declaration: the ordered element list, a key index
/// remembering each slot's position, which accessor halves have carried
/// decorators per slot, and the finishers collected so far.
struct Decoration {
    work: Vec<ElementDescriptor>,
    index: HashMap<ElementKey, usize>,
    decorated_accessors: HashMap<ElementKey, (bool, bool)>,
    finishers: Vec<Finisher>,
}

impl Decoration {
    fn new() -> Self {
        Self {
            work: Vec::new(),
            index: HashMap::new(),
            decorated_accessors: HashMap::new(),
            finishers: Vec::new(),
        }
    }

    /// Track which halves of an accessor slot have carried decorators.
    /// Redefining a decorated half is last-write-wins; decorating the
    /// opposite half of an already-decorated slot is the runtime edition of
    /// the both-halves error.
    fn note_decorated_accessor(&mut self, element: &ElementDescriptor) -> Result<(), RuntimeError> {
        if !element.descriptor.is_accessor() || element.decorators.is_empty() {
            return Ok(());
        }
        let key = element_key(element);
        let halves = (
            element.descriptor.get.is_some(),
            element.descriptor.set.is_some(),
        );
        if let Some(&(had_get, had_set)) = self.decorated_accessors.get(&key) {
            let same_half = (halves.0 && had_get) || (halves.1 && had_set);
            if !same_half {
                return Err(RuntimeError::BothAccessorsDecorated {
                    key: element.key.clone(),
                });
            }
        }
        self.decorated_accessors.insert(key, halves);
        Ok(())
    }

    /// Step 1, one element at a time: accessor halves sharing a slot merge
    /// last-write-wins; any other collision replaces the earlier element in
    /// place (later definition wins, original position kept); fresh keys
    /// append.
    fn admit(&mut self, element: ElementDescriptor) -> Result<(), RuntimeError> {
        if element.kind != DescriptorKind::Property {
            return Err(RuntimeError::UnsupportedElementKind {
                found: element.kind.as_str().to_string(),
            });
        }
        self.note_decorated_accessor(&element)?;

        let key = element_key(&element);
        match self.index.get(&key).copied() {
            Some(pos)
                if self.work[pos].descriptor.is_accessor()
                    && element.descriptor.is_accessor() =>
            {
                let existing = &mut self.work[pos];
                if element.descriptor.get.is_some() {
                    existing.descriptor.get = element.descriptor.get;
                }
                if element.descriptor.set.is_some() {
                    existing.descriptor.set = element.descriptor.set;
                }
                existing.descriptor.enumerable = element.descriptor.enumerable;
                existing.descriptor.configurable = element.descriptor.configurable;
                if !element.decorators.is_empty() {
                    existing.decorators = element.decorators;
                }
            }
            Some(pos) => {
                self.work[pos] = element;
            }
            None => {
                self.index.insert(key, self.work.len());
                self.work.push(element);
            }
        }
        Ok(())
    }

    /// Step 2: fold each element through its decorator list in stored order
    /// (deepest-declared first). Extras splice in right after their producer
    /// and are picked up by the same loop, decorators and all.
    fn decorate_all(&mut self) -> Result<(), RuntimeError> {
        let mut i = 0;
        while i < self.work.len() {
            let decorators = std::mem::take(&mut self.work[i].decorators);
            let before = element_key(&self.work[i]);
            let mut current = self.work[i].clean()?;
            let mut extras = Vec::new();

            for decorator in &decorators {
                let outcome = decorator(current)?;
                if let Some(finisher) = outcome.finisher {
                    self.finishers.push(finisher);
                }
                extras.extend(outcome.extras);
                current = outcome.element.clean()?;
            }

            let after = element_key(&current);
            if after != before {
                if self.index.get(&before) == Some(&i) {
                    self.index.remove(&before);
                }
                self.index.entry(after).or_insert(i);
            }
            self.work[i] = current;

            self.splice(i + 1, extras)?;
            i += 1;
        }
        Ok(())
    }

    /// Splice extras in as standalone elements, keeping the key index and the
    /// decorated-accessor tracking coherent so a both-halves conflict arising
    /// dynamically is still rejected.
    fn splice(
        &mut self,
        position: usize,
        extras: Vec<ElementDescriptor>,
    ) -> Result<(), RuntimeError> {
        let mut at = position;
        for extra in extras {
            if extra.kind != DescriptorKind::Property {
                return Err(RuntimeError::UnsupportedElementKind {
                    found: extra.kind.as_str().to_string(),
                });
            }
            self.note_decorated_accessor(&extra)?;

            let key = element_key(&extra);
            for pos in self.index.values_mut() {
                if *pos >= at {
                    *pos += 1;
                }
            }
            self.index.entry(key).or_insert(at);
            self.work.insert(at, extra);
            at += 1;
        }
        Ok(())
    }
}

/// Decorate one declaration.
///
/// For a class, pass the constructor and leave `target` as `None` (the
/// constructor's prototype is the instance-side target); for an object
/// literal, pass the target and no constructor. Returns the final constructor
/// or the mutated target.
pub fn apply(
    ctor: Option<FunctionRef>,
    target: Option<ObjectRef>,
    elements: Vec<ElementDescriptor>,
    class_decorators: Vec<ClassDecorator>,
) -> Result<Value, RuntimeError> {
    let (instance_target, result) = match (&ctor, &target) {
        (Some(c), None) => (c.prototype(), Value::Function(c.clone())),
        (Some(c), Some(t)) => (t.clone(), Value::Function(c.clone())),
        (None, Some(t)) => (t.clone(), Value::Object(t.clone())),
        (None, None) => return Err(RuntimeError::MissingSubject),
    };
    if ctor.is_none() && !class_decorators.is_empty() {
        return Err(RuntimeError::ClassDecoratorsWithoutConstructor);
    }

    let mut decoration = Decoration::new();
    for element in elements {
        decoration.admit(element)?;
    }
    decoration.decorate_all()?;
    let Decoration {
        work, mut finishers, ..
    } = decoration;

    let mut resolved = work;
    if let Some(ctor) = &ctor {
        if !class_decorators.is_empty() {
            let mut descriptor = ClassDescriptor {
                kind: DescriptorKind::Class,
                constructor: ctor.clone(),
                parent: None,
                members: resolved,
            };
            for decorator in &class_decorators {
                let outcome = decorator(descriptor)?;
                if let Some(finisher) = outcome.finisher {
                    finishers.push(finisher);
                }
                descriptor = outcome.descriptor;
                if descriptor.kind != DescriptorKind::Class {
                    return Err(RuntimeError::ClassKindChanged {
                        found: descriptor.kind.as_str().to_string(),
                    });
                }
                if !Rc::ptr_eq(&descriptor.constructor, ctor) {
                    return Err(RuntimeError::ConstructorReplaced {
                        name: ctor.name().to_string(),
                    });
                }
            }
            resolved = descriptor.members;
        }
    }

    for element in &resolved {
        // Class decorators may have edited `members`; cleaning is idempotent
        // for everything that already went through decoration.
        let cleaned = element.clean()?;
        if cleaned.is_static {
            match &ctor {
                Some(c) => c.define_static(cleaned.key.as_str(), cleaned.descriptor),
                None => {
                    return Err(RuntimeError::StaticElementOnObject { key: cleaned.key });
                }
            }
        } else {
            instance_target.define_property(cleaned.key.as_str(), cleaned.descriptor);
        }
    }

    for finisher in finishers {
        finisher(result.clone())?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ElementOutcome;
    use crate::value::{JsFunction, JsObject};

    fn noop_fn(name: &str) -> FunctionRef {
        JsFunction::native(name, Rc::new(|_, _| Ok(Value::Undefined)))
    }

    fn identity() -> crate::descriptor::ElementDecorator {
        Rc::new(|element| Ok(ElementOutcome::of(element)))
    }

    #[test]
    fn test_split_accessor_elements_remerge() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::getter("a", noop_fn("get a")))
            .unwrap();
        decoration
            .admit(ElementDescriptor::method("m", noop_fn("m")))
            .unwrap();
        decoration
            .admit(ElementDescriptor::setter("a", noop_fn("set a")))
            .unwrap();
        assert_eq!(decoration.work.len(), 2);
        let merged = &decoration.work[0];
        assert!(merged.descriptor.get.is_some());
        assert!(merged.descriptor.set.is_some());
    }

    #[test]
    fn test_both_halves_decorated_rejected_at_merge() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::getter("a", noop_fn("get a")).decorated(identity()))
            .unwrap();
        let err = decoration
            .admit(ElementDescriptor::setter("a", noop_fn("set a")).decorated(identity()))
            .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::BothAccessorsDecorated { key: "a".to_string() }
        );
    }

    #[test]
    fn test_redecorating_the_same_half_wins_last() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::getter("a", noop_fn("get v1")).decorated(identity()))
            .unwrap();
        decoration
            .admit(ElementDescriptor::getter("a", noop_fn("get v2")).decorated(identity()))
            .unwrap();
        assert_eq!(decoration.work.len(), 1);
        assert_eq!(decoration.work[0].decorators.len(), 1);
    }

    #[test]
    fn test_decorating_one_half_is_fine() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::getter("a", noop_fn("get a")))
            .unwrap();
        decoration
            .admit(ElementDescriptor::setter("a", noop_fn("set a")).decorated(identity()))
            .unwrap();
        assert_eq!(decoration.work.len(), 1);
        assert_eq!(decoration.work[0].decorators.len(), 1);
    }

    #[test]
    fn test_data_collision_replaces_in_place() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::value("a", Value::Number(1.0)))
            .unwrap();
        decoration
            .admit(ElementDescriptor::value("b", Value::Number(2.0)))
            .unwrap();
        decoration
            .admit(ElementDescriptor::value("a", Value::Number(3.0)))
            .unwrap();
        assert_eq!(decoration.work.len(), 2);
        assert_eq!(decoration.work[0].key, "a");
        assert_eq!(decoration.work[0].descriptor.value, Some(Value::Number(3.0)));
    }

    #[test]
    fn test_static_and_instance_slots_are_distinct() {
        let mut decoration = Decoration::new();
        decoration
            .admit(ElementDescriptor::method("run", noop_fn("run")))
            .unwrap();
        decoration
            .admit(ElementDescriptor::method("run", noop_fn("run")).static_member())
            .unwrap();
        assert_eq!(decoration.work.len(), 2);
    }

    #[test]
    fn test_missing_subject() {
        let err = apply(None, None, vec![], vec![]).unwrap_err();
        assert_eq!(err, RuntimeError::MissingSubject);
    }

    #[test]
    fn test_class_decorators_need_a_constructor() {
        let target = JsObject::new();
        let decorator: ClassDecorator =
            Rc::new(|descriptor| Ok(crate::descriptor::ClassOutcome::of(descriptor)));
        let err = apply(None, Some(target), vec![], vec![decorator]).unwrap_err();
        assert_eq!(err, RuntimeError::ClassDecoratorsWithoutConstructor);
    }
}
