use crate::value::ObjectRef;
use compact_str::{CompactString, ToCompactString};
use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

/// A chain of lexical scopes. Cloning yields another handle to the same scope.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    inner: Rc<RefCell<Scope>>,
}

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<CompactString, ObjectRef>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh child scope whose lookups fall back to `self`.
    pub fn new_scope(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Scope {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn is_root(&self) -> bool {
        self.inner.borrow().parent.is_none()
    }

    /// Looks `name` up from this scope outwards.
    pub fn get(&self, name: &str) -> Option<ObjectRef> {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            let scope = environment.inner.borrow();
            if let Some(value) = scope.values.get(name) {
                return Some(Arc::clone(value));
            }
            current = scope.parent.clone();
        }
        None
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn declare(&self, name: &str, value: ObjectRef) {
        self.inner
            .borrow_mut()
            .values
            .insert(name.to_compact_string(), value);
    }

    /// Rebinds `name` in the innermost scope that already holds it. When no scope does, the
    /// name is declared here instead.
    pub fn assign(&self, name: &str, value: ObjectRef) {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            if let Some(slot) = environment.inner.borrow_mut().values.get_mut(name) {
                *slot = value;
                return;
            }
            current = environment.inner.borrow().parent.clone();
        }
        self.declare(name, value);
    }

    /// The bindings held directly by this scope, sorted by name.
    pub fn bindings(&self) -> Vec<(CompactString, ObjectRef)> {
        let mut bindings: Vec<_> = self
            .inner
            .borrow()
            .values
            .iter()
            .map(|(name, value)| (name.clone(), Arc::clone(value)))
            .collect();
        bindings.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn child_scope_reads_parent() {
        let root = Environment::new();
        root.declare("x", Object::integer(1));
        let child = root.new_scope();
        assert_eq!(child.get("x"), Some(Object::integer(1)));
        assert!(child.get("y").is_none());
        assert!(root.is_root());
        assert!(!child.is_root());
    }

    #[test]
    fn declare_shadows_without_touching_parent() {
        let root = Environment::new();
        root.declare("x", Object::integer(1));
        let child = root.new_scope();
        child.declare("x", Object::integer(2));
        assert_eq!(child.get("x"), Some(Object::integer(2)));
        assert_eq!(root.get("x"), Some(Object::integer(1)));
    }

    #[test]
    fn assign_updates_owning_scope() {
        let root = Environment::new();
        root.declare("x", Object::integer(1));
        let child = root.new_scope().new_scope();
        child.assign("x", Object::integer(5));
        assert_eq!(root.get("x"), Some(Object::integer(5)));
        assert!(child.bindings().is_empty());
    }

    #[test]
    fn assign_unknown_declares_locally() {
        let root = Environment::new();
        let child = root.new_scope();
        child.assign("y", Object::integer(3));
        assert_eq!(child.get("y"), Some(Object::integer(3)));
        assert!(root.get("y").is_none());
    }

    #[test]
    fn bindings_are_sorted() {
        let root = Environment::new();
        root.declare("b", Object::integer(2));
        root.declare("a", Object::integer(1));
        let names: Vec<_> = root.bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
