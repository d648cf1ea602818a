use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::builtins::map_builtins;
use crate::object::Object;

#[derive(Debug, Default)]
pub struct EnvironmentCore {
    store: HashMap<Rc<str>, Rc<Object>>,
    outer: Option<Environment>,
}

/// Shared handle to a scope. Cloning the handle does not copy the scope, so a
/// closure sees bindings added to its defining scope after it was created.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    core: Rc<RefCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: &Environment) -> Environment {
        Environment {
            core: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Looks the name up in this scope, then in the enclosing ones, and
    /// finally among the builtins.
    pub fn get(&self, key: &str) -> Option<Rc<Object>> {
        self.lookup(key)
            .or_else(|| map_builtins(key).map(Object::builtin_function))
    }

    fn lookup(&self, key: &str) -> Option<Rc<Object>> {
        let env = self.core.borrow();
        match env.store.get(key) {
            Some(value) => Some(value.clone()),
            None => env.outer.as_ref().and_then(|outer| outer.lookup(key)),
        }
    }

    /// Binds in this scope only, shadowing any outer binding of the same name.
    pub fn set(&self, key: Rc<str>, value: Rc<Object>) {
        self.core.borrow_mut().store.insert(key, value);
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosed_lookup_and_shadowing() {
        let outer = Environment::new();
        outer.set("a".into(), Object::integer(1));
        outer.set("b".into(), Object::integer(2));

        let inner = Environment::new_enclosed(&outer);
        inner.set("a".into(), Object::integer(10));

        assert_eq!(inner.get("a"), Some(Object::integer(10)));
        assert_eq!(inner.get("b"), Some(Object::integer(2)));
        assert_eq!(outer.get("a"), Some(Object::integer(1)));
        assert_eq!(inner.get("c"), None);
    }

    #[test]
    fn test_later_bindings_are_visible_through_clones() {
        let env = Environment::new();
        let handle = env.clone();
        let inner = Environment::new_enclosed(&env);

        env.set("late".into(), Object::boolean(true));

        assert!(handle.ptr_eq(&env));
        assert_eq!(inner.get("late"), Some(Object::boolean(true)));
    }

    #[test]
    fn test_builtins_are_resolved_last() {
        let env = Environment::new();
        assert!(matches!(env.get("len").as_deref(), Some(Object::Builtin(_))));
        assert!(matches!(env.get("uzunluk").as_deref(), Some(Object::Builtin(_))));

        env.set("len".into(), Object::integer(3));
        assert_eq!(env.get("len"), Some(Object::integer(3)));
    }
}
