//! Chained symbol tables
//!
//! One `Scope` type serves both stages: the analyzer stores `Variable` and
//! `FunctionSignature` records, the interpreter stores live bindings and
//! callables. Lookup walks the parent chain; definitions only ever touch the
//! innermost scope.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle to a scope shared between a child and the code that created it
pub type SharedScope<V, F> = Rc<RefCell<Scope<V, F>>>;

#[derive(Debug)]
pub struct Scope<V, F> {
    parent: Option<SharedScope<V, F>>,
    variables: HashMap<String, V>,
    /// Keyed by name and arity
    functions: HashMap<(String, usize), F>,
}

impl<V: Clone, F: Clone> Scope<V, F> {
    /// A scope with no parent
    pub fn root() -> SharedScope<V, F> {
        Rc::new(RefCell::new(Self {
            parent: None,
            variables: HashMap::new(),
            functions: HashMap::new(),
        }))
    }

    /// A fresh scope whose lookups fall back to `parent`
    pub fn child(parent: &SharedScope<V, F>) -> SharedScope<V, F> {
        Rc::new(RefCell::new(Self {
            parent: Some(Rc::clone(parent)),
            variables: HashMap::new(),
            functions: HashMap::new(),
        }))
    }

    pub fn parent(&self) -> Option<SharedScope<V, F>> {
        self.parent.clone()
    }

    /// Bind `name` in this scope; fails if this scope already binds it
    pub fn define_variable(&mut self, name: &str, value: V) -> Result<(), String> {
        if self.variables.contains_key(name) {
            return Err(format!("Variable '{}' is already defined in this scope", name));
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    pub fn lookup_variable(&self, name: &str) -> Option<V> {
        match self.variables.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().lookup_variable(name)),
        }
    }

    /// Bind `(name, arity)` in this scope; fails if this scope already binds it
    pub fn define_function(&mut self, name: &str, arity: usize, function: F) -> Result<(), String> {
        let key = (name.to_string(), arity);
        if self.functions.contains_key(&key) {
            return Err(format!(
                "Function '{}/{}' is already defined in this scope",
                name, arity
            ));
        }
        self.functions.insert(key, function);
        Ok(())
    }

    /// Bind `(name, arity)` in this scope, replacing any existing binding
    pub fn bind_function(&mut self, name: &str, arity: usize, function: F) {
        self.functions.insert((name.to_string(), arity), function);
    }

    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<F> {
        match self.functions.get(&(name.to_string(), arity)) {
            Some(function) => Some(function.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().lookup_function(name, arity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestScope = Scope<i32, &'static str>;

    #[test]
    fn test_lookup_walks_parents() {
        let root = TestScope::root();
        root.borrow_mut().define_variable("x", 1).unwrap();

        let child = TestScope::child(&root);
        let grandchild = TestScope::child(&child);

        assert_eq!(grandchild.borrow().lookup_variable("x"), Some(1));
        assert_eq!(grandchild.borrow().lookup_variable("y"), None);
    }

    #[test]
    fn test_shadowing_in_child() {
        let root = TestScope::root();
        root.borrow_mut().define_variable("x", 1).unwrap();

        let child = TestScope::child(&root);
        child.borrow_mut().define_variable("x", 2).unwrap();

        assert_eq!(child.borrow().lookup_variable("x"), Some(2));
        assert_eq!(root.borrow().lookup_variable("x"), Some(1));
    }

    #[test]
    fn test_redefinition_in_same_scope() {
        let root = TestScope::root();
        root.borrow_mut().define_variable("x", 1).unwrap();

        let err = root.borrow_mut().define_variable("x", 2).unwrap_err();
        assert!(err.contains("already defined"));
    }

    #[test]
    fn test_functions_keyed_by_arity() {
        let root = TestScope::root();
        root.borrow_mut().define_function("f", 0, "f0").unwrap();
        root.borrow_mut().define_function("f", 2, "f2").unwrap();
        assert!(root.borrow_mut().define_function("f", 2, "again").is_err());

        let child = TestScope::child(&root);
        assert_eq!(child.borrow().lookup_function("f", 0), Some("f0"));
        assert_eq!(child.borrow().lookup_function("f", 2), Some("f2"));
        assert_eq!(child.borrow().lookup_function("f", 1), None);
    }

    #[test]
    fn test_bind_function_replaces() {
        let root = TestScope::root();
        root.borrow_mut().bind_function("print", 1, "builtin");
        assert!(root.borrow_mut().define_function("print", 1, "user").is_err());

        root.borrow_mut().bind_function("print", 1, "other");
        assert_eq!(root.borrow().lookup_function("print", 1), Some("other"));
    }

    #[test]
    fn test_variables_and_functions_are_separate() {
        let root = TestScope::root();
        root.borrow_mut().define_variable("f", 1).unwrap();
        root.borrow_mut().define_function("f", 1, "f1").unwrap();

        assert_eq!(root.borrow().lookup_variable("f"), Some(1));
        assert_eq!(root.borrow().lookup_function("f", 1), Some("f1"));
    }

    #[test]
    fn test_parent_handle() {
        let root = TestScope::root();
        let child = TestScope::child(&root);

        assert!(root.borrow().parent().is_none());
        let parent = child.borrow().parent().unwrap();
        assert!(Rc::ptr_eq(&parent, &root));
    }
}
