use crate::{BooleanFunction, LogicError};
use delegate::delegate;
use itertools::Itertools;
use std::collections::HashMap;

/// Named Boolean functions defined during an interpreter session
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    workspace: HashMap<String, BooleanFunction>,
}

impl Runtime {
    delegate! {
        to self.workspace {
            /// Number of stored functions
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workspace.contains_key(name)
    }

    /// Store a function, replacing any previous function with the same name
    pub fn save(&mut self, name: impl Into<String>, function: BooleanFunction) {
        self.workspace.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Result<&BooleanFunction, LogicError> {
        self.workspace
            .get(name)
            .ok_or_else(|| LogicError::BooleanFunctionNotFound(name.to_string()))
    }

    /// Owned copy of a stored function, used to resolve references in expressions
    pub fn lookup(&self, name: &str) -> Result<BooleanFunction, LogicError> {
        self.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Result<BooleanFunction, LogicError> {
        self.workspace
            .remove(name)
            .ok_or_else(|| LogicError::BooleanFunctionNotFound(name.to_string()))
    }

    /// Sorted names of the stored functions
    pub fn names(&self) -> Vec<&str> {
        self.workspace.keys().map(String::as_str).sorted().collect()
    }
}
