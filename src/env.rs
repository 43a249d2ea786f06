use std::collections::HashMap;

/// Shell variables set by assignment statements (`name=value`).
///
/// The store lives for the whole session. Values are only ever overwritten,
/// never removed. Nothing here is exported to child processes.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: HashMap<String, String>,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a variable, `None` if it was never assigned.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}
