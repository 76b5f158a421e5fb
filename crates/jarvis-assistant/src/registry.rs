//! Alias registries mapping caller-chosen names to remote ids.

use std::collections::HashMap;

use crate::error::AssistantError;

/// Unique alias to remote id mapping for one resource kind.
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    /// Resource kind used in error messages, e.g. `"thread"`.
    kind: &'static str,
    entries: HashMap<String, String>,
}

impl AliasRegistry {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Fail with `Duplicate` if `alias` is taken.
    pub fn ensure_free(&self, alias: &str) -> Result<(), AssistantError> {
        if self.entries.contains_key(alias) {
            return Err(AssistantError::Duplicate {
                resource: self.kind,
                alias: alias.to_string(),
            });
        }
        Ok(())
    }

    /// Remote id registered under `alias`, or `NotFound`.
    pub fn resolve(&self, alias: &str) -> Result<&str, AssistantError> {
        self.entries
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| AssistantError::NotFound {
                resource: self.kind,
                alias: alias.to_string(),
            })
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Register a new alias. Fails with `Duplicate` without modifying the map.
    pub fn insert(&mut self, alias: &str, id: impl Into<String>) -> Result<(), AssistantError> {
        self.ensure_free(alias)?;
        self.entries.insert(alias.to_string(), id.into());
        Ok(())
    }

    /// Move the id under `old` to `new` in one step.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), AssistantError> {
        self.resolve(old)?;
        self.ensure_free(new)?;
        if let Some(id) = self.entries.remove(old) {
            self.entries.insert(new.to_string(), id);
        }
        Ok(())
    }

    pub fn remove(&mut self, alias: &str) -> Option<String> {
        self.entries.remove(alias)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.entries.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    /// Registered remote ids, sorted by alias.
    pub fn ids(&self) -> Vec<String> {
        let mut pairs: Vec<(&String, &String)> = self.entries.iter().collect();
        pairs.sort();
        pairs.into_iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
