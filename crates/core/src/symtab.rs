use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Label name to byte address, remembering first-definition order for the
/// post-assembly dump.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, u64>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn define(&mut self, name: &str, address: u64) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(Error::DuplicateLabel(name.to_string()));
        }
        self.entries.insert(name.to_string(), address);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<u64> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedLabel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Labels with their addresses, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, address)| (name.as_str(), *address))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
