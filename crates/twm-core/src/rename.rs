//! Original identifier to normalized identifier, built during the tree pass.

use std::collections::HashMap;

/// Rename table consumed by [`crate::propagate_references`].
///
/// Keys are unique; re-inserting a key replaces its value but keeps the
/// position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RenameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rename, returning the previous replacement for `original`.
    pub fn insert(
        &mut self,
        original: impl Into<String>,
        normalized: impl Into<String>,
    ) -> Option<String> {
        let original = original.into();
        let normalized = normalized.into();
        if let Some(&position) = self.index.get(&original) {
            return Some(std::mem::replace(&mut self.entries[position].1, normalized));
        }
        self.index.insert(original.clone(), self.entries.len());
        self.entries.push((original, normalized));
        None
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(original, normalized)| (original.as_str(), normalized.as_str()))
    }

    /// Entries in the order substitutions are applied: longest original
    /// first, ties in insertion order.
    pub fn application_order(&self) -> Vec<(&str, &str)> {
        let mut ordered: Vec<(&str, &str)> = self.iter().collect();
        ordered.sort_by(|left, right| right.0.len().cmp(&left.0.len()));
        ordered
    }
}
