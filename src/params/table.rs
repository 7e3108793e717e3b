use parking_lot::RwLock;

use crate::storage::ParamView;

/// An insertion ordered association of parameter names and views.
///
/// Insertions may come from several threads, each one only holds the lock while
/// pushing its entry. Once populated the table is only read.
#[derive(Debug, Default)]
pub struct ParamTable {
    entries: RwLock<Vec<(String, ParamView)>>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new view under `name`.
    ///
    /// If `name` is already present its view gets replaced and keeps its position.
    ///
    /// # Arguments
    /// * `name` - The name of the parameter.
    /// * `view` - The view of the parameter.
    pub fn insert(&self, name: impl Into<String>, view: ParamView) {
        upsert(&mut self.entries.write(), name.into(), view);
    }

    /// Moves every entry of `other` into this table, prefixing their names with
    /// `{prefix}_`.
    ///
    /// # Arguments
    /// * `prefix` - The prefix of the new names, usually the layer index.
    /// * `other` - The table to take the entries from.
    pub fn merge(&self, prefix: &str, other: ParamTable) {
        let incoming = other.into_entries();
        let mut entries = self.entries.write();

        for (name, view) in incoming {
            upsert(&mut entries, format!("{prefix}_{name}"), view);
        }
    }

    pub fn get(&self, name: &str) -> Option<ParamView> {
        self.entries
            .read()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, view)| view.clone())
    }

    /// Returns the names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, ParamView)> {
        self.entries.read().clone()
    }

    pub fn into_entries(self) -> Vec<(String, ParamView)> {
        self.entries.into_inner()
    }
}

fn upsert(entries: &mut Vec<(String, ParamView)>, name: String, view: ParamView) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some((_, old)) => *old = view,
        None => entries.push((name, view)),
    }
}
