//! Class-name to class-id mapping shared across a conversion run.

use std::collections::{BTreeSet, HashMap};

use super::ClassId;

/// Bijective mapping from class name to a dense [`ClassId`].
///
/// Built once per run and never mutated afterwards. Lookups are exact and
/// case-sensitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassTable {
    names: Vec<String>,
    ids: HashMap<String, ClassId>,
}

impl ClassTable {
    /// Builds a table from an unordered set of names.
    ///
    /// Names are deduplicated and sorted lexically (byte order) so the same
    /// name set always yields the same ids.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self::from_ordered(sorted)
    }

    /// Builds a table that keeps the given order, e.g. a `classes.txt` list.
    ///
    /// A repeated name keeps its first id.
    pub fn from_ordered<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            if table.ids.contains_key(&name) {
                continue;
            }
            table
                .ids
                .insert(name.clone(), ClassId::new(table.names.len()));
            table.names.push(name);
        }
        table
    }

    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.ids.get(name).copied()
    }

    /// Class names in ascending id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (ClassId::new(idx), name.as_str()))
    }
}
