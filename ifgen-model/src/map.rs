//! Insertion-ordered name mapping.
//!
//! Every named collection in the model (enums, structs, enum elements,
//! struct members, function params) keeps declaration order and answers
//! lookups by name. Entries live in a vector; a side table maps names to
//! vector indices, so an index stays a stable handle for the lifetime of
//! the map.

use std::collections::HashMap;

/// An entity that is addressed by name inside its enclosing mapping.
pub trait Named {
    /// Returns the entity name.
    fn name(&self) -> &str;
}

/// Ordered mapping from name to entity.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> NamedMap<T> {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity.
    ///
    /// # Errors
    /// Returns the entity back if its name is already present.
    pub fn insert(&mut self, item: T) -> Result<usize, T> {
        if self.index.contains_key(item.name()) {
            return Err(item);
        }
        let position = self.items.len();
        self.index.insert(item.name().to_string(), position);
        self.items.push(item);
        Ok(position)
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&idx| &self.items[idx])
    }

    /// Returns the declaration index of a name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if a name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the entity names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::name)
    }
}

impl<T> NamedMap<T> {
    /// Returns the entity at a declaration index.
    #[must_use]
    pub fn get_index(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub(crate) fn get_index_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    /// Iterates over entities in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the last inserted entity.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> std::ops::Index<usize> for NamedMap<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.items[idx]
    }
}

impl<'a, T> IntoIterator for &'a NamedMap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str, u32);

    impl Named for Item {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut map = NamedMap::new();
        assert_eq!(map.insert(Item("b", 1)), Ok(0));
        assert_eq!(map.insert(Item("a", 2)), Ok(1));
        assert_eq!(map.insert(Item("c", 3)), Ok(2));

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(map.position("a"), Some(1));
        assert_eq!(map.get("c"), Some(&Item("c", 3)));
        assert_eq!(map.last(), Some(&Item("c", 3)));
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut map = NamedMap::new();
        map.insert(Item("x", 1)).unwrap();
        let rejected = map.insert(Item("x", 2)).unwrap_err();

        assert_eq!(rejected, Item("x", 2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x").unwrap().1, 1);
    }

    #[test]
    fn test_empty_map() {
        let map: NamedMap<Item> = NamedMap::new();
        assert!(map.is_empty());
        assert!(!map.contains("x"));
        assert!(map.get_index(0).is_none());
        assert_eq!(map.iter().count(), 0);
    }
}
