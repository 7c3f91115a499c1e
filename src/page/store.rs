//! Relation store: a page's insertion-ordered neighbour map.
//!
//! Entries are kept in discovery order. Removing an entry and adding it
//! again moves it to the end, with a fresh record.

use hashbrown::HashMap;

use crate::model::{Axis, Relation, RelationType};
use super::PageRef;

#[derive(Debug, Default)]
pub struct NeighbourMap {
    entries: Vec<(String, Relation)>,
    /// path → position in `entries`
    slots: HashMap<String, usize>,
}

impl NeighbourMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Relation> {
        self.slots.get(path).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.entries.iter().map(|(path, r)| (path.as_str(), r))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    /// Create or merge the record for `target` on one axis.
    ///
    /// Returns `true` when a new record was created.
    pub fn upsert(
        &mut self,
        target: &PageRef,
        axis: Axis,
        relation_type: RelationType,
        definition: Option<&str>,
    ) -> bool {
        if let Some(&i) = self.slots.get(target.path()) {
            self.entries[i].1.upsert(axis, relation_type, definition);
            return false;
        }
        let relation = Relation::to(target).with(axis, relation_type, definition);
        self.slots.insert(target.path().to_string(), self.entries.len());
        self.entries.push((target.path().to_string(), relation));
        true
    }

    /// Unconditional removal. Returns the removed record, if any.
    pub fn remove(&mut self, path: &str) -> Option<Relation> {
        let i = self.slots.remove(path)?;
        let (_, relation) = self.entries.remove(i);
        for (p, _) in &self.entries[i..] {
            if let Some(slot) = self.slots.get_mut(p.as_str()) {
                *slot -= 1;
            }
        }
        Some(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::settings::{shared_settings, GraphSettings};

    fn page(path: &str) -> PageRef {
        Page::shared(path, None, shared_settings(GraphSettings::default()))
    }

    #[test]
    fn test_upsert_creates_then_merges() {
        let b = page("B.md");
        let mut map = NeighbourMap::new();
        assert!(map.upsert(&b, Axis::Child, RelationType::Inferred, Some("down")));
        assert!(!map.upsert(&b, Axis::Child, RelationType::Defined, Some("children")));

        let r = map.get("B.md").unwrap();
        assert_eq!(r.child.relation_type, Some(RelationType::Defined));
        assert_eq!(r.child.definition.joined().as_deref(), Some("down, children"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let (a, b, c) = (page("A.md"), page("B.md"), page("C.md"));
        let mut map = NeighbourMap::new();
        for p in [&a, &b, &c] {
            map.upsert(p, Axis::Friend, RelationType::Defined, None);
        }
        assert!(map.remove("B.md").is_some());
        assert!(map.remove("B.md").is_none());
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["A.md", "C.md"]);
        assert!(map.get("C.md").is_some());

        map.upsert(&b, Axis::Parent, RelationType::Inferred, None);
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["A.md", "C.md", "B.md"]);
        let r = map.get("B.md").unwrap();
        assert!(!r.friend.present);
        assert!(r.parent.is(RelationType::Inferred));
    }
}
