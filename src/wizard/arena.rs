//! Ordered storage for repeatable wizard sections.

use crate::domain::types::SectionId;

/// Sections kept in display order, each with an id that survives removals of
/// other sections.
#[derive(Debug, Clone)]
pub struct SectionArena<T> {
    next_id: u32,
    entries: Vec<(SectionId, T)>,
}

impl<T> Default for SectionArena<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> SectionArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section and returns its id. Ids are never reused.
    pub fn add(&mut self, value: T) -> SectionId {
        let id = SectionId::new(self.next_id);
        self.next_id += 1;
        self.entries.push((id, value));
        id
    }

    pub fn remove(&mut self, id: SectionId) -> Option<T> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, id: SectionId) -> Option<&T> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(entry, _)| *entry == id)
            .map(|(_, value)| value)
    }

    /// Current display index of a section.
    pub fn index_of(&self, id: SectionId) -> Option<usize> {
        self.entries.iter().position(|(entry, _)| *entry == id)
    }

    pub fn id_at(&self, index: usize) -> Option<SectionId> {
        self.entries.get(index).map(|(id, _)| *id)
    }

    pub fn ids(&self) -> Vec<SectionId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
