//! In-memory repositories
//!
//! Plain concurrent CRUD stores keyed by entity id. Persistence formats are
//! out of scope; these exist so services have somewhere to put state.

use dashmap::DashMap;

use crate::entities::{Project, WorkspaceSnapshot};

/// Concurrent in-memory store keyed by id
#[derive(Debug, Default)]
pub struct InMemoryRepository<T> {
    items: DashMap<String, T>,
}

impl<T: Clone + Send + Sync + 'static> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    pub fn save(&self, id: &str, item: T) {
        self.items.insert(id.to_string(), item);
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.items.get(id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<T> {
        self.items
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.items.remove(id).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&self) {
        self.items.clear();
    }
}

pub type ProjectRepository = InMemoryRepository<Project>;
pub type SnapshotRepository = InMemoryRepository<WorkspaceSnapshot>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_find_remove_round_trip() {
        let repository: InMemoryRepository<String> = InMemoryRepository::new();
        assert!(repository.is_empty());

        repository.save("a", "alpha".to_string());
        repository.save("b", "beta".to_string());
        assert_eq!(repository.len(), 2);
        assert_eq!(repository.find("a").as_deref(), Some("alpha"));

        assert_eq!(repository.remove("a").as_deref(), Some("alpha"));
        assert!(repository.find("a").is_none());
    }

    #[test]
    fn save_overwrites_existing_entries() {
        let repository: InMemoryRepository<i32> = InMemoryRepository::new();
        repository.save("x", 1);
        repository.save("x", 2);
        assert_eq!(repository.len(), 1);
        assert_eq!(repository.find("x"), Some(2));
    }
}
