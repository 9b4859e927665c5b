use anyhow::{Context, Result};

use super::snapshot::Snapshot;
use super::store::Store;

/// Key of the slot holding the manager state
pub const STATE_KEY: &str = "todo-app-state";

/// Saves and loads a [`Snapshot`] in a single slot of a [`Store`].
#[derive(Debug)]
pub struct PersistenceStore<S: Store> {
    store: S,
}

impl<S: Store> PersistenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let content = serde_json::to_vec_pretty(snapshot).context("Failed to serialize state")?;
        self.store
            .set(STATE_KEY, &content)
            .context("Failed to save state")?;
        tracing::debug!(projects = snapshot.projects.len(), "state saved");
        Ok(())
    }

    /// Returns `None` when nothing was saved yet or the slot cannot be decoded,
    /// including content that is not UTF-8.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let Some(content) = self.store.get(STATE_KEY).context("Failed to read state")? else {
            return Ok(None);
        };

        match serde_json::from_slice::<Snapshot>(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable saved state");
                Ok(None)
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(STATE_KEY).context("Failed to clear state")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use crate::storage::snapshot::ProjectRecord;
    use crate::todo::{Todo, TodoDraft};
    use pretty_assertions::assert_eq;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            active_project_id: "work".to_string(),
            projects: vec![
                ProjectRecord {
                    id: "default".to_string(),
                    name: "My Project".to_string(),
                    items: vec![],
                },
                ProjectRecord {
                    id: "work".to_string(),
                    name: "Work".to_string(),
                    items: vec![
                        Todo::create(TodoDraft::new("A").priority("low"), None),
                        Todo::create(TodoDraft::new("B").due_date("2024-05-01"), None),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_load_empty_returns_none() {
        let persistence = PersistenceStore::new(MemoryStore::new());
        assert_eq!(persistence.load().unwrap(), None);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut persistence = PersistenceStore::new(MemoryStore::new());
        let snapshot = sample_snapshot();

        persistence.save(&snapshot).unwrap();

        assert_eq!(persistence.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_save_uses_fixed_key() {
        let store = MemoryStore::new();
        let mut persistence = PersistenceStore::new(store.clone());
        persistence.save(&sample_snapshot()).unwrap();

        assert!(store.get(STATE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_malformed_state_is_absent() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, b"{not json").unwrap();

        let persistence = PersistenceStore::new(store);
        assert_eq!(persistence.load().unwrap(), None);
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, br#"{"projects": 3}"#).unwrap();

        let persistence = PersistenceStore::new(store);
        assert_eq!(persistence.load().unwrap(), None);
    }

    #[test]
    fn test_non_utf8_state_is_absent() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, &[0xff, 0xfe, b'{']).unwrap();

        let persistence = PersistenceStore::new(store);
        assert_eq!(persistence.load().unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let mut persistence = PersistenceStore::new(MemoryStore::new());
        persistence.save(&sample_snapshot()).unwrap();

        persistence.clear().unwrap();

        assert_eq!(persistence.load().unwrap(), None);
    }
}
