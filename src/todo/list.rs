use std::collections::HashSet;

use super::item::{Todo, TodoDraft, TodoId, TodoPatch};

/// The todos of one project, in insertion (display) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectList {
    name: String,
    items: Vec<Todo>,
}

impl ProjectList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn get_all(&self) -> &[Todo] {
        &self.items
    }

    pub fn add(&mut self, draft: TodoDraft) -> &Todo {
        self.items.push(Todo::create(draft, None));
        &self.items[self.items.len() - 1]
    }

    /// Returns false if no item has `id`.
    pub fn update(&mut self, id: &TodoId, patch: TodoPatch) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &TodoId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    pub fn find_by_id(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Replace all items with `records`, keeping their ids.
    /// A record repeating an earlier id is dropped.
    pub fn hydrate(&mut self, records: impl IntoIterator<Item = Todo>) {
        let mut seen: HashSet<TodoId> = HashSet::new();
        self.items = records
            .into_iter()
            .filter_map(|record| {
                if !seen.insert(record.id.clone()) {
                    tracing::warn!(
                        id = %record.id,
                        project = %self.name,
                        "dropping duplicate todo id"
                    );
                    return None;
                }
                let draft = TodoDraft {
                    title: record.title,
                    description: record.description,
                    due_date: record.due_date,
                    priority: record.priority,
                };
                Some(Todo::create(draft, Some(record.id)))
            })
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
