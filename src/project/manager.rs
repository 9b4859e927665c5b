use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;

use super::id::project_id_from_name;
use crate::storage::{PersistenceStore, ProjectRecord, Snapshot, Store};
use crate::todo::{ProjectList, Todo, TodoDraft, TodoId, TodoPatch};

pub const DEFAULT_PROJECT_ID: &str = "default";
pub const DEFAULT_PROJECT_NAME: &str = "My Project";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
struct ProjectEntry {
    id: String,
    list: ProjectList,
}

/// Owns every project and keeps the store in sync with them.
///
/// Every mutating call saves the full state before returning. When that save
/// fails the in-memory change is kept and the error is returned; the next
/// successful save writes it out.
#[derive(Debug)]
pub struct ProjectManager<S: Store> {
    projects: Vec<ProjectEntry>,
    active_project_id: String,
    persistence: PersistenceStore<S>,
}

impl<S: Store> ProjectManager<S> {
    /// Rehydrate from `persistence`, or seed the default project if it holds nothing.
    pub fn new(persistence: PersistenceStore<S>) -> Result<Self> {
        let mut manager = Self {
            projects: Vec::new(),
            active_project_id: DEFAULT_PROJECT_ID.to_string(),
            persistence,
        };

        match manager.persistence.load()? {
            Some(snapshot) => {
                if manager.restore(snapshot) {
                    manager.save()?;
                }
            }
            None => manager.seed()?,
        }

        Ok(manager)
    }

    /// Returns true if the snapshot needed repairs.
    fn restore(&mut self, snapshot: Snapshot) -> bool {
        let mut repaired = false;
        let mut seen: HashSet<String> = HashSet::new();

        for record in snapshot.projects {
            if !seen.insert(record.id.clone()) {
                tracing::warn!(id = %record.id, "dropping duplicate project id");
                repaired = true;
                continue;
            }
            let mut list = ProjectList::new(record.name);
            let count = record.items.len();
            list.hydrate(record.items);
            if list.len() != count {
                repaired = true;
            }
            self.projects.push(ProjectEntry {
                id: record.id,
                list,
            });
        }

        if self.index_of(DEFAULT_PROJECT_ID).is_none() {
            tracing::warn!("saved state has no default project, recreating it");
            self.projects.insert(
                0,
                ProjectEntry {
                    id: DEFAULT_PROJECT_ID.to_string(),
                    list: ProjectList::new(DEFAULT_PROJECT_NAME),
                },
            );
            repaired = true;
        }

        if self.index_of(&snapshot.active_project_id).is_some() {
            self.active_project_id = snapshot.active_project_id;
        } else {
            tracing::warn!(
                active = %snapshot.active_project_id,
                "saved active project does not exist, using default"
            );
            self.active_project_id = DEFAULT_PROJECT_ID.to_string();
            repaired = true;
        }

        tracing::debug!(projects = self.projects.len(), "state restored");
        repaired
    }

    fn seed(&mut self) -> Result<()> {
        tracing::info!("no saved state, creating default project");
        self.projects = vec![ProjectEntry {
            id: DEFAULT_PROJECT_ID.to_string(),
            list: ProjectList::new(DEFAULT_PROJECT_NAME),
        }];
        self.active_project_id = DEFAULT_PROJECT_ID.to_string();
        self.save()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    fn list_mut(&mut self, id: &str) -> Option<&mut ProjectList> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| &mut p.list)
    }

    fn save(&mut self) -> Result<()> {
        let snapshot = self.snapshot();
        self.persistence.save(&snapshot)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active_project_id: self.active_project_id.clone(),
            projects: self
                .projects
                .iter()
                .map(|p| ProjectRecord {
                    id: p.id.clone(),
                    name: p.list.name().to_string(),
                    items: p.list.get_all().to_vec(),
                })
                .collect(),
        }
    }

    /// Returns false without changing anything if `id` is taken.
    pub fn create_project(&mut self, id: &str, name: &str) -> Result<bool> {
        if self.index_of(id).is_some() {
            return Ok(false);
        }
        self.projects.push(ProjectEntry {
            id: id.to_string(),
            list: ProjectList::new(name),
        });
        tracing::debug!(id, name, "project created");
        self.save()?;
        Ok(true)
    }

    /// Create a project whose id is derived from `name`. Returns the new id.
    pub fn create_project_named(&mut self, name: &str) -> Result<Option<String>> {
        let id = project_id_from_name(name);
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self.create_project(&id, name.trim())?.then_some(id))
    }

    pub fn get_project(&self, id: &str) -> Option<&ProjectList> {
        self.projects.iter().find(|p| p.id == id).map(|p| &p.list)
    }

    pub fn get_active_project(&self) -> Option<&ProjectList> {
        self.get_project(&self.active_project_id)
    }

    pub fn active_project_id(&self) -> &str {
        &self.active_project_id
    }

    pub fn set_active_project(&mut self, id: &str) -> Result<bool> {
        if self.index_of(id).is_none() {
            return Ok(false);
        }
        self.active_project_id = id.to_string();
        tracing::debug!(id, "active project changed");
        self.save()?;
        Ok(true)
    }

    pub fn get_all_projects(&self) -> Vec<ProjectSummary> {
        self.projects
            .iter()
            .map(|p| ProjectSummary {
                id: p.id.clone(),
                name: p.list.name().to_string(),
            })
            .collect()
    }

    /// The default project is never deleted. Deleting the active project
    /// makes the default project active.
    pub fn delete_project(&mut self, id: &str) -> Result<bool> {
        if id == DEFAULT_PROJECT_ID {
            return Ok(false);
        }
        let Some(index) = self.index_of(id) else {
            return Ok(false);
        };

        self.projects.remove(index);
        if self.active_project_id == id {
            self.active_project_id = DEFAULT_PROJECT_ID.to_string();
        }
        tracing::debug!(id, active = %self.active_project_id, "project deleted");
        self.save()?;
        Ok(true)
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> Result<bool> {
        let Some(list) = self.list_mut(id) else {
            return Ok(false);
        };
        list.rename(name);
        tracing::debug!(id, name, "project renamed");
        self.save()?;
        Ok(true)
    }

    /// Returns `None` if `project_id` is unknown.
    pub fn add_todo(&mut self, project_id: &str, draft: TodoDraft) -> Result<Option<Todo>> {
        let Some(list) = self.list_mut(project_id) else {
            return Ok(None);
        };
        let todo = list.add(draft).clone();
        tracing::debug!(project = project_id, id = %todo.id, "todo added");
        self.save()?;
        Ok(Some(todo))
    }

    pub fn update_todo(
        &mut self,
        project_id: &str,
        todo_id: &TodoId,
        patch: TodoPatch,
    ) -> Result<bool> {
        let updated = self
            .list_mut(project_id)
            .is_some_and(|list| list.update(todo_id, patch));
        if updated {
            tracing::debug!(project = project_id, id = %todo_id, "todo updated");
            self.save()?;
        }
        Ok(updated)
    }

    pub fn delete_todo(&mut self, project_id: &str, todo_id: &TodoId) -> Result<bool> {
        let deleted = self
            .list_mut(project_id)
            .is_some_and(|list| list.delete(todo_id));
        if deleted {
            tracing::debug!(project = project_id, id = %todo_id, "todo deleted");
            self.save()?;
        }
        Ok(deleted)
    }

    /// Find a todo in any project. Returns the owning project's id with it.
    pub fn find_todo(&self, todo_id: &TodoId) -> Option<(&str, &Todo)> {
        self.projects.iter().find_map(|p| {
            p.list
                .find_by_id(todo_id)
                .map(|todo| (p.id.as_str(), todo))
        })
    }

    /// Erase the saved state and start over with only the default project.
    pub fn reset(&mut self) -> Result<()> {
        self.persistence.clear()?;
        self.seed()
    }
}
