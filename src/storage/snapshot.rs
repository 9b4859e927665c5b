use serde::{Deserialize, Serialize};

use crate::todo::Todo;

/// Complete persisted state of a project manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub active_project_id: String,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Todo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{TodoDraft, TodoId};

    #[test]
    fn test_wire_shape() {
        let snapshot = Snapshot {
            active_project_id: "default".to_string(),
            projects: vec![ProjectRecord {
                id: "default".to_string(),
                name: "My Project".to_string(),
                items: vec![Todo::create(
                    TodoDraft::new("A").due_date("2024-01-01").priority("low"),
                    Some(TodoId::from("abc")),
                )],
            }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["activeProjectId"], "default");
        assert_eq!(value["projects"][0]["id"], "default");
        assert_eq!(value["projects"][0]["name"], "My Project");
        assert_eq!(value["projects"][0]["items"][0]["id"], "abc");
        assert_eq!(value["projects"][0]["items"][0]["dueDate"], "2024-01-01");
    }

    #[test]
    fn test_parses_browser_written_state() {
        let json = r#"{
            "activeProjectId": "work",
            "projects": [
                {"id": "default", "name": "My Project", "items": []},
                {"id": "work", "name": "Work", "items": [
                    {"id": "5f0c", "title": "Ship", "description": "", "dueDate": "2024-02-01", "priority": "high"}
                ]}
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.active_project_id, "work");
        assert_eq!(snapshot.projects.len(), 2);
        assert_eq!(snapshot.projects[1].items[0].id.as_str(), "5f0c");
    }
}
