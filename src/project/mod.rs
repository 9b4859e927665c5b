pub mod id;
pub mod manager;

pub use id::project_id_from_name;
pub use manager::{DEFAULT_PROJECT_ID, DEFAULT_PROJECT_NAME, ProjectManager, ProjectSummary};
