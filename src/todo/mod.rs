pub mod item;
pub mod list;
pub mod priority;

pub use item::{Todo, TodoDraft, TodoId, TodoPatch};
pub use list::ProjectList;
pub use priority::Priority;
