pub mod file;
pub mod memory;
pub mod persistence;
pub mod snapshot;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{PersistenceStore, STATE_KEY};
pub use snapshot::{ProjectRecord, Snapshot};
pub use store::Store;
