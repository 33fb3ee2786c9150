pub mod persistence;
pub mod progress_store;

pub use persistence::{FilePersistence, MemoryPersistence, Persistence};
pub use progress_store::ProgressStore;
