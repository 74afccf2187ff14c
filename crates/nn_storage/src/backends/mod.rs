pub mod fs;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use fs::FsImageStore;
pub use memory::{InMemoryImageStore, InMemoryRepository};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
