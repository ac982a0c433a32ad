pub mod config;
pub mod manager;
pub mod page;
pub mod schema;
pub mod storage;
pub mod vocab;

pub use config::Config;
pub use manager::{ContentManager, ManagerError};
pub use page::{Page, PageData, PageSummary};
pub use schema::{Schema, SchemaProperty, SchemaSummary};
pub use storage::{FileStorage, Storage, StorageError};
pub use vocab::{GraphLoader, HierarchyBuilder, Resolver, SchemaClass, VocabError};
