mod error;
mod file;

pub use error::StorageError;
pub use file::FileStorage;

use crate::page::{Page, PageSummary};
use crate::schema::{Schema, SchemaSummary};

/// Trait for schema and page storage backends.
///
/// Implementations persist administrator-defined schemas and the pages
/// written against them.
pub trait Storage {
    /// Saves a schema, replacing any schema with the same name.
    fn save_schema(&self, schema: &Schema) -> Result<(), StorageError>;

    /// Loads a schema by name.
    fn load_schema(&self, name: &str) -> Result<Schema, StorageError>;

    /// Lists all schemas as summaries, sorted by name.
    fn list_schemas(&self) -> Result<Vec<SchemaSummary>, StorageError>;

    /// Deletes a schema definition. Its pages are left alone.
    fn delete_schema(&self, name: &str) -> Result<(), StorageError>;

    /// Saves a page, replacing any page with the same identifier.
    fn save_page(&self, page: &Page) -> Result<(), StorageError>;

    /// Loads a page of a schema by identifier.
    fn load_page(&self, schema_name: &str, identifier: &str) -> Result<Page, StorageError>;

    /// Lists the pages of a schema, sorted by secondary identifier then identifier.
    fn list_pages(&self, schema_name: &str) -> Result<Vec<PageSummary>, StorageError>;

    /// Deletes a page.
    fn delete_page(&self, schema_name: &str, identifier: &str) -> Result<(), StorageError>;
}
