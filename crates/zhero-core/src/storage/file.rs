use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{StorageConfig, DEFAULT_PAGES_DIR, DEFAULT_SCHEMAS_DIR};
use crate::page::{Page, PageSummary};
use crate::schema::{Schema, SchemaSummary};

use super::error::StorageError;
use super::Storage;

/// File-based storage implementation.
///
/// One pretty-printed JSON file per item:
/// ```text
/// .zhero/
///   schemas/
///     BlogPosting.json
///   pages/
///     BlogPosting/
///       5f0c...e2.json
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base data directory
    base_path: PathBuf,
    schemas_dir: String,
    pages_dir: String,
}

impl FileStorage {
    /// Creates a FileStorage rooted at `base_path` with the default layout.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            schemas_dir: DEFAULT_SCHEMAS_DIR.to_string(),
            pages_dir: DEFAULT_PAGES_DIR.to_string(),
        }
    }

    /// Creates a FileStorage from the `[storage]` configuration section.
    pub fn with_config(config: &StorageConfig) -> Self {
        Self {
            base_path: PathBuf::from(&config.data_dir),
            schemas_dir: config.schemas_dir.clone(),
            pages_dir: config.pages_dir.clone(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path to the schemas directory.
    fn schemas_path(&self) -> PathBuf {
        self.base_path.join(&self.schemas_dir)
    }

    /// Returns the path to a schema's definition file.
    fn schema_file(&self, name: &str) -> Result<PathBuf, StorageError> {
        check_name(name)?;
        Ok(self.schemas_path().join(format!("{}.json", name)))
    }

    /// Returns the path to the page directory of a schema.
    fn pages_path(&self, schema_name: &str) -> Result<PathBuf, StorageError> {
        check_name(schema_name)?;
        Ok(self.base_path.join(&self.pages_dir).join(schema_name))
    }

    /// Returns the path to a page file.
    fn page_file(&self, schema_name: &str, identifier: &str) -> Result<PathBuf, StorageError> {
        check_name(identifier)?;
        Ok(self.pages_path(schema_name)?.join(format!("{}.json", identifier)))
    }
}

impl Storage for FileStorage {
    fn save_schema(&self, schema: &Schema) -> Result<(), StorageError> {
        let path = self.schema_file(&schema.name)?;
        write_json(&path, schema)?;
        tracing::debug!(schema = %schema.name, "schema saved");
        Ok(())
    }

    fn load_schema(&self, name: &str) -> Result<Schema, StorageError> {
        let path = self.schema_file(name)?;
        if !path.exists() {
            return Err(StorageError::SchemaNotFound(name.to_string()));
        }
        read_json(&path)
    }

    fn list_schemas(&self) -> Result<Vec<SchemaSummary>, StorageError> {
        let mut summaries: Vec<SchemaSummary> = json_files(&self.schemas_path())?
            .iter()
            .filter_map(|path| match read_json::<Schema>(path) {
                Ok(schema) => Some(schema.to_summary()),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping unreadable schema");
                    None
                }
            })
            .collect();

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn delete_schema(&self, name: &str) -> Result<(), StorageError> {
        let path = self.schema_file(name)?;
        if !path.exists() {
            return Err(StorageError::SchemaNotFound(name.to_string()));
        }

        fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!(schema = name, "schema deleted");
        Ok(())
    }

    fn save_page(&self, page: &Page) -> Result<(), StorageError> {
        let path = self.page_file(&page.schema_name, &page.identifier)?;
        write_json(&path, page)?;
        tracing::debug!(schema = %page.schema_name, page = %page.identifier, "page saved");
        Ok(())
    }

    fn load_page(&self, schema_name: &str, identifier: &str) -> Result<Page, StorageError> {
        let path = self.page_file(schema_name, identifier)?;
        if !path.exists() {
            return Err(StorageError::PageNotFound {
                schema: schema_name.to_string(),
                identifier: identifier.to_string(),
            });
        }
        read_json(&path)
    }

    fn list_pages(&self, schema_name: &str) -> Result<Vec<PageSummary>, StorageError> {
        let mut summaries: Vec<PageSummary> = json_files(&self.pages_path(schema_name)?)?
            .iter()
            .filter_map(|path| match read_json::<Page>(path) {
                Ok(page) => Some(page.to_summary()),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping unreadable page");
                    None
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            a.secondary_identifier
                .cmp(&b.secondary_identifier)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        Ok(summaries)
    }

    fn delete_page(&self, schema_name: &str, identifier: &str) -> Result<(), StorageError> {
        let path = self.page_file(schema_name, identifier)?;
        if !path.exists() {
            return Err(StorageError::PageNotFound {
                schema: schema_name.to_string(),
                identifier: identifier.to_string(),
            });
        }

        fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!(schema = schema_name, page = identifier, "page deleted");
        Ok(())
    }
}

/// Names become file names; anything that could leave the directory is refused.
fn check_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| StorageError::io(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let json = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

/// `*.json` files directly inside `dir`; empty if the directory is missing.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(files)
}
