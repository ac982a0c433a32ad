use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::page::{field_text, Page, PageData, PageSummary};
use crate::schema::{Schema, SchemaSummary};
use crate::storage::{Storage, StorageError};
use crate::vocab::{Resolver, VocabError};

/// Manages schemas and their pages.
///
/// Schemas are checked against the vocabulary before they are stored, and
/// pages against their schema.
pub struct ContentManager<S: Storage> {
    storage: S,
    resolver: Arc<Resolver>,
}

impl<S: Storage> ContentManager<S> {
    /// Creates a new ContentManager with the given storage backend.
    pub fn new(storage: S, resolver: Arc<Resolver>) -> Self {
        Self { storage, resolver }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    // -------------------------------------------------------------------------
    // Schemas
    // -------------------------------------------------------------------------

    /// Validates and persists a schema definition.
    ///
    /// Keeps the creation time of a schema already stored under the same name.
    pub fn save_schema(&mut self, mut schema: Schema) -> Result<Schema, ManagerError> {
        self.validate_schema(&schema)?;

        schema.normalize_order();
        let now = Utc::now();
        schema.created_at = match self.storage.load_schema(&schema.name) {
            Ok(existing) => existing.created_at,
            Err(StorageError::SchemaNotFound(_)) => now,
            Err(e) => return Err(e.into()),
        };
        schema.updated_at = now;

        self.storage.save_schema(&schema)?;
        tracing::info!(schema = %schema.name, properties = schema.properties.len(), "schema saved");
        Ok(schema)
    }

    /// Gets a schema by name.
    pub fn get_schema(&self, name: &str) -> Result<Schema, ManagerError> {
        Ok(self.storage.load_schema(name)?)
    }

    /// Lists all schemas.
    pub fn list_schemas(&self) -> Result<Vec<SchemaSummary>, ManagerError> {
        Ok(self.storage.list_schemas()?)
    }

    /// Deletes a schema that has no pages left.
    pub fn delete_schema(&mut self, name: &str) -> Result<(), ManagerError> {
        let pages = self.storage.list_pages(name)?.len();
        if pages > 0 {
            return Err(ManagerError::SchemaInUse {
                schema: name.to_string(),
                pages,
            });
        }

        self.storage.delete_schema(name)?;
        tracing::info!(schema = name, "schema deleted");
        Ok(())
    }

    fn validate_schema(&self, schema: &Schema) -> Result<(), ManagerError> {
        if !self.resolver.all_classes().contains(&schema.name) {
            return Err(ManagerError::UnknownClass(schema.name.clone()));
        }

        if schema.properties.is_empty() {
            return Err(ManagerError::InvalidSchema(format!(
                "schema {} selects no properties",
                schema.name
            )));
        }

        let class = self.resolver.schema_class_by_name(&schema.name)?;
        let mut seen = HashSet::new();
        for property in &schema.properties {
            if !class.has_property(&property.name) {
                return Err(ManagerError::UnknownProperty {
                    class: schema.name.clone(),
                    property: property.name.clone(),
                });
            }
            if !seen.insert(property.name.as_str()) {
                return Err(ManagerError::InvalidSchema(format!(
                    "property {} selected twice",
                    property.name
                )));
            }
        }

        for (role, field) in [
            ("identifier", &schema.identifier),
            ("secondary identifier", &schema.secondary_identifier),
        ] {
            if field.trim().is_empty() {
                return Err(ManagerError::InvalidSchema(format!("{} is not set", role)));
            }
            if !schema.has_property(field) {
                return Err(ManagerError::InvalidSchema(format!(
                    "{} {} is not a selected property",
                    role, field
                )));
            }
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pages
    // -------------------------------------------------------------------------

    /// Creates a page with a fresh identifier and persists it.
    pub fn create_page(
        &mut self,
        schema_name: &str,
        data: PageData,
        enabled: bool,
    ) -> Result<Page, ManagerError> {
        let schema = self.storage.load_schema(schema_name)?;
        validate_page_data(&schema, &data)?;

        let page = Page::new(&schema, data, enabled);
        self.storage.save_page(&page)?;
        tracing::info!(schema = schema_name, page = %page.identifier, "page created");
        Ok(page)
    }

    /// Replaces the data of an existing page.
    pub fn update_page(
        &mut self,
        schema_name: &str,
        identifier: &str,
        data: PageData,
        enabled: bool,
    ) -> Result<Page, ManagerError> {
        let schema = self.storage.load_schema(schema_name)?;
        let mut page = self.storage.load_page(schema_name, identifier)?;
        validate_page_data(&schema, &data)?;

        page.set_data(&schema, data);
        page.set_enabled(enabled);
        self.storage.save_page(&page)?;
        Ok(page)
    }

    /// Gets a page by schema and identifier.
    pub fn get_page(&self, schema_name: &str, identifier: &str) -> Result<Page, ManagerError> {
        Ok(self.storage.load_page(schema_name, identifier)?)
    }

    /// Lists the pages of an existing schema.
    pub fn list_pages(&self, schema_name: &str) -> Result<Vec<PageSummary>, ManagerError> {
        self.storage.load_schema(schema_name)?;
        Ok(self.storage.list_pages(schema_name)?)
    }

    /// Pages of a schema whose searchable fields contain `query`
    /// (case-insensitive). A blank query lists every page.
    pub fn search_pages(&self, schema_name: &str, query: &str) -> Result<Vec<PageSummary>, ManagerError> {
        let schema = self.storage.load_schema(schema_name)?;
        let summaries = self.storage.list_pages(schema_name)?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(summaries);
        }

        let mut found = Vec::new();
        for summary in summaries {
            let page = self.storage.load_page(schema_name, &summary.identifier)?;
            let hit = schema
                .searchable_properties()
                .any(|p| field_text(page.data.get(&p.name)).to_lowercase().contains(&needle));
            if hit {
                found.push(summary);
            }
        }
        Ok(found)
    }

    /// Turns public visibility of a page on or off.
    pub fn enable_page(
        &mut self,
        schema_name: &str,
        identifier: &str,
        enabled: bool,
    ) -> Result<Page, ManagerError> {
        let mut page = self.storage.load_page(schema_name, identifier)?;
        page.set_enabled(enabled);
        self.storage.save_page(&page)?;
        tracing::info!(schema = schema_name, page = identifier, enabled, "page visibility changed");
        Ok(page)
    }

    /// Deletes a page by schema and identifier.
    pub fn delete_page(&mut self, schema_name: &str, identifier: &str) -> Result<(), ManagerError> {
        self.storage.delete_page(schema_name, identifier)?;
        Ok(())
    }

    /// JSON-LD of an enabled page. Disabled pages are reported as missing.
    pub fn published_page(&self, schema_name: &str, identifier: &str) -> Result<Value, ManagerError> {
        let schema = self.storage.load_schema(schema_name)?;
        let page = self.storage.load_page(schema_name, identifier)?;
        if !page.enabled {
            return Err(StorageError::PageNotFound {
                schema: schema_name.to_string(),
                identifier: identifier.to_string(),
            }
            .into());
        }
        Ok(page.to_jsonld(&schema.identifier))
    }
}

/// Every field must be a schema property and every mandatory property
/// except the generated identifier must have a value.
fn validate_page_data(schema: &Schema, data: &PageData) -> Result<(), ManagerError> {
    if let Some(field) = data.keys().find(|k| !schema.has_property(k)) {
        return Err(ManagerError::UnknownField {
            schema: schema.name.clone(),
            field: field.clone(),
        });
    }

    let missing = schema
        .mandatory_properties()
        .filter(|p| p.name != schema.identifier)
        .find(|p| data.get(&p.name).map_or(true, is_blank));
    if let Some(property) = missing {
        return Err(ManagerError::MissingField {
            schema: schema.name.clone(),
            field: property.name.clone(),
        });
    }

    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Errors that can occur in ContentManager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unknown vocabulary class: {0}")]
    UnknownClass(String),

    #[error("Class {class} has no property {property}")]
    UnknownProperty { class: String, property: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Missing value for mandatory field {field} of {schema}")]
    MissingField { schema: String, field: String },

    #[error("Field {field} is not part of schema {schema}")]
    UnknownField { schema: String, field: String },

    #[error("Schema {schema} still has {pages} page(s)")]
    SchemaInUse { schema: String, pages: usize },

    #[error("Vocabulary error: {0}")]
    Vocab(#[from] VocabError),
}

impl ManagerError {
    /// Whether the error means the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ManagerError::Storage(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaProperty;
    use crate::storage::FileStorage;
    use crate::vocab::{GraphStore, Literal, Namespace, Term, Triple};
    use serde_json::json;
    use tempfile::TempDir;

    fn vocab_graph() -> GraphStore {
        let rdf_type = Namespace::rdf().term("type");
        let class = Namespace::rdfs().term("Class");
        let schema = Namespace::schema();
        let domain = schema.term("domainIncludes");
        let range = schema.term("rangeIncludes");
        let comment = Namespace::rdfs().term("comment");

        let mut triples = vec![
            Triple::new(schema.term("Thing"), rdf_type.clone(), class.clone()),
            Triple::new(schema.term("Event"), rdf_type.clone(), class.clone()),
            Triple::new(
                schema.term("Event"),
                Namespace::rdfs().term("subClassOf"),
                schema.term("Thing"),
            ),
            Triple::new(
                schema.term("Event"),
                comment,
                Term::Literal(Literal::new("An event happening at a certain time.")),
            ),
        ];
        for (prop, domain_class) in [("identifier", "Thing"), ("name", "Thing"), ("startDate", "Event")] {
            triples.push(Triple::new(schema.term(prop), domain.clone(), schema.term(domain_class)));
            triples.push(Triple::new(schema.term(prop), range.clone(), schema.term("Text")));
        }
        GraphStore::from_triples(triples)
    }

    fn create_test_manager() -> (ContentManager<FileStorage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let resolver = Arc::new(Resolver::new(Arc::new(vocab_graph())));
        (ContentManager::new(storage, resolver), temp_dir)
    }

    fn event_schema() -> Schema {
        Schema::new("Event", "identifier", "name")
            .with_property(SchemaProperty::new("identifier", "Text"))
            .with_property(SchemaProperty::new("name", "Text").mandatory())
            .with_property(SchemaProperty::new("startDate", "Text"))
    }

    #[test]
    fn test_save_schema() {
        let (mut manager, _temp) = create_test_manager();

        let saved = manager.save_schema(event_schema()).unwrap();
        assert_eq!(saved.properties.len(), 3);
        assert_eq!(manager.get_schema("Event").unwrap().identifier, "identifier");
    }

    #[test]
    fn test_save_schema_unknown_class() {
        let (mut manager, _temp) = create_test_manager();

        let schema = Schema::new("Nonsense", "identifier", "name")
            .with_property(SchemaProperty::new("identifier", "Text"));
        assert!(matches!(
            manager.save_schema(schema),
            Err(ManagerError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_save_schema_unknown_property() {
        let (mut manager, _temp) = create_test_manager();

        let schema = event_schema().with_property(SchemaProperty::new("colour", "Text"));
        assert!(matches!(
            manager.save_schema(schema),
            Err(ManagerError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_save_schema_identifier_must_be_selected() {
        let (mut manager, _temp) = create_test_manager();

        let schema = Schema::new("Event", "identifier", "name")
            .with_property(SchemaProperty::new("name", "Text"));
        assert!(matches!(
            manager.save_schema(schema),
            Err(ManagerError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_create_page() {
        let (mut manager, _temp) = create_test_manager();
        manager.save_schema(event_schema()).unwrap();

        let data = PageData::from([("name".to_string(), json!("Launch party"))]);
        let page = manager.create_page("Event", data, true).unwrap();

        assert_eq!(page.secondary_identifier, "Launch party");
        assert_eq!(page.data["identifier"], json!(page.identifier));
        assert_eq!(manager.list_pages("Event").unwrap().len(), 1);
    }

    #[test]
    fn test_create_page_missing_mandatory() {
        let (mut manager, _temp) = create_test_manager();
        manager.save_schema(event_schema()).unwrap();

        let data = PageData::from([("name".to_string(), json!("  "))]);
        assert!(matches!(
            manager.create_page("Event", data, true),
            Err(ManagerError::MissingField { .. })
        ));
    }

    #[test]
    fn test_create_page_unknown_field() {
        let (mut manager, _temp) = create_test_manager();
        manager.save_schema(event_schema()).unwrap();

        let data = PageData::from([
            ("name".to_string(), json!("Launch party")),
            ("colour".to_string(), json!("red")),
        ]);
        assert!(matches!(
            manager.create_page("Event", data, true),
            Err(ManagerError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_delete_schema_in_use() {
        let (mut manager, _temp) = create_test_manager();
        manager.save_schema(event_schema()).unwrap();
        let data = PageData::from([("name".to_string(), json!("Launch party"))]);
        let page = manager.create_page("Event", data, true).unwrap();

        assert!(matches!(
            manager.delete_schema("Event"),
            Err(ManagerError::SchemaInUse { pages: 1, .. })
        ));

        manager.delete_page("Event", &page.identifier).unwrap();
        manager.delete_schema("Event").unwrap();
        assert!(manager.get_schema("Event").unwrap_err().is_not_found());
    }

    #[test]
    fn test_published_page_requires_enabled() {
        let (mut manager, _temp) = create_test_manager();
        manager.save_schema(event_schema()).unwrap();
        let data = PageData::from([("name".to_string(), json!("Launch party"))]);
        let page = manager.create_page("Event", data, false).unwrap();

        let err = manager.published_page("Event", &page.identifier).unwrap_err();
        assert!(err.is_not_found());

        manager.enable_page("Event", &page.identifier, true).unwrap();
        let doc = manager.published_page("Event", &page.identifier).unwrap();
        assert_eq!(doc["@type"], "Event");
        assert_eq!(doc["@id"], json!(page.identifier));
    }
}
