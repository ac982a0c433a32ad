use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::Schema;

/// JSON-LD context every exported page refers to.
pub const JSONLD_CONTEXT: &str = "https://schema.org/";

/// Field values of a page, keyed by property name.
pub type PageData = BTreeMap<String, Value>;

/// A piece of content conforming to a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Name of the schema the page belongs to
    pub schema_name: String,
    /// Generated page id, also stored under the schema's identifier property
    pub identifier: String,
    /// Display label, copied from the schema's secondary identifier property
    pub secondary_identifier: String,
    /// Field values
    #[serde(default)]
    pub data: PageData,
    /// Whether the page is served publicly
    pub enabled: bool,
    /// When the page was created
    pub created_at: DateTime<Utc>,
    /// When the page was last updated
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Creates a page with a fresh identifier.
    ///
    /// The identifier is written into `data` under the schema's identifier
    /// property, replacing anything the caller put there.
    pub fn new(schema: &Schema, mut data: PageData, enabled: bool) -> Self {
        let identifier = Uuid::new_v4().to_string();
        data.insert(schema.identifier.clone(), Value::String(identifier.clone()));
        let secondary_identifier = field_text(data.get(&schema.secondary_identifier));
        let now = Utc::now();

        Self {
            schema_name: schema.name.clone(),
            identifier,
            secondary_identifier,
            data,
            enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the field values, keeping the identifier.
    pub fn set_data(&mut self, schema: &Schema, mut data: PageData) {
        data.insert(schema.identifier.clone(), Value::String(self.identifier.clone()));
        self.secondary_identifier = field_text(data.get(&schema.secondary_identifier));
        self.data = data;
        self.updated_at = Utc::now();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.updated_at = Utc::now();
    }

    /// Renders the page as a Schema.org JSON-LD node.
    ///
    /// The value of `identifier_field` becomes `@id`; every other field is
    /// copied as is.
    pub fn to_jsonld(&self, identifier_field: &str) -> Value {
        let mut node = Map::new();
        node.insert("@context".to_string(), Value::String(JSONLD_CONTEXT.to_string()));
        node.insert("@type".to_string(), Value::String(self.schema_name.clone()));

        for (key, value) in &self.data {
            if key == identifier_field {
                node.insert("@id".to_string(), value.clone());
            } else {
                node.insert(key.clone(), value.clone());
            }
        }

        Value::Object(node)
    }

    /// Converts the page to a summary (for listings).
    pub fn to_summary(&self) -> PageSummary {
        PageSummary {
            schema_name: self.schema_name.clone(),
            identifier: self.identifier.clone(),
            secondary_identifier: self.secondary_identifier.clone(),
            enabled: self.enabled,
            updated_at: self.updated_at,
        }
    }
}

/// A lightweight summary of a page for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub schema_name: String,
    pub identifier: String,
    pub secondary_identifier: String,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// Text of a field value: strings unquoted, null or missing as empty.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
