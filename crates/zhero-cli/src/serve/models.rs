//! Request and response types (DTOs) for the admin and public servers.

use serde::{Deserialize, Serialize};

use zhero_core::{PageData, Schema, SchemaClass, SchemaProperty};

// =============================================================================
// Vocabulary
// =============================================================================

/// Query parameters for `/api/classes`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassQuery {
    /// Case-insensitive substring filter.
    pub q: Option<String>,
}

/// Query string of `/api/pages/{schema}`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Matched against the schema's searchable fields.
    pub q: Option<String>,
}

/// Response for `/api/classes/{name}`.
#[derive(Debug, Serialize)]
pub struct ClassDetails {
    #[serde(flatten)]
    pub class: SchemaClass,
    /// Path from `Thing` down to the class.
    pub breadcrumbs: Vec<String>,
}

// =============================================================================
// Content
// =============================================================================

/// Body of `POST /api/schemas`.
#[derive(Debug, Deserialize)]
pub struct SchemaRequest {
    pub name: String,
    pub identifier: String,
    pub secondary_identifier: String,
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
}

impl SchemaRequest {
    pub fn into_schema(self) -> Schema {
        let mut schema = Schema::new(self.name, self.identifier, self.secondary_identifier);
        schema.properties = self.properties;
        schema
    }
}

/// Body of `POST /api/pages/{schema}` and `PUT /api/pages/{schema}/{id}`.
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub data: PageData,
    #[serde(default)]
    pub enabled: bool,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
