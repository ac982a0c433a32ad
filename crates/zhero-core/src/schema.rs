use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content type defined by the administrator.
///
/// A schema is named after a vocabulary class and picks a subset of that
/// class's properties for editors to fill in. Two of the selected
/// properties play special roles: `identifier` holds the generated page id,
/// `secondary_identifier` the human-readable label used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Short name of the vocabulary class (e.g. `BlogPosting`)
    pub name: String,
    /// Property holding the page identifier
    pub identifier: String,
    /// Property holding the display label of a page
    pub secondary_identifier: String,
    /// Selected properties, in form order
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
    /// When the schema was first saved
    pub created_at: DateTime<Utc>,
    /// When the schema was last saved
    pub updated_at: DateTime<Utc>,
}

impl Schema {
    /// Creates an empty schema for a vocabulary class.
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        secondary_identifier: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            identifier: identifier.into(),
            secondary_identifier: secondary_identifier.into(),
            properties: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a property at the end of the form.
    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        let order = self.properties.len();
        self.properties.push(SchemaProperty { order, ..property });
        self
    }

    /// Finds a selected property by name.
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Properties an editor must fill in.
    pub fn mandatory_properties(&self) -> impl Iterator<Item = &SchemaProperty> {
        self.properties.iter().filter(|p| p.mandatory)
    }

    /// Properties whose values page searches match against.
    pub fn searchable_properties(&self) -> impl Iterator<Item = &SchemaProperty> {
        self.properties.iter().filter(|p| p.searchable)
    }

    /// Renumbers `order` to match the position of each property.
    pub fn normalize_order(&mut self) {
        for (i, p) in self.properties.iter_mut().enumerate() {
            p.order = i;
        }
    }

    /// Converts the schema to a summary (for listings).
    pub fn to_summary(&self) -> SchemaSummary {
        SchemaSummary {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            secondary_identifier: self.secondary_identifier.clone(),
            property_count: self.properties.len(),
            updated_at: self.updated_at,
        }
    }
}

/// One property selected for a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Vocabulary property name (e.g. `headline`)
    pub name: String,
    /// Whether every page must provide a value
    #[serde(default)]
    pub mandatory: bool,
    /// Whether page searches match against this property
    #[serde(default)]
    pub searchable: bool,
    /// Expected type chosen among the property's `rangeIncludes` (e.g. `Text`)
    #[serde(rename = "type", default)]
    pub property_type: String,
    /// Editor widget used for the value
    #[serde(default)]
    pub component: String,
    /// Position in the form
    #[serde(default)]
    pub order: usize,
}

impl SchemaProperty {
    pub fn new(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            searchable: false,
            property_type: property_type.into(),
            component: String::new(),
            order: 0,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }
}

/// A lightweight summary of a schema for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub name: String,
    pub identifier: String,
    pub secondary_identifier: String,
    pub property_count: usize,
    pub updated_at: DateTime<Utc>,
}
