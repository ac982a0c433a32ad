use serde::{Deserialize, Serialize};

/// A vocabulary class with its inherited properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaClass {
    /// Short class name (namespace stripped).
    pub name: String,
    /// First `rdfs:comment` of the class, or empty.
    pub description: String,
    /// Full IRI of the class.
    pub canonical_url: String,
    /// Properties of the class and all its ancestors, root-most ancestor first.
    pub properties: Vec<ClassProperty>,
}

impl SchemaClass {
    /// Finds a property by short name.
    pub fn property(&self, name: &str) -> Option<&ClassProperty> {
        self.properties.iter().find(|p| p.property == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

/// A property usable on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassProperty {
    /// Short property name.
    pub property: String,
    /// Full IRI of the property.
    pub canonical_url: String,
    /// First `rdfs:comment` of the property, or empty.
    pub description: String,
    /// Short names of the classes a value may have (`rangeIncludes`).
    pub expected_types: Vec<String>,
}
