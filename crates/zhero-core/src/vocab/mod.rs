//! Vocabulary graph engine.
//!
//! Loads a Schema.org-style RDF vocabulary once, then answers class and
//! property questions over it:
//!
//! - [`GraphLoader`] downloads (if needed) and parses the JSON-LD document;
//! - [`GraphStore`] holds the triples and runs pattern queries;
//! - [`Resolver`] lists classes, subclasses and inherited properties;
//! - [`HierarchyBuilder`] derives breadcrumb paths for every class.

mod error;
mod graph;
pub mod hierarchy;
mod jsonld;
mod loader;
mod model;
mod resolver;
mod term;

pub use error::VocabError;
pub use graph::GraphStore;
pub use hierarchy::{build_breadcrumbs, build_breadcrumbs_from_depths, Breadcrumb, HierarchyBuilder};
pub use jsonld::JsonLdError;
pub use loader::{download_to_path, GraphLoader};
pub use model::{ClassProperty, SchemaClass};
pub use resolver::Resolver;
pub use term::{Literal, Namespace, Term, Triple, ATTIC, PENDING, RDFS_NS, RDF_NS, SCHEMA_NS, XSD_NS};
