//! Class and property answers over the vocabulary graph.
//!
//! Every listing leaves out unstable terms: anything the graph marks as
//! `isPartOf` the attic (retired) or pending (unreleased) vocabulary.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::VocabError;
use super::graph::GraphStore;
use super::loader::GraphLoader;
use super::model::{ClassProperty, SchemaClass};
use super::term::{Namespace, Term, Triple, ATTIC, PENDING};

/// Terms the resolver queries with, built once per namespace.
#[derive(Debug, Clone)]
struct VocabTerms {
    rdf_type: Term,
    rdfs_class: Term,
    comment: Term,
    sub_class_of: Term,
    is_part_of: Term,
    domain_includes: Term,
    range_includes: Term,
    attic: Term,
    pending: Term,
}

impl VocabTerms {
    fn new(vocab: &Namespace) -> Self {
        let rdf = Namespace::rdf();
        let rdfs = Namespace::rdfs();
        Self {
            rdf_type: rdf.term("type"),
            rdfs_class: rdfs.term("Class"),
            comment: rdfs.term("comment"),
            sub_class_of: rdfs.term("subClassOf"),
            is_part_of: vocab.term("isPartOf"),
            domain_includes: vocab.term("domainIncludes"),
            range_includes: vocab.term("rangeIncludes"),
            attic: Term::iri(ATTIC),
            pending: Term::iri(PENDING),
        }
    }
}

/// Answers vocabulary questions: classes, subclasses, inherited properties.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct Resolver {
    graph: Arc<GraphStore>,
    namespace: Namespace,
    terms: VocabTerms,
    unstable: HashSet<String>,
}

impl Resolver {
    /// Creates a resolver for the Schema.org namespace.
    pub fn new(graph: Arc<GraphStore>) -> Self {
        Self::with_namespace(graph, Namespace::schema())
    }

    /// Creates a resolver for a custom vocabulary namespace.
    pub fn with_namespace(graph: Arc<GraphStore>, namespace: Namespace) -> Self {
        let terms = VocabTerms::new(&namespace);
        let mut resolver = Self {
            graph,
            namespace,
            terms,
            unstable: HashSet::new(),
        };
        resolver.unstable = resolver.unstable_nodes();

        tracing::debug!(
            unstable = resolver.unstable.len(),
            namespace = resolver.namespace.as_str(),
            "vocabulary resolver ready"
        );
        resolver
    }

    /// Loads the graph through `loader` and builds a resolver on it.
    pub async fn load(loader: &GraphLoader, namespace: Namespace) -> Result<Self, VocabError> {
        let graph = loader.load().await?;
        Ok(Self::with_namespace(graph, namespace))
    }

    /// The underlying graph.
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// The active vocabulary namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Short name of a term in the active namespace.
    pub fn short_name(&self, term: &Term) -> String {
        self.namespace.short_name(term)
    }

    /// Term for a short name; full IRIs are taken as is.
    pub fn class_term(&self, name: &str) -> Term {
        if name.contains("://") {
            Term::iri(name)
        } else {
            self.namespace.term(name)
        }
    }

    /// Whether a short name belongs to the attic or pending vocabulary.
    pub fn is_unstable(&self, name: &str) -> bool {
        self.unstable.contains(name)
    }

    /// Number of unstable terms found at construction.
    pub fn unstable_count(&self) -> usize {
        self.unstable.len()
    }

    /// Whether `name` is a stable class of the vocabulary.
    pub fn is_class(&self, name: &str) -> bool {
        let term = self.class_term(name);
        !self.is_unstable(&self.short_name(&term))
            && self
                .graph
                .query_one(Some(&term), Some(&self.terms.rdf_type), Some(&self.terms.rdfs_class))
                .is_some()
    }

    /// All stable classes, sorted.
    pub fn all_classes(&self) -> Vec<String> {
        let triples = self
            .graph
            .query_all(None, Some(&self.terms.rdf_type), Some(&self.terms.rdfs_class));
        self.prepare_values(&triples, |t| &t.subject)
    }

    /// Stable classes whose name contains `query` (case-insensitive), sorted.
    pub fn search_classes(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        let mut classes = self.all_classes();
        if !needle.is_empty() {
            classes.retain(|c| c.to_lowercase().contains(&needle));
        }
        classes
    }

    /// Direct stable subclasses of `class`, sorted.
    pub fn sub_classes_of(&self, class: &Term) -> Vec<String> {
        let triples = self
            .graph
            .query_all(None, Some(&self.terms.sub_class_of), Some(class));
        self.prepare_values(&triples, |t| &t.subject)
    }

    /// Resolves a class with the properties of its whole ancestor chain.
    ///
    /// Properties are grouped by the ancestor declaring them, root-most
    /// ancestor first. A property declared on two ancestors shows up twice.
    pub fn schema_class(&self, class: &Term) -> Result<SchemaClass, VocabError> {
        let chain = self.ancestor_chain(class)?;

        let properties = chain
            .iter()
            .filter(|ancestor| !self.is_unstable(&self.short_name(ancestor)))
            .flat_map(|ancestor| self.properties_of(ancestor))
            .collect();

        Ok(SchemaClass {
            name: self.short_name(class),
            description: self.description(class),
            canonical_url: class.raw_value().to_string(),
            properties,
        })
    }

    /// [`Resolver::schema_class`] by short name.
    pub fn schema_class_by_name(&self, name: &str) -> Result<SchemaClass, VocabError> {
        self.schema_class(&self.class_term(name))
    }

    /// Depth-first listing of `class` and its stable subclasses, each entry
    /// prefixed by `marker` repeated once per level below `class`.
    ///
    /// Siblings come in the order of [`Resolver::sub_classes_of`]. A class
    /// with several parents is listed under each of them. A subclass that is
    /// already on the current descent path is skipped.
    pub fn sub_classes_hierarchy_of(&self, class: &Term, marker: &str, level: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut path = Vec::new();
        self.walk_sub_classes(class, marker, level, &mut path, &mut lines);
        lines
    }

    fn walk_sub_classes(
        &self,
        class: &Term,
        marker: &str,
        level: usize,
        path: &mut Vec<Term>,
        lines: &mut Vec<String>,
    ) {
        lines.push(format!("{}{}", marker.repeat(level), self.short_name(class)));
        path.push(class.clone());

        for name in self.sub_classes_of(class) {
            let sub = self.class_term(&name);
            if path.contains(&sub) {
                tracing::warn!(class = %name, "subClassOf cycle, not descending again");
                continue;
            }
            self.walk_sub_classes(&sub, marker, level + 1, path, lines);
        }

        path.pop();
    }

    /// Ancestors of `class` from the root down to `class` itself, following
    /// the first `subClassOf` edge of each class.
    fn ancestor_chain(&self, class: &Term) -> Result<Vec<Term>, VocabError> {
        let mut chain = vec![class.clone()];
        let mut visited: HashSet<Term> = HashSet::from([class.clone()]);
        let mut current = class.clone();

        while let Some(t) = self
            .graph
            .query_one(Some(&current), Some(&self.terms.sub_class_of), None)
        {
            let parent = t.object.clone();
            if !visited.insert(parent.clone()) {
                return Err(VocabError::CyclicHierarchy {
                    class: self.short_name(&parent),
                });
            }
            chain.push(parent.clone());
            current = parent;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Stable properties declared directly on `class` via `domainIncludes`.
    fn properties_of(&self, class: &Term) -> Vec<ClassProperty> {
        self.graph
            .query_all(None, Some(&self.terms.domain_includes), Some(class))
            .into_iter()
            .filter_map(|t| {
                let name = self.short_name(&t.subject);
                if self.is_unstable(&name) {
                    return None;
                }
                Some(ClassProperty {
                    property: name,
                    canonical_url: t.subject.raw_value().to_string(),
                    description: self.description(&t.subject),
                    expected_types: self.expected_types(&t.subject),
                })
            })
            .collect()
    }

    /// Short names of the `rangeIncludes` values, in graph order.
    fn expected_types(&self, property: &Term) -> Vec<String> {
        self.graph
            .query_all(Some(property), Some(&self.terms.range_includes), None)
            .into_iter()
            .map(|t| self.short_name(&t.object))
            .collect()
    }

    /// First literal `rdfs:comment`, or empty.
    fn description(&self, term: &Term) -> String {
        self.graph
            .query_all(Some(term), Some(&self.terms.comment), None)
            .into_iter()
            .find_map(|t| t.object.as_literal())
            .map(|lit| lit.value().to_string())
            .unwrap_or_default()
    }

    fn unstable_nodes(&self) -> HashSet<String> {
        let mut triples = self
            .graph
            .query_all(None, Some(&self.terms.is_part_of), Some(&self.terms.attic));
        triples.extend(
            self.graph
                .query_all(None, Some(&self.terms.is_part_of), Some(&self.terms.pending)),
        );

        triples.iter().map(|t| self.short_name(&t.subject)).collect()
    }

    /// Short names of the selected terms, minus unstable ones, sorted.
    fn prepare_values(&self, triples: &[&Triple], pick: impl Fn(&Triple) -> &Term) -> Vec<String> {
        let mut values: Vec<String> = triples
            .iter()
            .map(|t| self.short_name(pick(*t)))
            .filter(|name| !self.is_unstable(name))
            .collect();
        values.sort();
        values
    }
}
