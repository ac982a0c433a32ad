//! RDF terms, triples and namespaces.
//!
//! Terms are cheap to clone (`Arc<str>` inside) and compare by their raw
//! string value, so an IRI built from a namespace equals the same IRI read
//! from a document.

use std::fmt;
use std::sync::Arc;

/// A literal value with optional language tag or datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: Arc<str>,
    language: Option<Arc<str>>,
    datatype: Option<Arc<str>>,
}

impl Literal {
    /// Plain string literal.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.as_ref()),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged string literal.
    pub fn with_language(value: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Self {
            language: Some(Arc::from(language.as_ref())),
            ..Self::new(value)
        }
    }

    /// Typed literal.
    pub fn typed(value: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Self {
            datatype: Some(Arc::from(datatype.as_ref())),
            ..Self::new(value)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Absolute IRI.
    Iri(Arc<str>),
    /// Blank node label (without the `_:` prefix).
    Blank(Arc<str>),
    /// Literal value.
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(Arc::from(label.as_ref()))
    }

    pub fn literal(value: impl AsRef<str>) -> Self {
        Term::Literal(Literal::new(value))
    }

    /// The raw string value: the IRI, the blank label, or the literal's lexical form.
    pub fn raw_value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal(lit) => lit.value(),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => match (lit.language(), lit.datatype()) {
                (Some(lang), _) => write!(f, "{:?}@{}", lit.value(), lang),
                (None, Some(dt)) => write!(f, "{:?}^^<{}>", lit.value(), dt),
                (None, None) => write!(f, "{:?}", lit.value()),
            },
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A namespace IRI prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(Arc<str>);

/// `http://www.w3.org/1999/02/22-rdf-syntax-ns#`
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// `http://www.w3.org/2000/01/rdf-schema#`
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `http://www.w3.org/2001/XMLSchema#`
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
/// `https://schema.org/`
pub const SCHEMA_NS: &str = "https://schema.org/";

/// Part of the vocabulary holding retired terms.
pub const ATTIC: &str = "https://attic.schema.org";
/// Part of the vocabulary holding proposed, unreleased terms.
pub const PENDING: &str = "https://pending.schema.org";

impl Namespace {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self(Arc::from(prefix.as_ref()))
    }

    pub fn rdf() -> Self {
        Self::new(RDF_NS)
    }

    pub fn rdfs() -> Self {
        Self::new(RDFS_NS)
    }

    pub fn schema() -> Self {
        Self::new(SCHEMA_NS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the IRI term `prefix + local`.
    pub fn term(&self, local: &str) -> Term {
        Term::iri(format!("{}{}", self.0, local))
    }

    /// Strip this namespace from a term's raw value.
    ///
    /// Terms outside the namespace keep their full value.
    pub fn short_name(&self, term: &Term) -> String {
        let raw = term.raw_value();
        raw.strip_prefix(self.as_str()).unwrap_or(raw).to_string()
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_compare_by_raw_value() {
        assert_eq!(Namespace::schema().term("Thing"), Term::iri("https://schema.org/Thing"));
        assert_ne!(Term::iri("https://schema.org/Thing"), Term::literal("https://schema.org/Thing"));
    }

    #[test]
    fn test_short_name() {
        let schema = Namespace::schema();
        assert_eq!(schema.short_name(&schema.term("Event")), "Event");
        assert_eq!(
            schema.short_name(&Term::iri("http://www.w3.org/2000/01/rdf-schema#Class")),
            "http://www.w3.org/2000/01/rdf-schema#Class"
        );
    }

    #[test]
    fn test_display() {
        let t = Triple::new(
            Term::iri("https://schema.org/Event"),
            Term::iri("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::Literal(Literal::with_language("Event", "en")),
        );
        assert_eq!(
            t.to_string(),
            "<https://schema.org/Event> <http://www.w3.org/2000/01/rdf-schema#label> \"Event\"@en ."
        );
    }
}
