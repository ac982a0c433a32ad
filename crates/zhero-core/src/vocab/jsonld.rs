//! Minimal JSON-LD reader producing triples.
//!
//! Covers the subset the vocabulary publishers use: an inline `@context`
//! of prefix and term definitions (with `@type: @id` coercion), `@vocab`,
//! `@base`, a top-level `@graph`, node objects with `@id` and `@type`,
//! nested node objects, value objects (`@value`, `@language`, `@type`),
//! `@list`/`@set` containers and native JSON scalars. Remote contexts are
//! rejected. Named graphs are flattened into the default graph.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::term::{Literal, Term, Triple, RDF_NS, XSD_NS};

/// Errors raised while reading a JSON-LD document.
#[derive(Debug, Error)]
pub enum JsonLdError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Remote context not supported: {0}")]
    RemoteContext(String),

    #[error("Invalid node: {0}")]
    InvalidNode(String),
}

/// Parse a JSON-LD document into triples, in document order.
pub fn parse_str(content: &str) -> Result<Vec<Triple>, JsonLdError> {
    let doc: Value = serde_json::from_str(content)?;
    parse_value(&doc)
}

/// Convert an already-parsed JSON-LD document into triples.
pub fn parse_value(doc: &Value) -> Result<Vec<Triple>, JsonLdError> {
    let mut reader = Reader::default();
    let ctx = Context::default();

    match doc {
        Value::Array(items) => {
            for item in items {
                reader.top_level(item, &ctx)?;
            }
        }
        other => reader.top_level(other, &ctx)?,
    }

    Ok(reader.triples)
}

/// Returns true if the IRI has an RFC 3986 scheme.
fn is_absolute(iri: &str) -> bool {
    match iri.find(':') {
        Some(pos) => {
            let scheme = &iri[..pos];
            !scheme.is_empty()
                && scheme.as_bytes()[0].is_ascii_alphabetic()
                && scheme
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
        }
        None => false,
    }
}

/// Split a compact IRI `prefix:suffix`. Absolute IRIs (`http://..`) are not compact.
fn split_compact(s: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = s.split_once(':')?;
    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }
    Some((prefix, suffix))
}

#[derive(Debug, Clone)]
struct TermDef {
    iri: String,
    coerce_id: bool,
}

#[derive(Debug, Clone, Default)]
struct Context {
    terms: HashMap<String, TermDef>,
    vocab: Option<String>,
    base: Option<String>,
}

/// Term definitions may point at each other (`"name": "schema:name"`).
const MAX_EXPANSION_DEPTH: usize = 8;

impl Context {
    /// Apply a local `@context` on top of this one.
    fn extend(&self, local: &Value) -> Result<Context, JsonLdError> {
        let mut ctx = self.clone();
        match local {
            Value::Null => ctx = Context::default(),
            Value::String(url) => return Err(JsonLdError::RemoteContext(url.clone())),
            Value::Array(items) => {
                for item in items {
                    ctx = ctx.extend(item)?;
                }
            }
            Value::Object(map) => ctx.define(map)?,
            other => {
                return Err(JsonLdError::InvalidContext(format!(
                    "unexpected context value {}",
                    other
                )))
            }
        }
        Ok(ctx)
    }

    fn define(&mut self, map: &Map<String, Value>) -> Result<(), JsonLdError> {
        for (key, value) in map {
            match key.as_str() {
                "@vocab" => self.vocab = value.as_str().map(str::to_string),
                "@base" => self.base = value.as_str().map(str::to_string),
                k if k.starts_with('@') => {}
                _ => match value {
                    Value::Null => {
                        self.terms.remove(key);
                    }
                    Value::String(iri) => {
                        self.terms.insert(
                            key.clone(),
                            TermDef {
                                iri: iri.clone(),
                                coerce_id: false,
                            },
                        );
                    }
                    Value::Object(def) => {
                        let iri = match def.get("@id") {
                            Some(Value::String(id)) => id.clone(),
                            _ => key.clone(),
                        };
                        let coerce_id = matches!(
                            def.get("@type").and_then(Value::as_str),
                            Some("@id") | Some("@vocab")
                        );
                        self.terms.insert(key.clone(), TermDef { iri, coerce_id });
                    }
                    other => {
                        return Err(JsonLdError::InvalidContext(format!(
                            "term '{}' has unsupported definition {}",
                            key, other
                        )))
                    }
                },
            }
        }
        Ok(())
    }

    fn coerces_id(&self, key: &str) -> bool {
        self.terms.get(key).is_some_and(|d| d.coerce_id)
    }

    /// Expand a term, compact IRI or IRI. `vocab` selects vocabulary-relative
    /// resolution (property names, types) over document-relative (`@id`).
    fn expand(&self, value: &str, vocab: bool) -> String {
        self.expand_depth(value, vocab, 0)
    }

    fn expand_depth(&self, value: &str, vocab: bool, depth: usize) -> String {
        if depth > MAX_EXPANSION_DEPTH || value.starts_with("_:") {
            return value.to_string();
        }

        if vocab {
            if let Some(def) = self.terms.get(value) {
                if def.iri != value {
                    return self.expand_depth(&def.iri, true, depth + 1);
                }
                return def.iri.clone();
            }
        }

        if let Some((prefix, suffix)) = split_compact(value) {
            if let Some(def) = self.terms.get(prefix) {
                let ns = self.expand_depth(&def.iri, true, depth + 1);
                return format!("{}{}", ns, suffix);
            }
        }

        if is_absolute(value) {
            return value.to_string();
        }

        match (vocab, &self.vocab, &self.base) {
            (true, Some(v), _) => format!("{}{}", v, value),
            (_, _, Some(base)) => format!("{}{}", base, value),
            _ => value.to_string(),
        }
    }

    fn term(&self, value: &str, vocab: bool) -> Term {
        match value.strip_prefix("_:") {
            Some(label) => Term::blank(label),
            None => Term::iri(self.expand(value, vocab)),
        }
    }
}

#[derive(Default)]
struct Reader {
    triples: Vec<Triple>,
    blank_counter: usize,
}

impl Reader {
    fn fresh_blank(&mut self) -> Term {
        let label = format!("genid{}", self.blank_counter);
        self.blank_counter += 1;
        Term::blank(label)
    }

    fn top_level(&mut self, value: &Value, ctx: &Context) -> Result<(), JsonLdError> {
        match value {
            Value::Object(obj) => {
                self.node(obj, ctx)?;
                Ok(())
            }
            other => Err(JsonLdError::InvalidNode(format!(
                "top-level item must be an object, got {}",
                other
            ))),
        }
    }

    /// Emit the triples of a node object. Returns its subject, or `None` for a
    /// bare `{"@context", "@graph"}` wrapper.
    fn node(&mut self, obj: &Map<String, Value>, parent: &Context) -> Result<Option<Term>, JsonLdError> {
        let ctx = match obj.get("@context") {
            Some(local) => parent.extend(local)?,
            None => parent.clone(),
        };

        if let Some(graph) = obj.get("@graph") {
            let items: &[Value] = match graph {
                Value::Array(items) => items,
                single => std::slice::from_ref(single),
            };
            for item in items {
                self.top_level(item, &ctx)?;
            }

            if obj.keys().all(|k| k == "@context" || k == "@graph") {
                return Ok(None);
            }
        }

        let subject = match obj.get("@id") {
            Some(Value::String(id)) => ctx.term(id, false),
            Some(other) => {
                return Err(JsonLdError::InvalidNode(format!("@id must be a string, got {}", other)))
            }
            None => self.fresh_blank(),
        };

        if let Some(types) = obj.get("@type") {
            let rdf_type = Term::iri(format!("{}type", RDF_NS));
            for ty in as_slice(types) {
                let ty = ty.as_str().ok_or_else(|| {
                    JsonLdError::InvalidNode(format!("@type values must be strings, got {}", ty))
                })?;
                self.triples.push(Triple::new(
                    subject.clone(),
                    rdf_type.clone(),
                    ctx.term(ty, true),
                ));
            }
        }

        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }

            let predicate = ctx.expand(key, true);
            if !is_absolute(&predicate) {
                // Undefined terms are dropped.
                continue;
            }
            let predicate = Term::iri(predicate);
            let coerce_id = ctx.coerces_id(key);

            for object in self.values(value, &ctx, coerce_id)? {
                self.triples.push(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }

        Ok(Some(subject))
    }

    fn values(&mut self, value: &Value, ctx: &Context, coerce_id: bool) -> Result<Vec<Term>, JsonLdError> {
        let mut out = Vec::new();
        match value {
            Value::Null => {}
            Value::String(s) if coerce_id => out.push(ctx.term(s, false)),
            Value::String(s) => out.push(Term::literal(s)),
            Value::Bool(b) => out.push(Term::Literal(Literal::typed(
                b.to_string(),
                format!("{}boolean", XSD_NS),
            ))),
            Value::Number(n) => {
                let datatype = if n.is_i64() || n.is_u64() { "integer" } else { "double" };
                out.push(Term::Literal(Literal::typed(
                    n.to_string(),
                    format!("{}{}", XSD_NS, datatype),
                )));
            }
            Value::Array(items) => {
                for item in items {
                    out.extend(self.values(item, ctx, coerce_id)?);
                }
            }
            Value::Object(obj) => {
                if let Some(v) = obj.get("@value") {
                    out.extend(value_object(v, obj, ctx)?);
                } else if let Some(inner) = obj.get("@list").or_else(|| obj.get("@set")) {
                    out.extend(self.values(inner, ctx, coerce_id)?);
                } else if let Some(subject) = self.node(obj, ctx)? {
                    out.push(subject);
                }
            }
        }
        Ok(out)
    }
}

fn value_object(value: &Value, obj: &Map<String, Value>, ctx: &Context) -> Result<Option<Term>, JsonLdError> {
    let lexical = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        other => {
            return Err(JsonLdError::InvalidNode(format!(
                "@value must be a scalar, got {}",
                other
            )))
        }
    };

    let literal = match (obj.get("@language").and_then(Value::as_str), obj.get("@type").and_then(Value::as_str)) {
        (Some(lang), _) => Literal::with_language(lexical, lang),
        (None, Some(ty)) => Literal::typed(lexical, ctx.expand(ty, true)),
        (None, None) => Literal::new(lexical),
    };
    Ok(Some(Term::Literal(literal)))
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &str = "https://schema.org/";
    const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    fn find<'a>(triples: &'a [Triple], s: &str, p: &str) -> Vec<&'a Term> {
        triples
            .iter()
            .filter(|t| t.subject.raw_value() == s && t.predicate.raw_value() == p)
            .map(|t| &t.object)
            .collect()
    }

    #[test]
    fn test_schema_org_style_graph() {
        let doc = json!({
            "@context": {
                "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
                "rdfs": RDFS,
                "schema": SCHEMA
            },
            "@graph": [
                {
                    "@id": "schema:Event",
                    "@type": "rdfs:Class",
                    "rdfs:comment": "An event happening at a certain time.",
                    "rdfs:label": {"@language": "en", "@value": "Event"},
                    "rdfs:subClassOf": {"@id": "schema:Thing"}
                },
                {
                    "@id": "schema:startDate",
                    "@type": "rdf:Property",
                    "schema:domainIncludes": [{"@id": "schema:Event"}, {"@id": "schema:Schedule"}],
                    "schema:isPartOf": {"@id": "https://pending.schema.org"}
                }
            ]
        });

        let triples = parse_value(&doc).unwrap();
        let event = format!("{}Event", SCHEMA);

        let types = find(&triples, &event, "http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        assert_eq!(types, vec![&Term::iri(format!("{}Class", RDFS))]);

        let comment = find(&triples, &event, &format!("{}comment", RDFS));
        assert_eq!(comment, vec![&Term::literal("An event happening at a certain time.")]);

        let label = find(&triples, &event, &format!("{}label", RDFS));
        assert_eq!(label[0].as_literal().unwrap().language(), Some("en"));

        let parent = find(&triples, &event, &format!("{}subClassOf", RDFS));
        assert_eq!(parent, vec![&Term::iri(format!("{}Thing", SCHEMA))]);

        let domains = find(&triples, &format!("{}startDate", SCHEMA), &format!("{}domainIncludes", SCHEMA));
        assert_eq!(domains.len(), 2);

        let part_of = find(&triples, &format!("{}startDate", SCHEMA), &format!("{}isPartOf", SCHEMA));
        assert_eq!(part_of, vec![&Term::iri("https://pending.schema.org")]);
    }

    #[test]
    fn test_coerced_terms_and_vocab() {
        let doc = json!({
            "@context": {
                "@vocab": SCHEMA,
                "parent": {"@id": "schema:parent", "@type": "@id"},
                "schema": SCHEMA
            },
            "@id": "http://example.org/kid",
            "@type": "Person",
            "name": "Kid",
            "age": 7,
            "parent": "http://example.org/mum"
        });

        let triples = parse_value(&doc).unwrap();
        let kid = "http://example.org/kid";

        assert_eq!(
            find(&triples, kid, &format!("{}parent", SCHEMA)),
            vec![&Term::iri("http://example.org/mum")]
        );
        assert_eq!(find(&triples, kid, &format!("{}name", SCHEMA)), vec![&Term::literal("Kid")]);
        let age = find(&triples, kid, &format!("{}age", SCHEMA));
        assert_eq!(age[0].as_literal().unwrap().datatype(), Some("http://www.w3.org/2001/XMLSchema#integer"));
        assert_eq!(
            find(&triples, kid, "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            vec![&Term::iri(format!("{}Person", SCHEMA))]
        );
    }

    #[test]
    fn test_nested_node_gets_blank_subject() {
        let doc = json!({
            "@context": {"schema": SCHEMA},
            "@id": "http://example.org/e",
            "schema:location": {"schema:name": "Hall"}
        });

        let triples = parse_value(&doc).unwrap();
        let location = find(&triples, "http://example.org/e", &format!("{}location", SCHEMA));
        assert!(matches!(location[0], Term::Blank(_)));
        assert_eq!(
            find(&triples, location[0].raw_value(), &format!("{}name", SCHEMA)),
            vec![&Term::literal("Hall")]
        );
    }

    #[test]
    fn test_undefined_terms_are_dropped() {
        let doc = json!({"@id": "http://example.org/x", "unknown": "value"});
        assert!(parse_value(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_remote_context_rejected() {
        let doc = json!({"@context": "https://schema.org/", "@id": "http://example.org/x"});
        assert!(matches!(parse_value(&doc), Err(JsonLdError::RemoteContext(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_str("{not json"), Err(JsonLdError::Json(_))));
    }

    #[test]
    fn test_compact_iri_detection() {
        assert_eq!(split_compact("schema:Thing"), Some(("schema", "Thing")));
        assert_eq!(split_compact("https://schema.org/Thing"), None);
        assert!(is_absolute("https://attic.schema.org"));
        assert!(!is_absolute("Thing"));
    }
}
