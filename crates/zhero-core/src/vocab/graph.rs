//! In-memory triple store with pattern queries.
//!
//! Triples live in a slot vector (insertion order) with per-position indexes
//! pointing into it. Removal clears the slot and the index entries, so query
//! results always come back in insertion order.

use std::collections::HashMap;
use std::path::Path;

use super::error::VocabError;
use super::jsonld;
use super::term::{Term, Triple};

/// A parsed triple graph.
#[derive(Debug, Default)]
pub struct GraphStore {
    slots: Vec<Option<Triple>>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Term, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
    len: usize,
}

impl GraphStore {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from triples, keeping their order.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::new();
        for t in triples {
            graph.insert(t);
        }
        graph
    }

    /// Parse a JSON-LD document.
    pub fn from_jsonld_str(content: &str, origin: &str) -> Result<Self, VocabError> {
        let triples = jsonld::parse_str(content).map_err(|e| VocabError::parse(origin, e))?;
        Ok(Self::from_triples(triples))
    }

    /// Read and parse a JSON-LD file.
    pub fn from_jsonld_file(path: &Path) -> Result<Self, VocabError> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabError::io(path, e))?;
        Self::from_jsonld_str(&content, &path.display().to_string())
    }

    /// Add a triple.
    pub fn insert(&mut self, triple: Triple) {
        let idx = self.slots.len();
        self.by_subject.entry(triple.subject.clone()).or_default().push(idx);
        self.by_predicate.entry(triple.predicate.clone()).or_default().push(idx);
        self.by_object.entry(triple.object.clone()).or_default().push(idx);
        self.slots.push(Some(triple));
        self.len += 1;
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.slots.iter().flatten()
    }

    /// First triple matching the pattern, `None` positions match anything.
    pub fn query_one<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Option<&'a Triple> {
        self.candidates(subject, predicate, object)
            .filter_map(|i| self.slots[i].as_ref())
            .find(|t| pattern_matches(t, subject, predicate, object))
    }

    /// Every triple matching the pattern, `None` positions match anything.
    pub fn query_all<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<&'a Triple> {
        self.candidates(subject, predicate, object)
            .filter_map(|i| self.slots[i].as_ref())
            .filter(|t| pattern_matches(t, subject, predicate, object))
            .collect()
    }

    /// Remove every copy of a triple. Returns whether anything was removed.
    ///
    /// Freed slots stay behind as tombstones; the slot vector never shrinks.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let positions: Vec<usize> = self
            .candidates(Some(&triple.subject), None, None)
            .filter(|&i| self.slots[i].as_ref() == Some(triple))
            .collect();

        if positions.is_empty() {
            return false;
        }

        for &i in &positions {
            self.slots[i] = None;
            self.len -= 1;
        }
        Self::unindex(&mut self.by_subject, &triple.subject, &positions);
        Self::unindex(&mut self.by_predicate, &triple.predicate, &positions);
        Self::unindex(&mut self.by_object, &triple.object, &positions);

        true
    }

    fn unindex(index: &mut HashMap<Term, Vec<usize>>, key: &Term, positions: &[usize]) {
        if let Some(list) = index.get_mut(key) {
            list.retain(|i| !positions.contains(i));
            if list.is_empty() {
                index.remove(key);
            }
        }
    }

    /// Slot positions to scan: the smallest index list among the bound
    /// positions, or every slot for a fully wildcarded pattern.
    fn candidates<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        const EMPTY: &[usize] = &[];

        let lists = [
            subject.map(|s| self.by_subject.get(s).map_or(EMPTY, Vec::as_slice)),
            predicate.map(|p| self.by_predicate.get(p).map_or(EMPTY, Vec::as_slice)),
            object.map(|o| self.by_object.get(o).map_or(EMPTY, Vec::as_slice)),
        ];

        match lists.into_iter().flatten().min_by_key(|l| l.len()) {
            Some(list) => Box::new(list.iter().copied()),
            None => Box::new(0..self.slots.len()),
        }
    }
}

fn pattern_matches(
    triple: &Triple,
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
) -> bool {
    subject.map_or(true, |s| &triple.subject == s)
        && predicate.map_or(true, |p| &triple.predicate == p)
        && object.map_or(true, |o| &triple.object == o)
}
