//! Breadcrumb tree of the vocabulary classes.
//!
//! The resolver flattens the class tree into a depth-first listing where each
//! entry carries its depth as a run of marker strings:
//!
//! ```text
//! Thing
//! >Action
//! >>AssessAction
//! >Event
//! ```
//!
//! [`build_breadcrumbs`] turns that listing back into one root-to-class path
//! per entry, keeping a stack of the current path while scanning.

use std::sync::{Arc, OnceLock};

use crate::config::{DEFAULT_HIERARCHY_MARKER, DEFAULT_ROOT_CLASS};

use super::resolver::Resolver;
use super::term::Term;

/// A path of short class names from the root down to one class.
pub type Breadcrumb = Vec<String>;

/// Depth of a listing entry and its name with the marker run removed.
pub fn split_depth<'a>(line: &'a str, marker: &str) -> (usize, &'a str) {
    if marker.is_empty() {
        return (0, line);
    }

    let mut depth = 0;
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix(marker) {
        depth += 1;
        rest = stripped;
    }
    (depth, rest)
}

/// Rebuilds breadcrumb paths from a marker-encoded depth-first listing.
pub fn build_breadcrumbs<S: AsRef<str>>(lines: &[S], marker: &str) -> Vec<Breadcrumb> {
    let entries: Vec<(usize, String)> = lines
        .iter()
        .map(|l| {
            let (depth, name) = split_depth(l.as_ref(), marker);
            (depth, name.to_string())
        })
        .collect();
    build_breadcrumbs_from_depths(&entries)
}

/// Rebuilds breadcrumb paths from `(depth, name)` pairs.
///
/// The first entry is the root whatever its depth. For each later entry at
/// depth `d`, with `parents` the current path:
/// - `d == parents.len()`: child of the last entry, pushed;
/// - `d == parents.len() - 1`: sibling, replaces the last element;
/// - `d < parents.len() - 1`: ascent, path cut to `d` elements then pushed;
/// - `d > parents.len()`: not a valid listing; the path is left unchanged
///   and recorded again as is.
pub fn build_breadcrumbs_from_depths(entries: &[(usize, String)]) -> Vec<Breadcrumb> {
    let Some(((_, root), rest)) = entries.split_first() else {
        return Vec::new();
    };

    let mut parents: Vec<String> = vec![root.clone()];
    let mut hierarchy = Vec::with_capacity(entries.len());
    hierarchy.push(parents.clone());

    for (depth, name) in rest {
        let depth = *depth;
        let len = parents.len();

        if depth == len {
            parents.push(name.clone());
        } else if depth + 1 == len {
            parents[len - 1] = name.clone();
        } else if depth + 1 < len {
            parents.truncate(depth);
            parents.push(name.clone());
        }

        hierarchy.push(parents.clone());
    }

    hierarchy
}

/// First breadcrumb ending in `class`.
pub fn find_breadcrumbs<'a>(hierarchy: &'a [Breadcrumb], class: &str) -> Option<&'a [String]> {
    hierarchy
        .iter()
        .find(|path| path.last().is_some_and(|last| last == class))
        .map(Vec::as_slice)
}

/// Builds the class hierarchy from a resolver on first use and keeps it.
#[derive(Debug)]
pub struct HierarchyBuilder {
    resolver: Arc<Resolver>,
    root: Term,
    marker: String,
    hierarchy: OnceLock<Vec<Breadcrumb>>,
}

impl HierarchyBuilder {
    /// Hierarchy rooted at `Thing`, encoded with `>`.
    pub fn new(resolver: Arc<Resolver>) -> Self {
        let root = resolver.class_term(DEFAULT_ROOT_CLASS);
        Self::with_root(resolver, root, DEFAULT_HIERARCHY_MARKER)
    }

    /// Hierarchy rooted at a custom class with a custom marker.
    pub fn with_root(resolver: Arc<Resolver>, root: Term, marker: impl Into<String>) -> Self {
        Self {
            resolver,
            root,
            marker: marker.into(),
            hierarchy: OnceLock::new(),
        }
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Every breadcrumb path, in depth-first order. Built on the first call.
    pub fn class_hierarchy(&self) -> &[Breadcrumb] {
        self.hierarchy.get_or_init(|| {
            let lines = self
                .resolver
                .sub_classes_hierarchy_of(&self.root, &self.marker, 0);
            let hierarchy = build_breadcrumbs(&lines, &self.marker);
            tracing::debug!(paths = hierarchy.len(), root = %self.root, "class hierarchy built");
            hierarchy
        })
    }

    /// Path from the root to `class`, if the class is in the hierarchy.
    pub fn breadcrumbs_for(&self, class: &str) -> Option<&[String]> {
        find_breadcrumbs(self.class_hierarchy(), class)
    }

    /// Whether the hierarchy has been computed already.
    pub fn is_built(&self) -> bool {
        self.hierarchy.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crumbs(paths: &[&[&str]]) -> Vec<Breadcrumb> {
        paths
            .iter()
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_build_breadcrumbs() {
        let lines = ["Thing", ">Action", ">>AssessAction", ">Event"];
        assert_eq!(
            build_breadcrumbs(&lines, ">"),
            crumbs(&[
                &["Thing"],
                &["Thing", "Action"],
                &["Thing", "Action", "AssessAction"],
                &["Thing", "Event"],
            ])
        );
    }

    #[test]
    fn test_ascent_over_several_levels() {
        let lines = ["Thing", ">Action", ">>AssessAction", ">>>ChooseAction", ">>>>VoteAction", ">Event"];
        let result = build_breadcrumbs(&lines, ">");
        assert_eq!(result[4], vec!["Thing", "Action", "AssessAction", "ChooseAction", "VoteAction"]);
        assert_eq!(result[5], vec!["Thing", "Event"]);
    }

    #[test]
    fn test_multi_char_marker() {
        let lines = ["Thing", "--Place", "----Residence", "--Person"];
        assert_eq!(
            build_breadcrumbs(&lines, "--"),
            crumbs(&[&["Thing"], &["Thing", "Place"], &["Thing", "Place", "Residence"], &["Thing", "Person"]])
        );
    }

    // Depth jumps of more than one level leave the current path untouched.
    // Whether such listings should be repaired instead is still undecided.
    #[test]
    fn test_depth_jump_keeps_previous_path() {
        let lines = ["Thing", ">Action", ">>>Deep", ">Event"];
        assert_eq!(
            build_breadcrumbs(&lines, ">"),
            crumbs(&[&["Thing"], &["Thing", "Action"], &["Thing", "Action"], &["Thing", "Event"]])
        );
    }

    #[test]
    fn test_empty_listing() {
        let lines: [&str; 0] = [];
        assert!(build_breadcrumbs(&lines, ">").is_empty());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let entries = vec![(0, "Thing".to_string()), (1, "Action".to_string()), (1, "Event".to_string())];
        let result = build_breadcrumbs_from_depths(&entries);
        assert_eq!(result[1], vec!["Thing", "Action"]);
        assert_eq!(result[2], vec!["Thing", "Event"]);
    }

    #[test]
    fn test_split_depth() {
        assert_eq!(split_depth(">>Event", ">"), (2, "Event"));
        assert_eq!(split_depth("Thing", ">"), (0, "Thing"));
        assert_eq!(split_depth("Thing", ""), (0, "Thing"));
    }

    #[test]
    fn test_find_breadcrumbs() {
        let hierarchy = build_breadcrumbs(&["Thing", ">Action", ">>AssessAction", ">Event"], ">");
        assert_eq!(
            find_breadcrumbs(&hierarchy, "AssessAction"),
            Some(&["Thing".to_string(), "Action".to_string(), "AssessAction".to_string()][..])
        );
        assert_eq!(find_breadcrumbs(&hierarchy, "Missing"), None);
    }
}
