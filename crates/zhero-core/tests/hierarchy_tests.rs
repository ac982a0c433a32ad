use std::path::PathBuf;
use std::sync::Arc;

use zhero_core::vocab::{build_breadcrumbs, GraphStore};
use zhero_core::{HierarchyBuilder, Resolver};

fn create_test_builder() -> HierarchyBuilder {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/vocab.jsonld");
    let graph = GraphStore::from_jsonld_file(&path).unwrap();
    HierarchyBuilder::new(Arc::new(Resolver::new(Arc::new(graph))))
}

#[test]
fn test_class_hierarchy() {
    let builder = create_test_builder();

    let hierarchy = builder.class_hierarchy();
    assert_eq!(hierarchy.len(), 16);
    assert_eq!(hierarchy[0], vec!["Thing"]);
    assert_eq!(hierarchy[1], vec!["Thing", "Action"]);
    assert_eq!(
        hierarchy[8],
        vec!["Thing", "CreativeWork", "Article", "SocialMediaPosting", "BlogPosting", "LiveBlogPosting"]
    );
    assert_eq!(hierarchy[9], vec!["Thing", "Event"]);
}

#[test]
fn test_every_path_prefix_is_a_path() {
    let builder = create_test_builder();
    let hierarchy = builder.class_hierarchy();

    for path in hierarchy {
        assert_eq!(path[0], "Thing");
        for len in 1..path.len() {
            let prefix = &path[..len];
            assert!(
                hierarchy.iter().any(|p| p.as_slice() == prefix),
                "prefix {:?} of {:?} missing",
                prefix,
                path
            );
        }
    }
}

#[test]
fn test_unstable_classes_not_in_hierarchy() {
    let builder = create_test_builder();

    assert!(builder.breadcrumbs_for("StupidType").is_none());
    assert!(builder.breadcrumbs_for("PendingThing").is_none());
}

#[test]
fn test_breadcrumbs_for() {
    let builder = create_test_builder();

    assert_eq!(
        builder.breadcrumbs_for("ChooseAction").unwrap(),
        ["Thing", "Action", "AssessAction", "ChooseAction"]
    );
    assert_eq!(builder.breadcrumbs_for("Thing").unwrap(), ["Thing"]);
    assert!(builder.breadcrumbs_for("Unicorn").is_none());
}

#[test]
fn test_breadcrumbs_first_parent_wins() {
    let builder = create_test_builder();

    // LocalBusiness is listed under Organization and Place.
    assert_eq!(
        builder.breadcrumbs_for("LocalBusiness").unwrap(),
        ["Thing", "Organization", "LocalBusiness"]
    );
    let listed = builder
        .class_hierarchy()
        .iter()
        .filter(|p| p.last().map(String::as_str) == Some("LocalBusiness"))
        .count();
    assert_eq!(listed, 2);
}

#[test]
fn test_hierarchy_is_memoized() {
    let builder = create_test_builder();
    assert!(!builder.is_built());

    let first = builder.class_hierarchy().as_ptr();
    assert!(builder.is_built());
    let second = builder.class_hierarchy().as_ptr();
    assert_eq!(first, second);
}

#[test]
fn test_build_breadcrumbs_scenario() {
    let lines = ["Thing", ">Action", ">>AssessAction", ">Event"];
    let expected: Vec<Vec<String>> = vec![
        vec!["Thing".into()],
        vec!["Thing".into(), "Action".into()],
        vec!["Thing".into(), "Action".into(), "AssessAction".into()],
        vec!["Thing".into(), "Event".into()],
    ];
    assert_eq!(build_breadcrumbs(&lines, ">"), expected);
}
