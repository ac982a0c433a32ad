use std::path::PathBuf;
use std::sync::Arc;

use zhero_core::vocab::{GraphStore, Namespace, Term, Triple};
use zhero_core::{Resolver, VocabError};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/vocab.jsonld")
}

fn create_test_resolver() -> Resolver {
    let graph = GraphStore::from_jsonld_file(&fixture_path()).unwrap();
    Resolver::new(Arc::new(graph))
}

fn schema(name: &str) -> Term {
    Namespace::schema().term(name)
}

#[test]
fn test_all_classes_sorted_and_stable() {
    let resolver = create_test_resolver();

    let classes = resolver.all_classes();
    assert_eq!(
        classes,
        vec![
            "Action",
            "Article",
            "AssessAction",
            "BlogPosting",
            "ChooseAction",
            "CreativeWork",
            "Event",
            "ExhibitionEvent",
            "LiveBlogPosting",
            "LocalBusiness",
            "Organization",
            "Person",
            "Place",
            "SocialMediaPosting",
            "Text",
            "Thing",
        ]
    );

    let mut sorted = classes.clone();
    sorted.sort();
    assert_eq!(classes, sorted);
    assert_eq!(classes, resolver.all_classes());
}

#[test]
fn test_unstable_terms_detected() {
    let resolver = create_test_resolver();

    assert!(resolver.is_unstable("StupidType"));
    assert!(resolver.is_unstable("PendingThing"));
    assert!(resolver.is_unstable("oldThingProperty"));
    assert!(!resolver.is_unstable("Thing"));
    assert_eq!(resolver.unstable_count(), 5);
}

#[test]
fn test_is_class() {
    let resolver = create_test_resolver();

    assert!(resolver.is_class("Thing"));
    assert!(resolver.is_class("LiveBlogPosting"));
    assert!(resolver.is_class("https://schema.org/Event"));
    assert!(!resolver.is_class("StupidType"));
    assert!(!resolver.is_class("name"));
    assert!(!resolver.is_class("Nope"));
}

#[test]
fn test_attic_class_excluded_from_subclasses() {
    let resolver = create_test_resolver();

    let subs = resolver.sub_classes_of(&schema("Thing"));
    assert_eq!(
        subs,
        vec!["Action", "CreativeWork", "Event", "Organization", "Person", "Place"]
    );
    assert!(!subs.contains(&"StupidType".to_string()));
    assert!(!subs.contains(&"PendingThing".to_string()));
}

#[test]
fn test_subclasses_are_classes() {
    let resolver = create_test_resolver();
    let classes = resolver.all_classes();

    for class in &classes {
        for sub in resolver.sub_classes_of(&resolver.class_term(class)) {
            assert!(classes.contains(&sub), "{} is not a class", sub);
        }
    }
}

#[test]
fn test_live_blog_posting_inherits_properties() {
    let resolver = create_test_resolver();

    let class = resolver.schema_class(&schema("LiveBlogPosting")).unwrap();
    assert_eq!(class.name, "LiveBlogPosting");
    assert_eq!(class.canonical_url, "https://schema.org/LiveBlogPosting");
    assert!(class.description.starts_with("A LiveBlogPosting is a BlogPosting"));

    let names: Vec<&str> = class.properties.iter().map(|p| p.property.as_str()).collect();
    for expected in ["name", "identifier", "headline", "author", "articleBody", "liveBlogUpdate"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }

    // Root-most ancestor first, the class itself last.
    assert_eq!(names.first(), Some(&"name"));
    assert_eq!(names.last(), Some(&"liveBlogUpdate"));

    let update = class.property("liveBlogUpdate").unwrap();
    assert_eq!(update.canonical_url, "https://schema.org/liveBlogUpdate");
    assert_eq!(update.description, "An update to the LiveBlog.");
    assert_eq!(update.expected_types, vec!["BlogPosting"]);
}

#[test]
fn test_unstable_properties_excluded() {
    let resolver = create_test_resolver();

    let thing = resolver.schema_class_by_name("Thing").unwrap();
    assert!(!thing.has_property("oldThingProperty"));

    let event = resolver.schema_class_by_name("Event").unwrap();
    assert!(event.has_property("startDate"));
    assert!(!event.has_property("pendingProperty"));
}

#[test]
fn test_expected_types_in_graph_order() {
    let resolver = create_test_resolver();

    let work = resolver.schema_class_by_name("CreativeWork").unwrap();
    let author = work.property("author").unwrap();
    assert_eq!(author.expected_types, vec!["Organization", "Person"]);

    let event = resolver.schema_class_by_name("Event").unwrap();
    assert_eq!(
        event.property("startDate").unwrap().expected_types,
        vec!["Date", "DateTime"]
    );
}

#[test]
fn test_language_tagged_description() {
    let resolver = create_test_resolver();

    let event = resolver.schema_class_by_name("Event").unwrap();
    assert_eq!(event.description, "An event happening at a certain time and location.");
}

#[test]
fn test_first_parent_chain() {
    let resolver = create_test_resolver();

    let business = resolver.schema_class_by_name("LocalBusiness").unwrap();
    assert!(business.has_property("founder"));
    assert!(business.has_property("name"));
}

#[test]
fn test_properties_not_deduplicated() {
    let mut graph = GraphStore::from_jsonld_file(&fixture_path()).unwrap();
    graph.insert(Triple::new(
        schema("name"),
        schema("domainIncludes"),
        schema("CreativeWork"),
    ));
    let resolver = Resolver::new(Arc::new(graph));

    let article = resolver.schema_class_by_name("Article").unwrap();
    let count = article.properties.iter().filter(|p| p.property == "name").count();
    assert_eq!(count, 2);
}

#[test]
fn test_search_classes() {
    let resolver = create_test_resolver();

    assert_eq!(
        resolver.search_classes("posting"),
        vec!["BlogPosting", "LiveBlogPosting", "SocialMediaPosting"]
    );
    assert_eq!(resolver.search_classes("").len(), resolver.all_classes().len());
    assert!(resolver.search_classes("stupid").is_empty());
}

#[test]
fn test_hierarchy_listing() {
    let resolver = create_test_resolver();

    let lines = resolver.sub_classes_hierarchy_of(&schema("Thing"), ">", 0);
    assert_eq!(
        lines,
        vec![
            "Thing",
            ">Action",
            ">>AssessAction",
            ">>>ChooseAction",
            ">CreativeWork",
            ">>Article",
            ">>>SocialMediaPosting",
            ">>>>BlogPosting",
            ">>>>>LiveBlogPosting",
            ">Event",
            ">>ExhibitionEvent",
            ">Organization",
            ">>LocalBusiness",
            ">Person",
            ">Place",
            ">>LocalBusiness",
        ]
    );
}

#[test]
fn test_cycle_in_graph_is_reported() {
    let mut graph = GraphStore::from_jsonld_file(&fixture_path()).unwrap();
    let sub_class_of = Namespace::rdfs().term("subClassOf");
    graph.insert(Triple::new(schema("Thing"), sub_class_of, schema("Event")));
    let resolver = Resolver::new(Arc::new(graph));

    let err = resolver.schema_class_by_name("ExhibitionEvent").unwrap_err();
    assert!(matches!(err, VocabError::CyclicHierarchy { .. }));
}
