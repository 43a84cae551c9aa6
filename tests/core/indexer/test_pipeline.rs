// Integration tests for the indexing pipeline

use crate::common::{create_test_services, FACTS};
use passage::core::error::PassageError;
use passage::core::types::IndexOutcome;
use std::sync::Arc;

#[test]
fn test_index_creates_collection() {
    let (services, _temp) = create_test_services();

    let outcome = services
        .indexer
        .index("facts.txt", "facts.txt", FACTS.as_bytes())
        .unwrap();

    match &outcome {
        IndexOutcome::Created { collection, stats } => {
            assert_eq!(collection.name(), "factstxt");
            // The empty sentence after the final '.' is dropped
            assert_eq!(stats.chunks_created, 10);
            assert_eq!(stats.chars_extracted, FACTS.chars().count());
        }
        other => panic!("Expected Created, got {other:?}"),
    }

    let listed = services.store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "factstxt");
    assert_eq!(listed[0].chunks, 10);
    assert_eq!(listed[0].source.as_deref(), Some("facts.txt"));
}

#[test]
fn test_reindex_is_a_no_op() {
    let (services, _temp) = create_test_services();

    services
        .indexer
        .index("facts", "facts.txt", FACTS.as_bytes())
        .unwrap();
    let again = services
        .indexer
        .index("facts", "other.txt", b"Completely different content here.")
        .unwrap();

    assert!(matches!(again, IndexOutcome::AlreadyIndexed { .. }));
    assert_eq!(again.message(), "Already indexed");

    let listed = services.store.list().unwrap();
    assert_eq!(listed[0].chunks, 10);
    assert_eq!(listed[0].source.as_deref(), Some("facts.txt"));
}

#[test]
fn test_names_that_sanitize_alike_share_a_collection() {
    let (services, _temp) = create_test_services();

    services
        .indexer
        .index("My Notes!", "notes.txt", FACTS.as_bytes())
        .unwrap();
    let again = services
        .indexer
        .index("MyNotes", "notes.txt", FACTS.as_bytes())
        .unwrap();

    assert!(matches!(again, IndexOutcome::AlreadyIndexed { .. }));
    assert_eq!(again.collection().name(), "MyNotes");
}

#[test]
fn test_numeric_name_is_made_valid() {
    let (services, _temp) = create_test_services();

    let outcome = services
        .indexer
        .index("2024", "2024.txt", FACTS.as_bytes())
        .unwrap();

    assert_eq!(outcome.collection().name(), "a2024a");
}

#[test]
fn test_empty_document_rolls_back() {
    let (services, _temp) = create_test_services();

    let err = services
        .indexer
        .index("blank", "blank.txt", b"  \n  ")
        .unwrap_err();
    assert!(matches!(err, PassageError::EmptyDocument(_)));
    assert!(services.store.list().unwrap().is_empty());

    // No residue: the same name indexes cleanly afterwards
    let outcome = services
        .indexer
        .index("blank", "blank.txt", FACTS.as_bytes())
        .unwrap();
    assert!(matches!(outcome, IndexOutcome::Created { .. }));
}

#[test]
fn test_unsupported_format_rolls_back() {
    let (services, _temp) = create_test_services();

    let err = services
        .indexer
        .index("report", "report.docx", b"PK\x03\x04")
        .unwrap_err();

    assert!(matches!(err, PassageError::UnsupportedFormat(_)));
    assert!(services.store.get("report").unwrap_err().is_not_found());
}

#[test]
fn test_invalid_name_creates_nothing() {
    let (services, _temp) = create_test_services();

    let err = services
        .indexer
        .index("!!!", "facts.txt", FACTS.as_bytes())
        .unwrap_err();

    assert!(matches!(err, PassageError::InvalidName(_)));
    assert!(services.store.list().unwrap().is_empty());
}

#[test]
fn test_concurrent_index_creates_once() {
    let (services, _temp) = create_test_services();
    let services = Arc::new(services);

    let outcomes: Vec<IndexOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let services = Arc::clone(&services);
                scope.spawn(move || {
                    services
                        .indexer
                        .index("shared", "facts.txt", FACTS.as_bytes())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let created = outcomes
        .iter()
        .filter(|o| matches!(o, IndexOutcome::Created { .. }))
        .count();
    assert_eq!(created, 1);
    assert_eq!(services.store.list().unwrap()[0].chunks, 10);
}
