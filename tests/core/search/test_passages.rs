// End-to-end passage search tests

use crate::common::{create_test_services, lettered_document};
use passage::core::config::Config;
use passage::core::services::Services;
use passage::core::types::Collection;
use tempfile::TempDir;

fn indexed(sentences: usize) -> (Services, Collection, TempDir) {
    let (services, temp) = create_test_services();
    let outcome = services
        .indexer
        .index("letters", "letters.txt", lettered_document(sentences).as_bytes())
        .unwrap();
    let collection = outcome.collection().clone();
    (services, collection, temp)
}

#[test]
fn test_hit_expands_one_before_three_after() {
    let (services, collection, _temp) = indexed(20);

    let response = services.search.search(&collection, "w10", None).unwrap();

    assert_eq!(response.passages, vec!["w9.w10.w11.w12.w13"]);
    assert_eq!(response.hits, 1);
}

#[test]
fn test_window_clipped_at_document_start() {
    let (services, collection, _temp) = indexed(20);

    let response = services.search.search(&collection, "w0", None).unwrap();
    assert_eq!(response.passages, vec!["w0.w1.w2.w3"]);
}

#[test]
fn test_window_clipped_at_document_end() {
    let (services, collection, _temp) = indexed(20);

    let response = services.search.search(&collection, "w19", None).unwrap();
    assert_eq!(response.passages, vec!["w18.w19"]);
}

#[test]
fn test_overlapping_windows_become_one_passage() {
    let (services, collection, _temp) = indexed(20);

    let response = services.search.search(&collection, "w5. w7", None).unwrap();
    assert_eq!(response.passages, vec!["w4.w5.w6.w7.w8.w9.w10"]);
}

#[test]
fn test_passages_follow_document_order() {
    let (services, collection, _temp) = indexed(30);

    // Query order does not matter
    let response = services.search.search(&collection, "w20. w2", None).unwrap();
    assert_eq!(
        response.passages,
        vec!["w1.w2.w3.w4.w5", "w19.w20.w21.w22.w23"]
    );
}

#[test]
fn test_adjacent_windows_merge_without_gap() {
    let (services, collection, _temp) = indexed(30);

    // Windows 1..=5 and 6..=10 touch, so they form one run
    let response = services.search.search(&collection, "w2.w7", None).unwrap();
    assert_eq!(
        response.passages,
        vec!["w1.w2.w3.w4.w5.w6.w7.w8.w9.w10"]
    );
}

#[test]
fn test_unmatched_query_returns_nothing() {
    let (services, collection, _temp) = indexed(10);

    let response = services
        .search
        .search(&collection, "nothing here matches", None)
        .unwrap();
    assert!(response.passages.is_empty());
}

#[test]
fn test_custom_window_from_config() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = temp.path().to_path_buf();
    config.search.window_before = 3;
    config.search.window_after = 3;
    let services = Services::new(config).unwrap();

    let outcome = services
        .indexer
        .index("letters", "letters.txt", lettered_document(20).as_bytes())
        .unwrap();
    let response = services
        .search
        .search(outcome.collection(), "w10", None)
        .unwrap();

    assert_eq!(response.passages, vec!["w7.w8.w9.w10.w11.w12.w13"]);
}

#[test]
fn test_collection_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = temp.path().to_path_buf();

    {
        let services = Services::new(config.clone()).unwrap();
        services
            .indexer
            .index("letters", "letters.txt", lettered_document(12).as_bytes())
            .unwrap();
    }

    let services = Services::new(config).unwrap();
    let collection = services.store.get("letters").unwrap();
    let response = services.search.search(&collection, "w6", None).unwrap();

    assert_eq!(response.passages, vec!["w5.w6.w7.w8.w9"]);
}
