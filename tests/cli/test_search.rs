//! Tests for the search CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::{lettered_document, FACTS};
use passage::cli::commands::search::{execute, SearchArgs};
use passage::cli::OutputFormat;

fn args(query: &str, collection: Option<&str>) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        k: None,
        collection: collection.map(str::to_string),
    }
}

#[tokio::test]
async fn test_search_active_collection() {
    let fixture = CliFixture::new();
    fixture
        .router
        .index("facts", "facts.txt", FACTS.as_bytes())
        .unwrap();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(
            args("honey", None),
            &fixture.router,
            &fixture.services,
            format,
        )
        .await;
        assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
    }
}

#[tokio::test]
async fn test_search_named_collection() {
    let fixture = CliFixture::new();
    fixture
        .router
        .index("letters", "letters.txt", lettered_document(10).as_bytes())
        .unwrap();
    fixture
        .router
        .index("facts", "facts.txt", FACTS.as_bytes())
        .unwrap();

    let result = execute(
        args("w3", Some("letters")),
        &fixture.router,
        &fixture.services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok());
    // Searching by name leaves the selection alone
    assert_eq!(fixture.router.active(), "facts");
}

#[tokio::test]
async fn test_search_unknown_collection_suggests_list() {
    let fixture = CliFixture::new();

    let err = execute(
        args("anything", Some("ghost")),
        &fixture.router,
        &fixture.services,
        OutputFormat::Human,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("passage list"));
}

#[tokio::test]
async fn test_search_blank_query_rejected() {
    let fixture = CliFixture::new();

    let err = execute(
        args("  ", None),
        &fixture.router,
        &fixture.services,
        OutputFormat::Human,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Invalid query"));
}

#[tokio::test]
async fn test_search_with_nothing_indexed() {
    let fixture = CliFixture::new();

    let result = execute(
        args("anything", None),
        &fixture.router,
        &fixture.services,
        OutputFormat::Human,
    )
    .await;
    assert!(result.is_ok());
}
