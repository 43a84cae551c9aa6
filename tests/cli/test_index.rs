//! Tests for the index CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::{TestDoc, FACTS};
use passage::cli::commands::index::{execute, IndexArgs};
use passage::cli::OutputFormat;

#[tokio::test]
async fn test_index_file_selects_collection() {
    let fixture = CliFixture::new();
    let doc = TestDoc::new("facts.txt", FACTS.as_bytes());

    let args = IndexArgs {
        file: doc.path().to_path_buf(),
        name: None,
    };
    let result = execute(args, &fixture.router, OutputFormat::Human).await;
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());

    assert_eq!(fixture.router.active(), "factstxt");
    // The selection outlives this invocation
    assert_eq!(fixture.next_invocation().active(), "factstxt");
}

#[tokio::test]
async fn test_index_with_name_json() {
    let fixture = CliFixture::new();
    let doc = TestDoc::new("facts.txt", FACTS.as_bytes());

    let args = IndexArgs {
        file: doc.path().to_path_buf(),
        name: Some("science".to_string()),
    };
    execute(args, &fixture.router, OutputFormat::Json)
        .await
        .unwrap();

    let listed = fixture.router.list().unwrap();
    assert_eq!(listed.collections[0].name, "science");
}

#[tokio::test]
async fn test_index_twice_succeeds() {
    let fixture = CliFixture::new();
    let doc = TestDoc::new("facts.txt", FACTS.as_bytes());

    for _ in 0..2 {
        let args = IndexArgs {
            file: doc.path().to_path_buf(),
            name: None,
        };
        assert!(execute(args, &fixture.router, OutputFormat::Human)
            .await
            .is_ok());
    }
    assert_eq!(fixture.router.list().unwrap().collections.len(), 1);
}

#[tokio::test]
async fn test_index_missing_file() {
    let fixture = CliFixture::new();

    let args = IndexArgs {
        file: fixture.temp.path().join("nope.txt"),
        name: None,
    };
    let err = execute(args, &fixture.router, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Cannot read"));
}

#[tokio::test]
async fn test_index_empty_document_fails() {
    let fixture = CliFixture::new();
    let doc = TestDoc::new("empty.txt", b"");

    let args = IndexArgs {
        file: doc.path().to_path_buf(),
        name: None,
    };
    let err = execute(args, &fixture.router, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Empty document"));
    assert_eq!(fixture.router.active(), "alldocs");
}
