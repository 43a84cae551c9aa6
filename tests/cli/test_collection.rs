//! Tests for the list, select and delete CLI commands

use crate::cli::test_helpers::CliFixture;
use crate::common::FACTS;
use passage::cli::commands::collection::{
    execute_delete, execute_list, execute_select, DeleteArgs, ListArgs, SelectArgs,
};
use passage::cli::OutputFormat;

#[tokio::test]
async fn test_list_empty_and_populated() {
    let fixture = CliFixture::new();

    assert!(execute_list(ListArgs {}, &fixture.router, OutputFormat::Human)
        .await
        .is_ok());

    fixture
        .router
        .index("facts", "facts.txt", FACTS.as_bytes())
        .unwrap();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        assert!(execute_list(ListArgs {}, &fixture.router, format)
            .await
            .is_ok());
    }
}

#[tokio::test]
async fn test_select_persists_across_invocations() {
    let fixture = CliFixture::new();
    fixture
        .router
        .index("first", "a.txt", FACTS.as_bytes())
        .unwrap();
    fixture
        .router
        .index("second", "b.txt", FACTS.as_bytes())
        .unwrap();

    let args = SelectArgs {
        name: "first".to_string(),
    };
    execute_select(args, &fixture.router, OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(fixture.next_invocation().active(), "first");
}

#[tokio::test]
async fn test_select_unknown_fails() {
    let fixture = CliFixture::new();

    let args = SelectArgs {
        name: "ghost".to_string(),
    };
    let err = execute_select(args, &fixture.router, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not found"));
    assert!(err.to_string().contains("passage list"));
}

#[tokio::test]
async fn test_delete_with_force() {
    let fixture = CliFixture::new();
    fixture
        .router
        .index("doomed", "doomed.txt", FACTS.as_bytes())
        .unwrap();

    let args = DeleteArgs {
        name: "doomed".to_string(),
        force: true,
    };
    execute_delete(args, &fixture.router, OutputFormat::Human)
        .await
        .unwrap();

    assert!(fixture.router.list().unwrap().collections.is_empty());
    assert_eq!(fixture.next_invocation().active(), "alldocs");
}

#[tokio::test]
async fn test_delete_unknown_fails() {
    let fixture = CliFixture::new();

    let args = DeleteArgs {
        name: "ghost".to_string(),
        force: true,
    };
    assert!(execute_delete(args, &fixture.router, OutputFormat::Json)
        .await
        .is_err());
}
