//! Integration tests for immediate dispatch through the fluent builder
//!
//! These tests drive the public client API against a recording transport
//! and check the exact commands issued and the handles returned.

mod common;

use common::{bulk, RecordingTransport};
use rdcmd::{Args, Client, CommandFamily, RdCmdError, RespValue, SubCommand};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn users() -> CommandFamily {
    CommandFamily::new("user:{{id}}")
        .with_command("GET", SubCommand::new(""))
        .with_command("HGETALL", SubCommand::new("").preserve_not_found())
        .with_command(
            "SETEX",
            SubCommand::new("{{ttl}} {{val}}")
                .default_param("ttl", 300)
                .default_param("val", "x"),
        )
        .with_command(
            "TOUCH",
            SubCommand::new("{{val}}")
                .command_name("SET")
                .expire_after(Duration::from_secs(30)),
        )
}

fn client_with(transport: RecordingTransport) -> (Client, Arc<RecordingTransport>) {
    let transport = Arc::new(transport);
    (Client::from_arc(transport.clone()), transport)
}

#[tokio::test]
async fn test_get_by_id() {
    let (client, transport) =
        client_with(RecordingTransport::new().with_reply(Ok(bulk("alice"))));
    let family = users();

    let name = client.cmd(&family, "GET").arg("id", 7).string().await;

    assert_eq!(transport.commands(), vec![vec!["GET", "user:7"]]);
    assert_eq!(name.result(), Ok("alice".to_string()));
}

#[tokio::test]
async fn test_defaults_fill_missing_arguments() {
    let (client, transport) = client_with(RecordingTransport::new());
    let family = users();

    client
        .cmd(&family, "SETEX")
        .arg("id", 1)
        .arg("ttl", 60)
        .boolean()
        .await;

    assert_eq!(transport.commands(), vec![vec!["SETEX", "user:1", "60", "x"]]);
}

#[tokio::test]
async fn test_caller_arguments_are_not_modified() {
    let (client, _transport) = client_with(RecordingTransport::new());
    let family = users();
    let args = Args::new().with("id", 3);

    client.cmd(&family, "SETEX").args(args.clone()).boolean().await;

    assert_eq!(args.len(), 1);
    assert!(!args.contains("val"));
}

#[tokio::test]
async fn test_expire_issued_once_after_success() {
    let (client, transport) = client_with(RecordingTransport::new());
    let family = users();

    let ok = client
        .cmd(&family, "TOUCH")
        .arg("id", 5)
        .arg("val", "v")
        .boolean()
        .await;

    assert_eq!(ok.result(), Ok(true));
    assert_eq!(transport.commands(), vec![vec!["SET", "user:5", "v"]]);
    assert_eq!(
        transport.expires(),
        vec![("user:5".to_string(), Duration::from_secs(30))]
    );
}

#[tokio::test]
async fn test_expire_issued_once_after_failure() {
    let (client, transport) = client_with(RecordingTransport::new().with_reply(Err(
        RdCmdError::TimeoutError {
            message: "read timed out".to_string(),
        },
    )));
    let family = users();

    let ok = client
        .cmd(&family, "TOUCH")
        .arg("id", 5)
        .arg("val", "v")
        .boolean()
        .await;

    assert!(matches!(ok.err(), Some(RdCmdError::TimeoutError { .. })));
    assert_eq!(transport.expires().len(), 1);
}

#[tokio::test]
#[tracing_test::traced_test]
async fn test_expire_failure_leaves_primary_untouched() {
    let (client, transport) = client_with(RecordingTransport::new().with_failing_expire());
    let family = users();

    let ok = client
        .cmd(&family, "TOUCH")
        .arg("id", 8)
        .arg("val", "v")
        .boolean()
        .await;

    assert_eq!(ok.result(), Ok(true));
    assert_eq!(transport.expires().len(), 1);
    assert!(logs_contain("auxiliary expire failed"));
}

#[tokio::test]
async fn test_ttl_is_evaluated_per_invocation() {
    let counter = Arc::new(AtomicU64::new(10));
    let ttl_source = counter.clone();
    let family = CommandFamily::new("lock:{{name}}").with_command(
        "SET",
        SubCommand::new("1").expire_with(move || {
            Duration::from_secs(ttl_source.fetch_add(10, Ordering::SeqCst))
        }),
    );
    let (client, transport) = client_with(RecordingTransport::new());

    client.cmd(&family, "SET").arg("name", "a").boolean().await;
    client.cmd(&family, "SET").arg("name", "b").boolean().await;

    assert_eq!(
        transport.expires(),
        vec![
            ("lock:a".to_string(), Duration::from_secs(10)),
            ("lock:b".to_string(), Duration::from_secs(20)),
        ]
    );
}

#[tokio::test]
async fn test_not_found_is_cleared_by_default() {
    let (client, _transport) =
        client_with(RecordingTransport::new().with_reply(Ok(RespValue::BulkString(None))));
    let family = users();

    let name = client.cmd(&family, "GET").arg("id", 404).string().await;

    assert!(name.err().is_none());
    assert_eq!(name.val(), "");
}

#[tokio::test]
async fn test_not_found_is_preserved_when_declared() {
    let (client, _transport) =
        client_with(RecordingTransport::new().with_reply(Ok(RespValue::Nil)));
    let family = users();

    let profile = client
        .cmd(&family, "HGETALL")
        .arg("id", 404)
        .map_string_string()
        .await;

    assert_eq!(profile.err(), Some(&RdCmdError::NotFound));
    assert!(profile.val().is_empty());
}

#[tokio::test]
async fn test_reading_a_handle_never_reissues() {
    let (client, transport) =
        client_with(RecordingTransport::new().with_reply(Ok(RespValue::Integer(1))));
    let family = users();

    let mut builder = client.cmd(&family, "GET").arg("id", 1);
    let first = builder.int().await;
    let second = builder.int().await;
    for _ in 0..3 {
        first.val();
        first.err();
        second.result().unwrap();
    }
    builder.err().await;
    builder.val().await;

    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_mismatched_accessor_reports_error() {
    let (client, transport) =
        client_with(RecordingTransport::new().with_reply(Ok(RespValue::Integer(1))));
    let family = users();

    let mut builder = client.cmd(&family, "GET").arg("id", 1);
    assert_eq!(builder.int().await.val(), 1);

    let as_text = builder.string().await;
    assert!(matches!(
        as_text.result(),
        Err(RdCmdError::ShapeMismatch { .. })
    ));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_server_error_surfaces_on_handle() {
    let (client, _transport) = client_with(
        RecordingTransport::new()
            .with_reply(Ok(RespValue::Error("WRONGTYPE Operation".to_string()))),
    );
    let family = users();

    let name = client.cmd(&family, "GET").arg("id", 1).string().await;
    assert_eq!(
        name.err(),
        Some(&RdCmdError::Server {
            message: "WRONGTYPE Operation".to_string()
        })
    );
}

#[tokio::test]
#[should_panic(expected = "invalid command declaration")]
async fn test_unknown_operation_is_fatal() {
    let (client, _transport) = client_with(RecordingTransport::new());
    let family = users();
    client.cmd(&family, "LPUSH").arg("id", 1).int().await;
}
