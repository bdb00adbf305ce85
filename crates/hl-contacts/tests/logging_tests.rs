//! Diagnostics emitted by the resolver

mod support;

use hl_contacts::{
    CancellationToken, ContactsApi, ContactsUtil, HighLevelConfig, SearchContactsRequest,
    UpdateContactRequest, UpsertContactRequest,
};
use support::{FakeProvider, FakeTransport, capture_logs};

fn resolver(log_enabled: bool) -> ContactsUtil {
    let provider = FakeProvider::new(FakeTransport::new());
    ContactsUtil::new(provider, &HighLevelConfig::default().with_log_enabled(log_enabled))
}

#[tokio::test]
async fn test_delete_logs_at_warn() {
    let (logs, _guard) = capture_logs();
    let util = resolver(true);

    util.delete("pit-1", "c-42", &CancellationToken::new())
        .await
        .unwrap();

    let lines = logs.resolver_lines();
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].contains("WARN"));
    assert!(lines[0].contains("Deleting contact (c-42)"));
}

#[tokio::test]
async fn test_other_operations_log_at_debug() {
    let (logs, _guard) = capture_logs();
    let util = resolver(true);
    let cancel = CancellationToken::new();

    let mut upsert = UpsertContactRequest::new("loc-1").with_email("Jane@Example.com");
    util.upsert("pit-1", &mut upsert, &cancel).await.unwrap();
    util.search("pit-1", &SearchContactsRequest::default(), &cancel)
        .await
        .unwrap();
    util.get_by_id("pit-1", "c-42", &cancel).await.unwrap();
    util.get_by_email("pit-1", "Jane@Example.com", "loc-1", &cancel)
        .await
        .unwrap();
    util.update("pit-1", "c-42", &mut UpdateContactRequest::default(), &cancel)
        .await
        .unwrap();

    let lines = logs.resolver_lines();
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(line.contains("DEBUG"), "unexpected severity: {}", line);
        assert!(!line.contains("WARN"), "unexpected severity: {}", line);
    }
}

#[tokio::test]
async fn test_upsert_logs_normalized_email_and_location() {
    let (logs, _guard) = capture_logs();
    let util = resolver(true);

    let mut upsert = UpsertContactRequest::new("loc-1")
        .with_email("Jane@Example.com")
        .with_phone("+1 555 0100");
    util.upsert("pit-1", &mut upsert, &CancellationToken::new())
        .await
        .unwrap();

    let lines = logs.resolver_lines();
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].contains("jane@example.com"));
    assert!(lines[0].contains("loc-1"));
    assert!(!lines[0].contains("Jane@Example.com"));
    assert!(!lines[0].contains("555"));
}

#[tokio::test]
async fn test_get_by_email_logs_normalized_email() {
    let (logs, _guard) = capture_logs();
    let util = resolver(true);

    util.get_by_email("pit-1", "Jane@Example.com", "loc-9", &CancellationToken::new())
        .await
        .unwrap();

    let contents = logs.resolver_lines().join("\n");
    assert!(contents.contains("email (jane@example.com) in location (loc-9)"));
}

#[tokio::test]
async fn test_logging_disabled_is_silent() {
    let (logs, _guard) = capture_logs();
    let util = resolver(false);
    let cancel = CancellationToken::new();

    util.delete("pit-1", "c-42", &cancel).await.unwrap();
    util.get_by_id("pit-1", "c-42", &cancel).await.unwrap();
    util.get_by_email("pit-1", "jane@example.com", "loc-1", &cancel)
        .await
        .unwrap();

    assert!(logs.resolver_lines().is_empty(), "{}", logs.contents());
}
