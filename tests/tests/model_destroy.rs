use mautic::{Contact, Error, Method, Model, Persist};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::MockConnection;

fn persisted(mock: &std::sync::Arc<MockConnection>) -> Contact {
    Contact::load(mock.connection(), Some(&json!({"id": 42, "fields": {"all": {"id": 42}}})))
}

#[tokio::test]
async fn destroy_deletes() {
    let mock = MockConnection::new();
    mock.reply(json!({"contact": {"id": 42}}));

    let mut contact = persisted(&mock);
    assert!(contact.destroy().await.unwrap());

    assert_eq!(
        mock.log().calls(),
        vec![(Method::Delete, "api/contacts/42/delete".to_string())]
    );
    assert!(contact.errors().is_none());
}

#[tokio::test]
async fn destroy_captures_request_errors() {
    let mock = MockConnection::new();
    let payload = json!([{"code": 404, "message": "Item was not found."}]);
    mock.fail(Error::request_failed(Some(404), "Item was not found.", Some(payload.clone())));

    let mut contact = persisted(&mock);
    assert!(!contact.destroy().await.unwrap());
    assert_eq!(contact.errors(), Some(&payload));
}

#[tokio::test]
async fn destroy_captures_errors_without_payload() {
    let mock = MockConnection::new();
    mock.fail(Error::request_failed(Some(500), "Internal Server Error", None));

    let mut contact = persisted(&mock);
    assert!(!contact.destroy().await.unwrap());
    assert_eq!(
        contact.errors(),
        Some(&json!([{"code": 500, "message": "request failed (500): Internal Server Error"}]))
    );
}

#[tokio::test]
async fn destroy_captures_validation_errors() {
    let mock = MockConnection::new();
    mock.fail(Error::validation(Some(400), json!({"message": "locked"})));

    let mut contact = persisted(&mock);
    assert!(!contact.destroy().await.unwrap());
    assert_eq!(contact.errors(), Some(&json!({"message": "locked"})));
}

#[tokio::test]
async fn destroy_without_id_fails_before_request() {
    let mock = MockConnection::new();

    let mut contact = Contact::build(&mock.connection());
    let err = contact.destroy().await.unwrap_err();

    assert_eq!(err.to_string(), "cannot destroy Contact without an id");
    assert!(mock.log().is_empty());
}

#[tokio::test]
async fn destroy_keeps_referenced_tags() {
    let mock = MockConnection::new();
    mock.reply(json!({}));

    let mut contact = Contact::load(
        mock.connection(),
        Some(&json!({"id": 42, "fields": {"all": {"id": 42}}, "tags": [{"id": 1, "tag": "vip"}]})),
    );
    let tags = contact.tags().to_vec();

    assert!(contact.destroy().await.unwrap());
    assert_eq!(tags[0].tag(), Some("vip"));
    assert_eq!(mock.log().len(), 1);
}
