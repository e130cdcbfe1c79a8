use mautic::{Contact, Error, Method, Model, Persist, Segment, Tag};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{params, MockConnection};

#[tokio::test]
async fn find_decodes_singular_member() {
    let mock = MockConnection::new();
    mock.reply(json!({
        "contact": {"id": 42, "fields": {"all": {"firstname": "Ann"}}}
    }));

    let contact = Contact::find(&mock.connection(), 42, params!()).await.unwrap();

    assert_eq!(contact.id(), Some(42));
    assert_eq!(contact.first_name(), Some("Ann"));
    assert_eq!(contact.get("firstname"), Some(&json!("Ann")));
    assert!(contact.changes().is_empty());

    let request = mock.log().last().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "api/contacts/42");
    assert_eq!(request.params(), Some(&params!()));
}

#[tokio::test]
async fn find_passes_query_params() {
    let mock = MockConnection::new();
    mock.reply(json!({"tag": {"id": 3, "tag": "vip"}}));

    let tag = Tag::find(&mock.connection(), 3, params!("minimal": true))
        .await
        .unwrap();

    assert_eq!(tag.tag(), Some("vip"));
    assert_eq!(
        mock.log().last().unwrap().params(),
        Some(&params!("minimal": true))
    );
}

#[tokio::test]
async fn find_validation_error_propagates() {
    let mock = MockConnection::new();
    mock.fail(Error::validation(
        Some(400),
        json!([{"code": 400, "message": "id: invalid"}]),
    ));

    let err = Contact::find(&mock.connection(), 7, params!()).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.errors(), Some(&json!([{"code": 400, "message": "id: invalid"}])));
}

#[tokio::test]
async fn find_missing_member_is_invalid_response() {
    let mock = MockConnection::new();
    mock.reply(json!({"contacts": {}}));

    let err = Contact::find(&mock.connection(), 1, params!()).await.unwrap_err();

    assert!(err.is_invalid_response());
    assert_eq!(err.to_string(), "invalid response: missing `contact` member");
}

#[tokio::test]
async fn all_preserves_response_order() {
    let mock = MockConnection::new();
    mock.reply(json!({
        "total": "3",
        "contacts": {
            "9": {"id": 9, "fields": {"all": {"firstname": "Cid"}}},
            "2": {"id": 2, "fields": {"all": {"firstname": "Bea"}}},
            "5": {"id": 5, "fields": {"all": {"firstname": "Al"}}},
        }
    }));

    let contacts = Contact::all(&mock.connection(), params!("limit": 3))
        .await
        .unwrap();

    let ids: Vec<_> = contacts.iter().map(|contact| contact.id()).collect();
    assert_eq!(ids, vec![Some(9), Some(2), Some(5)]);
    assert!(contacts.iter().all(|contact| contact.changes().is_empty()));

    let request = mock.log().last().unwrap();
    assert_eq!(request.path, "api/contacts");
    assert_eq!(request.params(), Some(&params!("limit": 3)));
}

#[tokio::test]
async fn all_accepts_empty_list() {
    let mock = MockConnection::new();
    mock.reply(json!({"total": 0, "tags": []}));

    let tags = Tag::all(&mock.connection(), params!()).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn all_uses_overridden_field_name() {
    let mock = MockConnection::new();
    mock.reply(json!({
        "total": 1,
        "lists": {"4": {"id": 4, "name": "Newsletter", "alias": "newsletter"}}
    }));

    let segments = Segment::all(&mock.connection(), params!()).await.unwrap();

    assert_eq!(mock.log().last().unwrap().path, "api/segments");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].name(), Some("Newsletter"));
    assert_eq!(segments[0].alias(), Some("newsletter"));
}

#[tokio::test]
async fn request_error_propagates_from_all() {
    let mock = MockConnection::new();
    mock.fail(Error::request_failed(Some(500), "Internal Server Error", None));

    let err = Contact::all(&mock.connection(), params!()).await.unwrap_err();
    assert!(err.is_request());
    assert!(!err.is_validation());
}

#[tokio::test]
async fn create_with_posts_params() {
    let mock = MockConnection::new();
    mock.reply(json!({
        "contact": {"id": 11, "fields": {"all": {"id": 11, "email": "ann@example.com"}}}
    }));

    let contact = Contact::create_with(&mock.connection(), params!("email": "ann@example.com"))
        .await
        .unwrap();

    assert_eq!(contact.id(), Some(11));
    assert!(contact.changes().is_empty());

    let request = mock.log().last().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "api/contacts/new");
    assert_eq!(request.body(), Some(&params!("email": "ann@example.com")));
}

#[tokio::test]
async fn create_with_validation_error_propagates() {
    let mock = MockConnection::new();
    mock.fail(Error::validation(Some(422), json!({"email": ["required"]})));

    let err = Contact::create_with(&mock.connection(), params!())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
