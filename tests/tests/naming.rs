use mautic::{Contact, Model, Names, Persist, Record, Segment, Tag};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{params, MockConnection};

/// A resource type defined outside the crate.
#[derive(Debug)]
struct ContactNote {
    record: Record,
}

impl Model for ContactNote {
    const NAME: &'static str = "ContactNote";

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

#[test]
fn names_derive_from_type_name() {
    assert_eq!(Contact::names().endpoint, "contacts");
    assert_eq!(Contact::names().item_name, "contact");
    assert_eq!(Tag::names().field_name, "tags");
    assert_eq!(ContactNote::names().endpoint, "contact_notes");
    assert_eq!(ContactNote::names().item_name, "contact_note");
}

#[test]
fn names_are_memoized() {
    assert!(std::ptr::eq(Contact::names(), Contact::names()));
    assert_eq!(
        Segment::names(),
        &Names::from_type_name("Segment").with_field_name("lists")
    );
}

#[tokio::test]
async fn custom_model_round_trip() {
    let mock = MockConnection::new();
    mock.reply(json!({"contact_note": {"id": 1, "text": "hello"}}));

    let mut note = ContactNote::build(&mock.connection());
    note.set("text", "hello");

    assert!(note.save(false).await.unwrap());
    assert_eq!(mock.log().last().unwrap().path, "api/contact_notes/new");
    assert_eq!(mock.log().last().unwrap().body(), Some(&params!("text": "hello")));
    assert_eq!(note.id(), Some(1));
}

/// Served from `api/orgs` instead of `api/companies`.
#[derive(Debug)]
struct Company {
    record: Record,
}

impl Model for Company {
    const NAME: &'static str = "Company";

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn derive_names() -> Names {
        Names::from_type_name(Self::NAME).with_endpoint("orgs")
    }
}

#[tokio::test]
async fn endpoint_override_renames_members() {
    let mock = MockConnection::new();
    mock.reply(json!({"orgs": {"5": {"id": 5, "companyname": "Acme"}}}));
    mock.reply(json!({"org": {"id": 5, "companyname": "Acme"}}));

    let companies = Company::all(&mock.connection(), params!()).await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(mock.log().last().unwrap().path, "api/orgs");

    let company = Company::find(&mock.connection(), 5, params!()).await.unwrap();
    assert_eq!(company.get("companyname"), Some(&json!("Acme")));
    assert_eq!(mock.log().last().unwrap().path, "api/orgs/5");
}
