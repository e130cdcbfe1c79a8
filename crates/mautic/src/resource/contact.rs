use crate::{
    model::send,
    record::{is_present, Id},
    Error, Json, Method, Model, Params, Record, RequestOptions, Result, Segment, SharedConnection,
    Tag,
};

use log::warn;

/// A contact (lead), `api/contacts`.
///
/// Anonymous visitors are contacts too; listings through
/// [`Model::scope`] leave them out.
#[derive(Debug, Clone)]
pub struct Contact {
    record: Record,
    tags: Vec<Tag>,
}

impl Contact {
    pub fn first_name(&self) -> Option<&str> {
        self.record.get_str("firstname")
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.record.set("firstname", first_name.into());
    }

    pub fn last_name(&self) -> Option<&str> {
        self.record.get_str("lastname")
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.record.set("lastname", last_name.into());
    }

    pub fn email(&self) -> Option<&str> {
        self.record.get_str("email")
    }

    /// `"{first name} {last name}"`, skipping missing parts.
    pub fn name(&self) -> String {
        let first = self.first_name().unwrap_or_default();
        let last = self.last_name().unwrap_or_default();
        format!("{} {}", first, last).trim().to_string()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Whether the contact opted out of email.
    pub fn is_dnc(&self) -> bool {
        self.record.get("doNotContact").is_some_and(is_present)
    }

    /// Adds the contact to the email do-not-contact list.
    pub async fn add_dnc(&mut self, comments: &str) -> Result<bool> {
        let mut body = Params::new();
        body.insert("comments".to_string(), Json::from(comments));
        self.dnc("add", body).await
    }

    /// Removes the contact from the email do-not-contact list.
    pub async fn remove_dnc(&mut self) -> Result<bool> {
        self.dnc("remove", Params::new()).await
    }

    async fn dnc(&mut self, action: &str, body: Params) -> Result<bool> {
        let id = self.require_id()?;
        let path = format!("api/contacts/{}/dnc/email/{}", id, action);
        let connection = self.record.connection().clone();

        match send(&connection, Method::Post, &path, RequestOptions::with_body(body)).await {
            Ok(_) => {
                self.record.clear_changes();
                self.record.set_errors(None);
            }
            Err(err) if err.is_validation() => {
                warn!("{} {}: {}", Method::Post, path, err);
                self.record.set_errors(err.errors().cloned());
            }
            Err(err) => return Err(err),
        }

        Ok(self.record.is_valid())
    }

    /// Segments the contact with `contact_id` belongs to.
    pub async fn segment_memberships(
        connection: &SharedConnection,
        contact_id: Id,
    ) -> Result<Vec<Segment>> {
        let path = format!("api/contacts/{}/segments", contact_id);
        let json = send(connection, Method::Get, &path, RequestOptions::new()).await?;
        let field_name = &Segment::names().field_name;

        match json.get(field_name) {
            Some(Json::Object(lists)) => Ok(lists
                .values()
                .map(|list| Segment::load(connection.clone(), Some(list)))
                .collect()),
            Some(Json::Array(lists)) => Ok(lists
                .iter()
                .map(|list| Segment::load(connection.clone(), Some(list)))
                .collect()),
            _ => Err(Error::invalid_response(format!(
                "missing `{}` member in response to GET {}",
                field_name, path
            ))),
        }
    }

    /// Segments this contact belongs to.
    pub async fn segments(&self) -> Result<Vec<Segment>> {
        let id = self.require_id()?;
        Self::segment_memberships(self.record.connection(), id).await
    }

    fn require_id(&self) -> Result<Id> {
        self.record
            .id()
            .ok_or_else(|| crate::err!("contact has no id"))
    }
}

impl Model for Contact {
    const NAME: &'static str = "Contact";

    fn from_record(record: Record) -> Self {
        Self {
            record,
            tags: vec![],
        }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn decode(&mut self, source: Option<&Json>) {
        self.record.assign(source);
        // Tags live on `self.tags`, never in the attributes.
        self.record.remove("tags");

        let Some(source) = source else {
            return;
        };

        self.tags = match source.get("tags") {
            Some(Json::Array(tags)) => tags
                .iter()
                .map(|tag| Tag::load(self.record.connection().clone(), Some(tag)))
                .collect(),
            _ => vec![],
        };

        let dnc = source.get("doNotContact").cloned().unwrap_or(Json::Null);
        self.record.set("doNotContact", dnc);
    }

    fn default_params() -> Params {
        let mut params = Params::new();
        params.insert("search".to_string(), Json::from("!is:anonymous"));
        params
    }
}
