mod field;
pub use field::FieldDescriptor;

mod table;
pub use table::AttributeTable;

use crate::{Json, Params, SharedConnection};

use chrono::{DateTime, NaiveDateTime, Utc};

use std::fmt;

/// Identifier of a persisted resource.
pub type Id = i64;

/// State shared by every resource type: the connection it was fetched
/// through, its attributes, and the outcome of the last mutation.
#[derive(Clone)]
pub struct Record {
    connection: SharedConnection,
    table: AttributeTable,
    fields: Vec<FieldDescriptor>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    errors: Option<Json>,
}

impl Record {
    /// A record with no attributes.
    pub fn blank(connection: SharedConnection) -> Self {
        Self {
            connection,
            table: AttributeTable::new(),
            fields: vec![],
            created_at: None,
            updated_at: None,
            errors: None,
        }
    }

    /// Decodes `payload` into a record with no pending changes.
    pub fn new(connection: SharedConnection, payload: Option<&Json>) -> Self {
        let mut record = Self::blank(connection);
        record.assign(payload);
        record.clear_changes();
        record
    }

    /// Replaces identity and attributes with the ones decoded from `source`.
    ///
    /// The previous attribute table is discarded, not merged into. Assigned
    /// keys are marked as changed; callers checkpoint with
    /// [`clear_changes`](Self::clear_changes).
    pub fn assign(&mut self, source: Option<&Json>) {
        let decoded = field::decode(source);
        let mut table = AttributeTable::new();

        if let Some(Json::Object(source)) = source {
            if let Some(id) = source.get("id") {
                table.set("id", id.clone());
            }
            self.created_at = source.get("dateAdded").and_then(parse_timestamp);
            self.updated_at = source.get("dateModified").and_then(parse_timestamp);
        } else {
            self.created_at = None;
            self.updated_at = None;
        }

        table.extend(decoded.data);
        self.table = table;
        self.fields = decoded.descriptors;
    }

    pub fn connection(&self) -> &SharedConnection {
        &self.connection
    }

    /// The resource id, once persisted. Numeric strings are accepted.
    pub fn id(&self) -> Option<Id> {
        match self.table.get("id")? {
            Json::Number(id) => id.as_i64(),
            Json::String(id) => id.trim().parse().ok(),
            _ => None,
        }
    }

    /// `{id}/{connection id}`, unique across Mautic instances.
    pub fn mautic_id(&self) -> String {
        let id = self.id().map(|id| id.to_string()).unwrap_or_default();
        format!("{}/{}", id, self.connection.id().unwrap_or_default())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn get(&self, name: &str) -> Option<&Json> {
        self.table.get(name)
    }

    /// String value of an attribute; `None` for other JSON types.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.table.get(name).and_then(Json::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Json>) {
        self.table.set(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Json> {
        self.table.remove(name)
    }

    pub fn attributes(&self) -> &Params {
        self.table.to_map()
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    pub fn changes(&self) -> Params {
        self.table.changes()
    }

    pub fn has_changes(&self) -> bool {
        self.table.has_changes()
    }

    pub fn clear_changes(&mut self) {
        self.table.clear();
    }

    /// Field descriptors built by the last decode.
    pub fn field_descriptors(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Error payload captured by the last failed mutation.
    pub fn errors(&self) -> Option<&Json> {
        self.errors.as_ref()
    }

    pub fn set_errors(&mut self, errors: Option<Json>) {
        self.errors = errors;
    }

    /// `true` unless the last mutation captured an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id())
            .field("attributes", self.table.to_map())
            .field("changes", &self.table.changes())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Whether an attribute value carries content worth sending.
///
/// `null`, `false`, blank strings and empty collections are not present.
pub fn is_present(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(value) => *value,
        Json::String(value) => !value.trim().is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
        Json::Number(_) => true,
    }
}

/// Parses an API timestamp. Mautic emits RFC 3339, older releases a naive
/// `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(value: &Json) -> Option<DateTime<Utc>> {
    let value = value.as_str()?.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
