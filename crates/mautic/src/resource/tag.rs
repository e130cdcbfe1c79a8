use crate::{Model, Record};

/// A contact tag, `api/tags`.
#[derive(Debug, Clone)]
pub struct Tag {
    record: Record,
}

impl Tag {
    pub fn tag(&self) -> Option<&str> {
        self.record.get_str("tag")
    }
}

impl Model for Tag {
    const NAME: &'static str = "Tag";

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
