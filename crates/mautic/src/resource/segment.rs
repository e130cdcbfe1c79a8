use crate::{Model, Names, Record};

/// A contact segment. Segments are served from `api/segments` but wrapped
/// in `lists` / `list` members.
#[derive(Debug, Clone)]
pub struct Segment {
    record: Record,
}

impl Segment {
    pub fn name(&self) -> Option<&str> {
        self.record.get_str("name")
    }

    pub fn alias(&self) -> Option<&str> {
        self.record.get_str("alias")
    }

    pub fn is_published(&self) -> bool {
        self.record
            .get("isPublished")
            .is_some_and(crate::record::is_present)
    }
}

impl Model for Segment {
    const NAME: &'static str = "Segment";

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
        Names::from_type_name(Self::NAME).with_field_name("lists")
    }
}
