use crate::{Json, Params};

/// One custom field of a resource, as delivered in the `fields` member.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Real field name.
    pub alias: String,

    pub value: Json,

    /// Display label, when the API sent one.
    pub label: Option<String>,

    /// Field group (`core`, `social`, ...), when the API grouped fields.
    pub group: Option<String>,
}

impl FieldDescriptor {
    pub fn new(alias: impl Into<String>, value: Json) -> Self {
        Self {
            alias: alias.into(),
            value,
            label: None,
            group: None,
        }
    }

    /// Builds a descriptor from one entry of a grouped field listing. The
    /// entry key is used when the attributes carry no alias.
    fn from_attrs(key: &str, group: &str, attrs: &Params) -> Self {
        let alias = match attrs.get("alias") {
            Some(Json::String(alias)) => alias.clone(),
            _ => key.to_string(),
        };

        Self {
            alias,
            value: attrs.get("value").cloned().unwrap_or(Json::Null),
            label: attrs
                .get("label")
                .and_then(Json::as_str)
                .map(String::from),
            group: Some(group.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.alias
    }
}

/// Flat attribute data decoded from a resource payload.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Decoded {
    pub(crate) data: Params,
    pub(crate) descriptors: Vec<FieldDescriptor>,
}

/// Flattens a resource payload into attribute data.
///
/// Payloads carry fields either flattened under `fields.all` or grouped by
/// category under `fields.<group>.<key> = {alias, value, ..}`. Both shapes
/// yield the same mapping. A payload without a `fields` member is used as is.
pub(crate) fn decode(source: Option<&Json>) -> Decoded {
    let Some(Json::Object(source)) = source else {
        return Decoded::default();
    };

    let fields = match source.get("fields") {
        Some(Json::Object(fields)) => fields,
        // `fields: []` is how the API serializes an empty field set.
        Some(_) => return Decoded::default(),
        None => {
            return Decoded {
                data: source.clone(),
                descriptors: vec![],
            }
        }
    };

    let mut decoded = Decoded::default();

    if let Some(Json::Object(all)) = fields.get("all") {
        for (key, value) in all {
            decoded.data.insert(key.clone(), value.clone());
            decoded
                .descriptors
                .push(FieldDescriptor::new(key.clone(), value.clone()));
        }
        return decoded;
    }

    for (group, pairs) in fields {
        // Groups are expected to be objects; anything else is skipped.
        let Json::Object(pairs) = pairs else {
            continue;
        };

        for (key, attrs) in pairs {
            let Json::Object(attrs) = attrs else {
                continue;
            };

            let descriptor = FieldDescriptor::from_attrs(key, group, attrs);
            decoded
                .data
                .insert(descriptor.alias.clone(), descriptor.value.clone());
            decoded.descriptors.push(descriptor);
        }
    }

    decoded
}
