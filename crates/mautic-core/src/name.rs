use heck::ToSnakeCase;

/// A type or resource name split into its snake case parts.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    /// Builds a name from a type name. Any module path (`mautic::Contact`)
    /// is dropped first.
    pub fn new(src: &str) -> Self {
        let simple = src.rsplit("::").next().unwrap_or(src);
        let snake = simple.to_snake_case();
        let parts = snake
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    /// The snake case name with its last part pluralized.
    pub fn plural(&self) -> String {
        self.map_last(pluralize)
    }

    /// The snake case name with its last part singularized.
    pub fn singular(&self) -> String {
        self.map_last(singularize)
    }

    fn map_last(&self, f: impl FnOnce(&str) -> String) -> String {
        match self.parts.split_last() {
            Some((last, init)) => {
                let mut parts = init.to_vec();
                parts.push(f(last));
                parts.join("_")
            }
            None => String::new(),
        }
    }
}

pub fn pluralize(word: &str) -> String {
    pluralizer::pluralize(word, 2, false)
}

pub fn singularize(word: &str) -> String {
    pluralizer::pluralize(word, 1, false)
}

/// The path and JSON member names a resource is exchanged under.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Names {
    /// REST path segment of the collection, `api/{endpoint}`.
    pub endpoint: String,

    /// JSON member wrapping a listing response.
    pub field_name: String,

    /// JSON member wrapping a single resource.
    pub item_name: String,
}

impl Names {
    /// Derives names from a type name: `Contact` is served from
    /// `api/contacts`, listed under `contacts` and returned under `contact`.
    pub fn from_type_name(type_name: &str) -> Self {
        let plural = Name::new(type_name).plural();
        Self {
            endpoint: plural.clone(),
            item_name: singularize(&plural),
            field_name: plural,
        }
    }

    /// Overrides the endpoint. JSON member names follow it unless they were
    /// overridden with [`Names::with_field_name`].
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        if self.field_name == self.endpoint {
            self = self.with_field_name(endpoint.clone());
        }
        self.endpoint = endpoint;
        self
    }

    /// Overrides the JSON member names. The item name is the singular of the
    /// given field name.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self.item_name = singularize(&self.field_name);
        self
    }
}
