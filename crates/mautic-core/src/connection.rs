use crate::{async_trait, Json, Params, Result};

use std::{fmt, sync::Arc};

/// HTTP verbs used by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters and JSON body of a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub params: Option<Params>,
    pub body: Option<Params>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            params: Some(params),
            body: None,
        }
    }

    pub fn with_body(body: Params) -> Self {
        Self {
            params: None,
            body: Some(body),
        }
    }
}

/// A signed channel to a Mautic instance.
///
/// Implementations perform exactly one HTTP exchange per call. A 4xx
/// validation rejection must surface as [`Error::validation`], any other
/// failure as a request error (see [`Error::is_request`]).
///
/// [`Error::validation`]: crate::Error::validation
/// [`Error::is_request`]: crate::Error::is_request
#[async_trait]
pub trait Connection: fmt::Debug + Send + Sync + 'static {
    /// Identifies the connection, e.g. to tell apart records fetched from
    /// different Mautic instances.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Performs a request against `path`, relative to the API root, and
    /// returns the decoded JSON response.
    async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Json>;
}

/// Connections are shared between every record they materialize.
pub type SharedConnection = Arc<dyn Connection>;
