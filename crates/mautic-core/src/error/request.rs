use super::Error;
use crate::Json;

/// A request failed for a reason other than payload validation.
#[derive(Debug)]
pub(super) struct RequestError {
    pub(super) status: Option<u16>,
    pub(super) message: Box<str>,
    pub(super) errors: Option<Json>,
}

impl std::error::Error for RequestError {}

impl core::fmt::Display for RequestError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("request failed")?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error for a failed request, e.g. a 5xx response or a
    /// rejected credential.
    pub fn request_failed(
        status: Option<u16>,
        message: impl Into<String>,
        errors: Option<Json>,
    ) -> Error {
        Error::from(super::ErrorKind::Request(RequestError {
            status,
            message: message.into().into_boxed_str(),
            errors,
        }))
    }
}
