use super::Error;
use crate::Json;

/// The server rejected the content of a request.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) status: Option<u16>,
    pub(super) errors: Json,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("validation failed")?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        if let Some(message) = super::summarize(&self.errors) {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a validation error carrying the server's field-level error
    /// details.
    pub fn validation(status: Option<u16>, errors: Json) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError { status, errors }))
    }

    /// Returns `true` if the server rejected the request payload.
    pub fn is_validation(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Validation(_)))
    }
}
