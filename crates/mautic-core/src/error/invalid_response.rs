use super::Error;

/// The server answered, but not with the shape the caller expected.
#[derive(Debug)]
pub(super) struct InvalidResponseError {
    context: Box<str>,
}

impl std::error::Error for InvalidResponseError {}

impl core::fmt::Display for InvalidResponseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid response: {}", self.context)
    }
}

impl Error {
    /// Creates an error for a malformed or unexpected response.
    pub fn invalid_response(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidResponse(InvalidResponseError {
            context: context.into().into_boxed_str(),
        }))
    }

    /// Returns `true` if this error is an invalid response error.
    pub fn is_invalid_response(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidResponse(_)))
    }
}
