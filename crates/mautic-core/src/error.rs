mod adhoc;
mod invalid_response;
mod request;
mod transport;
mod validation;

use adhoc::AdhocError;
use invalid_response::InvalidResponseError;
use request::RequestError;
use transport::TransportError;
use validation::ValidationError;

use crate::Json;

use std::sync::Arc;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error returned by a connection or by the model layer.
///
/// Validation failures are a kind of request failure: `is_request()` returns
/// `true` for both, `is_validation()` only for the former.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    fn any_kind(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }

    /// Returns `true` if the request failed for any reason, validation
    /// failures included.
    pub fn is_request(&self) -> bool {
        self.any_kind(|kind| {
            matches!(
                kind,
                ErrorKind::Validation(_)
                    | ErrorKind::Request(_)
                    | ErrorKind::Transport(_)
                    | ErrorKind::InvalidResponse(_)
            )
        })
    }

    /// The structured error payload reported by the server, if any.
    pub fn errors(&self) -> Option<&Json> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Validation(err) => Some(&err.errors),
            ErrorKind::Request(err) => err.errors.as_ref(),
            _ => None,
        })
    }

    /// The HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<u16> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Validation(err) => err.status,
            ErrorKind::Request(err) => err.status,
            _ => None,
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Validation(ValidationError),
    Request(RequestError),
    Transport(TransportError),
    InvalidResponse(InvalidResponseError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
            Request(err) => core::fmt::Display::fmt(err, f),
            Transport(err) => core::fmt::Display::fmt(err, f),
            InvalidResponse(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown mautic error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::invalid_response(err.to_string())
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// Extracts a human readable message from an API error payload.
///
/// The API reports errors as `[{"code": 400, "message": "..."}]`, but older
/// releases also use a bare object or string.
fn summarize(errors: &Json) -> Option<&str> {
    match errors {
        Json::String(message) => Some(message),
        Json::Array(items) => items.iter().find_map(summarize),
        Json::Object(map) => match map.get("message") {
            Some(Json::String(message)) => Some(message),
            _ => map.values().find_map(summarize),
        },
        _ => None,
    }
}
