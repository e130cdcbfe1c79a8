pub mod connection;
pub use connection::{Connection, Method, RequestOptions, SharedConnection};

mod error;
pub use error::{Error, IntoError};

pub mod name;
pub use name::{Name, Names};

pub use async_trait::async_trait;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Untyped JSON value, as exchanged with the API.
pub type Json = serde_json::Value;

/// Ordered JSON object used for query parameters, request bodies and
/// attribute data.
pub type Params = serde_json::Map<String, Json>;
