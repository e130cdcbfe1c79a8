#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::HttpConnection;

mod model;
pub use model::{Model, Persist};

mod proxy;
pub use proxy::Proxy;

pub mod record;
pub use record::{AttributeTable, FieldDescriptor, Id, Record};

pub mod resource;
pub use resource::{Contact, Segment, Tag};

pub use mautic_core::{
    bail, err, Connection, Error, Json, Method, Name, Names, Params, RequestOptions, Result,
    SharedConnection,
};
