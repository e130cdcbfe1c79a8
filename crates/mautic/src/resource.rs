//! Concrete resource types.

mod contact;
pub use contact::Contact;

mod segment;
pub use segment::Segment;

mod tag;
pub use tag::Tag;
