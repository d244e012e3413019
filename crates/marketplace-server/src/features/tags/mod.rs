//! Tags
//!
//! Tags label certificates and double as user skills. [`reconcile`] holds the
//! name resolution and diffing shared by both owners.

pub mod commands;
pub mod model;
pub mod queries;
pub mod reconcile;
pub mod routes;

pub use commands::{CreateTagCommand, DeleteTagCommand};
pub use model::Tag;
pub use queries::{GetTagQuery, ListTagsQuery, MostUsedTagQuery};
pub use routes::tags_routes;
