pub mod get;
pub mod list;
pub mod most_used;

pub use get::{GetTagError, GetTagQuery};
pub use list::{ListTagsError, ListTagsQuery, ListTagsResponse};
pub use most_used::{MostUsedTagError, MostUsedTagQuery, MostUsedTagResponse};
