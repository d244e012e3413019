pub mod get;
pub mod list;

pub use get::{GetUserOrderError, GetUserOrderQuery};
pub use list::{ListUserOrdersError, ListUserOrdersQuery, ListUserOrdersResponse};
