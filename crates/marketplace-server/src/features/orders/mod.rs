//! Orders
//!
//! A user buys one or more `ACTIVE` certificates at once. Lines keep the price
//! paid so later repricing never changes past orders.

pub mod commands;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::CreateOrderCommand;
pub use model::{OrderLine, OrderResponse};
pub use queries::{GetUserOrderQuery, ListUserOrdersQuery};
pub use routes::orders_routes;
