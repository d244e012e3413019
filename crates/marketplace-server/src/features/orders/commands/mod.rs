pub mod create;

pub use create::{CreateOrderCommand, CreateOrderError, CreateOrderResponse};
