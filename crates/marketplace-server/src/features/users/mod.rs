//! Users and their skills
//!
//! Skills are tags, reconciled the same way as certificate tags.

pub mod commands;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateUserCommand, DeleteUserCommand, EnsureAdminCommand, UpdateUserCommand};
pub use model::UserResponse;
pub use queries::{GetUserQuery, ListUsersQuery};
pub use routes::users_routes;
