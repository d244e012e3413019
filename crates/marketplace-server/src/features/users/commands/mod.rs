pub mod create;
pub mod delete;
pub mod ensure_admin;
pub mod update;

pub use create::{CreateUserCommand, CreateUserError, CreateUserResponse};
pub use delete::{DeleteUserCommand, DeleteUserError, DeleteUserResponse};
pub use ensure_admin::{EnsureAdminCommand, EnsureAdminError, EnsureAdminResponse};
pub use update::{UpdateUserCommand, UpdateUserError, UpdateUserResponse};
