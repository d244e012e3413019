pub mod login;

pub use login::{AuthenticatedUser, LoginCommand, LoginError};
