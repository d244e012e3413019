pub mod create;
pub mod delete;

pub use create::{CreateTagCommand, CreateTagError, CreateTagResponse};
pub use delete::{DeleteTagCommand, DeleteTagError, DeleteTagResponse};
