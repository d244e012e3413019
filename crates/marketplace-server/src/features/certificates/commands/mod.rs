pub mod add_desired_developer;
pub mod add_tag;
pub mod assign_developer;
pub mod create;
pub mod delete;
pub mod patch;
pub mod remove_desired_developer;
pub mod remove_tag;
pub mod unassign_developer;
pub mod update;

pub use add_desired_developer::{
    AddDesiredDeveloperCommand, AddDesiredDeveloperError, AddDesiredDeveloperResponse,
};
pub use add_tag::{AddCertificateTagCommand, AddCertificateTagError};
pub use assign_developer::{AssignDeveloperCommand, AssignDeveloperError};
pub use create::{CreateCertificateCommand, CreateCertificateError, CreateCertificateResponse};
pub use delete::{DeleteCertificateCommand, DeleteCertificateError, DeleteCertificateResponse};
pub use patch::{PatchCertificateCommand, PatchCertificateError};
pub use remove_desired_developer::{
    RemoveDesiredDeveloperCommand, RemoveDesiredDeveloperError, RemoveDesiredDeveloperResponse,
};
pub use remove_tag::{
    RemoveCertificateTagCommand, RemoveCertificateTagError, RemoveCertificateTagResponse,
};
pub use unassign_developer::{UnassignDeveloperCommand, UnassignDeveloperError};
pub use update::{UpdateCertificateCommand, UpdateCertificateError, UpdateCertificateResponse};
