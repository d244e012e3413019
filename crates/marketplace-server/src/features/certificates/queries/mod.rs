pub mod get;
pub mod list;
pub mod list_by_user;
pub mod list_desired_developers;
pub mod list_tags;

pub use get::{GetCertificateError, GetCertificateQuery, GetCertificateResponse};
pub use list::{ListCertificatesError, ListCertificatesQuery, ListCertificatesResponse};
pub use list_by_user::{
    ListUserCertificatesError, ListUserCertificatesQuery, ListUserCertificatesResponse,
    UserRelation,
};
pub use list_desired_developers::{ListDesiredDevelopersError, ListDesiredDevelopersQuery};
pub use list_tags::{ListCertificateTagsError, ListCertificateTagsQuery};
