//! Gift certificates
//!
//! Certificates carry a status lifecycle (`DRAFT` → `PUBLISHED` → `ACTIVE` →
//! `INACTIVE`), a tag set and a searchable catalogue. Each one records the
//! admin who created it; users may ask to develop it and an admin assigns
//! the developer.
//!
//! - [`search`] composes the filtered search and its count query
//! - [`guard`] decides which updates a status allows
//! - `commands/` and `queries/` hold the mediator requests and handlers

pub mod commands;
pub mod guard;
pub mod model;
pub mod queries;
pub mod routes;
pub mod search;

pub use commands::{
    AddCertificateTagCommand, AddDesiredDeveloperCommand, AssignDeveloperCommand,
    CreateCertificateCommand, DeleteCertificateCommand, PatchCertificateCommand,
    RemoveCertificateTagCommand, RemoveDesiredDeveloperCommand, UnassignDeveloperCommand,
    UpdateCertificateCommand,
};
pub use model::{CertificateResponse, CertificateStatus};
pub use queries::{
    GetCertificateQuery, ListCertificateTagsQuery, ListCertificatesQuery,
    ListDesiredDevelopersQuery, ListUserCertificatesQuery, UserRelation,
};
pub use routes::{certificates_routes, user_certificates_routes};
pub use search::{CertificateSearch, SortField};
