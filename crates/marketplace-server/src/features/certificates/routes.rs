//! Certificate API routes
//!
//! Wires the certificate commands and queries to Axum handlers. The router is
//! mounted at `/api/v1/certificates` and again at `/api/v1/items`.
//!
//! # Route Structure
//!
//! - `GET /certificates` - Search certificates (public)
//! - `POST /certificates` - Create a certificate (admin)
//! - `GET /certificates/:id` - Get a certificate (public)
//! - `PUT /certificates/:id` - Replace a certificate (admin)
//! - `PATCH /certificates/:id` - Partially update a certificate (admin)
//! - `DELETE /certificates/:id` - Delete a certificate (admin)
//! - `GET /certificates/:id/tags` - List a certificate's tags (public)
//! - `POST /certificates/:id/tags` - Attach a tag by name (admin)
//! - `DELETE /certificates/:id/tags/:tag_id` - Detach a tag (admin)
//! - `GET /certificates/:id/desired-devs` - Users who asked to develop it
//! - `POST /certificates/:id/desired-devs/:dev_id` - Ask to develop it (admin or self)
//! - `DELETE /certificates/:id/desired-devs/:dev_id` - Withdraw the request (admin or self)
//! - `POST /certificates/:id/dev/:dev_id` - Assign the developer (admin)
//! - `DELETE /certificates/:id/dev` - Unassign the developer (admin)
//!
//! [`user_certificates_routes`] adds `GET /users/:id/certificates` and is
//! merged into the users router.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{
        AddCertificateTagCommand, AddCertificateTagError, AddDesiredDeveloperCommand,
        AddDesiredDeveloperError, AssignDeveloperCommand, AssignDeveloperError,
        CreateCertificateCommand, CreateCertificateError, DeleteCertificateCommand,
        DeleteCertificateError, PatchCertificateCommand, RemoveCertificateTagCommand,
        RemoveCertificateTagError, RemoveDesiredDeveloperCommand, RemoveDesiredDeveloperError,
        UnassignDeveloperCommand, UnassignDeveloperError, UpdateCertificateCommand,
        UpdateCertificateError,
    },
    queries::{
        GetCertificateError, GetCertificateQuery, ListCertificateTagsError,
        ListCertificateTagsQuery, ListCertificatesError, ListCertificatesQuery,
        ListDesiredDevelopersError, ListDesiredDevelopersQuery, ListUserCertificatesError,
        ListUserCertificatesQuery,
    },
};
use crate::{
    api::response::{created, ApiResponse},
    auth::{AdminUser, AuthUser},
    error::{ApiResult, AppError},
    features::{shared::pagination::PageLinks, users::routes::ensure_self_or_admin},
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the certificates router
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1/certificates", certificates_routes())
///     .with_state(pool);
/// ```
pub fn certificates_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_certificates).post(create_certificate))
        .route(
            "/:id",
            get(get_certificate)
                .put(update_certificate)
                .patch(patch_certificate)
                .delete(delete_certificate),
        )
        .route("/:id/tags", get(list_certificate_tags).post(add_certificate_tag))
        .route("/:id/tags/:tag_id", delete(remove_certificate_tag))
        .route("/:id/desired-devs", get(list_desired_developers))
        .route(
            "/:id/desired-devs/:dev_id",
            post(add_desired_developer).delete(remove_desired_developer),
        )
        .route("/:id/dev", delete(unassign_developer))
        .route("/:id/dev/:dev_id", post(assign_developer))
}

/// Routes mounted under `/api/v1/users`
pub fn user_certificates_routes() -> Router<PgPool> {
    Router::new().route("/:id/certificates", get(list_user_certificates))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a certificate
///
/// # Endpoint
///
/// `POST /api/v1/certificates`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Spa weekend",
///   "description": "Two days of rest",
///   "price": 120.50,
///   "duration": 30,
///   "status": "DRAFT",
///   "tags": ["spa", "relax"]
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - Certificate created
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - A non-retired certificate already uses the name
#[tracing::instrument(skip(pool, admin, command), fields(name = %command.name))]
async fn create_certificate(
    State(pool): State<PgPool>,
    admin: AdminUser,
    Json(mut command): Json<CreateCertificateCommand>,
) -> ApiResult<Response> {
    command.creator_id = Some(admin.user_id());

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(certificate_id = response.id, "Certificate created via API");

    Ok(created(response))
}

/// Replace a certificate
///
/// # Endpoint
///
/// `PUT /api/v1/certificates/:id`
///
/// # Response
///
/// - `200 OK` - Certificate updated
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - Certificate not found
/// - `409 Conflict` - Status transition not allowed or duplicate name
#[tracing::instrument(skip(pool, _admin, command), fields(certificate_id = id))]
async fn update_certificate(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateCertificateCommand>,
) -> ApiResult<Response> {
    command.id = id;

    let response = super::commands::update::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Partially update a certificate
///
/// # Endpoint
///
/// `PATCH /api/v1/certificates/:id`
///
/// Absent fields keep their stored values; the merged certificate goes
/// through the same checks as `PUT`.
///
/// # Response
///
/// - `200 OK` - Certificate updated
/// - `400 Bad Request` - Validation error or empty patch
/// - `404 Not Found` - Certificate not found
/// - `409 Conflict` - Status transition not allowed or duplicate name
#[tracing::instrument(skip(pool, _admin, command), fields(certificate_id = id))]
async fn patch_certificate(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(mut command): Json<PatchCertificateCommand>,
) -> ApiResult<Response> {
    command.id = id;

    let response = super::commands::patch::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Delete a certificate
///
/// # Endpoint
///
/// `DELETE /api/v1/certificates/:id`
///
/// # Response
///
/// - `200 OK` - Certificate deleted
/// - `404 Not Found` - Certificate not found
/// - `409 Conflict` - Certificate is part of an order
#[tracing::instrument(skip(pool, _admin), fields(certificate_id = id))]
async fn delete_certificate(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteCertificateCommand { id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Attach a tag to a certificate
///
/// # Endpoint
///
/// `POST /api/v1/certificates/:id/tags`
///
/// # Request Body
///
/// ```json
/// { "name": "spa" }
/// ```
///
/// # Response
///
/// - `201 Created` - Tag attached, returns the tag
/// - `404 Not Found` - Certificate not found
/// - `409 Conflict` - Tag already attached, or certificate is `ACTIVE`/`INACTIVE`
#[tracing::instrument(skip(pool, _admin, command), fields(certificate_id = id))]
async fn add_certificate_tag(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(mut command): Json<AddCertificateTagCommand>,
) -> ApiResult<Response> {
    command.certificate_id = id;

    let tag = super::commands::add_tag::handle(pool, command).await?;

    Ok(created(tag))
}

/// Detach a tag from a certificate
///
/// # Endpoint
///
/// `DELETE /api/v1/certificates/:id/tags/:tag_id`
///
/// # Response
///
/// - `200 OK` - Tag detached
/// - `404 Not Found` - Certificate not found or tag not attached
/// - `409 Conflict` - Certificate is `ACTIVE`/`INACTIVE`
#[tracing::instrument(skip(pool, _admin))]
async fn remove_certificate_tag(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path((certificate_id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    let command = RemoveCertificateTagCommand {
        certificate_id,
        tag_id,
    };

    let response = super::commands::remove_tag::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Ask to develop a certificate
///
/// # Endpoint
///
/// `POST /api/v1/certificates/:id/desired-devs/:dev_id`
///
/// # Response
///
/// - `201 Created` - Request recorded
/// - `403 Forbidden` - Caller is neither the developer nor an admin
/// - `404 Not Found` - Certificate or user not found
/// - `409 Conflict` - Already requested, certificate retired or developer assigned
#[tracing::instrument(skip(pool, caller))]
async fn add_desired_developer(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path((certificate_id, developer_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    ensure_self_or_admin(&caller, developer_id)?;

    let command = AddDesiredDeveloperCommand {
        certificate_id,
        developer_id,
    };
    let response = super::commands::add_desired_developer::handle(pool, command).await?;

    Ok(created(response))
}

/// Withdraw a request to develop a certificate
///
/// # Endpoint
///
/// `DELETE /api/v1/certificates/:id/desired-devs/:dev_id`
///
/// # Response
///
/// - `200 OK` - Request withdrawn
/// - `403 Forbidden` - Caller is neither the developer nor an admin
/// - `404 Not Found` - Certificate not found or no such request
#[tracing::instrument(skip(pool, caller))]
async fn remove_desired_developer(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path((certificate_id, developer_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    ensure_self_or_admin(&caller, developer_id)?;

    let command = RemoveDesiredDeveloperCommand {
        certificate_id,
        developer_id,
    };
    let response = super::commands::remove_desired_developer::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Assign the developer of a certificate
///
/// # Endpoint
///
/// `POST /api/v1/certificates/:id/dev/:dev_id`
///
/// # Response
///
/// - `200 OK` - Developer assigned, returns the certificate
/// - `404 Not Found` - Certificate or user not found
/// - `409 Conflict` - Certificate is `INACTIVE`
#[tracing::instrument(skip(pool, _admin))]
async fn assign_developer(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path((certificate_id, developer_id)): Path<(i64, i64)>,
) -> ApiResult<Response> {
    let command = AssignDeveloperCommand {
        certificate_id,
        developer_id,
    };
    let response = super::commands::assign_developer::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Unassign the developer of a certificate
///
/// # Endpoint
///
/// `DELETE /api/v1/certificates/:id/dev`
#[tracing::instrument(skip(pool, _admin), fields(certificate_id = id))]
async fn unassign_developer(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let command = UnassignDeveloperCommand { certificate_id: id };
    let response = super::commands::unassign_developer::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Search certificates
///
/// # Endpoint
///
/// `GET /api/v1/certificates?tag_names=a,b&text_part=spa&status=ACTIVE&order_by=price&page=1&per_page=50`
///
/// # Query Parameters
///
/// - `tag_names` - Comma-separated; a certificate must carry every one
/// - `text_part` - Case-insensitive substring of name or description
/// - `status` - Comma-separated statuses
/// - `order_by` - `id` (default), `creationDate`, `modificationDate`, `name`,
///   `description`, `price` or `duration`
/// - `page` - Page number (default: 1)
/// - `per_page` - Items per page (default: 50, max: 100)
///
/// # Response
///
/// - `200 OK` - Page of certificates with pagination metadata and links
/// - `400 Bad Request` - Invalid status, sort field or pagination
#[tracing::instrument(skip(pool, uri, query))]
async fn list_certificates(
    State(pool): State<PgPool>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListCertificatesQuery>,
) -> ApiResult<Response> {
    let filters = query.link_filters();

    let page = super::queries::list::handle(pool, query).await?;

    tracing::debug!(
        count = page.items.len(),
        total = page.pagination.total,
        "Certificates listed via API"
    );

    let links = PageLinks::build(uri.path(), &filters, &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

/// Get a single certificate
///
/// # Endpoint
///
/// `GET /api/v1/certificates/:id`
///
/// # Response
///
/// - `200 OK` - Certificate with its tags
/// - `404 Not Found` - Certificate not found
#[tracing::instrument(skip(pool), fields(certificate_id = id))]
async fn get_certificate(State(pool): State<PgPool>, Path(id): Path<i64>) -> ApiResult<Response> {
    let response = super::queries::get::handle(pool, GetCertificateQuery { id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// List the tags of a certificate
///
/// # Endpoint
///
/// `GET /api/v1/certificates/:id/tags`
#[tracing::instrument(skip(pool), fields(certificate_id = id))]
async fn list_certificate_tags(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let tags =
        super::queries::list_tags::handle(pool, ListCertificateTagsQuery { certificate_id: id })
            .await?;

    Ok(ApiResponse::success(tags).into_response())
}

/// Users who asked to develop a certificate
///
/// # Endpoint
///
/// `GET /api/v1/certificates/:id/desired-devs`
#[tracing::instrument(skip(pool, _caller), fields(certificate_id = id))]
async fn list_desired_developers(
    State(pool): State<PgPool>,
    _caller: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let developers = super::queries::list_desired_developers::handle(
        pool,
        ListDesiredDevelopersQuery { certificate_id: id },
    )
    .await?;

    Ok(ApiResponse::success(developers).into_response())
}

/// Certificates a user created, asked to develop, or develops
///
/// # Endpoint
///
/// `GET /api/v1/users/:id/certificates?relation=taken&page=1&per_page=50`
///
/// # Query Parameters
///
/// - `relation` - `created` (default), `desired` or `taken`
/// - `page`, `per_page` - As for the certificate search
///
/// # Response
///
/// - `200 OK` - Page of certificates
/// - `400 Bad Request` - Unknown relation or invalid pagination
/// - `403 Forbidden` - Caller is neither the user nor an admin
/// - `404 Not Found` - User not found
#[tracing::instrument(skip(pool, caller, uri, query), fields(user_id = id))]
async fn list_user_certificates(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path(id): Path<i64>,
    OriginalUri(uri): OriginalUri,
    Query(mut query): Query<ListUserCertificatesQuery>,
) -> ApiResult<Response> {
    ensure_self_or_admin(&caller, id)?;
    query.user_id = id;
    let filters = query.link_filters();

    let page = super::queries::list_by_user::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &filters, &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateCertificateError> for AppError {
    fn from(err: CreateCertificateError) -> Self {
        match err {
            CreateCertificateError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            CreateCertificateError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CreateCertificateError::CreatorNotFound(_) => AppError::NotFound(err.to_string()),
            CreateCertificateError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateCertificateError> for AppError {
    fn from(err: UpdateCertificateError) -> Self {
        match err {
            UpdateCertificateError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateCertificateError::Validation(_) | UpdateCertificateError::NoFieldsToUpdate => {
                AppError::InvalidArgument(err.to_string())
            },
            UpdateCertificateError::Transition(_) | UpdateCertificateError::DuplicateName(_) => {
                AppError::Conflict(err.to_string())
            },
            UpdateCertificateError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteCertificateError> for AppError {
    fn from(err: DeleteCertificateError) -> Self {
        match err {
            DeleteCertificateError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteCertificateError::Ordered(_) => AppError::Conflict(err.to_string()),
            DeleteCertificateError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AddCertificateTagError> for AppError {
    fn from(err: AddCertificateTagError) -> Self {
        match err {
            AddCertificateTagError::NotFound(_) => AppError::NotFound(err.to_string()),
            AddCertificateTagError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            AddCertificateTagError::Transition(_) | AddCertificateTagError::AlreadyAttached => {
                AppError::Conflict(err.to_string())
            },
            AddCertificateTagError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RemoveCertificateTagError> for AppError {
    fn from(err: RemoveCertificateTagError) -> Self {
        match err {
            RemoveCertificateTagError::NotFound(_)
            | RemoveCertificateTagError::TagNotAttached { .. } => {
                AppError::NotFound(err.to_string())
            },
            RemoveCertificateTagError::Transition(_) => AppError::Conflict(err.to_string()),
            RemoveCertificateTagError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetCertificateError> for AppError {
    fn from(err: GetCertificateError) -> Self {
        match err {
            GetCertificateError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetCertificateError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListCertificateTagsError> for AppError {
    fn from(err: ListCertificateTagsError) -> Self {
        match err {
            ListCertificateTagsError::NotFound(_) => AppError::NotFound(err.to_string()),
            ListCertificateTagsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListCertificatesError> for AppError {
    fn from(err: ListCertificatesError) -> Self {
        match err {
            ListCertificatesError::InvalidStatus(_)
            | ListCertificatesError::InvalidOrderBy(_)
            | ListCertificatesError::Pagination(_) => AppError::InvalidArgument(err.to_string()),
            ListCertificatesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AddDesiredDeveloperError> for AppError {
    fn from(err: AddDesiredDeveloperError) -> Self {
        match err {
            AddDesiredDeveloperError::NotFound(_) | AddDesiredDeveloperError::UserNotFound(_) => {
                AppError::NotFound(err.to_string())
            },
            AddDesiredDeveloperError::Inactive
            | AddDesiredDeveloperError::DeveloperAssigned(_)
            | AddDesiredDeveloperError::AlreadyRequested { .. } => AppError::Conflict(err.to_string()),
            AddDesiredDeveloperError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RemoveDesiredDeveloperError> for AppError {
    fn from(err: RemoveDesiredDeveloperError) -> Self {
        match err {
            RemoveDesiredDeveloperError::NotFound(_)
            | RemoveDesiredDeveloperError::NotRequested { .. } => {
                AppError::NotFound(err.to_string())
            },
            RemoveDesiredDeveloperError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AssignDeveloperError> for AppError {
    fn from(err: AssignDeveloperError) -> Self {
        match err {
            AssignDeveloperError::NotFound(_) | AssignDeveloperError::UserNotFound(_) => {
                AppError::NotFound(err.to_string())
            },
            AssignDeveloperError::Inactive => AppError::Conflict(err.to_string()),
            AssignDeveloperError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UnassignDeveloperError> for AppError {
    fn from(err: UnassignDeveloperError) -> Self {
        match err {
            UnassignDeveloperError::NotFound(_) | UnassignDeveloperError::NoDeveloper(_) => {
                AppError::NotFound(err.to_string())
            },
            UnassignDeveloperError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListDesiredDevelopersError> for AppError {
    fn from(err: ListDesiredDevelopersError) -> Self {
        match err {
            ListDesiredDevelopersError::NotFound(_) => AppError::NotFound(err.to_string()),
            ListDesiredDevelopersError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListUserCertificatesError> for AppError {
    fn from(err: ListUserCertificatesError) -> Self {
        match err {
            ListUserCertificatesError::UserNotFound(_) => AppError::NotFound(err.to_string()),
            ListUserCertificatesError::InvalidRelation(_)
            | ListUserCertificatesError::Pagination(_) => {
                AppError::InvalidArgument(err.to_string())
            },
            ListUserCertificatesError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::features::certificates::guard::TransitionError;

    fn status_of(err: AppError) -> StatusCode {
        err.status_and_code().0
    }

    #[test]
    fn test_transition_errors_are_conflicts() {
        let err: AppError = UpdateCertificateError::Transition(TransitionError::Inactive).into();
        assert_eq!(err.to_string(), "Cannot update certificate with status INACTIVE");
        assert_eq!(status_of(err), StatusCode::CONFLICT);

        let err: AppError = UpdateCertificateError::Transition(TransitionError::ActiveOnlyDeactivate).into();
        assert_eq!(err.to_string(), "Certificate with status ACTIVE can be only set to INACTIVE");
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            status_of(GetCertificateError::NotFound(1).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CreateCertificateError::DuplicateName("dup".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(UpdateCertificateError::NoFieldsToUpdate.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                RemoveCertificateTagError::TagNotAttached {
                    certificate_id: 1,
                    tag_id: 2
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AddCertificateTagError::AlreadyAttached.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DeleteCertificateError::Ordered(3).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_developer_error_kinds() {
        assert_eq!(
            status_of(
                AddDesiredDeveloperError::AlreadyRequested {
                    certificate_id: 1,
                    developer_id: 2
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AddDesiredDeveloperError::UserNotFound(2).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AssignDeveloperError::Inactive.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(UnassignDeveloperError::NoDeveloper(1).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CreateCertificateError::CreatorNotFound(9).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_routes_structure() {
        let router = certificates_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
