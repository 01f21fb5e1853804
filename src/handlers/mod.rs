pub mod auth;
pub mod comments;
pub mod posts;
pub mod profile;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::PublicUser;
use crate::store::Store;

/// Parse a path segment as a resource id
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} id", kind)))
}

/// Resolve an author reference to its public projection. Users are never
/// deleted, so a dangling author reference is a data fault.
pub(crate) async fn author_view(store: &dyn Store, id: Uuid) -> Result<PublicUser, ApiError> {
    match store.find_user(id).await? {
        Some(user) => Ok(PublicUser::from(&user)),
        None => {
            tracing::error!("author {} referenced but not found", id);
            Err(ApiError::internal_server_error(
                "An error occurred while processing your request",
            ))
        }
    }
}
