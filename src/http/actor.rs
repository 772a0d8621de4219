//! Identification of the acting user.

use super::error::ApiError;
use crate::account::domain::UserId;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header naming the acting user.
pub const ACTOR_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made.
///
/// Read from the [`ACTOR_HEADER`] header; a missing or malformed value is
/// rejected with 401. Whether the user exists is left to the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| ApiError::unauthorized(format!("missing {ACTOR_HEADER} header")))?;
        raw.to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(|uuid| Self(UserId::from_uuid(uuid)))
            .ok_or_else(|| ApiError::unauthorized(format!("malformed {ACTOR_HEADER} header")))
    }
}
