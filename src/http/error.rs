//! Mapping of service errors onto HTTP responses.

use crate::account::{ports::AccountRepositoryError, services::AccountServiceError};
use crate::chat::{ports::ChatRepositoryError, services::ChatServiceError};
use crate::issue::{ports::IssueRepositoryError, services::IssueServiceError};
use crate::notification::{
    ports::{NotificationRepositoryError, NotifierError},
    services::InboxServiceError,
};
use crate::social::{ports::EngagementRepositoryError, services::SocialServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Error returned by every JSON handler.
///
/// Serialises as `{"error": "<message>"}` with a status code chosen by the
/// kind of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 response for invalid input.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401 response for a missing or unknown actor.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 response for an actor lacking permission.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// 404 response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 response; the detail is logged rather than returned.
    #[must_use]
    pub fn internal(detail: &dyn std::error::Error) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<AccountRepositoryError> for ApiError {
    fn from(err: AccountRepositoryError) -> Self {
        match err {
            AccountRepositoryError::DuplicateUsername(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            AccountRepositoryError::UserNotFound(_) => Self::not_found(err.to_string()),
            AccountRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<IssueRepositoryError> for ApiError {
    fn from(err: IssueRepositoryError) -> Self {
        match err {
            IssueRepositoryError::DuplicateIssue(_)
            | IssueRepositoryError::LeaderAccountTaken(_)
            | IssueRepositoryError::VersionConflict { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            IssueRepositoryError::NotFound(_) | IssueRepositoryError::LeaderNotFound(_) => {
                Self::not_found(err.to_string())
            }
            IssueRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<EngagementRepositoryError> for ApiError {
    fn from(err: EngagementRepositoryError) -> Self {
        match err {
            EngagementRepositoryError::DuplicateComment(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            EngagementRepositoryError::CommentNotFound(_) => Self::not_found(err.to_string()),
            EngagementRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<NotificationRepositoryError> for ApiError {
    fn from(err: NotificationRepositoryError) -> Self {
        match err {
            NotificationRepositoryError::Duplicate(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            NotificationRepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            NotificationRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<ChatRepositoryError> for ApiError {
    fn from(err: ChatRepositoryError) -> Self {
        match err {
            ChatRepositoryError::DuplicateRoom(_) | ChatRepositoryError::DuplicateMessage(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            ChatRepositoryError::RoomNotFound(_) => Self::not_found(err.to_string()),
            ChatRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<NotifierError> for ApiError {
    fn from(err: NotifierError) -> Self {
        match err {
            NotifierError::UnknownSender(_) => Self::unauthorized(err.to_string()),
            NotifierError::Domain(_) => Self::bad_request(err.to_string()),
            NotifierError::Account(inner) => inner.into(),
            NotifierError::Repository(inner) => inner.into(),
            NotifierError::Render(_) => Self::internal(&err),
        }
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::NotFound(_) => Self::not_found(err.to_string()),
            AccountServiceError::Domain(_) => Self::bad_request(err.to_string()),
            AccountServiceError::Repository(inner) => inner.into(),
            AccountServiceError::Notifier(inner) => inner.into(),
        }
    }
}

impl From<IssueServiceError> for ApiError {
    fn from(err: IssueServiceError) -> Self {
        match err {
            IssueServiceError::UnknownActor(_) => Self::unauthorized(err.to_string()),
            IssueServiceError::NotFound(_) | IssueServiceError::LeaderNotFound(_) => {
                Self::not_found(err.to_string())
            }
            IssueServiceError::NotTaggedLeader { .. } | IssueServiceError::NotReporter { .. } => {
                Self::forbidden(err.to_string())
            }
            IssueServiceError::ContentRejected(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            IssueServiceError::Domain(_) => Self::bad_request(err.to_string()),
            IssueServiceError::Repository(inner) => inner.into(),
            IssueServiceError::Accounts(inner) => inner.into(),
            IssueServiceError::Notifier(inner) => inner.into(),
        }
    }
}

impl From<SocialServiceError> for ApiError {
    fn from(err: SocialServiceError) -> Self {
        match err {
            SocialServiceError::UnknownActor(_) => Self::unauthorized(err.to_string()),
            SocialServiceError::IssueNotFound(_) | SocialServiceError::CommentNotFound(_) => {
                Self::not_found(err.to_string())
            }
            SocialServiceError::Domain(_) => Self::bad_request(err.to_string()),
            SocialServiceError::Repository(inner) => inner.into(),
            SocialServiceError::Issues(inner) => inner.into(),
            SocialServiceError::Accounts(inner) => inner.into(),
            SocialServiceError::Notifier(inner) => inner.into(),
        }
    }
}

impl From<InboxServiceError> for ApiError {
    fn from(err: InboxServiceError) -> Self {
        match err {
            InboxServiceError::NotFound(_) => Self::not_found(err.to_string()),
            InboxServiceError::Repository(inner) => inner.into(),
        }
    }
}

impl From<ChatServiceError> for ApiError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::UnknownActor(_) => Self::unauthorized(err.to_string()),
            ChatServiceError::UserNotFound(_) | ChatServiceError::RoomNotFound(_) => {
                Self::not_found(err.to_string())
            }
            ChatServiceError::NotRoomManager { .. } => Self::forbidden(err.to_string()),
            ChatServiceError::Domain(_) => Self::bad_request(err.to_string()),
            ChatServiceError::Repository(inner) => inner.into(),
            ChatServiceError::Accounts(inner) => inner.into(),
            ChatServiceError::Notifier(inner) => inner.into(),
        }
    }
}

/// Result type for JSON handlers.
pub type ApiResult<T> = Result<T, ApiError>;
