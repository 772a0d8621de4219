//! JSON and WebSocket surface.
//!
//! Handlers are thin: they read the acting user from the
//! [`actor::ACTOR_HEADER`] header, call one service operation and map the
//! result onto a JSON body or an [`ApiError`].

mod accounts;
pub mod actor;
mod chats;
pub mod error;
mod inbox;
mod issues;
pub mod sockets;
pub mod state;
pub mod views;

pub use actor::{ACTOR_HEADER, Actor};
pub use error::{ApiError, ApiResult};
pub use sockets::dispatch_frame;
pub use state::{AppServices, AppState, Stores};

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

/// Builds the application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users", post(accounts::register_user))
        .route("/api/users/me/bio", put(accounts::update_bio))
        .route("/api/users/:id", get(accounts::show_user))
        .route(
            "/api/users/:id/follow",
            post(accounts::follow).delete(accounts::unfollow),
        )
        .route(
            "/api/leaders",
            get(accounts::leaderboard).post(accounts::register_leader),
        )
        .route("/api/issues", get(issues::feed).post(issues::submit))
        .route("/api/issues/mine", get(issues::mine))
        .route("/api/issues/:id", get(issues::detail))
        .route("/api/issues/:id/resolve", post(issues::resolve))
        .route("/api/issues/:id/confirm", post(issues::confirm))
        .route("/api/issues/:id/flag", post(issues::flag))
        .route("/api/issues/:id/like", post(issues::like))
        .route("/api/issues/:id/bookmark", post(issues::bookmark))
        .route(
            "/api/issues/:id/comments",
            get(issues::comments).post(issues::add_comment),
        )
        .route("/api/bookmarks", get(issues::bookmarks))
        .route("/api/comments/:id/replies", post(issues::reply))
        .route("/api/comments/:id/like", post(issues::like_comment))
        .route("/api/hashtags/:name/issues", get(issues::by_hashtag))
        .route("/api/notifications", get(inbox::list))
        .route("/api/notifications/read-all", post(inbox::mark_all_read))
        .route("/api/notifications/:id/read", post(inbox::mark_read))
        .route("/api/chats", get(chats::list).post(chats::create))
        .route("/api/chats/:id", get(chats::open))
        .route("/api/chats/:id/messages", post(chats::send))
        .route("/api/chats/:id/members", post(chats::add_members))
        .route("/api/chats/:id/members/:user", delete(chats::remove_member))
        .route("/ws/chat/:room", get(sockets::chat_socket))
        .route("/ws/notifications", get(sockets::notification_socket))
        .route("/ws/issue/:issue", get(sockets::issue_socket))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
