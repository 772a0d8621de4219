//! Notification endpoints.

use super::{actor::Actor, error::ApiResult, state::AppState, views::InboxView};
use crate::notification::domain::NotificationId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

/// Result of marking every notification read.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct MarkedView {
    marked: u64,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<InboxView>> {
    let summary = state.inbox.inbox(actor).await?;
    Ok(Json(InboxView::from(&summary)))
}

pub(super) async fn mark_read(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<NotificationId>,
) -> ApiResult<StatusCode> {
    state.inbox.mark_read(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn mark_all_read(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<MarkedView>> {
    let marked = state.inbox.mark_all_read(actor).await?;
    Ok(Json(MarkedView { marked }))
}
