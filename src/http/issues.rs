//! Issue submission, browsing, resolution and engagement endpoints.

use super::{
    actor::Actor,
    error::ApiResult,
    state::AppState,
    views::{
        CommentBodyRequest, CommentView, HashtagView, IssueView, ResolutionView, SubmitIssueBody,
        ThreadView, issue_views,
    },
};
use crate::issue::{domain::IssueId, services::SubmitIssueRequest};
use crate::social::domain::{CommentId, LikeToggle};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

/// Result of flagging an issue.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct FlagView {
    flag_count: u64,
    counted: bool,
}

/// Result of toggling a bookmark.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct BookmarkView {
    bookmarked: bool,
}

pub(super) async fn feed(State(state): State<AppState>) -> ApiResult<Json<Vec<IssueView>>> {
    let issues = state.reporting.feed().await?;
    Ok(Json(issue_views(&issues, None)))
}

pub(super) async fn mine(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<IssueView>>> {
    let issues = state.reporting.mine(actor).await?;
    Ok(Json(issue_views(&issues, Some(actor))))
}

pub(super) async fn submit(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<SubmitIssueBody>,
) -> ApiResult<(StatusCode, Json<IssueView>)> {
    let mut request = SubmitIssueRequest::new(
        body.title,
        body.description,
        body.latitude,
        body.longitude,
        body.leader_id,
    );
    if let Some(url) = body.image_url {
        request = request.with_image_url(url);
    }
    let issue = state.reporting.submit(actor, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueView::for_viewer(&issue, Some(actor))),
    ))
}

pub(super) async fn detail(
    State(state): State<AppState>,
    viewer: Option<Actor>,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<IssueView>> {
    let issue = state.reporting.get(id).await?;
    let viewer = viewer.map(|Actor(user)| user);
    let engagement = state.engagement.snapshot(id, viewer).await?;
    Ok(Json(
        IssueView::for_viewer(&issue, viewer).with_engagement(engagement),
    ))
}

pub(super) async fn resolve(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<ResolutionView>> {
    let outcome = state.resolution.resolve_as_leader(actor, id).await?;
    Ok(Json(ResolutionView::for_actor(&outcome, actor)))
}

pub(super) async fn confirm(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<ResolutionView>> {
    let outcome = state.resolution.confirm_as_reporter(actor, id).await?;
    Ok(Json(ResolutionView::for_actor(&outcome, actor)))
}

pub(super) async fn flag(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<FlagView>> {
    let outcome = state.reporting.flag(actor, id).await?;
    Ok(Json(FlagView {
        flag_count: outcome.flag_count,
        counted: outcome.counted,
    }))
}

pub(super) async fn like(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<LikeToggle>> {
    Ok(Json(state.engagement.toggle_issue_like(actor, id).await?))
}

pub(super) async fn bookmark(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<BookmarkView>> {
    let bookmarked = state.engagement.toggle_bookmark(actor, id).await?;
    Ok(Json(BookmarkView { bookmarked }))
}

pub(super) async fn bookmarks(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<IssueView>>> {
    let issues = state.engagement.bookmarks(actor).await?;
    Ok(Json(issue_views(&issues, Some(actor))))
}

pub(super) async fn comments(
    State(state): State<AppState>,
    Path(id): Path<IssueId>,
) -> ApiResult<Json<Vec<ThreadView>>> {
    let threads = state.engagement.threads(id).await?;
    Ok(Json(threads.iter().map(ThreadView::from).collect()))
}

pub(super) async fn add_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<IssueId>,
    Json(body): Json<CommentBodyRequest>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let comment = state.engagement.add_comment(actor, id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(CommentView::from(&comment))))
}

pub(super) async fn reply(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(target): Path<CommentId>,
    Json(body): Json<CommentBodyRequest>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let comment = state.engagement.reply(actor, target, &body.content).await?;
    Ok((StatusCode::CREATED, Json(CommentView::from(&comment))))
}

pub(super) async fn like_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<CommentId>,
) -> ApiResult<Json<LikeToggle>> {
    Ok(Json(state.engagement.toggle_comment_like(actor, id).await?))
}

pub(super) async fn by_hashtag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<HashtagView>> {
    let found = state.reporting.by_hashtag(&name).await?;
    let (hashtag, usage_count) = found.hashtag.as_ref().map_or_else(
        || (name.trim_start_matches('#').to_lowercase(), 0),
        |tag| (tag.name().as_str().to_owned(), tag.usage_count()),
    );
    Ok(Json(HashtagView {
        hashtag,
        usage_count,
        issues: issue_views(&found.issues, None),
    }))
}
