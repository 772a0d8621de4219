//! User, follow and leader endpoints.

use super::{
    actor::Actor,
    error::ApiResult,
    state::AppState,
    views::{BioBody, FollowView, LeaderView, RegisterLeaderBody, RegisterUserBody, UserView},
};
use crate::account::{domain::UserId, services::RegisterUserRequest};
use crate::issue::services::RegisterLeaderRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

pub(super) async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserBody>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let mut request = RegisterUserRequest::new(body.username);
    if let Some(email) = body.email {
        request = request.with_email(email);
    }
    if let Some(real_name) = body.real_name {
        request = request.with_real_name(real_name);
    }
    let (user, profile) = state.accounts.register(request).await?;
    Ok((StatusCode::CREATED, Json(UserView::new(&user, &profile))))
}

pub(super) async fn show_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<UserView>> {
    let user = state.accounts.user(id).await?;
    let profile = state.accounts.profile(id).await?;
    Ok(Json(UserView::new(&user, &profile)))
}

pub(super) async fn update_bio(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<BioBody>,
) -> ApiResult<Json<UserView>> {
    let profile = state.accounts.update_bio(actor, &body.bio).await?;
    let user = state.accounts.user(actor).await?;
    Ok(Json(UserView::new(&user, &profile)))
}

pub(super) async fn follow(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(followee): Path<UserId>,
) -> ApiResult<Json<FollowView>> {
    let changed = state.accounts.follow(actor, followee).await?;
    Ok(Json(FollowView {
        following: true,
        changed,
    }))
}

pub(super) async fn unfollow(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(followee): Path<UserId>,
) -> ApiResult<Json<FollowView>> {
    let changed = state.accounts.unfollow(actor, followee).await?;
    Ok(Json(FollowView {
        following: false,
        changed,
    }))
}

pub(super) async fn leaderboard(State(state): State<AppState>) -> ApiResult<Json<Vec<LeaderView>>> {
    let leaders = state.leaders.leaderboard().await?;
    Ok(Json(leaders.iter().map(LeaderView::from).collect()))
}

pub(super) async fn register_leader(
    State(state): State<AppState>,
    Json(body): Json<RegisterLeaderBody>,
) -> ApiResult<(StatusCode, Json<LeaderView>)> {
    let mut request = RegisterLeaderRequest::new(body.name, body.designation);
    if let Some(url) = body.profile_picture {
        request = request.with_profile_picture(url);
    }
    if let Some(account) = body.account_id {
        request = request.with_account(account);
    }
    let leader = state.leaders.register(request).await?;
    Ok((StatusCode::CREATED, Json(LeaderView::from(&leader))))
}
