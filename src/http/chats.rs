//! Chat room endpoints.

use super::{
    actor::Actor,
    error::ApiResult,
    state::AppState,
    views::{
        AddMembersBody, CreateRoomBody, MessageView, RoomDetailView, RoomMessagesView,
        RoomSummaryView, SendMessageBody,
    },
};
use crate::account::domain::UserId;
use crate::chat::{domain::RoomId, services::CreateRoomRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

pub(super) async fn list(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<RoomSummaryView>>> {
    let rooms = state.chat.rooms_for(actor).await?;
    Ok(Json(rooms.iter().map(RoomSummaryView::from).collect()))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<CreateRoomBody>,
) -> ApiResult<(StatusCode, Json<RoomDetailView>)> {
    let request = CreateRoomRequest::from_parts(body.participants, body.is_group_chat, body.name);
    let (room, created) = state.chat.create_room(actor, request).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(RoomDetailView::from(&room))))
}

pub(super) async fn open(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<RoomId>,
) -> ApiResult<Json<RoomMessagesView>> {
    let view = state.chat.open_room(actor, id).await?;
    Ok(Json(RoomMessagesView::from(&view)))
}

pub(super) async fn send(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<RoomId>,
    Json(body): Json<SendMessageBody>,
) -> ApiResult<(StatusCode, Json<MessageView>)> {
    let message = state
        .chat
        .send_message(actor, id, &body.message, body.file_url)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageView::from(&message))))
}

pub(super) async fn add_members(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<RoomId>,
    Json(body): Json<AddMembersBody>,
) -> ApiResult<Json<RoomDetailView>> {
    let room = state.chat.add_members(actor, id, &body.members).await?;
    Ok(Json(RoomDetailView::from(&room)))
}

pub(super) async fn remove_member(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((id, member)): Path<(RoomId, UserId)>,
) -> ApiResult<Json<RoomDetailView>> {
    let room = state.chat.remove_member(actor, id, member).await?;
    Ok(Json(RoomDetailView::from(&room)))
}
