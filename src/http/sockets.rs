//! WebSocket endpoints for the chat, notification and issue channels.
//!
//! Each socket joins exactly one hub channel. Events published on the
//! channel are forwarded to the client; inbound text frames are decoded
//! for the channel's family and applied through the same services as the
//! JSON API. A frame that cannot be applied is answered with an `error`
//! event on the originating socket only. A socket whose subscription ends,
//! for example after its user is removed from a room, is closed.

use super::{
    actor::Actor,
    error::{ApiError, ApiResult},
    state::AppState,
};
use crate::account::{domain::UserId, services::AccountServiceError};
use crate::chat::domain::RoomId;
use crate::issue::domain::IssueId;
use crate::realtime::{
    ChannelKey, ChatFrame, IssueFrame, NotificationFrame, OutboundEvent, parse_frame,
};
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub(super) async fn chat_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(room): Path<RoomId>,
) -> ApiResult<Response> {
    if !state.chat.is_participant(actor, room).await? {
        return Err(ApiError::forbidden(format!(
            "user {actor} is not a participant of room {room}"
        )));
    }
    Ok(upgrade(ws, state, actor, ChannelKey::Room(room)))
}

pub(super) async fn notification_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Response> {
    require_user(&state, actor).await?;
    Ok(upgrade(ws, state, actor, ChannelKey::Notifications(actor)))
}

pub(super) async fn issue_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(issue): Path<IssueId>,
) -> ApiResult<Response> {
    require_user(&state, actor).await?;
    state.reporting.get(issue).await?;
    Ok(upgrade(ws, state, actor, ChannelKey::Issue(issue)))
}

async fn require_user(state: &AppState, actor: UserId) -> ApiResult<()> {
    match state.accounts.user(actor).await {
        Ok(_) => Ok(()),
        Err(AccountServiceError::NotFound(_)) => {
            Err(ApiError::unauthorized(format!("unknown user: {actor}")))
        }
        Err(err) => Err(err.into()),
    }
}

fn upgrade(ws: WebSocketUpgrade, state: AppState, actor: UserId, channel: ChannelKey) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state, actor, channel))
}

async fn serve_socket(socket: WebSocket, state: AppState, actor: UserId, channel: ChannelKey) {
    let (mut sink, mut stream) = socket.split();
    let mut subscription = state.hub.subscribe_member(channel, actor);
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<OutboundEvent>();
    info!(%channel, user = %actor, "socket connected");

    let mut writer = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                Some(event) = reply_rx.recv() => event,
                received = subscription.recv() => match received {
                    Some(event) => event,
                    None => {
                        debug!(%channel, user = %actor, "subscription ended");
                        break;
                    }
                },
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "failed to encode outbound event");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
        if let Err(err) = sink.send(Message::Close(None)).await {
            debug!(error = %err, "close frame not delivered");
        }
    });

    loop {
        let message = tokio::select! {
            _ = &mut writer => break,
            message = stream.next() => message,
        };
        match message {
            Some(Ok(Message::Text(text))) => {
                let Some(reply) = dispatch_frame(&state, actor, channel, &text).await else {
                    continue;
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            Some(Ok(Message::Close(_)) | Err(_)) | None => break,
            Some(Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_))) => {}
        }
    }

    writer.abort();
    info!(%channel, user = %actor, "socket disconnected");
}

/// Applies one inbound text frame from `actor` on `channel`.
///
/// Returns the event to send back to the originating socket only, if
/// any. Successful chat messages, comments and likes produce no direct
/// reply because the channel broadcast already reaches the sender.
pub async fn dispatch_frame(
    state: &AppState,
    actor: UserId,
    channel: ChannelKey,
    text: &str,
) -> Option<OutboundEvent> {
    let result = match channel {
        ChannelKey::Room(room) => chat_frame(state, actor, room, text).await,
        ChannelKey::Notifications(_) => notification_frame(state, actor, text).await,
        ChannelKey::Issue(issue) => issue_frame(state, actor, issue, text).await,
    };
    result.unwrap_or_else(|err| {
        warn!(%channel, user = %actor, error = %err.message(), "frame rejected");
        Some(OutboundEvent::Error {
            message: err.message().to_owned(),
        })
    })
}

async fn chat_frame(
    state: &AppState,
    actor: UserId,
    room: RoomId,
    text: &str,
) -> ApiResult<Option<OutboundEvent>> {
    let ChatFrame::ChatMessage { message, file_url } = decode(text)?;
    let sent = state
        .chat
        .send_message(actor, room, &message, file_url)
        .await?;
    debug!(room = %room, message = %sent.id(), "chat frame applied");
    Ok(None)
}

async fn notification_frame(
    state: &AppState,
    actor: UserId,
    text: &str,
) -> ApiResult<Option<OutboundEvent>> {
    let NotificationFrame::MarkRead { notification_id } = decode(text)?;
    state.inbox.mark_read(actor, notification_id).await?;
    Ok(Some(OutboundEvent::NotificationMarkedRead { notification_id }))
}

async fn issue_frame(
    state: &AppState,
    actor: UserId,
    issue: IssueId,
    text: &str,
) -> ApiResult<Option<OutboundEvent>> {
    match decode(text)? {
        IssueFrame::NewComment { content } => {
            state.engagement.add_comment(actor, issue, &content).await?;
        }
        IssueFrame::NewLike => {
            state.engagement.toggle_issue_like(actor, issue).await?;
        }
    }
    Ok(None)
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> ApiResult<T> {
    parse_frame(text).map_err(|err| ApiError::bad_request(err.to_string()))
}
