//! Inbound socket frame dispatch tests.
//!
//! Frames are applied through `dispatch_frame` directly so the tests can
//! observe hub broadcasts without opening a WebSocket.

use super::helpers::{TestApp, app};
use civic_resolve::chat::domain::RoomId;
use civic_resolve::http::dispatch_frame;
use civic_resolve::issue::domain::IssueId;
use civic_resolve::notification::domain::NotificationId;
use civic_resolve::realtime::{ChannelKey, IssueUpdate, OutboundEvent};
use eyre::eyre;
use rstest::rstest;
use serde_json::{Value, json};

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> eyre::Result<T> {
    Ok(serde_json::from_value(value.clone())?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chat_frame_is_broadcast_to_the_room(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let (_, created) = app
        .post("/api/chats", asha, Some(json!({ "participants": [bilal] })))
        .await?;
    let room: RoomId = parse(&created["id"])?;
    let mut listener = app.state.hub.subscribe(ChannelKey::Room(room));

    let reply = dispatch_frame(
        &app.state,
        asha,
        ChannelKey::Room(room),
        r#"{"type":"chat_message","message":"On my way"}"#,
    )
    .await;

    assert_eq!(reply, None);
    let Some(OutboundEvent::ChatMessage(payload)) = listener.recv().await else {
        return Err(eyre!("expected a chat broadcast"));
    };
    assert_eq!(payload.message, "On my way");
    assert_eq!(payload.sender_username, "asha");
    assert_eq!(payload.room_id, room);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_frames_answer_with_an_error(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let outsider = app.register("chen").await?;
    let (_, created) = app
        .post("/api/chats", asha, Some(json!({ "participants": [bilal] })))
        .await?;
    let room: RoomId = parse(&created["id"])?;

    let malformed = dispatch_frame(
        &app.state,
        asha,
        ChannelKey::Room(room),
        r#"{"type":"typing"}"#,
    )
    .await;
    let intruding = dispatch_frame(
        &app.state,
        outsider,
        ChannelKey::Room(room),
        r#"{"type":"chat_message","message":"let me in"}"#,
    )
    .await;
    let unknown_note = dispatch_frame(
        &app.state,
        asha,
        ChannelKey::Notifications(asha),
        &json!({ "action": "mark_read", "notification_id": NotificationId::new() })
            .to_string(),
    )
    .await;

    for reply in [malformed, intruding, unknown_note] {
        assert!(matches!(reply, Some(OutboundEvent::Error { .. })), "{reply:?}");
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_frame_is_acknowledged(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    app.post(&format!("/api/users/{asha}/follow"), bilal, None)
        .await?;
    let (_, inbox) = app.get("/api/notifications", Some(asha)).await?;
    let notification_id: NotificationId = parse(&inbox["notifications"][0]["id"])?;

    let reply = dispatch_frame(
        &app.state,
        asha,
        ChannelKey::Notifications(asha),
        &json!({ "action": "mark_read", "notification_id": notification_id }).to_string(),
    )
    .await;
    let (_, after) = app.get("/api/notifications", Some(asha)).await?;

    assert_eq!(
        reply,
        Some(OutboundEvent::NotificationMarkedRead { notification_id })
    );
    assert_eq!(after["unread"], json!(0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_frames_comment_and_like(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue_id = app.submit(asha, &leader, "Broken footpath tiles").await?;
    let issue: IssueId = parse(&Value::String(issue_id.clone()))?;
    let mut watcher = app.state.hub.subscribe(ChannelKey::Issue(issue));

    let commented = dispatch_frame(
        &app.state,
        bilal,
        ChannelKey::Issue(issue),
        r#"{"action":"new_comment","content":"Tripped here yesterday"}"#,
    )
    .await;
    let Some(OutboundEvent::IssueUpdate(IssueUpdate::NewComment(comment))) =
        watcher.recv().await
    else {
        return Err(eyre!("expected a comment broadcast"));
    };
    let liked = dispatch_frame(
        &app.state,
        bilal,
        ChannelKey::Issue(issue),
        r#"{"action":"new_like"}"#,
    )
    .await;

    assert_eq!(commented, None);
    assert_eq!(comment.username, "bilal");
    assert_eq!(comment.content, "Tripped here yesterday");
    assert_eq!(liked, None);
    assert_eq!(
        watcher.recv().await,
        Some(OutboundEvent::IssueUpdate(IssueUpdate::LikeUpdate {
            user_id: bilal,
            liked: true,
            like_count: 1,
        }))
    );
    let (_, detail) = app.get(&format!("/api/issues/{issue_id}"), None).await?;
    assert_eq!(detail["engagement"]["comment_count"], json!(1));
    Ok(())
}
