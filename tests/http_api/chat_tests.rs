//! Chat room, message and membership tests.

use super::helpers::{TestApp, app, string_field};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_room_is_created_once(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;

    let (created, room) = app
        .post("/api/chats", asha, Some(json!({ "participants": [bilal] })))
        .await?;
    let (reused, same) = app
        .post("/api/chats", bilal, Some(json!({ "participants": [asha] })))
        .await?;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(reused, StatusCode::OK);
    assert_eq!(room["id"], same["id"]);
    assert_eq!(room["is_group_chat"], json!(false));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn messages_are_delivered_and_counted_unread(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let outsider = app.register("chen").await?;
    let (_, room) = app
        .post("/api/chats", asha, Some(json!({ "participants": [bilal] })))
        .await?;
    let room_id = string_field(&room, "id")?;
    let messages = format!("/api/chats/{room_id}/messages");

    let (sent, message) = app
        .post(&messages, asha, Some(json!({ "message": "Meeting at six?" })))
        .await?;
    let (blank, _) = app
        .post(&messages, asha, Some(json!({ "message": "  " })))
        .await?;
    let (intruder, _) = app
        .post(&messages, outsider, Some(json!({ "message": "hello" })))
        .await?;
    let (_, listed) = app.get("/api/chats", Some(bilal)).await?;
    let (_, opened) = app.get(&format!("/api/chats/{room_id}"), Some(bilal)).await?;
    let (_, relisted) = app.get("/api/chats", Some(bilal)).await?;
    let (_, inbox) = app.get("/api/notifications", Some(bilal)).await?;

    assert_eq!(sent, StatusCode::CREATED);
    assert_eq!(message["message"], json!("Meeting at six?"));
    assert_eq!(blank, StatusCode::BAD_REQUEST);
    assert_eq!(intruder, StatusCode::NOT_FOUND);
    assert_eq!(listed[0]["unread"], json!(1));
    assert_eq!(listed[0]["display_name"], json!("asha"));
    assert_eq!(listed[0]["latest_message"]["message"], json!("Meeting at six?"));
    assert_eq!(opened["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(relisted[0]["unread"], json!(0));
    assert_eq!(inbox["notifications"][0]["notification_type"], json!("message"));
    assert_eq!(inbox["notifications"][0]["room_id"], json!(room_id));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_membership_is_managed_by_the_creator(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let chen = app.register("chen").await?;
    let (_, room) = app
        .post(
            "/api/chats",
            asha,
            Some(json!({
                "participants": [bilal],
                "is_group_chat": true,
                "name": "Ward 12",
            })),
        )
        .await?;
    let room_id = string_field(&room, "id")?;
    let members = format!("/api/chats/{room_id}/members");

    let (denied, _) = app
        .post(&members, bilal, Some(json!({ "members": [chen] })))
        .await?;
    let (_, grown) = app
        .post(&members, asha, Some(json!({ "members": [chen] })))
        .await?;
    let (_, shrunk) = app
        .send(
            Method::DELETE,
            &format!("{members}/{bilal}"),
            Some(asha),
            None,
        )
        .await?;
    let (self_removal, _) = app
        .send(
            Method::DELETE,
            &format!("{members}/{asha}"),
            Some(asha),
            None,
        )
        .await?;

    assert_eq!(room["name"], json!("Ward 12"));
    assert_eq!(denied, StatusCode::FORBIDDEN);
    assert_eq!(grown["participants"].as_array().map(Vec::len), Some(3));
    assert_eq!(shrunk["participants"].as_array().map(Vec::len), Some(2));
    assert_eq!(self_removal, StatusCode::BAD_REQUEST);
    Ok(())
}
