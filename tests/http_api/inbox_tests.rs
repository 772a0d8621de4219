//! Notification listing and acknowledgement tests.

use super::helpers::{TestApp, app, string_field};
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activity_lands_in_the_inbox(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app.submit(asha, &leader, "Overflowing garbage bin").await?;
    app.post(&format!("/api/users/{asha}/follow"), bilal, None)
        .await?;
    app.post(&format!("/api/issues/{issue}/like"), bilal, None)
        .await?;
    app.post(&format!("/api/issues/{issue}/like"), asha, None)
        .await?;

    let (status, inbox) = app.get("/api/notifications", Some(asha)).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox["unread"], json!(2));
    let kinds: Vec<&str> = inbox["notifications"]
        .as_array()
        .map(|notes| {
            notes
                .iter()
                .filter_map(|note| note["notification_type"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"follow"));
    assert!(kinds.contains(&"like"));
    assert!(
        inbox["notifications"]
            .as_array()
            .is_some_and(|notes| notes.iter().all(|note| note["sender_id"] == json!(bilal)))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn marking_read_is_limited_to_the_recipient(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    app.post(&format!("/api/users/{asha}/follow"), bilal, None)
        .await?;
    let (_, inbox) = app.get("/api/notifications", Some(asha)).await?;
    let note = string_field(&inbox["notifications"][0], "id")?;
    let path = format!("/api/notifications/{note}/read");

    let (foreign, _) = app.post(&path, bilal, None).await?;
    let (own, body) = app.post(&path, asha, None).await?;
    let (_, after) = app.get("/api/notifications", Some(asha)).await?;

    assert_eq!(foreign, StatusCode::NOT_FOUND);
    assert_eq!(own, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(after["unread"], json!(0));
    assert_eq!(after["notifications"][0]["is_read"], json!(true));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_all_reports_how_many_changed(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let chen = app.register("chen").await?;
    app.post(&format!("/api/users/{asha}/follow"), bilal, None)
        .await?;
    app.post(&format!("/api/users/{asha}/follow"), chen, None)
        .await?;

    let (_, first) = app.post("/api/notifications/read-all", asha, None).await?;
    let (_, second) = app.post("/api/notifications/read-all", asha, None).await?;

    assert_eq!(first, json!({ "marked": 2 }));
    assert_eq!(second, json!({ "marked": 0 }));
    Ok(())
}
