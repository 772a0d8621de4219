//! Registration, profile, follow and actor header tests.

use super::helpers::{TestApp, app, string_field};
use axum::http::{Method, StatusCode};
use civic_resolve::account::domain::UserId;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_answers(app: TestApp) -> eyre::Result<()> {
    let response = app.text("/health").await?;

    assert_eq!(response, (StatusCode::OK, "ok".to_owned()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_user_has_an_empty_profile(app: TestApp) -> eyre::Result<()> {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "username": "asha", "real_name": "Asha Rao" })),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(string_field(&body, "username")?, "asha");
    assert_eq!(string_field(&body, "real_name")?, "Asha Rao");
    assert_eq!(body["followers"], json!(0));
    assert_eq!(body["reputation"], json!(0));

    let id = string_field(&body, "id")?;
    let (shown, profile) = app.get(&format!("/api/users/{id}"), None).await?;
    assert_eq!(shown, StatusCode::OK);
    assert_eq!(profile["username"], json!("asha"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_and_invalid_usernames_are_rejected(app: TestApp) -> eyre::Result<()> {
    app.register("asha").await?;

    let (duplicate, error) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "username": "Asha" })),
        )
        .await?;
    let (invalid, _) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "username": "two words" })),
        )
        .await?;

    assert_eq!(duplicate, StatusCode::CONFLICT);
    assert!(error["error"].is_string());
    assert_eq!(invalid, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actor_header_is_required(app: TestApp) -> eyre::Result<()> {
    let (missing, _) = app.get("/api/issues/mine", None).await?;
    let (unknown, _) = app
        .send(
            Method::PUT,
            "/api/users/me/bio",
            Some(UserId::new()),
            Some(json!({ "bio": "hello" })),
        )
        .await?;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn follow_and_unfollow_round_trip(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let path = format!("/api/users/{bilal}/follow");

    let (followed, first) = app.post(&path, asha, None).await?;
    let (_, repeat) = app.post(&path, asha, None).await?;
    let (_, profile) = app.get(&format!("/api/users/{bilal}"), None).await?;
    let (unfollowed, undone) = app.send(Method::DELETE, &path, Some(asha), None).await?;
    let (own, _) = app
        .post(&format!("/api/users/{asha}/follow"), asha, None)
        .await?;

    assert_eq!(followed, StatusCode::OK);
    assert_eq!(first, json!({ "following": true, "changed": true }));
    assert_eq!(repeat, json!({ "following": true, "changed": false }));
    assert_eq!(profile["followers"], json!(1));
    assert_eq!(unfollowed, StatusCode::OK);
    assert_eq!(undone, json!({ "following": false, "changed": true }));
    assert_eq!(own, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bio_update_is_visible_on_the_profile(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/me/bio",
            Some(asha),
            Some(json!({ "bio": "Ward 12 volunteer" })),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], json!("Ward 12 volunteer"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leader_with_unknown_account_is_rejected(app: TestApp) -> eyre::Result<()> {
    let stranger = UserId::new();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/leaders",
            None,
            Some(json!({
                "name": "Ghost",
                "designation": "Mayor",
                "account_id": stranger,
            })),
        )
        .await?;
    let (_, board) = app.get("/api/leaders", None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(board, json!([]));
    Ok(())
}
