//! Issue submission, resolution, engagement and hashtag tests.

use super::helpers::{TestApp, app, string_field};
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

fn statuses(body: &Value) -> Vec<&str> {
    body.as_array()
        .map(|issues| {
            issues
                .iter()
                .filter_map(|issue| issue["status"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_is_solved_after_leader_and_reporter_agree(app: TestApp) -> eyre::Result<()> {
    let reporter = app.register("asha").await?;
    let official = app.register("ravi").await?;
    let bystander = app.register("bilal").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app
        .submit(reporter, &leader, "Broken streetlight near #park")
        .await?;

    let (denied, _) = app
        .post(&format!("/api/issues/{issue}/resolve"), bystander, None)
        .await?;
    let (_, pending) = app
        .post(&format!("/api/issues/{issue}/resolve"), official, None)
        .await?;
    let (wrong_confirmer, _) = app
        .post(&format!("/api/issues/{issue}/confirm"), official, None)
        .await?;
    let (_, solved) = app
        .post(&format!("/api/issues/{issue}/confirm"), reporter, None)
        .await?;
    let (_, repeated) = app
        .post(&format!("/api/issues/{issue}/confirm"), reporter, None)
        .await?;
    let (_, board) = app.get("/api/leaders", None).await?;

    assert_eq!(denied, StatusCode::FORBIDDEN);
    assert_eq!(pending["issue"]["status"], json!("pending_confirm"));
    assert_eq!(pending["previous_status"], json!("open"));
    assert_eq!(wrong_confirmer, StatusCode::FORBIDDEN);
    assert_eq!(solved["issue"]["status"], json!("solved"));
    assert_eq!(solved["issue"]["status_label"], json!("Solved"));
    assert_eq!(solved["previous_status"], json!("pending_confirm"));
    assert_eq!(repeated["changed"], json!(false));
    assert_eq!(board[0]["solved_problems"], json!(1));
    assert_eq!(board[0]["name"], json!("Ravi Kumar"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn feed_and_mine_list_submitted_issues(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    app.submit(asha, &leader, "Overflowing garbage bin").await?;
    app.submit(bilal, &leader, "Broken park bench seat").await?;

    let (_, feed) = app.get("/api/issues", None).await?;
    let (_, mine) = app.get("/api/issues/mine", Some(asha)).await?;

    assert_eq!(statuses(&feed), vec!["open", "open"]);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["title"], json!("Overflowing garbage bin"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn public_views_hide_the_reporter(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app
        .submit(asha, &leader, "Leaking water main #pipes")
        .await?;
    let reporter = asha.to_string();
    let tag = reporter.get(reporter.len() - 4..).unwrap_or_default();

    let (_, feed) = app.get("/api/issues", None).await?;
    let (_, tagged) = app.get("/api/hashtags/pipes/issues", None).await?;
    let (_, seen_by_other) = app.get(&format!("/api/issues/{issue}"), Some(bilal)).await?;
    let (_, seen_by_owner) = app.get(&format!("/api/issues/{issue}"), Some(asha)).await?;
    let (_, mine) = app.get("/api/issues/mine", Some(asha)).await?;

    for public in [&feed[0], &tagged["issues"][0], &seen_by_other] {
        assert_eq!(public["reporter_tag"], json!(tag));
        assert!(public.get("reporter_id").is_none());
    }
    assert_eq!(seen_by_owner["reporter_id"], json!(reporter));
    assert_eq!(mine[0]["reporter_id"], json!(reporter));
    assert_eq!(mine[0]["reporter_tag"], json!(tag));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_submissions_are_rejected(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let submit = |title: &str, latitude: f64| {
        json!({
            "title": title,
            "description": "Seen near the bus depot on Monday",
            "latitude": latitude,
            "longitude": 77.59,
            "leader_id": leader,
        })
    };

    let (abusive, reason) = app
        .post("/api/issues", asha, Some(submit("This drive is a total scam", 12.9)))
        .await?;
    let (bad_location, _) = app
        .post("/api/issues", asha, Some(submit("Pothole on the ring road", 95.0)))
        .await?;
    let (_, feed) = app.get("/api/issues", None).await?;

    assert_eq!(abusive, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reason["error"].is_string());
    assert_eq!(bad_location, StatusCode::BAD_REQUEST);
    assert_eq!(feed, json!([]));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detail_reports_viewer_engagement(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app.submit(asha, &leader, "Overflowing garbage bin").await?;

    let (_, liked) = app
        .post(&format!("/api/issues/{issue}/like"), bilal, None)
        .await?;
    let (_, bookmarked) = app
        .post(&format!("/api/issues/{issue}/bookmark"), bilal, None)
        .await?;
    let (_, as_bilal) = app.get(&format!("/api/issues/{issue}"), Some(bilal)).await?;
    let (_, anonymous) = app.get(&format!("/api/issues/{issue}"), None).await?;
    let (_, saved) = app.get("/api/bookmarks", Some(bilal)).await?;

    assert_eq!(liked, json!({ "liked": true, "like_count": 1 }));
    assert_eq!(bookmarked, json!({ "bookmarked": true }));
    assert_eq!(as_bilal["engagement"]["liked"], json!(true));
    assert_eq!(as_bilal["engagement"]["bookmarked"], json!(true));
    assert_eq!(anonymous["engagement"]["like_count"], json!(1));
    assert_eq!(anonymous["engagement"]["liked"], json!(false));
    assert_eq!(saved[0]["id"], json!(issue));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn flags_count_once_per_user(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app.submit(asha, &leader, "Overflowing garbage bin").await?;
    let path = format!("/api/issues/{issue}/flag");

    let (_, first) = app.post(&path, bilal, None).await?;
    let (_, repeat) = app.post(&path, bilal, None).await?;

    assert_eq!(first, json!({ "flag_count": 1, "counted": true }));
    assert_eq!(repeat, json!({ "flag_count": 1, "counted": false }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_threaded(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let bilal = app.register("bilal").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app.submit(asha, &leader, "Overflowing garbage bin").await?;

    let (created, root) = app
        .post(
            &format!("/api/issues/{issue}/comments"),
            bilal,
            Some(json!({ "content": "Same on my street @asha" })),
        )
        .await?;
    let root_id = string_field(&root, "id")?;
    let (replied, reply) = app
        .post(
            &format!("/api/comments/{root_id}/replies"),
            asha,
            Some(json!({ "content": "Thanks, adding photos" })),
        )
        .await?;
    let (_, comment_like) = app
        .post(&format!("/api/comments/{root_id}/like"), asha, None)
        .await?;
    let (blank, _) = app
        .post(
            &format!("/api/issues/{issue}/comments"),
            bilal,
            Some(json!({ "content": "   " })),
        )
        .await?;
    let (_, threads) = app
        .get(&format!("/api/issues/{issue}/comments"), None)
        .await?;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(replied, StatusCode::CREATED);
    assert_eq!(reply["parent_id"], json!(root_id));
    assert_eq!(comment_like, json!({ "liked": true, "like_count": 1 }));
    assert_eq!(blank, StatusCode::BAD_REQUEST);
    assert_eq!(threads.as_array().map(Vec::len), Some(1));
    assert_eq!(threads[0]["id"], json!(root_id));
    assert_eq!(threads[0]["like_count"], json!(1));
    assert_eq!(threads[0]["replies"][0]["content"], json!("Thanks, adding photos"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hashtags_list_tagged_issues(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let official = app.register("ravi").await?;
    let leader = app.leader("Ravi Kumar", official).await?;
    let issue = app
        .submit(asha, &leader, "Check the #Pothole and #roadrepair issue")
        .await?;

    let (_, tagged) = app.get("/api/hashtags/pothole/issues", None).await?;
    let (_, unused) = app.get("/api/hashtags/Nowhere/issues", None).await?;

    assert_eq!(tagged["hashtag"], json!("pothole"));
    assert_eq!(tagged["usage_count"], json!(1));
    assert_eq!(tagged["issues"][0]["id"], json!(issue));
    assert_eq!(
        unused,
        json!({ "hashtag": "nowhere", "usage_count": 0, "issues": [] })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_issue_is_not_found(app: TestApp) -> eyre::Result<()> {
    let asha = app.register("asha").await?;
    let missing = uuid::Uuid::new_v4();

    let (detail, _) = app.get(&format!("/api/issues/{missing}"), None).await?;
    let (like, _) = app
        .post(&format!("/api/issues/{missing}/like"), asha, None)
        .await?;
    let (malformed, _) = app.get("/api/issues/not-a-uuid", None).await?;

    assert_eq!(detail, StatusCode::NOT_FOUND);
    assert_eq!(like, StatusCode::NOT_FOUND);
    assert_eq!(malformed, StatusCode::BAD_REQUEST);
    Ok(())
}
