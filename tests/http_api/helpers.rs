//! Shared helpers for driving the router in tests.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use civic_resolve::{
    account::domain::UserId,
    config::AppConfig,
    http::{ACTOR_HEADER, AppState, router},
};
use eyre::{OptionExt, Result, WrapErr};
use http_body_util::BodyExt;
use rstest::fixture;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Router plus the state behind it.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

/// Provides an application over fresh in-memory stores.
#[fixture]
pub fn app() -> TestApp {
    let state = AppState::in_memory(&AppConfig::default());
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Sends a request and returns the status with the decoded JSON body.
    ///
    /// Empty bodies decode to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body is not
    /// JSON.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        actor: Option<UserId>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header(ACTOR_HEADER, actor.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        if bytes.is_empty() {
            return Ok((status, Value::Null));
        }
        let value = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("response to {uri} is not JSON"))?;
        Ok((status, value))
    }

    /// Sends an anonymous `GET` and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not UTF-8.
    pub async fn text(&self, uri: &str) -> Result<(StatusCode, String)> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, String::from_utf8(bytes.to_vec())?))
    }

    /// Sends a `GET` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Propagates [`TestApp::send`] failures.
    pub async fn get(&self, uri: &str, actor: Option<UserId>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, actor, None).await
    }

    /// Sends a `POST` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Propagates [`TestApp::send`] failures.
    pub async fn post(
        &self,
        uri: &str,
        actor: UserId,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(actor), body).await
    }

    /// Registers a user and returns their identifier.
    ///
    /// # Errors
    ///
    /// Returns an error unless registration answers `201 Created`.
    pub async fn register(&self, username: &str) -> Result<UserId> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "username": username })),
            )
            .await?;
        eyre::ensure!(status == StatusCode::CREATED, "registration failed: {body}");
        id_of(&body)
    }

    /// Registers a leader operated by `account` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error unless registration answers `201 Created`.
    pub async fn leader(&self, name: &str, account: UserId) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/leaders",
                account,
                Some(json!({
                    "name": name,
                    "designation": "Ward Councillor",
                    "account_id": account,
                })),
            )
            .await?;
        eyre::ensure!(status == StatusCode::CREATED, "leader registration failed: {body}");
        string_field(&body, "id")
    }

    /// Submits an issue and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error unless submission answers `201 Created`.
    pub async fn submit(&self, reporter: UserId, leader: &str, title: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/issues",
                reporter,
                Some(json!({
                    "title": title,
                    "description": "Reported on the evening walk, needs attention",
                    "latitude": 12.97,
                    "longitude": 77.59,
                    "leader_id": leader,
                })),
            )
            .await?;
        eyre::ensure!(status == StatusCode::CREATED, "submission failed: {body}");
        string_field(&body, "id")
    }
}

/// Reads a string field from a JSON object.
///
/// # Errors
///
/// Returns an error when the field is missing or not a string.
pub fn string_field(body: &Value, field: &str) -> Result<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_eyre(format!("missing string field {field} in {body}"))
}

/// Reads the `id` field as a user identifier.
///
/// # Errors
///
/// Returns an error when the field is missing or not a UUID.
pub fn id_of(body: &Value) -> Result<UserId> {
    let id = body.get("id").cloned().ok_or_eyre("missing id")?;
    Ok(serde_json::from_value(id)?)
}
