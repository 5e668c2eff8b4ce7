//! HTTP surface.
//!
//! | Route | Auth | Purpose |
//! |---|---|---|
//! | `GET /users` | none | list tracked users |
//! | `POST /users` | none | append a user |
//! | `GET /progress` | none | live progress for every user |
//! | `POST /trigger-update` | Basic | fetch progress and email the digest |
//!
//! `/trigger-update` runs the whole update cycle inside the request, so the
//! caller (usually a cron job) sees aggregation failures directly.

pub mod auth;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::Result;
use crate::models::Settings;

pub use state::AppState;

/// Build the application router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/users", get(routes::list_users).post(routes::add_user))
        .route("/progress", get(routes::get_progress))
        .route("/trigger-update", post(routes::trigger_update))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings) -> Result<()> {
    tracing::info!("Initializing state...");
    let state = AppState::from_settings(settings)?;

    // Fail at startup rather than on the first request.
    let users = state.store.load().await?;
    tracing::info!(
        "Tracking {} users from {}",
        users.users.len(),
        settings.storage.users_file
    );

    let app = build_router(state);

    let address = settings.bind_address();
    tracing::info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use base64::{Engine, engine::general_purpose::STANDARD};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::models::{AuthConfig, EmailConfig, UserRecord, UsersDocument};
    use crate::services::{EmailDispatcher, ProgressAggregator};
    use crate::storage::{UserStore, YamlUserStore};
    use crate::test_support::{FakeLeetCode, RecordingSender};

    struct Harness {
        _tmp: TempDir,
        router: Router,
        store: Arc<YamlUserStore>,
        sender: Arc<RecordingSender>,
    }

    async fn harness(
        users: &[(&str, &str)],
        api: FakeLeetCode,
        sender: RecordingSender,
    ) -> Harness {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(YamlUserStore::new(tmp.path().join("config.yml")));
        store
            .save(&UsersDocument {
                users: users
                    .iter()
                    .map(|(name, email)| UserRecord::new(*name, *email))
                    .collect(),
            })
            .await
            .unwrap();

        let sender = Arc::new(sender);
        let state = Arc::new(AppState {
            store: store.clone(),
            aggregator: ProgressAggregator::new(Arc::new(api), 2),
            dispatcher: EmailDispatcher::new(sender.clone(), &EmailConfig::default()),
            auth: AuthConfig {
                username: "cron".to_string(),
                password: "pw".to_string(),
            },
        });

        Harness {
            _tmp: tmp,
            router: build_router(state),
            store,
            sender,
        }
    }

    fn alice_and_bob() -> FakeLeetCode {
        FakeLeetCode::default()
            .with_user(
                "alice",
                json!({ "totalSolved": 42, "recentSubmissions": ["a", "b", "c", "d", "e", "f"] }),
                json!({ "streak": 7 }),
            )
            .with_user("bob", json!({ "recentSubmissions": [] }), json!({ "streak": 1 }))
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn response_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn trigger(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/trigger-update");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(&h.router, Request::get("/users").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_add_then_list_appends_in_order() {
        let h = harness(
            &[("alice", "alice@example.com")],
            FakeLeetCode::default(),
            RecordingSender::default(),
        )
        .await;

        let response = send(
            &h.router,
            post_json(
                "/users",
                json!({ "leetcode_username": "bob", "email": "bob@example.com" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!({ "message": "User added successfully" })
        );

        let response = send(&h.router, Request::get("/users").body(Body::empty()).unwrap()).await;
        assert_eq!(
            response_json(response).await,
            json!([
                { "leetcode_username": "alice", "email": "alice@example.com" },
                { "leetcode_username": "bob", "email": "bob@example.com" }
            ])
        );
    }

    #[tokio::test]
    async fn test_add_user_rejects_bad_email() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(
            &h.router,
            post_json("/users", json!({ "leetcode_username": "bob", "email": "bob" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(h.store.load().await.unwrap().users.is_empty());
    }

    #[tokio::test]
    async fn test_add_user_rejects_missing_field() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(
            &h.router,
            post_json("/users", json!({ "leetcode_username": "bob" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response_json(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_add_user_ignores_extra_body_keys() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(
            &h.router,
            post_json(
                "/users",
                json!({ "leetcode_username": "bob", "email": "bob@example.com", "nickname": "b" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let users = h.store.load().await.unwrap().users;
        assert_eq!(users, vec![UserRecord::new("bob", "bob@example.com")]);
    }

    #[tokio::test]
    async fn test_progress_returns_records() {
        let h = harness(
            &[("alice", "alice@example.com"), ("bob", "bob@example.com")],
            alice_and_bob(),
            RecordingSender::default(),
        )
        .await;

        let response = send(
            &h.router,
            Request::get("/progress").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!([
                {
                    "username": "alice",
                    "solved_count": 42,
                    "recent_problems": ["a", "b", "c", "d", "e"],
                    "current_streak": 7
                },
                {
                    "username": "bob",
                    "solved_count": 0,
                    "recent_problems": [],
                    "current_streak": 1
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_progress_unknown_user_is_404() {
        let h = harness(
            &[("ghost", "ghost@example.com")],
            alice_and_bob(),
            RecordingSender::default(),
        )
        .await;

        let response = send(
            &h.router,
            Request::get("/progress").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trigger_without_credentials_is_401() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(&h.router, trigger(None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .unwrap()
                .to_str()
                .unwrap(),
            "Basic"
        );
    }

    #[tokio::test]
    async fn test_trigger_wrong_password_is_401() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(&h.router, trigger(Some(&basic("cron", "nope")))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_trigger_sends_digest_to_everyone() {
        let h = harness(
            &[("alice", "alice@example.com"), ("bob", "bob@example.com")],
            alice_and_bob(),
            RecordingSender::default(),
        )
        .await;

        let response = send(&h.router, trigger(Some(&basic("cron", "pw")))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!({ "message": "Update triggered and emails sent" })
        );

        assert_eq!(
            h.sender.attempted(),
            vec!["alice@example.com".to_string(), "bob@example.com".to_string()]
        );
        let attempts = h.sender.attempts.lock().unwrap();
        assert!(attempts[0].text.starts_with("LeetCode Progress Update\n\nUser: alice\n"));
        assert_eq!(attempts[0].text, attempts[1].text);
    }

    #[tokio::test]
    async fn test_trigger_aborts_when_a_profile_fails() {
        let h = harness(
            &[("alice", "alice@example.com"), ("ghost", "ghost@example.com")],
            alice_and_bob(),
            RecordingSender::default(),
        )
        .await;

        let response = send(&h.router, trigger(Some(&basic("cron", "pw")))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(h.sender.attempted().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_succeeds_despite_send_failure() {
        let h = harness(
            &[("alice", "alice@example.com"), ("bob", "bob@example.com")],
            alice_and_bob(),
            RecordingSender::failing_for(&["alice@example.com"]),
        )
        .await;

        let response = send(&h.router, trigger(Some(&basic("cron", "pw")))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.sender.attempted().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_users_file_is_422() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        tokio::fs::write(h.store.path(), "users: []\nowner: me\n")
            .await
            .unwrap();

        let response = send(&h.router, Request::get("/users").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let h = harness(&[], FakeLeetCode::default(), RecordingSender::default()).await;
        let response = send(
            &h.router,
            Request::get("/users")
                .header(header::ORIGIN, "https://buddies.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap()
                .to_str()
                .unwrap(),
            "*"
        );
    }
}
