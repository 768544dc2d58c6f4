//! End-to-end tests for the Discord router against a fake Discord API,
//! with the in-memory store standing in for MongoDB.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use venue_gateway::discord::{
    DiscordHttp, Harvester, HarvesterDefaults, MemoryStore, MessageStore, Scheduler,
};
use venue_gateway::server::{discord_router, DiscordState};

const TOKEN: &str = "user-token";
const CHANNEL: &str = "1100";
const TRADER: &str = "42";

fn channel_page() -> Value {
    json!([
        {
            "id": "3", "author": {"id": TRADER, "username": "trader"},
            "content": "TP hit", "timestamp": "2024-03-01T10:20:00+00:00",
            "message_reference": {"message_id": "1"},
            "referenced_message": {
                "id": "1", "author": {"id": TRADER, "username": "trader"},
                "content": "Long BTC 60000", "timestamp": "2024-03-01T10:00:00+00:00"
            }
        },
        {
            "id": "2", "author": {"id": "7", "username": "someone"},
            "content": "nice", "timestamp": "2024-03-01T10:02:00+00:00"
        },
        {
            "id": "1", "author": {"id": TRADER, "username": "trader"},
            "content": "Long BTC 60000", "timestamp": "2024-03-01T10:00:00+00:00",
            "attachments": [{"url": "https://cdn.example/chart.png"}]
        }
    ])
}

async fn messages(State(calls): State<Arc<AtomicU32>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    calls.fetch_add(1, Ordering::SeqCst);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(TOKEN) => (StatusCode::OK, Json(channel_page())),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "401: Unauthorized"}))),
    }
}

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    scheduler: Arc<Scheduler>,
    calls: Arc<AtomicU32>,
}

async fn harness(defaults: HarvesterDefaults) -> Harness {
    let calls = Arc::new(AtomicU32::new(0));
    let fake = Router::new()
        .route("/channels/:id/messages", get(messages))
        .with_state(Arc::clone(&calls));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake).await.unwrap();
    });

    let store = Arc::new(MemoryStore::new());
    let discord = DiscordHttp::new(Some(&format!("http://{addr}"))).unwrap();
    let harvester = Arc::new(Harvester::new(discord, store.clone(), defaults));
    let scheduler = Arc::new(Scheduler::new(Arc::clone(&harvester), Duration::from_secs(3600)));
    let app = discord_router(DiscordState {
        harvester,
        scheduler: Arc::clone(&scheduler),
    });
    Harness {
        app,
        store,
        scheduler,
        calls,
    }
}

fn configured() -> HarvesterDefaults {
    HarvesterDefaults {
        token: Some(TOKEN.to_string()),
        channel_id: Some(CHANNEL.to_string()),
        target_user_id: Some(TRADER.to_string()),
        limit: 100,
    }
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_fetch_and_save_is_idempotent() {
    let h = harness(configured()).await;

    let (status, body) = call(h.app.clone(), "POST", "/discord/messages/fetch-and-save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["username"], "trader");
    assert_eq!(body["message_count"], 2);
    // 20 minutes apart: two groups.
    assert_eq!(body["total_groups"], 2);
    assert_eq!(body["inserted_groups"], 2);
    assert_eq!(body["new_messages"], 2);

    let (_, body) = call(h.app.clone(), "POST", "/discord/messages/fetch-and-save", None).await;
    assert_eq!(body["inserted_groups"], 0);
    assert_eq!(body["new_messages"], 0);
    assert_eq!(h.store.len().await, 2);
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);

    let (status, body) = call(h.app.clone(), "GET", "/discord/messages/latest?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (_, body) = call(h.app, "GET", &format!("/discord/messages/count/{TRADER}"), None).await;
    assert_eq!(body["data"], json!({"user_id": TRADER, "count": 2}));
}

#[tokio::test]
async fn test_fetch_returns_export_with_reply() {
    let h = harness(configured()).await;
    let (status, body) = call(h.app, "POST", "/discord/messages/fetch", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["exported_count"], 2);
    assert_eq!(data["timespan"]["from"], "01/03/2024 10:00");
    assert_eq!(data["timespan"]["to"], "01/03/2024 10:20");
    let newest = &data["message_groups"][0]["messages"][0];
    assert_eq!(newest["content"], "TP hit");
    assert_eq!(newest["reply_to"]["message_id"], "1");
    // The fetch endpoint saves as a side effect.
    assert_eq!(h.store.count_by_user(TRADER).await.unwrap(), 2);
}

#[tokio::test]
async fn test_missing_credentials_is_400() {
    let h = harness(HarvesterDefaults::default()).await;
    let (status, body) = call(h.app, "POST", "/discord/messages/fetch", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing required Discord credentials");
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_token_is_404() {
    let h = harness(configured()).await;
    let body = json!({"discord_token": "wrong"});
    let (status, body) = call(h.app, "POST", "/discord/messages/fetch-and-save", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No messages found or failed to fetch from Discord");
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_health_follows_scheduler() {
    let h = harness(configured()).await;
    let (_, body) = call(h.app.clone(), "GET", "/health", None).await;
    assert_eq!(body["discord_scheduler"], "stopped");

    h.scheduler.start().await;
    let (_, body) = call(h.app.clone(), "GET", "/health", None).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["discord_scheduler"], "running");

    h.scheduler.stop().await;
    let (_, body) = call(h.app, "GET", "/health", None).await;
    assert_eq!(body["discord_scheduler"], "stopped");
}

#[tokio::test]
async fn test_run_job_now_saves_configured_channel() {
    let h = harness(configured()).await;

    h.scheduler.run_job_now().await;
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.len().await, 2);

    // While running, the job is handed to the scheduler task.
    h.scheduler.start().await;
    h.scheduler.run_job_now().await;
    for _ in 0..50 {
        if h.calls.load(Ordering::SeqCst) == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    h.scheduler.stop().await;
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.store.len().await, 2);
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_fetching() {
    let h = harness(configured()).await;

    let truncated = Request::builder()
        .method("POST")
        .uri("/discord/messages/fetch")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"channel_id": 12345, "limit": "lots""#))
        .unwrap();
    let response = h.app.clone().oneshot(truncated).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mistyped = json!({"channel_id": 12345, "limit": "lots"});
    let (status, _) =
        call(h.app, "POST", "/discord/messages/fetch-and-save", Some(mistyped)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    assert!(h.store.is_empty().await);
}
