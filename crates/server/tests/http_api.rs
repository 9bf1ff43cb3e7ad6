//! HTTP API tests against a server bound to an ephemeral port

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use calorisensei_config::Settings;
use calorisensei_llm::{CompletionBackend, CompletionRequest, LlmError};
use calorisensei_persistence::{
    HealthMirror, HealthRecord, HealthSource, HealthSummary, InMemoryStore, PersistenceError,
};
use calorisensei_server::{create_router, AppState};

struct CountingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionBackend for CountingBackend {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("Squats and lunges.".to_string())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

struct StaticHealth;

#[async_trait]
impl HealthSource for StaticHealth {
    async fn fetch(&self) -> Result<HealthRecord, PersistenceError> {
        Ok(HealthRecord {
            health_data: HealthSummary {
                daily_calories: 2100.0,
                daily_protein: 110.0,
                bmi: 22.0,
            },
        })
    }
}

async fn spawn_server() -> (SocketAddr, Arc<CountingBackend>) {
    spawn_server_with(Settings::default()).await
}

async fn spawn_server_with(settings: Settings) -> (SocketAddr, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend {
        calls: AtomicUsize::new(0),
    });
    let mirror = HealthMirror::new(Arc::new(InMemoryStore::new()), Arc::new(StaticHealth));
    let state = AppState::new(settings, backend.clone(), mirror);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    (addr, backend)
}

async fn new_session(client: &reqwest::Client, addr: SocketAddr) -> String {
    let created: Value = client
        .post(format!("http://{}/api/sessions", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    created["session_id"].as_str().unwrap().to_string()
}

/// Creating a session returns the welcome message
#[tokio::test]
async fn test_create_session() {
    let (addr, _) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/sessions", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["sender"], "ai");
}

/// Messages are answered and repeated questions come from the cache
#[tokio::test]
async fn test_send_message_and_cache() {
    let (addr, backend) = spawn_server().await;
    let client = reqwest::Client::new();
    let id = new_session(&client, addr).await;
    let url = format!("http://{}/api/sessions/{}/messages", addr, id);

    for _ in 0..2 {
        let body: Value = client
            .post(&url)
            .json(&json!({ "message": "best leg exercises" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(body["reply"]["text"]
            .as_str()
            .unwrap()
            .starts_with("Squats and lunges."));
        assert_eq!(body["status"]["typing"], false);
    }
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

    let body: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["messages"].as_array().unwrap().len(), 5);
}

/// Empty messages are accepted but produce no reply
#[tokio::test]
async fn test_empty_message() {
    let (addr, backend) = spawn_server().await;
    let client = reqwest::Client::new();
    let id = new_session(&client, addr).await;

    let body: Value = client
        .post(format!("http://{}/api/sessions/{}/messages", addr, id))
        .json(&json!({ "message": "   " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["reply"].is_null());
    assert_eq!(body["status"]["message_count"], 1);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

/// Connectivity events drive the banner; reset clears it
#[tokio::test]
async fn test_connectivity_and_reset() {
    let (addr, _) = spawn_server().await;
    let client = reqwest::Client::new();
    let id = new_session(&client, addr).await;

    let status: Value = client
        .post(format!("http://{}/api/connectivity/{}", addr, id))
        .json(&json!({ "online": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["online"], false);
    assert!(status["banner"]
        .as_str()
        .unwrap()
        .starts_with("Network connection lost"));

    let status: Value = client
        .post(format!("http://{}/api/sessions/{}/reset", addr, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(status["banner"].is_null());
    assert_eq!(status["message_count"], 1);
}

/// Unknown sessions are 404
#[tokio::test]
async fn test_unknown_session() {
    let (addr, _) = spawn_server().await;
    let response = reqwest::get(format!("http://{}/api/sessions/nope/status", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

/// Health summary and liveness endpoints
#[tokio::test]
async fn test_health_endpoints() {
    let (addr, _) = spawn_server().await;

    let body: Value = reqwest::get(format!("http://{}/api/health-data", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["healthData"]["dailyCalories"], 2100.0);

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

/// Deleted sessions are gone; deleting twice is a 404
#[tokio::test]
async fn test_delete_session() {
    let (addr, _) = spawn_server().await;
    let client = reqwest::Client::new();
    let id = new_session(&client, addr).await;
    let url = format!("http://{}/api/sessions/{}", addr, id);

    let response = client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/messages", url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

/// New sessions are refused at the limit until one is deleted
#[tokio::test]
async fn test_session_limit() {
    let mut settings = Settings::default();
    settings.server.max_sessions = 3;
    let (addr, _) = spawn_server_with(settings).await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(new_session(&client, addr).await);
    }

    let response = client
        .post(format!("http://{}/api/sessions", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);

    client
        .delete(format!("http://{}/api/sessions/{}", addr, ids[0]))
        .send()
        .await
        .unwrap();
    let response = client
        .post(format!("http://{}/api/sessions", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["sessions"], 3);
}
