use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use toolsubmit::config::Config;
use toolsubmit::form_state::FORM_SESSION_COOKIE;
use toolsubmit::models::Submission;
use toolsubmit::state::SharedState;
use toolsubmit::submission::store::{StoreError, StoredSubmission, SubmissionStore};

pub const ONE_MB: usize = 1024 * 1024;

/// Store that counts how many submissions reached it.
#[derive(Default)]
pub struct CountingStore {
    pub saved: AtomicUsize,
}

impl CountingStore {
    pub fn count(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStore for CountingStore {
    async fn save(&self, _submission: &Submission) -> Result<StoredSubmission, StoreError> {
        self.saved.fetch_add(1, Ordering::SeqCst);
        Ok(StoredSubmission {
            id: Uuid::now_v7(),
            received_at: Utc::now(),
        })
    }
}

/// Store that always fails.
pub struct FailingStore;

#[async_trait]
impl SubmissionStore for FailingStore {
    async fn save(&self, _submission: &Submission) -> Result<StoredSubmission, StoreError> {
        Err(StoreError::from("disk on fire"))
    }
}

/// A running test server instance, seen through one browser.
///
/// The form-session cookie handed out by the server is replayed on every
/// later request, the way a browser would.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    #[allow(dead_code)]
    pub state: SharedState,
    session: Mutex<Option<String>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Another browser on the same machine: same server, no cookies.
    #[allow(dead_code)]
    pub fn other_browser(&self) -> TestApp {
        TestApp {
            addr: self.addr,
            client: Client::new(),
            state: self.state.clone(),
            session: Mutex::new(None),
        }
    }

    /// The form-session cookie value this browser holds, if any.
    #[allow(dead_code)]
    pub fn session(&self) -> Option<String> {
        self.session.lock().unwrap().clone()
    }

    async fn send(&self, req: RequestBuilder) -> (Value, StatusCode) {
        let req = match self.session() {
            Some(token) => req.header("cookie", format!("{FORM_SESSION_COOKIE}={token}")),
            None => req,
        };
        let resp = req.send().await.expect("request failed");

        for value in resp.headers().get_all("set-cookie") {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default();
            if let Some(token) = pair.strip_prefix(&format!("{FORM_SESSION_COOKIE}=")) {
                *self.session.lock().unwrap() = Some(token.to_string());
            }
        }

        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a tool listing as JSON, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url("/api/v1/tools")).json(data))
            .await
    }

    /// Submit a tool listing as multipart form data, return (body, status).
    #[allow(dead_code)]
    pub async fn submit_multipart(&self, form: Form) -> (Value, StatusCode) {
        self.send(self.client.post(self.url("/api/v1/tools")).multipart(form))
            .await
    }

    /// Make a GET request and return (body, status).
    pub async fn get_json(&self, path: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.url(path))).await
    }

    /// POST a JSON body to an arbitrary path, return (body, status).
    #[allow(dead_code)]
    pub async fn post_json(&self, path: &str, data: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url(path)).json(data)).await
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        ..Config::default()
    }
}

/// Spawn a test app backed by the given store.
pub async fn spawn_app_with(config: Config, store: Arc<dyn SubmissionStore>) -> TestApp {
    let (app, state) = toolsubmit::build_app(config, store);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
        session: Mutex::new(None),
    }
}

/// Spawn a test app with a counting store, returning both.
pub async fn spawn_app() -> (TestApp, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    let app = spawn_app_with(test_config(), store.clone()).await;
    (app, store)
}

/// Bytes that sniff as a PNG image, padded to `len`.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(len.max(data.len()), 0);
    data
}

/// Bytes that sniff as a JPEG image, padded to `len`.
#[allow(dead_code)]
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(len.max(data.len()), 0);
    data
}

/// A complete, valid JSON submission. Files are described, not uploaded.
pub fn valid_submission() -> Value {
    json!({
        "name": "Acme Writer",
        "website": "https://example.com",
        "tagline": "Write faster with AI",
        "description": "A writing assistant for busy people.",
        "categories": ["AI", "Writing"],
        "pricing": "Free",
        "homepageScreenshot": { "name": "home.png", "type": "image/png", "size": ONE_MB },
    })
}

/// A complete, valid multipart submission with a real screenshot upload.
#[allow(dead_code)]
pub fn valid_multipart() -> Form {
    Form::new()
        .text("name", "Acme Writer")
        .text("website", "https://example.com")
        .text("tagline", "Write faster with AI")
        .text("description", "A writing assistant for busy people.")
        .text("categories", "AI")
        .text("categories", "Writing")
        .text("pricing", "Freemium")
        .part(
            "homepageScreenshot",
            Part::bytes(png_bytes(ONE_MB))
                .file_name("home.png")
                .mime_str("image/png")
                .unwrap(),
        )
}
