//! Application harness
//!
//! Every `TestApp` owns a fresh database (`sqlite::memory:` unless a test
//! asks for a file) and a temporary public directory, so tests never share
//! state.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, HOST},
        Method, Request, StatusCode,
    },
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use palaver::backend::server::{create_app, ServerConfig};

pub const TEST_HOST: &str = "chat.test";
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// `error.message` of an error body
    pub fn error_message(&self) -> &str {
        self.body["error"]["message"].as_str().unwrap_or_default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub config: ServerConfig,
    _public_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Start an app on a WAL database file inside the temporary directory
    pub async fn file_backed() -> Self {
        Self::with_config(|config| {
            let path = config.public_dir.join("palaver-test.db");
            config.database_url = format!("sqlite://{}?mode=rwc", path.display());
        })
        .await
    }

    /// Start an app after adjusting the test configuration
    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let public_dir = TempDir::new().expect("Failed to create public dir");
        let mut config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            bcrypt_cost: 4,
            public_dir: public_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        adjust(&mut config);

        let (router, pool) = create_app(config.clone())
            .await
            .expect("Failed to create test app");

        Self {
            router,
            pool,
            config,
            _public_dir: public_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };

        TestResponse { status, body }
    }

    /// Send a JSON request, optionally authenticated
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri).header(HOST, TEST_HOST);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Option<Value>) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Send a multipart form built with [`MultipartBody`]
    pub async fn multipart(&self, method: Method, uri: &str, token: &str, form: MultipartBody) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(HOST, TEST_HOST)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", MultipartBody::BOUNDARY))
            .body(Body::from(form.finish()))
            .expect("Failed to build request");

        self.send(request).await
    }
}

/// Minimal multipart/form-data encoder
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub const BOUNDARY: &'static str = "palaver-test-boundary";

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        self.bytes
    }
}
