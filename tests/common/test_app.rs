use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::TimeDelta;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use movie_catalog_service::infrastructure::{
    auth::TokenCodec,
    config::{
        AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, RuntimeMode, ServerConfig,
    },
    http::create_app,
};
use movie_catalog_service::presentation::handlers::AppState;

use super::fixtures::InMemoryCatalog;

pub const TEST_SECRET: &str = "api-test-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, operation_timeout_seconds: 5 },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_seconds: 1,
            host: "localhost".to_string(),
            port: 5432,
            database: "unused".to_string(),
            user: "unused".to_string(),
            password: String::new(),
        },
        auth: AuthConfig { jwt_secret: TEST_SECRET.to_string(), token_ttl_hours: 24 },
        logging: LoggingConfig { level: "debug".to_string(), filter: None, format: LogFormat::Compact },
    }
}

pub struct TestApp {
    pub router: Router,
    pub catalog: InMemoryCatalog,
}

impl TestApp {
    pub fn new() -> Self {
        let catalog = InMemoryCatalog::new();
        let state = AppState {
            ratings: Arc::new(catalog.clone()),
            credentials: Arc::new(catalog.clone()),
            codec: TokenCodec::new(TEST_SECRET),
            token_ttl: TimeDelta::hours(24),
        };
        Self { router: create_app(&test_config(), state), catalog }
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .uri("/auth/login")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder().uri(path).method("GET").body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn json(&self, method: &str, path: &str, token: Option<&str>, body: &Value) -> TestResponse {
        let mut builder = Request::builder()
            .uri(path)
            .method(method)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}
