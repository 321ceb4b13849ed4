//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use pulse_core::config::app::ServerConfig;
use pulse_core::config::channels::ChannelsConfig;
use pulse_core::config::logging::LoggingConfig;
use pulse_core::config::realtime::RealtimeConfig;
use pulse_core::config::worker::WorkerConfig;
use pulse_core::config::{AppConfig, DatabaseConfig};
use pulse_database::MemoryStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-memory store for direct row inspection
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Create a test application over the in-memory store.
    ///
    /// The channel registry carries the real senders: the SMS gateway is
    /// left unconfigured and the contact directory empty, so SMS sends fail
    /// with "No phone number on file" without touching the network.
    pub fn new() -> Self {
        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            channels: ChannelsConfig::default(),
            realtime: RealtimeConfig::default(),
            worker: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        };

        let store = Arc::new(MemoryStore::new());
        let directory = Arc::new(pulse_channels::StaticDirectory::new());
        let registry = Arc::new(
            pulse_channels::ChannelRegistry::new()
                .register(Arc::new(pulse_channels::InAppSender::new()))
                .register(Arc::new(pulse_channels::PushSender::new(
                    config.channels.push.clone(),
                )))
                .register(Arc::new(pulse_channels::SmsSender::new(
                    config.channels.sms.clone(),
                    directory as _,
                )))
                .register(Arc::new(pulse_channels::EmailSender::new())),
        );

        let feed = Arc::new(pulse_realtime::NotificationFeed::new(
            config.realtime.feed_buffer_size,
        ));
        let engine = Arc::new(pulse_dispatch::DispatchEngine::new(
            Arc::clone(&store) as _,
            registry,
            Arc::clone(&feed),
        ));
        let retention = Arc::new(pulse_dispatch::ReadRetentionManager::new(
            Arc::clone(&store) as _,
        ));

        let app_state = pulse_api::AppState {
            config: Arc::new(config),
            store: Arc::clone(&store) as _,
            feed,
            engine,
            retention,
        };

        let router = pulse_api::build_router(app_state);

        Self { router, store }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
