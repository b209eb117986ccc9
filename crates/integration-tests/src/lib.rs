//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! Each test spawns the production router on an ephemeral port backed by an
//! in-memory `SQLite` database, then drives it over HTTP with `reqwest`.
//! No external services are required.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr};

use reqwest::Client;
use serde_json::{Value, json};
use stockroom_api::config::ApiConfig;
use stockroom_api::state::AppState;
use stockroom_api::{app, db};
use tokio::task::JoinHandle;

/// A running API server bound to an ephemeral localhost port.
///
/// The server task is aborted when the handle is dropped, so each test gets
/// an isolated database and no port collisions.
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn the full application router on `127.0.0.1:0` with a fresh
    /// in-memory database, migrations applied.
    pub async fn spawn() -> Self {
        let database_url = "sqlite::memory:".to_string();
        let pool = db::create_pool(&database_url)
            .await
            .expect("Failed to create test pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let config = ApiConfig {
            database_url,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            log_json: false,
        };
        let router = app(AppState::new(config, pool));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Full URL for a path like `/api/stores`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Test helper: Create a store and return its JSON body.
pub async fn create_store(client: &Client, server: &TestServer, name: &str) -> Value {
    let resp = client
        .post(server.url("/api/stores"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create store");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse store body")
}

/// Test helper: Create a product and return its JSON body.
pub async fn create_product(
    client: &Client,
    server: &TestServer,
    store_id: &str,
    name: &str,
    category: &str,
    price: f64,
    quantity: i64,
) -> Value {
    let resp = client
        .post(server.url("/api/products"))
        .json(&json!({
            "storeId": store_id,
            "name": name,
            "category": category,
            "price": price,
            "quantityInStock": quantity,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product body")
}
