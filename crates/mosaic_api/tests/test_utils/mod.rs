//! Test utilities for HTTP client tests.
//!
//! This module provides a loopback community server that records what the
//! client sends and answers with scripted responses.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use mosaic_api::{HttpCommunityApi, build_http_client};
use mosaic_core::ApiConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted answers of the loopback server.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Script {
    pub upload_status: StatusCode,
    pub post_reply: Value,
    pub rate_limit_status: StatusCode,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            upload_status: StatusCode::OK,
            post_reply: json!({ "itemId": 7 }),
            rate_limit_status: StatusCode::OK,
        }
    }
}

/// What the server received.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct Recorded {
    pub upload_content_type: Option<String>,
    pub upload_body: Vec<u8>,
    pub post_form: Option<HashMap<String, String>>,
}

#[allow(dead_code)]
impl Recorded {
    /// Multipart body as lowercase text, for header assertions.
    pub fn upload_text(&self) -> String {
        String::from_utf8_lossy(&self.upload_body).to_lowercase()
    }
}

/// Community server bound to an ephemeral loopback port.
pub struct LoopbackServer {
    base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

#[allow(dead_code)]
impl LoopbackServer {
    /// Serve `script` until the test runtime shuts down.
    pub async fn start(script: Script) -> anyhow::Result<Self> {
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let upload = {
            let recorded = recorded.clone();
            let status = script.upload_status;
            move |headers: HeaderMap, body: Bytes| async move {
                {
                    let mut recorded = recorded.lock().unwrap();
                    recorded.upload_content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    recorded.upload_body = body.to_vec();
                }
                (status, Json(json!({ "key": "remote-key-1" })))
            }
        };

        let finalize = {
            let recorded = recorded.clone();
            let reply = script.post_reply.clone();
            move |Form(form): Form<HashMap<String, String>>| async move {
                recorded.lock().unwrap().post_form = Some(form);
                Json(reply)
            }
        };

        let rate_limit_status = script.rate_limit_status;
        let app = Router::new()
            .route("/api/items/upload", post(upload))
            .route("/api/items/post", post(finalize))
            .route(
                "/api/items/ratelimited",
                get(move || async move { rate_limit_status }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            recorded,
        })
    }

    /// Client pointed at this server.
    pub fn api(&self) -> anyhow::Result<HttpCommunityApi> {
        let config = ApiConfig::new(self.base_url.clone());
        let client = build_http_client(&config)?;
        Ok(HttpCommunityApi::new(client, config))
    }

    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }
}
