//! Loopback community server for tests that go through `HttpCommunityApi`.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use mosaic_api::{HttpCommunityApi, build_http_client};
use mosaic_core::ApiConfig;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Requests seen by the server.
#[derive(Debug, Clone, Default)]
pub struct Seen {
    pub upload_content_type: Option<String>,
    pub upload_body: Vec<u8>,
    pub post_form: Option<HashMap<String, String>>,
}

/// Server answering uploads with `remote-key-1`, posts with item 7 and the
/// rate-limit endpoint with a fixed status.
pub struct LoopbackServer {
    base_url: String,
    seen: Arc<Mutex<Seen>>,
}

impl LoopbackServer {
    pub async fn start(rate_limit_status: StatusCode) -> anyhow::Result<Self> {
        let seen = Arc::new(Mutex::new(Seen::default()));

        let upload = {
            let seen = seen.clone();
            move |headers: HeaderMap, body: Bytes| async move {
                let mut seen = seen.lock().unwrap();
                seen.upload_content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                seen.upload_body = body.to_vec();
                Json(json!({ "key": "remote-key-1" }))
            }
        };
        let finalize = {
            let seen = seen.clone();
            move |Form(form): Form<HashMap<String, String>>| async move {
                seen.lock().unwrap().post_form = Some(form);
                Json(json!({ "itemId": 7 }))
            }
        };

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
            seen,
        })
    }

    pub fn api(&self) -> anyhow::Result<Arc<HttpCommunityApi>> {
        let config = ApiConfig::new(self.base_url.clone());
        let client = build_http_client(&config)?;
        Ok(Arc::new(HttpCommunityApi::new(client, config)))
    }

    pub fn seen(&self) -> Seen {
        self.seen.lock().unwrap().clone()
    }
}
