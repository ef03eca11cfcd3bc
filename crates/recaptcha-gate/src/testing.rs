//! In-process siteverify stand-in and gate server for tests.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{AppConfig, RecaptchaConfig};
use crate::routes;
use crate::state::AppState;

/// How the fake upstream answers every siteverify call
#[derive(Clone)]
pub enum UpstreamReply {
    /// 200 with a JSON body
    Json(serde_json::Value),
    /// 200 with an arbitrary body
    Raw(String),
    /// Arbitrary status and body
    Status(StatusCode, String),
    /// 200 with a JSON body, after a delay
    Delayed(Duration, serde_json::Value),
    /// Redirect to a sibling endpoint that accepts any token
    Redirect(StatusCode),
}

struct FakeState {
    reply: UpstreamReply,
    calls: Mutex<Vec<HashMap<String, String>>>,
    redirected: Mutex<Vec<HashMap<String, String>>>,
}

/// Siteverify stand-in listening on an ephemeral local port
pub struct FakeSiteVerify {
    /// Pass as `recaptcha.base_url`
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeSiteVerify {
    pub async fn spawn(reply: UpstreamReply) -> Self {
        let state = Arc::new(FakeState {
            reply,
            calls: Mutex::new(Vec::new()),
            redirected: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/recaptcha/api/siteverify", post(siteverify))
            .route("/recaptcha/api/elsewhere", post(elsewhere))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/recaptcha/api", addr),
            state,
        }
    }

    /// Form parameters of every call received so far
    pub fn calls(&self) -> Vec<HashMap<String, String>> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Form parameters of every call that followed a redirect
    pub fn redirected_calls(&self) -> Vec<HashMap<String, String>> {
        self.state.redirected.lock().unwrap().clone()
    }
}

async fn siteverify(
    State(state): State<Arc<FakeState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    state.calls.lock().unwrap().push(params);

    match state.reply.clone() {
        UpstreamReply::Json(body) => Json(body).into_response(),
        UpstreamReply::Raw(body) => body.into_response(),
        UpstreamReply::Status(status, body) => (status, body).into_response(),
        UpstreamReply::Delayed(delay, body) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
        UpstreamReply::Redirect(status) => {
            (status, [(header::LOCATION, "/recaptcha/api/elsewhere")]).into_response()
        }
    }
}

async fn elsewhere(
    State(state): State<Arc<FakeState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.redirected.lock().unwrap().push(params);
    Json(serde_json::json!({ "success": true, "hostname": "localhost" }))
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/recaptcha/api", addr)
}

pub fn recaptcha_config(base_url: &str) -> RecaptchaConfig {
    RecaptchaConfig {
        secret: "test-secret".to_string(),
        hostname: "localhost".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 2,
    }
}

pub fn app_config(base_url: &str) -> AppConfig {
    AppConfig {
        recaptcha: recaptcha_config(base_url),
        ..Default::default()
    }
}

/// Serve the full router on an ephemeral local port
pub async fn spawn_gate(state: AppState) -> SocketAddr {
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}
