//! HTTP server mode for REST API access to the ticket and prompt clients

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::error::{Error, FailureKind, Result};
use crate::http::Transport;
use crate::openai::{OpenAiClient, DEFAULT_MODEL};
use crate::zendesk::ZendeskClient;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    zendesk: Arc<ZendeskClient>,
    openai: Arc<OpenAiClient>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State over prebuilt clients
    pub fn new(zendesk: ZendeskClient, openai: OpenAiClient) -> Self {
        Self {
            zendesk: Arc::new(zendesk),
            openai: Arc::new(openai),
            started_at: Utc::now(),
        }
    }

    /// State built from settings, sharing one transport
    pub fn from_settings(settings: &Settings, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::new(
            settings.zendesk_client(transport.clone())?,
            settings.openai_client(transport)?,
        ))
    }
}

/// Request body for the prompt endpoint
#[derive(Debug, Deserialize)]
struct PromptRequest {
    context: String,
    prompt: String,
    #[serde(default = "default_model")]
    model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// HTTP status for a failed call
fn status_for(error: &Error) -> StatusCode {
    match error.kind() {
        FailureKind::Config => StatusCode::BAD_REQUEST,
        FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FailureKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        FailureKind::ApiStatus if error.status() == Some(404) => StatusCode::NOT_FOUND,
        FailureKind::Transport
        | FailureKind::Authentication
        | FailureKind::ApiStatus
        | FailureKind::MalformedResponse
        | FailureKind::Normalization => StatusCode::BAD_GATEWAY,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            tracing::warn!("Request failed: {e}");
            (status_for(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
        .route("/zendesk/tickets/:id", get(ticket_show))
        .route("/prompt", post(prompt))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(settings: Settings, port: u16) -> Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(settings.http.build_transport()?);
    let app = router(AppState::from_settings(&settings, transport)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

async fn index() -> impl IntoResponse {
    Json(json!({ "name": crate::NAME, "version": crate::VERSION }))
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = Utc::now().signed_duration_since(state.started_at);
    Json(ApiResponse::success(json!({
        "status": "ok",
        "started_at": state.started_at.to_rfc3339(),
        "uptime_seconds": uptime.num_seconds(),
    })))
}

async fn ticket_show(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    respond(state.zendesk.ticket_show(id).await)
}

async fn prompt(State(state): State<Arc<AppState>>, Json(body): Json<PromptRequest>) -> Response {
    respond(
        state
            .openai
            .send_prompt(&body.context, &body.prompt, &body.model)
            .await,
    )
}
