//! Axum-based HTTP gateway for the elevator controller.
//!
//! Provides REST endpoints for:
//! - POST `/elevator/call` - Queue a floor (`{"floor": 3}`)
//! - POST `/elevator/open` - Open the door
//! - POST `/elevator/close` - Close the door
//! - POST `/elevator/start` - Start the dispatch loop
//! - POST `/elevator/stop` - Stop the dispatch loop
//! - GET `/elevator/status` - Current car state
//! - GET `/` - Health banner

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::messages::parse_call_request;
use crate::traits::Timer;
use crate::ElevatorController;

use super::api::{ApiResponse, CommandResponse, StatusResponse};

/// Shared handle every route works on.
pub type AppState<T> = Arc<ElevatorController<T>>;

type CommandReply = (StatusCode, Json<ApiResponse<CommandResponse>>);

fn reply(response: CommandResponse) -> CommandReply {
    (StatusCode::OK, Json(ApiResponse::ok(response)))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /elevator/call - Queue a floor
///
/// Accepts JSON: `{"floor": 3}`. A non-integer floor never reaches the car.
async fn call_floor<T: Timer + 'static>(
    State(controller): State<AppState<T>>,
    body: Bytes,
) -> CommandReply {
    let request = match parse_call_request(&body) {
        Ok(request) => request,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string()))),
    };

    match controller.call(request.floor) {
        Ok(outcome) => reply(outcome.into()),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::err(e.to_string())),
        ),
    }
}

/// POST /elevator/open - Open the door
async fn open_door<T: Timer + 'static>(State(controller): State<AppState<T>>) -> CommandReply {
    controller.open_door();
    reply(CommandResponse::accepted("door_opened"))
}

/// POST /elevator/close - Close the door
async fn close_door<T: Timer + 'static>(State(controller): State<AppState<T>>) -> CommandReply {
    controller.close_door();
    reply(CommandResponse::accepted("door_closed"))
}

/// POST /elevator/start - Start dispatching
///
/// Claims the car before answering, then runs the loop in the background so
/// the response does not wait for the queue to drain.
async fn start<T: Timer + 'static>(State(controller): State<AppState<T>>) -> CommandReply {
    match controller.begin() {
        Ok(ticket) => {
            let dispatcher = Arc::clone(&controller);
            tokio::spawn(async move {
                dispatcher.run(ticket).await;
            });
            reply(CommandResponse::accepted("dispatch_started"))
        }
        Err(outcome) => reply(outcome.into()),
    }
}

/// POST /elevator/stop - Stop dispatching at the next step boundary
async fn stop<T: Timer + 'static>(State(controller): State<AppState<T>>) -> CommandReply {
    if controller.stop() {
        reply(CommandResponse::accepted("stop_requested"))
    } else {
        reply(CommandResponse::ignored("already_idle"))
    }
}

/// GET /elevator/status - Current car state
async fn status<T: Timer + 'static>(
    State(controller): State<AppState<T>>,
) -> Json<ApiResponse<StatusResponse>> {
    Json(ApiResponse::ok(StatusResponse::from(controller.status())))
}

/// GET / - Health banner
async fn index() -> &'static str {
    "lift-sim elevator control API"
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<T: Timer + 'static>(state: AppState<T>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        .route("/elevator/call", post(call_floor::<T>))
        .route("/elevator/open", post(open_door::<T>))
        .route("/elevator/close", post(close_door::<T>))
        .route("/elevator/start", post(start::<T>))
        .route("/elevator/stop", post(stop::<T>))
        .route("/elevator/status", get(status::<T>))
        .route("/", get(index))
        .fallback(not_found)
        .with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared state
///
/// This function blocks until the server is shut down.
pub async fn run_server<T: Timer + 'static>(
    state: AppState<T>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("web server listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
