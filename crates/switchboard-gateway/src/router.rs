//! Axum router construction for the gateway.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS and request tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the router with CORS open to any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with_origins(state, &[])
}

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness plus roster counts
/// - `GET /ws/operators/{operator_id}` -- `WebSocket` phonebook stream
/// - `/api/phones/...` -- directory queries and binding
/// - `/api/operators/{id}/...` -- per-operator phonebook and release
/// - `POST /api/persons`, `POST /api/trains` -- phone registration
/// - `GET|POST /api/simulations` -- loaded simulations
///
/// An empty `origins` list allows any origin.
pub fn build_router_with_origins(state: Arc<AppState>, origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws/operators/{operator_id}", get(ws::ws_operator))
        // Phones
        .route("/api/phones", get(handlers::list_phones))
        .route("/api/phones/{id}", get(handlers::get_phone))
        .route("/api/phones/{id}/speed-dial", get(handlers::speed_dial))
        .route(
            "/api/phones/{id}/trains-and-mobiles",
            get(handlers::trains_and_mobiles),
        )
        .route("/api/phones/{id}/rec", get(handlers::rec))
        .route("/api/phones/{id}/assign", post(handlers::assign))
        .route("/api/phones/{id}/unassign", post(handlers::unassign))
        .route("/api/phones/{id}/position", post(handlers::position))
        // Operators
        .route("/api/operators/{id}/phones", get(handlers::operator_phones))
        .route(
            "/api/operators/{id}/release",
            post(handlers::release_operator),
        )
        // Registration
        .route("/api/persons", post(handlers::register_person))
        .route("/api/trains", post(handlers::register_train))
        .route(
            "/api/simulations",
            get(handlers::list_simulations).post(handlers::load_simulation),
        )
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!(origin = %origin, "Ignoring invalid CORS origin: {e}"))
                .ok()
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
