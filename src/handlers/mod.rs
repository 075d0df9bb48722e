// handlers/mod.rs - route tree
//
// Public (no auth) → Protected (`protect`) → Elevated (`protect` + admin role)
pub mod elevated;
pub mod protected;
pub mod public;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Uri},
    middleware, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::middleware::{protect, require_admin};
use crate::state::AppState;

/// Router plus the global layers: body limit, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let config = state.config().clone();
    // Leave headroom for multipart framing around a maximum-size image
    let body_limit = config.api.max_request_size_bytes.max(config.uploads.max_bytes + 64 * 1024);

    let app = router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.security));
    if config.api.enable_request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

/// `*` (or nothing configured) allows any origin; otherwise only the listed ones.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
    }
}

/// Route tree, `/uploads` static files included.
pub fn router(state: AppState) -> Router {
    let upload_dir = state.config().uploads.dir.clone();

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(elevated_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(not_found)
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/health", get(public::health))
        .route("/api/auth/register", post(public::register))
        .route("/api/auth/login", post(public::login))
        .route("/api/agents", get(public::agents_list))
        .route("/api/agents/:id", get(public::agent_show))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/api/auth/me", get(protected::me))
        .route("/api/auth/update-password", put(protected::update_password))
        .route("/api/users/profile", get(protected::profile_get).put(protected::profile_put))
        .route("/api/users/addresses", post(protected::address_add))
        .route(
            "/api/users/addresses/:address_id",
            put(protected::address_update).delete(protected::address_delete),
        )
        .route("/api/users/phones", post(protected::phone_add))
        .route(
            "/api/users/phones/:phone_id",
            put(protected::phone_update).delete(protected::phone_delete),
        )
        .route("/api/users/notifications", put(protected::notifications_put))
        .route("/api/goals", get(protected::goals_get).put(protected::goals_put))
        .route_layer(middleware::from_fn_with_state(state, protect))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/api/admin/dashboard", get(elevated::dashboard))
        .route("/api/admin/users", get(elevated::users_list))
        .route("/api/agents", post(elevated::agent_create))
        .route("/api/agents/:id", put(elevated::agent_update).delete(elevated::agent_delete))
        .route("/api/agents/:id/upload", post(elevated::agent_upload))
        // Layers run bottom-up: protect, then the role check
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, protect))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri))
}

/// Malformed ids can never match a stored record, so they read as not found.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", label)))
}
