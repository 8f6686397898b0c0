use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::Authenticator;
use crate::config::{AppConfig, Environment};
use crate::database::Database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{SchemeService, UserService};

/// Shared handles injected into every handler through axum's `State`
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub schemes: SchemeService,
    pub authenticator: Arc<dyn Authenticator>,
    pub database: Database,
}

impl AppState {
    pub fn new(database: Database, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            users: UserService::new(database.credential_store(), Arc::clone(&authenticator)),
            schemes: SchemeService::new(database.scheme_store()),
            authenticator,
            database,
        }
    }
}

/// Build the full router: public auth routes, the gated scheme API, and
/// global tracing/CORS layers.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(public::health_get))
        .merge(auth_public_routes())
        .merge(color_scheme_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/register", post(auth::register_post))
        .route("/api/login", post(auth::login_post))
}

fn color_scheme_routes(state: AppState) -> Router<AppState> {
    use protected::color_schemes;

    Router::new()
        .route(
            "/api/color-schemes",
            get(color_schemes::schemes_get)
                .post(color_schemes::scheme_post)
                .put(color_schemes::scheme_put),
        )
        .route(
            "/api/color-schemes/:id",
            get(color_schemes::scheme_get).delete(color_schemes::scheme_delete),
        )
        // route_layer so unknown paths still 404 instead of 401
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
