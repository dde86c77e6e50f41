pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        let rate_limiter = RateLimitState::new(
            config.auth_rate_limit_max,
            Duration::from_secs(config.auth_rate_limit_window_secs),
        );
        Self {
            store,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Wraps `router` so requests running past `timeout` answer 408 with the
/// usual JSON error body.
pub fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(error::handle_middleware_error))
            .timeout(timeout),
    )
}

/// Assembles routes, auth middleware, CORS, timeouts and request tracing.
pub fn build_app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/diary",
            post(handlers::diary::upsert_entry).get(handlers::diary::list_entries),
        )
        .route(
            "/api/diary/month/:year/:month",
            get(handlers::diary::list_month),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let routes = Router::new().merge(public_routes).merge(protected_routes);

    with_request_timeout(routes, state.config.request_timeout())
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;

    pub fn test_config() -> Config {
        Config {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: "test-secret".into(),
            jwt_ttl_secs: 3600,
            production: false,
            request_timeout_secs: 30,
            auth_rate_limit_max: 100,
            auth_rate_limit_window_secs: 60,
        }
    }
}
