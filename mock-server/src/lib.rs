//! In-memory stand-in for the Orderdaily main and partner APIs.
//!
//! Both surfaces are served from one router: `/api/v1/*` checks
//! `Authorization: Bearer <main key>`, `/api/orders/create` checks the raw
//! partner key. Unknown paths answer 400 and every error body is JSON, like
//! the real platform. `AppState::fail_next` makes the next API requests
//! answer 500 so callers can exercise their retry path.

pub mod handlers;
pub mod store;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

use handlers::MockError;
use store::Store;

pub type Db = Arc<RwLock<Store>>;

/// Credentials the mock accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeys {
    pub main: String,
    pub partner: String,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            main: "main-secret".to_string(),
            partner: "partner-secret".to_string(),
        }
    }
}

impl ApiKeys {
    /// `MOCK_MAIN_API_KEY` / `MOCK_PARTNER_API_KEY`, falling back to the
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            main: std::env::var("MOCK_MAIN_API_KEY").unwrap_or(defaults.main),
            partner: std::env::var("MOCK_PARTNER_API_KEY").unwrap_or(defaults.partner),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<ApiKeys>,
    pub db: Db,
    failures: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(keys: ApiKeys) -> Self {
        Self {
            keys: Arc::new(keys),
            db: Arc::new(RwLock::new(Store::seeded())),
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The next `count` API requests answer 500 before reaching a handler.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(ApiKeys::default()))
}

pub fn app_with_state(state: AppState) -> Router {
    let main = Router::new()
        .route("/shops", get(handlers::list_shops))
        .route("/shops/{id}", get(handlers::get_shop))
        .route("/shops/{id}/orders", get(handlers::list_shop_orders))
        .route("/shops/{id}/products", get(handlers::list_shop_products))
        .route("/orders", get(handlers::list_orders))
        .route("/categories", get(handlers::list_categories))
        .route("/categories/{id}", get(handlers::get_category))
        .route(
            "/attributes",
            get(handlers::list_attributes).post(handlers::create_attribute),
        )
        .route(
            "/attributes/{id}",
            get(handlers::get_attribute).delete(handlers::delete_attribute),
        )
        .route(
            "/attributes/{id}/attribute_values",
            get(handlers::list_attribute_values).post(handlers::create_attribute_value),
        )
        .route(
            "/attributes/{id}/attribute_values/{value_id}",
            get(handlers::get_attribute_value).delete(handlers::delete_attribute_value),
        )
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_main_key));

    let partner = Router::new()
        .route("/api/orders/create", post(handlers::create_partner_order))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_partner_key));

    Router::new()
        .nest("/api/v1", main)
        .merge(partner)
        .layer(middleware::from_fn_with_state(state.clone(), inject_failures))
        .route("/images/{name}", get(handlers::get_image))
        .fallback(handlers::unknown_endpoint)
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn authorization(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

fn forbidden() -> Response {
    MockError::new(StatusCode::FORBIDDEN, "Invalid API key.").into_response()
}

async fn require_main_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.keys.main);
    if authorization(&request) == Some(expected.as_str()) {
        return next.run(request).await;
    }
    warn!(path = %request.uri().path(), "rejected main API request");
    forbidden()
}

async fn require_partner_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if authorization(&request) == Some(state.keys.partner.as_str()) {
        return next.run(request).await;
    }
    warn!(path = %request.uri().path(), "rejected partner API request");
    forbidden()
}

async fn inject_failures(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.take_failure() {
        debug!(path = %request.uri().path(), "injecting server error");
        return MockError::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error.").into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_consumed_one_at_a_time() {
        let state = AppState::new(ApiKeys::default());
        assert!(!state.take_failure());
        state.fail_next(2);
        assert!(state.take_failure());
        assert!(state.take_failure());
        assert!(!state.take_failure());
    }

    #[test]
    fn cloned_state_shares_failure_counter() {
        let state = AppState::new(ApiKeys::default());
        let handle = state.clone();
        handle.fail_next(1);
        assert!(state.take_failure());
    }

    #[test]
    fn default_keys() {
        let keys = ApiKeys::default();
        assert_eq!(keys.main, "main-secret");
        assert_eq!(keys.partner, "partner-secret");
    }
}
