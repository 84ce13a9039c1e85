use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::country::{check_country, CountryGate};
use super::handlers::*;
use crate::service::Companies;
use crate::storage::Storage;

/// Build the application router. When `gate` is set, every request passes
/// the country access check before reaching a handler.
pub fn create_router<S: Storage>(storage: S, gate: Option<CountryGate>) -> Router {
    let state = AppState {
        companies: Companies::new(storage),
    };

    let router = Router::new()
        // Company routes
        .route("/companies", get(list_companies::<S>))
        .route("/companies", post(create_company::<S>))
        .route("/companies/{id}", get(get_company::<S>))
        .route("/companies/{id}", put(update_company::<S>))
        .route("/companies/{id}", delete(delete_company::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match gate {
        Some(gate) => router.layer(axum::middleware::from_fn_with_state(gate, check_country)),
        None => router,
    }
}
