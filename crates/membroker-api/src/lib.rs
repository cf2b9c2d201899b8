//! membroker-api — service broker REST API.
//!
//! Provides axum route handlers for the instance and binding lifecycle
//! verbs, plus the catalog document.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/v2/catalog` | Advertise the service catalog |
//! | PUT | `/v2/service_instances/{id}` | Provision an instance |
//! | PATCH | `/v2/service_instances/{id}` | Reassign service/plan |
//! | DELETE | `/v2/service_instances/{id}` | Deprovision an instance |
//! | PUT | `/v2/service_instances/{id}/service_bindings/{id}` | Attach a binding |
//! | DELETE | `/v2/service_instances/{id}/service_bindings/{id}` | Detach a binding |
//!
//! Every mutating handler runs one read-modify-write-persist cycle
//! against the store while holding its lock, so two requests can never
//! interleave within a cycle.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use tokio::sync::Mutex;

use membroker_config::Catalog;
use membroker_state::FileStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<Mutex<FileStore>>,
    pub catalog: Catalog,
}

/// Build the broker API router.
pub fn build_router(store: FileStore, catalog: Catalog) -> Router {
    let api_state = ApiState {
        store: Arc::new(Mutex::new(store)),
        catalog,
    };

    Router::new()
        .route("/v2/catalog", get(handlers::show_catalog))
        .route(
            "/v2/service_instances/{instance_id}",
            put(handlers::provision)
                .patch(handlers::update)
                .delete(handlers::deprovision),
        )
        .route(
            "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
            put(handlers::bind).delete(handlers::unbind),
        )
        .with_state(api_state)
}
