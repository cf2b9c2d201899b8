//! Broker API handlers.
//!
//! Each handler locks the store, takes a state snapshot, applies exactly
//! one `State` mutation, pushes the result back, and saves. Status codes
//! follow the service broker calling convention: 409 for uniqueness
//! conflicts, 503 when capacity is exhausted, 410 for deletes of things
//! already gone.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{debug, error};

use membroker_state::{Instance, StateError};

use crate::ApiState;

/// Provisioning request body.
#[derive(serde::Deserialize)]
pub struct ProvisionRequest {
    pub service_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub space_guid: String,
}

/// Update request body (service/plan reassignment).
#[derive(serde::Deserialize)]
pub struct UpdateRequest {
    pub service_id: String,
    pub plan_id: String,
}

/// Success body for provision/update/delete responses.
#[derive(Default, serde::Serialize)]
struct DashboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard_url: Option<String>,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(serde_json::json!({ "description": msg })),
    )
}

// ── Catalog ────────────────────────────────────────────────────

/// GET /v2/catalog
pub async fn show_catalog(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.catalog.clone())
}

// ── Provisioning ───────────────────────────────────────────────

/// PUT /v2/service_instances/{instance_id}
pub async fn provision(
    State(api): State<ApiState>,
    Path(instance_id): Path<String>,
    Json(req): Json<ProvisionRequest>,
) -> impl IntoResponse {
    let mut store = api.store.lock().await;
    let mut state = store.get_state();

    if state.instance_exists(&instance_id) {
        return error_response("instance id is taken", StatusCode::CONFLICT).into_response();
    }

    let instance = Instance {
        service_id: req.service_id,
        plan_id: req.plan_id,
        organization_guid: req.organization_guid,
        space_guid: req.space_guid,
        ..Instance::default()
    };

    match state.add_instance(&instance_id, instance) {
        Ok(()) => {
            store.put_state(state);
            if let Err(e) = store.save() {
                error!(%instance_id, %e, "failed to persist provision");
                return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            debug!(%instance_id, "instance provisioned");
            (StatusCode::CREATED, Json(DashboardResponse::default())).into_response()
        }
        Err(e @ StateError::CapacityExhausted(_)) => {
            error_response(&e.to_string(), StatusCode::SERVICE_UNAVAILABLE).into_response()
        }
        Err(e) => {
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// PATCH /v2/service_instances/{instance_id}
pub async fn update(
    State(api): State<ApiState>,
    Path(instance_id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> impl IntoResponse {
    let mut store = api.store.lock().await;
    let mut state = store.get_state();

    let mut instance = match state.instance(&instance_id) {
        Ok(instance) => instance,
        Err(_) => {
            return error_response("instance not found", StatusCode::NOT_FOUND).into_response();
        }
    };

    instance.service_id = req.service_id;
    instance.plan_id = req.plan_id;

    match state.update_instance(&instance_id, instance) {
        Ok(()) => {
            store.put_state(state);
            if let Err(e) = store.save() {
                error!(%instance_id, %e, "failed to persist update");
                return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            debug!(%instance_id, "instance updated");
            Json(DashboardResponse::default()).into_response()
        }
        Err(e) => {
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// DELETE /v2/service_instances/{instance_id}
pub async fn deprovision(
    State(api): State<ApiState>,
    Path(instance_id): Path<String>,
) -> impl IntoResponse {
    let mut store = api.store.lock().await;
    let mut state = store.get_state();

    match state.delete_instance(&instance_id) {
        Ok(()) => {
            store.put_state(state);
            if let Err(e) = store.save() {
                error!(%instance_id, %e, "failed to persist deprovision");
                return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            debug!(%instance_id, "instance deprovisioned");
            Json(DashboardResponse::default()).into_response()
        }
        Err(_) => error_response("instance not found", StatusCode::GONE).into_response(),
    }
}

// ── Bindings ───────────────────────────────────────────────────

/// PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}
pub async fn bind(
    State(api): State<ApiState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut store = api.store.lock().await;
    let mut state = store.get_state();

    match state.add_instance_binding(&instance_id, &binding_id) {
        Ok(()) => {
            store.put_state(state);
            if let Err(e) = store.save() {
                error!(%instance_id, %binding_id, %e, "failed to persist binding");
                return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            debug!(%instance_id, %binding_id, "binding attached");
            (StatusCode::CREATED, Json(DashboardResponse::default())).into_response()
        }
        Err(e @ StateError::InstanceNotFound(_)) => {
            error_response(&e.to_string(), StatusCode::NOT_FOUND).into_response()
        }
        Err(e @ StateError::DuplicateBinding(_)) => {
            error_response(&e.to_string(), StatusCode::CONFLICT).into_response()
        }
        Err(e) => {
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// DELETE /v2/service_instances/{instance_id}/service_bindings/{binding_id}
pub async fn unbind(
    State(api): State<ApiState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut store = api.store.lock().await;
    let mut state = store.get_state();

    match state.delete_instance_binding(&instance_id, &binding_id) {
        Ok(()) => {
            store.put_state(state);
            if let Err(e) = store.save() {
                error!(%instance_id, %binding_id, %e, "failed to persist unbind");
                return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response();
            }
            debug!(%instance_id, %binding_id, "binding detached");
            Json(DashboardResponse::default()).into_response()
        }
        Err(StateError::InstanceNotFound(_)) | Err(StateError::BindingNotFound(_)) => {
            error_response("binding not found", StatusCode::GONE).into_response()
        }
        Err(e) => {
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}
