//! Domain types for the membroker state store.
//!
//! Field names follow the persisted YAML document and must stay stable;
//! existing state files on disk depend on them.

use serde::{Deserialize, Serialize};

/// Unique identifier for a provisioned instance.
pub type InstanceId = String;

/// Identifier for a binding, unique within one instance.
pub type BindingId = String;

/// A provisioned service instance.
///
/// The instance id is not stored here — instances live in the state map
/// keyed by id, so the key is the single source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Instance {
    pub host: String,
    pub port: String,
    pub organization_guid: String,
    pub space_guid: String,
    pub service_id: String,
    pub plan_id: String,
    /// Binding ids attached to this instance. No duplicates.
    pub bindings: Vec<BindingId>,
}
