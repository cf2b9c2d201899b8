//! In-memory broker state: capacity accounting plus the instance map.
//!
//! All invariant checks live here. Operations are synchronous and
//! all-or-nothing: a failed call leaves the state exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};
use crate::types::{Instance, InstanceId};

/// Remaining capacity and the set of provisioned instances.
///
/// Capacity semantics: an add is refused only when capacity is exactly
/// zero. Negative capacity means the check is disabled (unlimited).
/// Binding operations never touch capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    pub capacity: i64,
    #[serde(default)]
    pub instances: BTreeMap<InstanceId, Instance>,
}

impl State {
    /// Fresh state with the configured capacity and no instances.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            instances: BTreeMap::new(),
        }
    }

    /// True iff an instance with this id is provisioned.
    pub fn instance_exists(&self, instance_id: &str) -> bool {
        self.instances.contains_key(instance_id)
    }

    /// Get a copy of an instance.
    pub fn instance(&self, instance_id: &str) -> StateResult<Instance> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| StateError::InstanceNotFound(instance_id.to_string()))
    }

    /// Provision a new instance under `instance_id`.
    ///
    /// Consumes one unit of capacity on success.
    pub fn add_instance(&mut self, instance_id: &str, instance: Instance) -> StateResult<()> {
        if self.capacity == 0 {
            return Err(StateError::CapacityExhausted(instance_id.to_string()));
        }

        if self.instances.contains_key(instance_id) {
            return Err(StateError::DuplicateInstance(instance_id.to_string()));
        }

        self.capacity -= 1;
        self.instances.insert(instance_id.to_string(), instance);
        Ok(())
    }

    /// Replace an existing instance wholesale. Capacity is unaffected.
    pub fn update_instance(&mut self, instance_id: &str, instance: Instance) -> StateResult<()> {
        if !self.instances.contains_key(instance_id) {
            return Err(StateError::InstanceNotFound(instance_id.to_string()));
        }

        self.instances.insert(instance_id.to_string(), instance);
        Ok(())
    }

    /// Deprovision an instance, releasing one unit of capacity.
    pub fn delete_instance(&mut self, instance_id: &str) -> StateResult<()> {
        if self.instances.remove(instance_id).is_none() {
            return Err(StateError::InstanceNotFound(instance_id.to_string()));
        }

        self.capacity += 1;
        Ok(())
    }

    /// True iff the instance exists and carries this binding.
    ///
    /// A missing instance is `false`, not an error.
    pub fn instance_binding_exists(&self, instance_id: &str, binding_id: &str) -> bool {
        match self.instances.get(instance_id) {
            Some(instance) => instance.bindings.iter().any(|b| b == binding_id),
            None => false,
        }
    }

    /// Attach a binding to an instance.
    pub fn add_instance_binding(&mut self, instance_id: &str, binding_id: &str) -> StateResult<()> {
        let mut instance = self.instance(instance_id)?;

        if instance.bindings.iter().any(|b| b == binding_id) {
            return Err(StateError::DuplicateBinding(binding_id.to_string()));
        }

        instance.bindings.push(binding_id.to_string());
        self.update_instance(instance_id, instance)
    }

    /// Detach a binding from an instance.
    pub fn delete_instance_binding(
        &mut self,
        instance_id: &str,
        binding_id: &str,
    ) -> StateResult<()> {
        let mut instance = self.instance(instance_id)?;

        match instance.bindings.iter().position(|b| b == binding_id) {
            Some(index) => {
                instance.bindings.remove(index);
                self.update_instance(instance_id, instance)
            }
            None => Err(StateError::BindingNotFound(binding_id.to_string())),
        }
    }
}
