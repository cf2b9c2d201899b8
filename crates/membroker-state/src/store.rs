//! FileStore — YAML file persistence for the broker state.
//!
//! One store, one file. Persistence is explicit: mutating the in-memory
//! state never writes to disk; callers decide when to `save`. Each save
//! and reload is a full open-write-close or open-read-close, no file
//! handle is held between calls.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::state::State;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// State store backed by a single YAML file.
pub struct FileStore {
    location: PathBuf,
    state: State,
}

impl FileStore {
    /// Open (or create) the store at the given location.
    ///
    /// A missing file is created empty and the configured fresh state is
    /// kept. A pre-existing file is loaded, and a malformed one fails
    /// construction with `Parse` rather than being silently discarded.
    pub fn open(location: impl Into<PathBuf>, capacity: i64) -> StateResult<Self> {
        let location = location.into();
        let mut store = Self {
            location,
            state: State::new(capacity),
        };

        if !store.location.exists() {
            fs::write(&store.location, "").map_err(map_err!(Io))?;
            debug!(path = ?store.location, "state file created");
        }

        store.reload()?;
        debug!(path = ?store.location, capacity = store.state.capacity, "state store opened");
        Ok(store)
    }

    /// Snapshot of the current in-memory state.
    ///
    /// Callers treat the clone as their working copy for one
    /// read-modify-write cycle and push it back with [`put_state`].
    ///
    /// [`put_state`]: FileStore::put_state
    pub fn get_state(&self) -> State {
        self.state.clone()
    }

    /// Replace the in-memory state wholesale.
    ///
    /// No validation happens here; invariants were enforced by the
    /// `State` mutation that produced the value.
    pub fn put_state(&mut self, state: State) {
        self.state = state;
    }

    /// Serialize the in-memory state to the backing file, overwriting
    /// prior contents.
    pub fn save(&self) -> StateResult<()> {
        let raw = serde_yaml::to_string(&self.state).map_err(map_err!(Io))?;
        fs::write(&self.location, raw).map_err(map_err!(Io))?;
        debug!(path = ?self.location, "state saved");
        Ok(())
    }

    /// Replace the in-memory state with the file contents, discarding
    /// unsaved changes.
    ///
    /// An empty file means nothing was persisted yet; the current state
    /// is kept.
    pub fn reload(&mut self) -> StateResult<()> {
        let raw = fs::read_to_string(&self.location).map_err(map_err!(Io))?;
        if raw.trim().is_empty() {
            return Ok(());
        }

        self.state = serde_yaml::from_str(&raw).map_err(map_err!(Parse))?;
        debug!(path = ?self.location, "state reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instance;

    fn temp_location(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("state.yml")
    }

    #[test]
    fn open_creates_missing_file_with_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);

        let store = FileStore::open(&location, 5).unwrap();

        assert!(location.exists());
        let state = store.get_state();
        assert_eq!(state.capacity, 5);
        assert!(state.instances.is_empty());
    }

    #[test]
    fn save_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);

        let mut store = FileStore::open(&location, 3).unwrap();
        let mut state = store.get_state();
        state
            .add_instance(
                "instance-id",
                Instance {
                    host: "127.0.0.1".to_string(),
                    port: "11211".to_string(),
                    ..Instance::default()
                },
            )
            .unwrap();
        state.add_instance_binding("instance-id", "binding-1").unwrap();
        store.put_state(state.clone());
        store.save().unwrap();

        // The reopening capacity is deliberately bogus: the file wins.
        let reopened = FileStore::open(&location, -10).unwrap();
        assert_eq!(reopened.get_state(), state);
        assert_eq!(reopened.get_state().capacity, 2);
    }

    #[test]
    fn open_fails_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);
        fs::write(&location, "{{{ not yaml").unwrap();

        let err = FileStore::open(&location, 1);
        assert!(matches!(err, Err(StateError::Parse(_))));
    }

    #[test]
    fn empty_file_is_no_prior_state() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);
        fs::write(&location, "\n  \n").unwrap();

        let store = FileStore::open(&location, 7).unwrap();
        assert_eq!(store.get_state().capacity, 7);
    }

    #[test]
    fn reload_discards_unsaved_changes() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);

        let mut store = FileStore::open(&location, 2).unwrap();
        let mut state = store.get_state();
        state.add_instance("saved", Instance::default()).unwrap();
        store.put_state(state);
        store.save().unwrap();

        let mut state = store.get_state();
        state.add_instance("unsaved", Instance::default()).unwrap();
        store.put_state(state);

        store.reload().unwrap();
        let state = store.get_state();
        assert!(state.instance_exists("saved"));
        assert!(!state.instance_exists("unsaved"));
        assert_eq!(state.capacity, 1);
    }

    #[test]
    fn save_fails_when_path_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("sub").join("state.yml");

        let store = FileStore {
            location,
            state: State::new(1),
        };
        assert!(matches!(store.save(), Err(StateError::Io(_))));
    }

    #[test]
    fn persisted_document_layout_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let location = temp_location(&dir);

        let mut store = FileStore::open(&location, 1).unwrap();
        let mut state = store.get_state();
        state
            .add_instance(
                "instance-id",
                Instance {
                    host: "10.0.0.1".to_string(),
                    port: "11211".to_string(),
                    organization_guid: "org-1".to_string(),
                    space_guid: "space-1".to_string(),
                    service_id: "service-1".to_string(),
                    plan_id: "plan-1".to_string(),
                    bindings: vec!["binding-1".to_string()],
                },
            )
            .unwrap();
        store.put_state(state);
        store.save().unwrap();

        let raw = fs::read_to_string(&location).unwrap();
        assert!(raw.contains("capacity: 0"));
        assert!(raw.contains("instance-id:"));
        assert!(raw.contains("organization_guid: org-1"));
        assert!(raw.contains("space_guid: space-1"));
        assert!(raw.contains("service_id: service-1"));
        assert!(raw.contains("plan_id: plan-1"));
        assert!(raw.contains("- binding-1"));
    }
}
