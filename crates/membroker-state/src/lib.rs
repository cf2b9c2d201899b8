//! membroker-state — file-backed state store for the broker.
//!
//! `State` holds the remaining provisioning capacity and the set of
//! provisioned instances (each with its binding ids) and enforces every
//! uniqueness and capacity invariant. `FileStore` binds a `State` to a
//! single YAML file on disk with explicit, caller-controlled save and
//! reload points.
//!
//! # Architecture
//!
//! `State` is pure data plus invariant-preserving operations — it never
//! touches disk. `FileStore` owns the current `State` and the file
//! location; callers run a read-modify-write cycle (`get_state`, mutate,
//! `put_state`, `save`) per request. There is no locking in here; the
//! HTTP layer wraps the store in one coarse mutex per process.

pub mod error;
pub mod state;
pub mod store;
pub mod types;

pub use error::{StateError, StateResult};
pub use state::State;
pub use store::FileStore;
pub use types::*;
