//! # Evidence Actor
//!
//! Records the files technicians attach to work orders. Only metadata and the storage path
//! are kept; moving bytes to a storage backend is the caller's concern.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`Evidence`](crate::model::Evidence)
//! - [`error`] - [`EvidenceError`]
//!
//! Context is the [`WorkOrderClient`](crate::clients::WorkOrderClient): uploads for an unknown
//! order are rejected in `on_create`.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Evidence;

/// Creates a new Evidence actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Evidence>, ResourceClient<Evidence>) {
    ResourceActor::new(buffer_size)
}
