//! # Technician Actor
//!
//! Owns the technician roster. It has no dependencies (`Context = ()`), and the
//! work-order actor reads it to validate assignments.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`Technician`], plus [`TechnicianUpdate`] and [`TechnicianAction`]
//! - [`error`] - [`TechnicianError`]
//! - [`new()`] - Factory function that creates the actor and client

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Technician;

/// Creates a new Technician actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Technician>, ResourceClient<Technician>) {
    ResourceActor::new(buffer_size)
}
