//! # Work Order Actor
//!
//! Owns every work order and is the only place their status changes.
//!
//! ## Overview
//!
//! Lifecycle operations arrive as [`WorkOrderAction`]s carrying the acting
//! [`Principal`](crate::access::Principal). The actor evaluates the
//! [lifecycle gate](crate::gates) against its own snapshot and applies the status change
//! through the explicit state machine on [`OrderStatus`](crate::model::OrderStatus).
//! Requests are processed one at a time, so two technicians racing on the same order see a
//! consistent sequence: the second request is checked against the result of the first.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`WorkOrder`]
//! - [`actions`] - [`WorkOrderCommand`], [`WorkOrderAction`] and [`WorkOrderUpdate`]
//! - [`error`] - [`WorkOrderError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! The actor's context is the [`TechnicianClient`](crate::clients::TechnicianClient), used to
//! check that assigned technicians exist:
//!
//! ```rust,ignore
//! let (roster_actor, roster) = technician_actor::new(32);
//! let (orders_actor, orders) = work_order_actor::new(32);
//! tokio::spawn(roster_actor.run(()));
//! tokio::spawn(orders_actor.run(TechnicianClient::new(roster)));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::WorkOrder;

/// Creates a new Work Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<WorkOrder>, ResourceClient<WorkOrder>) {
    ResourceActor::new(buffer_size)
}
