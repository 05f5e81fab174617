//! # fieldops
//!
//! > **Work orders for field-service crews: who may do what, and when.**
//!
//! Supervisors create and assign work orders; technicians start them, report progress and
//! impediments, fill in checklists, upload evidence and close them with the client's
//! sign-off. Every one of those steps passes two checks: a **role authority** (does this
//! role hold the capability?) and a **lifecycle gate** (does the order's current status
//! allow it?).
//!
//! ## Architecture Notes
//!
//! ### 1. One Store per Resource
//! Work orders, technicians and evidence each live in their own `ResourceActor<T>`, a Tokio
//! task that owns its map and processes requests one at a time. Two concurrent commands on
//! the same order are serialized; the second one sees the first one's result.
//!
//! ### 2. Checks at the Edge and in the Store
//! Clients refuse requests the role can never make before any message is sent. The actor
//! re-checks the gate against the stored order, so a stale view cannot move an order
//! through an edge the state machine forbids.
//!
//! ### 3. Async Context Injection
//! Dependencies are injected via `run(context)`: the work-order store receives a
//! [`TechnicianClient`](clients::TechnicianClient) to validate assignments, the evidence
//! store receives a [`WorkOrderClient`](clients::WorkOrderClient) to validate its parent
//! order.
//!
//! ### 4. Typed Errors
//! Each store has its own error enum. Permission, validation, transition and checklist
//! failures stay distinct all the way to the caller; only transport failures are
//! [`Retryable`](error::Retryable).
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - Generic actor, client and mock. Knows nothing about work orders.
//! - **Key items**: [`ActorEntity`](framework::ActorEntity), [`ResourceActor`](framework::ResourceActor),
//!   [`MockClient`](framework::mock::MockClient).
//!
//! ### 2. The Domain ([`model`], [`access`], [`gates`])
//! - Records, the status state machine, the capability table and the per-action gates.
//! - **Key items**: [`WorkOrder`](model::WorkOrder), [`OrderStatus`](model::OrderStatus),
//!   [`has_permission`](access::has_permission), [`available_actions`](gates::available_actions).
//!
//! ### 3. The Stores ([`work_order_actor`], [`technician_actor`], [`evidence_actor`])
//! - `ActorEntity` implementations plus their commands and errors.
//!
//! ### 4. The Interface ([`clients`], [`forms`])
//! - Role-checked clients and the form parsers and submission guard that feed them.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - Configuration, startup wiring, shutdown and tracing setup.
//! - **Key items**: [`FieldServiceSystem`](lifecycle::FieldServiceSystem),
//!   [`SystemConfig`](lifecycle::SystemConfig).
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! FIELDOPS_CONFIG=fieldops.toml RUST_LOG=debug cargo run
//! cargo test
//! ```

pub mod access;
pub mod clients;
pub mod error;
pub mod evidence_actor;
pub mod forms;
pub mod framework;
pub mod gates;
pub mod lifecycle;
pub mod model;
pub mod technician_actor;
pub mod work_order_actor;
