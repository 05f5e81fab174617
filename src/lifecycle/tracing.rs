//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: start and shutdown of each store, with its final size
//! - **Store Operations**: Create, Get, List, Update, Delete and Actions, keyed by entity id
//! - **Client Calls**: one span per gated call, carrying the acting role
//! - **Rejections**: permission, gate and transition failures at `warn`
//! - **Retries**: each re-issued read at `warn`
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run            # full payloads
//! RUST_LOG=fieldops::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, a technician closing an order reads:
//!
//! ```text
//! INFO perform{role=technician action="complete"}: Action ok entity_type="WorkOrder" id=order_1
//! INFO perform{role=technician action="complete"}: Action applied id=order_1 status=completed
//! ```
//!
//! A refused request shows the typed error:
//!
//! ```text
//! WARN Action failed entity_type="WorkOrder" id=order_1 error=transition from completed to cancelled is not allowed
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type identifies the store
        .compact()
        .init();
}
