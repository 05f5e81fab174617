//! # System Lifecycle & Orchestration
//!
//! Individual actors are simple; wiring them together is where the care goes. This module
//! creates the actors, injects each one's dependencies through `run(context)`, and shuts
//! them down in dependency order.
//!
//! **Key Responsibilities:**
//! 1. **Configuration** - [`SystemConfig`] from TOML or defaults
//! 2. **Actor Creation & Wiring** - [`FieldServiceSystem::new`]
//! 3. **Graceful Shutdown** - [`FieldServiceSystem::shutdown`]
//! 4. **Observability Setup** - [`setup_tracing`]

pub mod config;
pub mod system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use config::*;
pub use system::*;
