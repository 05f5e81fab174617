//! Pure data structures (DTOs) for the field-service domain.
//!
//! [`WorkOrder`], [`Technician`] and [`Evidence`] implement the
//! [`ActorEntity`](crate::framework::ActorEntity) trait in their actor modules.

pub mod checklist;
pub mod evidence;
pub mod role;
pub mod status;
pub mod technician;
pub mod work_order;

pub use checklist::*;
pub use evidence::*;
pub use role::*;
pub use status::*;
pub use technician::*;
pub use work_order::*;
