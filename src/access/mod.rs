//! # Role Authority
//!
//! Maps a [`Role`](crate::model::Role) to the capabilities it holds and resolves who is
//! acting. Every gated client operation calls [`require`] before it reaches a store.

pub mod authority;
pub mod session;

pub use authority::*;
pub use session::*;
