//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! Every operation that changes state takes the acting
//! [`Principal`](crate::access::Principal) and checks role authority before the request is
//! sent. Reads retry on transport failures according to a [`RetryPolicy`].

pub mod evidence_client;
pub mod retry;
pub mod technician_client;
pub mod work_order_client;

pub use evidence_client::*;
pub use retry::*;
pub use technician_client::*;
pub use work_order_client::*;
