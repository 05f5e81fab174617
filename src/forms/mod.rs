//! # Forms
//!
//! Client-side parsing and validation of the dashboard's forms, plus the
//! [`SubmissionGuard`] that keeps each form to one pending submission.

pub mod order_form;
pub mod reports;
pub mod submission;

pub use order_form::*;
pub use reports::*;
pub use submission::*;
