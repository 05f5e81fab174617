//! At most one in-flight submission per form.
//!
//! A form disables its submit button while a request is pending. [`SubmissionGuard`]
//! enforces the same rule for any caller: a second submission of the same form is
//! refused until the first one finishes. Different forms never block each other.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

use crate::model::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    CreateOrder,
    EditOrder,
    AssignTechnician,
    ProgressReport,
    Impediment,
    Checklist,
    Completion,
    Evidence,
    RegisterTechnician,
}

/// Identifies one form instance: the form kind and the order it belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormKey {
    pub form: FormKind,
    pub order: Option<OrderId>,
}

impl FormKey {
    pub const fn new(form: FormKind) -> Self {
        Self { form, order: None }
    }

    pub const fn for_order(form: FormKind, order: OrderId) -> Self {
        Self {
            form,
            order: Some(order),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission of {0:?} is already pending")]
    AlreadyPending(FormKey),
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<Mutex<HashSet<FormKey>>>,
}

/// Holds the slot for one submission. Dropping it frees the slot.
#[derive(Debug)]
pub struct SubmissionTicket {
    key: FormKey,
    in_flight: Arc<Mutex<HashSet<FormKey>>>,
}

impl SubmissionTicket {
    pub fn key(&self) -> FormKey {
        self.key
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
        debug!(key = ?self.key, "Submission finished");
    }
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `key`, or fails if a submission for it is still pending.
    pub fn begin(&self, key: FormKey) -> Result<SubmissionTicket, SubmitError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key) {
            debug!(?key, "Submission refused, already pending");
            return Err(SubmitError::AlreadyPending(key));
        }
        debug!(?key, "Submission started");
        Ok(SubmissionTicket {
            key,
            in_flight: self.in_flight.clone(),
        })
    }

    pub fn is_pending(&self, key: FormKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }

    /// Runs `submission` while holding the slot for `key`.
    ///
    /// The slot is released when the future completes or is dropped.
    pub async fn submit<F, T>(&self, key: FormKey, submission: F) -> Result<T, SubmitError>
    where
        F: Future<Output = T>,
    {
        let _ticket = self.begin(key)?;
        Ok(submission.await)
    }
}
