use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::access::{Principal, RoleSelection};
use crate::clients::{EvidenceClient, TechnicianClient, WorkOrderClient};
use crate::evidence_actor::EvidenceError;
use crate::forms::SubmissionGuard;
use crate::lifecycle::SystemConfig;
use crate::model::OrderId;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// The runtime orchestrator for the field-service stores.
///
/// `FieldServiceSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping every actor
/// - **Dependency Wiring**: the work-order store reads the technician roster, the
///   evidence store reads the work-order store
/// - **Shared Session State**: one [`RoleSelection`] and one [`SubmissionGuard`]
///
/// # Architecture
///
/// ```text
/// EvidenceClient ──► Evidence actor ──► WorkOrderClient ──► WorkOrder actor ──► TechnicianClient ──► Technician actor
/// ```
///
/// Dependencies only point one way, so dropping the public clients lets every actor drain
/// and exit in turn.
///
/// # Example
///
/// ```ignore
/// let system = FieldServiceSystem::new(&SystemConfig::default());
/// let supervisor = Principal::supervisor();
/// let tech = system.technicians.create(&supervisor, new_technician).await?;
/// let order = system.work_orders.create(&supervisor, new_order).await?;
/// system.shutdown().await?;
/// ```
pub struct FieldServiceSystem {
    pub work_orders: WorkOrderClient,
    pub technicians: TechnicianClient,
    pub evidence: EvidenceClient,
    pub session: Arc<RoleSelection>,
    pub submissions: SubmissionGuard,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FieldServiceSystem {
    /// Spawns the three actors with their injected context. Must be called inside a
    /// Tokio runtime.
    pub fn new(config: &SystemConfig) -> Self {
        let buffer = config.actor_buffer_size;
        let retry = config.retry.policy();

        // 1. Create actors
        let (technician_actor, technician_inner) = crate::technician_actor::new(buffer);
        let (work_order_actor, work_order_inner) = crate::work_order_actor::new(buffer);
        let (evidence_actor, evidence_inner) = crate::evidence_actor::new(buffer);

        let technicians = TechnicianClient::new(technician_inner).with_retry(retry);
        let work_orders = WorkOrderClient::new(work_order_inner).with_retry(retry);
        let evidence = EvidenceClient::new(evidence_inner).with_retry(retry);

        // 2. Start actors with injected context
        let technician_handle = tokio::spawn(technician_actor.run(()));
        let work_order_handle = tokio::spawn(work_order_actor.run(technicians.clone()));
        let evidence_handle = tokio::spawn(evidence_actor.run(work_orders.clone()));

        info!(buffer, default_role = %config.default_role, "Field service system started");

        Self {
            work_orders,
            technicians,
            evidence,
            session: Arc::new(RoleSelection::new(config.default_role)),
            submissions: SubmissionGuard::new(),
            // Evidence first: its context holds the last work-order sender.
            handles: vec![evidence_handle, work_order_handle, technician_handle],
        }
    }

    /// Deletes a work order and every evidence record attached to it. Requires
    /// `editOrders`.
    ///
    /// The order goes first, so uploads racing with the delete fail their order lookup
    /// instead of leaving records behind. Returns the number of evidence records removed.
    pub async fn delete_order(
        &self,
        principal: &Principal,
        id: OrderId,
    ) -> Result<usize, EvidenceError> {
        self.work_orders.delete(principal, id).await?;
        let removed = self.evidence.purge_order(principal, id).await?;
        info!(order = %id, removed, "Work order deleted");
        Ok(removed)
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes the request channels. The evidence actor exits first
    /// and releases its work-order client, then the work-order actor exits and releases
    /// the roster client. Clones of the clients held elsewhere keep their actor alive
    /// until they are dropped too.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.evidence);
        drop(self.work_orders);
        drop(self.technicians);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
