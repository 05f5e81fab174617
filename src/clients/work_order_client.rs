//! # Work Order Client
//!
//! The gated entry point to the work-order store. Role-only checks (create, delete, list
//! scope, metrics) happen here before a request is sent; checks that depend on the order's
//! current state run inside the actor.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::access::{has_permission, require, PermissionDenied, Principal};
use crate::clients::RetryPolicy;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::gates::{self, CompletionConfirmation, OrderActionKind};
use crate::model::{
    Capability, ChecklistResponse, ChecklistTemplate, ImpedimentKind, NewWorkOrder, OrderFilter,
    OrderId, OrderSummary, ProgressState, TechnicianId, WorkOrder, WorkOrderPatch,
};
use crate::work_order_actor::{WorkOrderAction, WorkOrderCommand, WorkOrderError, WorkOrderUpdate};

/// Client for interacting with the Work Order actor.
#[derive(Clone)]
pub struct WorkOrderClient {
    inner: ResourceClient<WorkOrder>,
    retry: RetryPolicy,
}

impl WorkOrderClient {
    pub fn new(inner: ResourceClient<WorkOrder>) -> Self {
        Self {
            inner,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ActorClient<WorkOrder> for WorkOrderClient {
    type Error = WorkOrderError;

    fn inner(&self) -> &ResourceClient<WorkOrder> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<WorkOrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => WorkOrderError::NotFound(id),
            Err(other) => WorkOrderError::Unavailable(other.to_string()),
        }
    }

    fn not_found(id: &OrderId) -> Self::Error {
        WorkOrderError::NotFound(id.to_string())
    }
}

/// Without `viewAllOrders` a principal only sees orders assigned to them.
fn may_view(principal: &Principal, order: &WorkOrder) -> bool {
    has_permission(principal.role, Capability::ViewAllOrders)
        || principal
            .technician_id
            .is_some_and(|tech| order.is_assigned_to(tech))
}

impl WorkOrderClient {
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn get(&self, principal: &Principal, id: OrderId) -> Result<WorkOrder, WorkOrderError> {
        let order = self.retry.run("get_order", || self.fetch(id)).await?;
        if !may_view(principal, &order) {
            return Err(PermissionDenied {
                role: principal.role,
                capability: Capability::ViewAllOrders,
            }
            .into());
        }
        Ok(order)
    }

    /// Lists orders matching `filter`, narrowed to the principal's own orders when they
    /// lack `viewAllOrders`.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn list(
        &self,
        principal: &Principal,
        mut filter: OrderFilter,
    ) -> Result<Vec<WorkOrder>, WorkOrderError> {
        if !has_permission(principal.role, Capability::ViewAllOrders) {
            let Some(own) = principal.technician_id else {
                return Ok(Vec::new());
            };
            if filter.assigned_to.is_some_and(|other| other != own) {
                return Err(PermissionDenied {
                    role: principal.role,
                    capability: Capability::ViewAllOrders,
                }
                .into());
            }
            filter.assigned_to = Some(own);
        }
        self.retry
            .run("list_orders", || self.fetch_all(filter.clone()))
            .await
    }

    #[instrument(skip(self, principal, params), fields(role = %principal.role))]
    pub async fn create(
        &self,
        principal: &Principal,
        params: NewWorkOrder,
    ) -> Result<OrderId, WorkOrderError> {
        require(principal.role, Capability::CreateOrders)?;
        params.validate()?;
        debug!(?params, "create called");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(%id, "Work order created");
        Ok(id)
    }

    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: OrderId,
        patch: WorkOrderPatch,
    ) -> Result<WorkOrder, WorkOrderError> {
        require(principal.role, Capability::EditOrders)?;
        self.inner
            .update(
                id,
                WorkOrderUpdate {
                    principal: *principal,
                    patch,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// Removes the order record only. Callers go through
    /// [`FieldServiceSystem::delete_order`](crate::lifecycle::FieldServiceSystem::delete_order),
    /// which also removes the order's evidence.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub(crate) async fn delete(
        &self,
        principal: &Principal,
        id: OrderId,
    ) -> Result<(), WorkOrderError> {
        require(principal.role, Capability::EditOrders)?;
        self.inner.delete(id).await.map_err(Self::map_error)
    }

    /// Sends a lifecycle command. The actor checks the gate and the state machine.
    #[instrument(skip(self, principal, command), fields(role = %principal.role, action = command.name()))]
    pub async fn perform(
        &self,
        principal: &Principal,
        id: OrderId,
        command: WorkOrderCommand,
    ) -> Result<WorkOrder, WorkOrderError> {
        command.validate()?;
        debug!("Sending request");
        let order = self
            .inner
            .perform_action(
                id,
                WorkOrderAction {
                    principal: *principal,
                    command,
                },
            )
            .await
            .map_err(Self::map_error)?;
        info!(%id, status = %order.status, "Action applied");
        Ok(order)
    }

    pub async fn assign_technician(
        &self,
        principal: &Principal,
        id: OrderId,
        technician: TechnicianId,
    ) -> Result<WorkOrder, WorkOrderError> {
        self.perform(principal, id, WorkOrderCommand::AssignTechnician { technician })
            .await
    }

    pub async fn start(&self, principal: &Principal, id: OrderId) -> Result<WorkOrder, WorkOrderError> {
        self.perform(principal, id, WorkOrderCommand::Start).await
    }

    pub async fn resume(&self, principal: &Principal, id: OrderId) -> Result<WorkOrder, WorkOrderError> {
        self.perform(principal, id, WorkOrderCommand::Resume).await
    }

    pub async fn report_progress(
        &self,
        principal: &Principal,
        id: OrderId,
        state: ProgressState,
        notes: impl Into<String>,
    ) -> Result<WorkOrder, WorkOrderError> {
        let notes = notes.into();
        self.perform(principal, id, WorkOrderCommand::ReportProgress { state, notes })
            .await
    }

    pub async fn report_impediment(
        &self,
        principal: &Principal,
        id: OrderId,
        kind: ImpedimentKind,
        description: impl Into<String>,
    ) -> Result<WorkOrder, WorkOrderError> {
        let description = description.into();
        self.perform(
            principal,
            id,
            WorkOrderCommand::ReportImpediment { kind, description },
        )
        .await
    }

    pub async fn submit_checklist(
        &self,
        principal: &Principal,
        template: ChecklistTemplate,
        response: ChecklistResponse,
    ) -> Result<WorkOrder, WorkOrderError> {
        let id = response.work_order_id;
        self.perform(
            principal,
            id,
            WorkOrderCommand::SubmitChecklist { template, response },
        )
        .await
    }

    pub async fn complete(
        &self,
        principal: &Principal,
        id: OrderId,
        notes: impl Into<String>,
        confirmation: CompletionConfirmation,
    ) -> Result<WorkOrder, WorkOrderError> {
        let notes = notes.into();
        self.perform(
            principal,
            id,
            WorkOrderCommand::Complete {
                notes,
                confirmation,
            },
        )
        .await
    }

    pub async fn cancel(
        &self,
        principal: &Principal,
        id: OrderId,
        reason: Option<String>,
    ) -> Result<WorkOrder, WorkOrderError> {
        self.perform(principal, id, WorkOrderCommand::Cancel { reason })
            .await
    }

    /// The actions the gate offers `principal` on the order's current snapshot.
    pub async fn available_actions(
        &self,
        principal: &Principal,
        id: OrderId,
    ) -> Result<Vec<OrderActionKind>, WorkOrderError> {
        let order = self.get(principal, id).await?;
        Ok(gates::available_actions(&order, principal))
    }

    /// Counts per status across every order. Requires `viewMetrics`.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn summary(&self, principal: &Principal) -> Result<OrderSummary, WorkOrderError> {
        require(principal.role, Capability::ViewMetrics)?;
        let orders = self
            .retry
            .run("order_summary", || self.fetch_all(OrderFilter::default()))
            .await?;
        Ok(OrderSummary::from_orders(&orders))
    }
}
