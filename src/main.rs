//! # fieldops demo
//!
//! Walks one work order through its whole lifecycle:
//! 1.  A supervisor registers a technician and creates an order assigned to them.
//! 2.  The technician starts it, reports an impediment, resumes, submits the checklist and
//!     uploads a photo.
//! 3.  The technician closes it with the client's sign-off; the supervisor reads the summary.

use fieldops::access::{Principal, SessionProvider};
use fieldops::forms::{CompletionForm, FormKey, FormKind, OrderForm};
use fieldops::lifecycle::{setup_tracing, FieldServiceSystem, SystemConfig};
use fieldops::model::{
    ChecklistItem, ChecklistResponse, ChecklistTemplate, EvidenceFile, EvidenceKind,
    ImpedimentKind, ItemResponse, NewTechnician, OrderType,
};
use tracing::{info, Instrument};

type DemoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> DemoResult<()> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    let system = FieldServiceSystem::new(&config);

    let supervisor = system.session.current_principal()?;
    info!(role = %supervisor.role, "Acting as");

    let span = tracing::info_span!("dispatch");
    let (technician, order) = async {
        let technician = system
            .technicians
            .create(
                &supervisor,
                NewTechnician {
                    name: "Laura Sánchez".into(),
                    email: "laura@example.com".into(),
                    phone: Some("+54 11 5555-0101".into()),
                    specialty: "Climatización".into(),
                },
            )
            .await?;

        let form = OrderForm {
            title: "Mantenimiento de aire acondicionado".into(),
            description: "Limpieza de filtros y control de carga de gas".into(),
            order_type: OrderType::Maintenance.to_string(),
            priority: "high".into(),
            client_name: "Empresa ABC".into(),
            client_address: "Av. Principal 123".into(),
            location: "Av. Principal 123, Piso 4".into(),
            scheduled_at: "2026-05-04".into(),
            assigned_to: Some(technician),
            ..Default::default()
        };
        let order = system
            .submissions
            .submit(
                FormKey::new(FormKind::CreateOrder),
                system.work_orders.create(&supervisor, form.parse()?),
            )
            .await??;
        DemoResult::Ok((technician, order))
    }
    .instrument(span)
    .await?;
    info!(%technician, %order, "Order dispatched");

    system.session.select(Principal::technician(technician));
    let tech = system.session.current_principal()?;

    let span = tracing::info_span!("field_work", %order);
    async {
        system.work_orders.start(&tech, order).await?;
        system
            .work_orders
            .report_impediment(
                &tech,
                order,
                ImpedimentKind::Access,
                "Sala de máquinas cerrada, esperando llave",
            )
            .await?;
        system.work_orders.resume(&tech, order).await?;

        let template = ChecklistTemplate {
            id: "ac-maintenance".into(),
            name: "Mantenimiento de Aire Acondicionado".into(),
            order_type: Some(OrderType::Maintenance),
            items: vec![
                ChecklistItem {
                    id: "filters".into(),
                    description: "Limpiar filtros".into(),
                    required: true,
                },
                ChecklistItem {
                    id: "gas".into(),
                    description: "Controlar carga de gas".into(),
                    required: true,
                },
                ChecklistItem {
                    id: "photos".into(),
                    description: "Fotografiar la unidad exterior".into(),
                    required: false,
                },
            ],
        };
        let checked = ItemResponse {
            checked: true,
            notes: None,
        };
        let response = ChecklistResponse {
            work_order_id: order,
            technician_id: Some(technician),
            entries: [("filters", checked.clone()), ("gas", checked)]
                .into_iter()
                .map(|(id, answer)| (id.to_string(), answer))
                .collect(),
        };
        system
            .work_orders
            .submit_checklist(&tech, template, response)
            .await?;

        let path = system
            .evidence
            .upload(
                &tech,
                order,
                EvidenceFile {
                    file_name: "unidad-exterior.jpg".into(),
                    content_type: "image/jpeg".into(),
                    kind: EvidenceKind::Photo,
                    bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
                },
                Some("Unidad exterior tras la limpieza".into()),
            )
            .await?;
        info!(%path, "Evidence uploaded");

        let completion = CompletionForm {
            notes: "Filtros limpios y carga de gas en rango".into(),
            client_signed: true,
            all_tasks_completed: true,
        };
        let done = system
            .submissions
            .submit(
                FormKey::for_order(FormKind::Completion, order),
                system.work_orders.perform(&tech, order, completion.parse()?),
            )
            .await??;
        info!(status = %done.status, "Order closed");
        DemoResult::Ok(())
    }
    .instrument(span)
    .await?;

    system.session.clear();
    let supervisor = system.session.current_principal()?;
    let summary = system.work_orders.summary(&supervisor).await?;
    info!(
        total = summary.total,
        completed = summary.completed,
        rate = summary.completion_rate(),
        "Summary"
    );

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
