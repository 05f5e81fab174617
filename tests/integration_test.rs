use chrono::{TimeZone, Utc};
use fieldops::access::{Principal, SessionProvider};
use fieldops::evidence_actor::EvidenceError;
use fieldops::forms::{EvidenceForm, FormKey, FormKind, SubmitError};
use fieldops::gates::{CompletionConfirmation, OrderActionKind};
use fieldops::lifecycle::{FieldServiceSystem, SystemConfig};
use fieldops::model::{
    Availability, Capability, ChecklistItem, ChecklistResponse, ChecklistTemplate, Client,
    EvidenceFile, EvidenceKind, ItemResponse, Location, NewTechnician, NewWorkOrder, OrderFilter,
    OrderId, OrderStatus, OrderType, Priority, ProgressState, Role, TechnicianId,
};
use fieldops::technician_actor::TechnicianError;
use fieldops::work_order_actor::WorkOrderError;

fn new_technician(name: &str, email: &str) -> NewTechnician {
    NewTechnician {
        name: name.into(),
        email: email.into(),
        phone: None,
        specialty: "Climatización".into(),
    }
}

fn new_order(title: &str, assigned_to: Option<TechnicianId>) -> NewWorkOrder {
    NewWorkOrder {
        title: title.into(),
        description: "Revisión completa del equipo según protocolo".into(),
        order_type: OrderType::Maintenance,
        client: Client {
            name: "Empresa ABC".into(),
            tax_id: None,
            address: "Av. Principal 123".into(),
            phone: None,
            email: Some("contacto@abc.com".into()),
        },
        location: Location {
            address: "Av. Principal 123, Piso 4".into(),
            coordinates: None,
            map_link: None,
        },
        scheduled_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
        priority: Priority::Medium,
        assigned_to,
        supervisor_notes: None,
    }
}

fn template() -> ChecklistTemplate {
    ChecklistTemplate {
        id: "maintenance-basic".into(),
        name: "Mantenimiento básico".into(),
        order_type: Some(OrderType::Maintenance),
        items: vec![
            ChecklistItem {
                id: "power_off".into(),
                description: "Cortar alimentación".into(),
                required: true,
            },
            ChecklistItem {
                id: "filters".into(),
                description: "Limpiar filtros".into(),
                required: true,
            },
            ChecklistItem {
                id: "notes".into(),
                description: "Observaciones generales".into(),
                required: false,
            },
        ],
    }
}

fn answers(order: OrderId, checked: &[&str]) -> ChecklistResponse {
    ChecklistResponse {
        work_order_id: order,
        technician_id: None,
        entries: checked
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    ItemResponse {
                        checked: true,
                        notes: None,
                    },
                )
            })
            .collect(),
    }
}

fn photo(name: &str) -> EvidenceFile {
    EvidenceFile {
        file_name: name.into(),
        content_type: "image/jpeg".into(),
        kind: EvidenceKind::Photo,
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

/// Full end-to-end run with every real actor: dispatch, field work, close-out, summary.
#[tokio::test]
async fn test_full_work_order_lifecycle() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = system.session.current_principal().unwrap();
    assert_eq!(supervisor.role, Role::Supervisor);

    let tech_id = system
        .technicians
        .create(&supervisor, new_technician("Laura Sánchez", "laura@example.com"))
        .await
        .expect("Failed to register technician");
    let order = system
        .work_orders
        .create(&supervisor, new_order("Mantenimiento trimestral", None))
        .await
        .expect("Failed to create order");

    let assigned = system
        .work_orders
        .assign_technician(&supervisor, order, tech_id)
        .await
        .unwrap();
    assert_eq!(assigned.assigned_to, Some(tech_id));
    assert_eq!(assigned.status, OrderStatus::Pending);

    system.session.select(Principal::technician(tech_id));
    let tech = system.session.current_principal().unwrap();

    assert_eq!(
        system.work_orders.available_actions(&tech, order).await.unwrap(),
        vec![OrderActionKind::Start, OrderActionKind::UploadEvidence]
    );

    system.work_orders.start(&tech, order).await.unwrap();
    system
        .work_orders
        .report_progress(&tech, order, ProgressState::InProgress, "Filtros desmontados")
        .await
        .unwrap();

    // One required item left unchecked.
    let err = system
        .work_orders
        .submit_checklist(&tech, template(), answers(order, &["power_off"]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WorkOrderError::IncompleteChecklist {
            missing: vec!["filters".into()]
        }
    );

    let accepted = system
        .work_orders
        .submit_checklist(&tech, template(), answers(order, &["power_off", "filters"]))
        .await
        .unwrap();
    let checklist = accepted.checklist.expect("checklist stored");
    assert_eq!(checklist.template_id, "maintenance-basic");
    assert_eq!(checklist.response.technician_id, Some(tech_id));

    let paths = system
        .evidence
        .upload_form(
            &tech,
            order,
            EvidenceForm {
                files: vec![photo("antes.jpg"), photo("despues.jpg")],
                description: "Antes y después".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        paths,
        vec![
            "orders/order_1/evidence/evidence_1-antes.jpg".to_string(),
            "orders/order_1/evidence/evidence_2-despues.jpg".to_string(),
        ]
    );
    let stored = system.evidence.list_for_order(order).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|e| e.technician_id() == Some(tech_id)));

    // Unsigned completion is refused and leaves the order in progress.
    let unsigned = CompletionConfirmation {
        all_tasks_completed: true,
        client_signed: false,
    };
    assert!(system
        .work_orders
        .complete(&tech, order, "Trabajo terminado correctamente", unsigned)
        .await
        .is_err());

    let done = system
        .work_orders
        .complete(
            &tech,
            order,
            "Trabajo terminado correctamente",
            CompletionConfirmation::CONFIRMED,
        )
        .await
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
    assert!(done.finished_at.is_some());
    assert!(system
        .work_orders
        .available_actions(&tech, order)
        .await
        .unwrap()
        .is_empty());

    system.session.clear();
    let supervisor = system.session.current_principal().unwrap();
    let summary = system.work_orders.summary(&supervisor).await.unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.completed, 1);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_technician_permissions_and_visibility() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();

    let ana = system
        .technicians
        .create(&supervisor, new_technician("Ana Gómez", "ana@example.com"))
        .await
        .unwrap();
    let luis = system
        .technicians
        .create(&supervisor, new_technician("Luis Pérez", "luis@example.com"))
        .await
        .unwrap();
    let for_ana = system
        .work_orders
        .create(&supervisor, new_order("Inspección de caldera", Some(ana)))
        .await
        .unwrap();
    let for_luis = system
        .work_orders
        .create(&supervisor, new_order("Cambio de compresor", Some(luis)))
        .await
        .unwrap();

    let ana_session = Principal::technician(ana);

    // Supervisor-only operations.
    let denied = system
        .work_orders
        .create(&ana_session, new_order("Orden no autorizada", Some(ana)))
        .await
        .unwrap_err();
    assert!(matches!(
        denied,
        WorkOrderError::PermissionDenied(ref p) if p.capability == Capability::CreateOrders
    ));
    assert!(matches!(
        system.work_orders.summary(&ana_session).await,
        Err(WorkOrderError::PermissionDenied(_))
    ));
    assert!(matches!(
        system
            .technicians
            .create(&ana_session, new_technician("Otro", "otro@example.com"))
            .await,
        Err(TechnicianError::PermissionDenied(_))
    ));
    assert!(matches!(
        system.work_orders.cancel(&ana_session, for_ana, None).await,
        Err(WorkOrderError::PermissionDenied(_))
    ));

    // Visibility is limited to the technician's own orders.
    let visible = system
        .work_orders
        .list(&ana_session, OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(visible.iter().map(|o| o.id).collect::<Vec<_>>(), vec![for_ana]);
    assert!(matches!(
        system.work_orders.get(&ana_session, for_luis).await,
        Err(WorkOrderError::PermissionDenied(_))
    ));
    assert_eq!(
        system
            .work_orders
            .list(&supervisor, OrderFilter::default())
            .await
            .unwrap()
            .len(),
        2
    );

    // Field actions need the assignee.
    assert!(matches!(
        system.work_orders.start(&ana_session, for_luis).await,
        Err(WorkOrderError::NotAssignee { .. })
    ));

    // Availability: self-service for technicians, supervisor for anyone.
    let busy = system
        .technicians
        .set_availability(&ana_session, ana, Availability::Busy)
        .await
        .unwrap();
    assert_eq!(busy.availability, Availability::Busy);
    assert!(matches!(
        system
            .technicians
            .set_availability(&ana_session, luis, Availability::Offline)
            .await,
        Err(TechnicianError::PermissionDenied(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_rejections_and_unknown_references() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();

    // Unknown technician on create, unknown order for evidence.
    assert!(matches!(
        system
            .work_orders
            .create(&supervisor, new_order("Sin técnico válido", Some(TechnicianId(42))))
            .await,
        Err(WorkOrderError::Roster(TechnicianError::NotFound(_)))
    ));
    assert!(matches!(
        system
            .evidence
            .upload(&supervisor, OrderId(42), photo("x.jpg"), None)
            .await,
        Err(EvidenceError::WorkOrder(WorkOrderError::NotFound(_)))
    ));
    assert!(matches!(
        system.work_orders.get(&supervisor, OrderId(42)).await,
        Err(WorkOrderError::NotFound(_))
    ));

    let tech_id = system
        .technicians
        .create(&supervisor, new_technician("Marta Díaz", "marta@example.com"))
        .await
        .unwrap();
    let order = system
        .work_orders
        .create(&supervisor, new_order("Reparación de bomba", Some(tech_id)))
        .await
        .unwrap();
    let tech = Principal::technician(tech_id);

    // Progress reports need an order in progress.
    assert!(matches!(
        system
            .work_orders
            .report_progress(&tech, order, ProgressState::InProgress, "Llegué al sitio")
            .await,
        Err(WorkOrderError::ActionNotAllowed { status: OrderStatus::Pending, .. })
    ));

    system.work_orders.start(&tech, order).await.unwrap();
    let paused = system
        .work_orders
        .report_progress(&tech, order, ProgressState::Paused, "Esperando repuestos")
        .await
        .unwrap();
    assert_eq!(paused.status, OrderStatus::Observed);

    // Observed orders can be resumed, not started again.
    assert!(matches!(
        system.work_orders.start(&tech, order).await,
        Err(WorkOrderError::InvalidTransition(_))
    ));
    system.work_orders.resume(&tech, order).await.unwrap();

    let cancelled = system
        .work_orders
        .cancel(&supervisor, order, Some("Equipo dado de baja".into()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Terminal: no edits, no transitions.
    assert!(matches!(
        system
            .work_orders
            .update(&supervisor, order, Default::default())
            .await,
        Err(WorkOrderError::ActionNotAllowed { .. })
    ));
    assert!(matches!(
        system.work_orders.resume(&tech, order).await,
        Err(WorkOrderError::InvalidTransition(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_evidence_follows_the_order_gate() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();
    let ana = system
        .technicians
        .create(&supervisor, new_technician("Ana Gómez", "ana@example.com"))
        .await
        .unwrap();
    let luis = system
        .technicians
        .create(&supervisor, new_technician("Luis Pérez", "luis@example.com"))
        .await
        .unwrap();
    let for_luis = system
        .work_orders
        .create(&supervisor, new_order("Cambio de compresor", Some(luis)))
        .await
        .unwrap();
    let ana_session = Principal::technician(ana);
    let luis_session = Principal::technician(luis);

    assert!(system
        .work_orders
        .available_actions(&luis_session, for_luis)
        .await
        .unwrap()
        .contains(&OrderActionKind::UploadEvidence));
    // A colleague is not offered the upload, and the store refuses it too.
    assert!(matches!(
        system
            .evidence
            .upload(&ana_session, for_luis, photo("ajeno.jpg"), None)
            .await,
        Err(EvidenceError::NotAssignee { order }) if order == for_luis
    ));

    // Assignee and supervisor may attach while the order is open.
    system
        .evidence
        .upload(&luis_session, for_luis, photo("compresor.jpg"), None)
        .await
        .unwrap();
    system
        .evidence
        .upload(&supervisor, for_luis, photo("acta.jpg"), None)
        .await
        .unwrap();

    system
        .work_orders
        .cancel(&supervisor, for_luis, None)
        .await
        .unwrap();
    for principal in [luis_session, supervisor] {
        assert!(matches!(
            system
                .evidence
                .upload(&principal, for_luis, photo("tarde.jpg"), None)
                .await,
            Err(EvidenceError::OrderClosed {
                status: OrderStatus::Cancelled,
                ..
            })
        ));
    }

    // Rejected uploads leave nothing behind.
    let stored = system.evidence.list_for_order(for_luis).await.unwrap();
    assert_eq!(stored.len(), 2);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_evidence_descriptions_belong_to_the_uploader() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();
    let ana = system
        .technicians
        .create(&supervisor, new_technician("Ana Gómez", "ana@example.com"))
        .await
        .unwrap();
    let luis = system
        .technicians
        .create(&supervisor, new_technician("Luis Pérez", "luis@example.com"))
        .await
        .unwrap();
    let order = system
        .work_orders
        .create(&supervisor, new_order("Inspección de caldera", Some(ana)))
        .await
        .unwrap();
    let ana_session = Principal::technician(ana);
    system
        .evidence
        .upload(&ana_session, order, photo("caldera.jpg"), None)
        .await
        .unwrap();
    let id = system.evidence.list_for_order(order).await.unwrap()[0].id;

    assert!(matches!(
        system
            .evidence
            .describe(&Principal::technician(luis), id, Some("Reescrita".into()))
            .await,
        Err(EvidenceError::PermissionDenied(_))
    ));
    let own = system
        .evidence
        .describe(&ana_session, id, Some("Quemador principal".into()))
        .await
        .unwrap();
    assert_eq!(own.description.as_deref(), Some("Quemador principal"));
    let reviewed = system
        .evidence
        .describe(&supervisor, id, Some("Revisado por supervisión".into()))
        .await
        .unwrap();
    assert_eq!(reviewed.description.as_deref(), Some("Revisado por supervisión"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deleting_an_order_removes_its_evidence() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();
    let tech_id = system
        .technicians
        .create(&supervisor, new_technician("Marta Díaz", "marta@example.com"))
        .await
        .unwrap();
    let doomed = system
        .work_orders
        .create(&supervisor, new_order("Orden duplicada", Some(tech_id)))
        .await
        .unwrap();
    let kept = system
        .work_orders
        .create(&supervisor, new_order("Orden vigente", Some(tech_id)))
        .await
        .unwrap();
    let tech = Principal::technician(tech_id);
    for (order, name) in [(doomed, "a.jpg"), (doomed, "b.jpg"), (kept, "c.jpg")] {
        system
            .evidence
            .upload(&tech, order, photo(name), None)
            .await
            .unwrap();
    }

    assert!(matches!(
        system.delete_order(&tech, doomed).await,
        Err(EvidenceError::WorkOrder(WorkOrderError::PermissionDenied(_)))
    ));

    assert_eq!(system.delete_order(&supervisor, doomed).await.unwrap(), 2);
    assert!(system.evidence.list_for_order(doomed).await.unwrap().is_empty());
    assert_eq!(system.evidence.list_for_order(kept).await.unwrap().len(), 1);
    assert!(matches!(
        system.work_orders.get(&supervisor, doomed).await,
        Err(WorkOrderError::NotFound(_))
    ));
    assert!(matches!(
        system
            .evidence
            .upload(&tech, doomed, photo("d.jpg"), None)
            .await,
        Err(EvidenceError::WorkOrder(WorkOrderError::NotFound(_)))
    ));
    assert!(matches!(
        system.delete_order(&supervisor, doomed).await,
        Err(EvidenceError::WorkOrder(WorkOrderError::NotFound(_)))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_list_searches_by_order_number_and_client() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();
    for title in ["Mantenimiento trimestral", "Cambio de filtros", "Revisión eléctrica"] {
        let mut params = new_order(title, None);
        params.location.address = "Parque industrial, nave norte".into();
        system
            .work_orders
            .create(&supervisor, params)
            .await
            .unwrap();
    }

    let search = |term: &str| OrderFilter {
        search: Some(term.into()),
        ..Default::default()
    };
    let hits = system
        .work_orders
        .list(&supervisor, search("2"))
        .await
        .unwrap();
    assert_eq!(hits.iter().map(|o| o.id).collect::<Vec<_>>(), vec![OrderId(2)]);
    let hits = system
        .work_orders
        .list(&supervisor, search("EMPRESA abc"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_starts_are_serialized() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let supervisor = Principal::supervisor();
    let tech_id = system
        .technicians
        .create(&supervisor, new_technician("Pablo Ruiz", "pablo@example.com"))
        .await
        .unwrap();
    let order = system
        .work_orders
        .create(&supervisor, new_order("Instalación de split", Some(tech_id)))
        .await
        .unwrap();
    let tech = Principal::technician(tech_id);

    let first = system.work_orders.clone();
    let second = system.work_orders.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.start(&tech, order).await }),
        tokio::spawn(async move { second.start(&tech, order).await }),
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(WorkOrderError::InvalidTransition(_)))));

    let stored = system.work_orders.get(&supervisor, order).await.unwrap();
    assert_eq!(stored.status, OrderStatus::InProgress);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_form_submission_is_refused() {
    let system = FieldServiceSystem::new(&SystemConfig::default());
    let key = FormKey::for_order(FormKind::Completion, OrderId(1));

    let ticket = system.submissions.begin(key).unwrap();
    let second = system
        .submissions
        .submit(key, async { "never sent" })
        .await;
    assert_eq!(second, Err(SubmitError::AlreadyPending(key)));

    drop(ticket);
    assert_eq!(
        system.submissions.submit(key, async { "sent" }).await,
        Ok("sent")
    );

    system.shutdown().await.unwrap();
}
