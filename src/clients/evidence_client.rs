//! # Evidence Client
//!
//! Gated uploads into the evidence store. Returns the storage path of each recorded file.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::access::{require, Principal};
use crate::clients::RetryPolicy;
use crate::forms::EvidenceForm;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    evidence_path, Capability, Evidence, EvidenceFile, EvidenceFilter, EvidenceId, NewEvidence,
    OrderId,
};
use crate::evidence_actor::{EvidenceError, EvidenceUpdate};

/// Client for interacting with the Evidence actor.
#[derive(Clone)]
pub struct EvidenceClient {
    inner: ResourceClient<Evidence>,
    retry: RetryPolicy,
}

impl EvidenceClient {
    pub fn new(inner: ResourceClient<Evidence>) -> Self {
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
impl ActorClient<Evidence> for EvidenceClient {
    type Error = EvidenceError;

    fn inner(&self) -> &ResourceClient<Evidence> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<EvidenceError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => EvidenceError::NotFound(id),
            Err(other) => EvidenceError::Unavailable(other.to_string()),
        }
    }

    fn not_found(id: &EvidenceId) -> Self::Error {
        EvidenceError::NotFound(id.to_string())
    }
}

impl EvidenceClient {
    /// Records one file against an existing order. Requires `uploadEvidence`.
    #[instrument(skip(self, principal, file), fields(role = %principal.role, file = %file.file_name))]
    pub async fn upload(
        &self,
        principal: &Principal,
        order: OrderId,
        file: EvidenceFile,
        description: Option<String>,
    ) -> Result<String, EvidenceError> {
        require(principal.role, Capability::UploadEvidence)?;
        file.validate()?;
        let file_name = file.file_name.clone();
        debug!("Sending request");
        let id = self
            .inner
            .create(NewEvidence {
                work_order_id: order,
                file,
                description,
                uploaded_by: *principal,
            })
            .await
            .map_err(Self::map_error)?;
        let path = evidence_path(order, id, &file_name);
        info!(%id, %path, "Evidence recorded");
        Ok(path)
    }

    /// Uploads every file of the evidence form, in order. Stops at the first failure.
    pub async fn upload_form(
        &self,
        principal: &Principal,
        order: OrderId,
        form: EvidenceForm,
    ) -> Result<Vec<String>, EvidenceError> {
        require(principal.role, Capability::UploadEvidence)?;
        form.validate()?;
        let description = form.description();
        let mut paths = Vec::with_capacity(form.files.len());
        for file in form.files {
            paths.push(
                self.upload(principal, order, file, description.clone())
                    .await?,
            );
        }
        Ok(paths)
    }

    #[instrument(skip(self))]
    pub async fn list_for_order(&self, order: OrderId) -> Result<Vec<Evidence>, EvidenceError> {
        let filter = EvidenceFilter {
            work_order_id: Some(order),
            kind: None,
        };
        self.retry
            .run("list_evidence", || self.fetch_all(filter.clone()))
            .await
    }

    /// Replaces a record's description. The uploader may edit their own records; anyone
    /// else needs `editOrders`.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn describe(
        &self,
        principal: &Principal,
        id: EvidenceId,
        description: Option<String>,
    ) -> Result<Evidence, EvidenceError> {
        require(principal.role, Capability::UploadEvidence)?;
        self.inner
            .update(
                id,
                EvidenceUpdate {
                    principal: *principal,
                    description,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// Removes a record. Requires `editOrders`.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn delete(&self, principal: &Principal, id: EvidenceId) -> Result<(), EvidenceError> {
        require(principal.role, Capability::EditOrders)?;
        self.inner.delete(id).await.map_err(Self::map_error)
    }

    /// Removes every record attached to `order`. Requires `editOrders`.
    ///
    /// Returns the number of records removed.
    #[instrument(skip(self, principal), fields(role = %principal.role))]
    pub async fn purge_order(
        &self,
        principal: &Principal,
        order: OrderId,
    ) -> Result<usize, EvidenceError> {
        require(principal.role, Capability::EditOrders)?;
        let records = self.list_for_order(order).await?;
        for record in &records {
            match self.inner.delete(record.id).await.map_err(Self::map_error) {
                Ok(()) | Err(EvidenceError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        info!(%order, removed = records.len(), "Evidence purged");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_create, MockClient};
    use crate::model::{EvidenceKind, TechnicianId};
    use crate::work_order_actor::WorkOrderError;

    fn photo() -> EvidenceFile {
        EvidenceFile {
            file_name: "antes.jpg".into(),
            content_type: "image/jpeg".into(),
            kind: EvidenceKind::Photo,
            bytes: vec![1; 16],
        }
    }

    #[tokio::test]
    async fn test_upload_returns_storage_path() {
        let (client, mut receiver) = create_mock_client::<Evidence>(10);
        let client = EvidenceClient::new(client);

        let handle = tokio::spawn(async move {
            let (params, respond_to) = expect_create(&mut receiver).await.unwrap();
            assert_eq!(params.work_order_id, OrderId(5));
            assert_eq!(params.uploaded_by, Principal::technician(TechnicianId(2)));
            let _ = respond_to.send(Ok(EvidenceId(11)));
        });

        let path = client
            .upload(
                &Principal::technician(TechnicianId(2)),
                OrderId(5),
                photo(),
                Some("Estado inicial".into()),
            )
            .await
            .unwrap();
        assert_eq!(path, "orders/order_5/evidence/evidence_11-antes.jpg");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_file_never_reaches_the_store() {
        let mock = MockClient::<Evidence>::new();
        let client = EvidenceClient::new(mock.client());
        let archive = EvidenceFile {
            content_type: "application/x-msdownload".into(),
            ..photo()
        };
        let err = client
            .upload(&Principal::supervisor(), OrderId(1), archive, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EvidenceError::Validation(ref v) if v.field == "content_type"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_unknown_order_is_reported() {
        let mut mock = MockClient::<Evidence>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(EvidenceError::WorkOrder(
                WorkOrderError::NotFound("order_9".into()),
            ))));
        let client = EvidenceClient::new(mock.client());
        let err = client
            .upload(&Principal::supervisor(), OrderId(9), photo(), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EvidenceError::WorkOrder(WorkOrderError::NotFound("order_9".into()))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_form_is_rejected() {
        let mock = MockClient::<Evidence>::new();
        let client = EvidenceClient::new(mock.client());
        let err = client
            .upload_form(
                &Principal::technician(TechnicianId(1)),
                OrderId(1),
                EvidenceForm::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EvidenceError::Validation(ref v) if v.field == "files"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_colleague_upload_is_refused_by_the_store() {
        let mut mock = MockClient::<Evidence>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(EvidenceError::NotAssignee {
                order: OrderId(4),
            })));
        let client = EvidenceClient::new(mock.client());
        let err = client
            .upload(&Principal::technician(TechnicianId(8)), OrderId(4), photo(), None)
            .await
            .unwrap_err();
        assert_eq!(err, EvidenceError::NotAssignee { order: OrderId(4) });
        mock.verify();
    }

    #[tokio::test]
    async fn test_technician_cannot_purge_an_order() {
        let mock = MockClient::<Evidence>::new();
        let client = EvidenceClient::new(mock.client());
        let err = client
            .purge_order(&Principal::technician(TechnicianId(2)), OrderId(3))
            .await
            .unwrap_err();
        assert!(matches!(err, EvidenceError::PermissionDenied(_)));
        mock.verify();
    }
}
