use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::access::Principal;
use crate::error::ValidationError;
use crate::model::{OrderId, TechnicianId};

/// Type-safe identifier for Evidence records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvidenceId(pub u32);

impl From<u32> for EvidenceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evidence_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Photo,
    Reading,
    Signature,
    Document,
    Other,
}

/// An uploaded file as received from the technician's device.
#[derive(Clone, PartialEq, Eq)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content_type: String,
    pub kind: EvidenceKind,
    pub bytes: Vec<u8>,
}

// Payloads are logged at debug level; keep the bytes out of the log line.
impl std::fmt::Debug for EvidenceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("kind", &self.kind)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl EvidenceFile {
    /// Accepts non-empty images and PDFs with a plain file name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.file_name.trim();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(ValidationError::new(
                "file_name",
                "must be a plain file name",
            ));
        }
        let content_type = self.content_type.to_ascii_lowercase();
        if !(content_type.starts_with("image/") || content_type == "application/pdf") {
            return Err(ValidationError::new(
                "content_type",
                format!("unsupported file type: {}", self.content_type),
            ));
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::new("file", "must not be empty"));
        }
        Ok(())
    }
}

/// Storage key for an uploaded file.
pub fn evidence_path(order: OrderId, evidence: EvidenceId, file_name: &str) -> String {
    format!("orders/{order}/evidence/{evidence}-{}", file_name.trim())
}

/// A file attached to a work order as proof of execution.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub work_order_id: OrderId,
    pub kind: EvidenceKind,
    pub file_path: String,
    pub content_type: String,
    pub size: usize,
    pub description: Option<String>,
    pub uploaded_by: Principal,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording an upload.
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub work_order_id: OrderId,
    pub file: EvidenceFile,
    pub description: Option<String>,
    /// Checked against the order's assignee and status when the record is created.
    pub uploaded_by: Principal,
}

#[derive(Debug, Clone, Default)]
pub struct EvidenceFilter {
    pub work_order_id: Option<OrderId>,
    pub kind: Option<EvidenceKind>,
}

impl Evidence {
    pub fn new(id: EvidenceId, params: NewEvidence, now: DateTime<Utc>) -> Self {
        Self {
            id,
            work_order_id: params.work_order_id,
            kind: params.file.kind,
            file_path: evidence_path(params.work_order_id, id, &params.file.file_name),
            content_type: params.file.content_type,
            size: params.file.bytes.len(),
            description: params.description,
            uploaded_by: params.uploaded_by,
            created_at: now,
        }
    }

    /// The technician who attached the file, if a technician did.
    pub fn technician_id(&self) -> Option<TechnicianId> {
        self.uploaded_by.technician_id
    }

    pub fn matches(&self, filter: &EvidenceFilter) -> bool {
        !(filter.work_order_id.is_some_and(|order| order != self.work_order_id)
            || filter.kind.is_some_and(|kind| kind != self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> EvidenceFile {
        EvidenceFile {
            file_name: "tablero.jpg".into(),
            content_type: "image/jpeg".into(),
            kind: EvidenceKind::Photo,
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[test]
    fn test_path_layout() {
        assert_eq!(
            evidence_path(OrderId(3), EvidenceId(9), "tablero.jpg"),
            "orders/order_3/evidence/evidence_9-tablero.jpg"
        );
    }

    #[test]
    fn test_images_and_pdfs_are_accepted() {
        assert!(photo().validate().is_ok());
        let pdf = EvidenceFile {
            file_name: "acta.pdf".into(),
            content_type: "application/pdf".into(),
            kind: EvidenceKind::Document,
            ..photo()
        };
        assert!(pdf.validate().is_ok());
    }

    #[test]
    fn test_other_files_are_rejected() {
        let zip = EvidenceFile {
            content_type: "application/zip".into(),
            ..photo()
        };
        assert_eq!(zip.validate().unwrap_err().field, "content_type");

        let empty = EvidenceFile {
            bytes: Vec::new(),
            ..photo()
        };
        assert_eq!(empty.validate().unwrap_err().field, "file");

        let nested = EvidenceFile {
            file_name: "../etc/passwd".into(),
            ..photo()
        };
        assert_eq!(nested.validate().unwrap_err().field, "file_name");
    }

    #[test]
    fn test_debug_omits_bytes() {
        let rendered = format!("{:?}", photo());
        assert!(rendered.contains("size: 3"));
        assert!(!rendered.contains("bytes"));
    }
}
