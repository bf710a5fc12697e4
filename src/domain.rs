use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of compliance documents an applicant can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    FinancialAudit,
    ScannedForm,
    OperationLicense,
}

impl DocumentKind {
    /// Fixed submission order, matching the upload form top to bottom.
    pub const SUBMISSION_ORDER: [DocumentKind; 3] = [
        DocumentKind::FinancialAudit,
        DocumentKind::ScannedForm,
        DocumentKind::OperationLicense,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::FinancialAudit => "Financial Audit",
            DocumentKind::ScannedForm => "Filled Form",
            DocumentKind::OperationLicense => "Operation License",
        }
    }

    /// Field name carried by the scoring service multipart upload.
    pub fn form_field(&self) -> &'static str {
        match self {
            DocumentKind::FinancialAudit => "financialAudit",
            DocumentKind::ScannedForm => "filledForm",
            DocumentKind::OperationLicense => "operationLicense",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque binary principal addressing the caller on the ledger backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(Vec<u8>);

impl Principal {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Canonical text rendering: lowercase hex, hyphenated in four-byte groups.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2 + self.0.len() / 4);
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 && index % 4 == 0 {
                out.push('-');
            }
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Ledger-assigned identifier for a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the ledger's append-only document log. Multiple records of
/// the same kind may coexist; identity is (owner, kind, submitted time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub owner: Principal,
    pub kind: DocumentKind,
    pub payload: Vec<u8>,
    /// Nanoseconds since the Unix epoch, as the ledger reports time.
    pub timestamp_ns: u64,
}

impl DocumentRecord {
    pub fn submitted_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp_ns as i64)
    }
}

/// Decision state reported by the ledger's underwriting pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderwritingStatus {
    Approved,
    Declined,
    Pending,
}

impl UnderwritingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UnderwritingStatus::Approved => "Approved",
            UnderwritingStatus::Declined => "Declined",
            UnderwritingStatus::Pending => "Pending",
        }
    }
}

/// Ledger-origin underwriting decision. Read-only to this crate; replaced
/// wholesale by a newer attempt, never field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingResult {
    pub status: UnderwritingStatus,
    pub quotation: Option<u64>,
    pub reason: Option<String>,
}

/// Scoring-origin quotation. Structurally unrelated to
/// [`UnderwritingResult`]; the view layer holds both side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiQuotation {
    pub status: String,
    pub quotation: f64,
    pub confidence: f64,
    pub model_predictions: BTreeMap<String, f64>,
}
