use std::collections::BTreeMap;

use crate::codec::SelectedFile;
use crate::domain::{
    AiQuotation, DocumentId, DocumentKind, DocumentRecord, UnderwritingResult,
};

/// Files the user picked for one attempt, at most one per kind. A kind
/// that is not populated here never produces a submission call.
#[derive(Debug, Clone, Default)]
pub struct DocumentSelection {
    files: BTreeMap<DocumentKind, SelectedFile>,
}

impl DocumentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a file for `kind`, replacing any earlier pick.
    pub fn select(&mut self, kind: DocumentKind, file: SelectedFile) {
        self.files.insert(kind, file);
    }

    pub fn clear(&mut self, kind: DocumentKind) {
        self.files.remove(&kind);
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&SelectedFile> {
        self.files.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Populated kinds in the fixed submission order: FinancialAudit,
    /// ScannedForm, OperationLicense.
    pub fn populated(&self) -> impl Iterator<Item = (DocumentKind, &SelectedFile)> {
        DocumentKind::SUBMISSION_ORDER
            .iter()
            .filter_map(|kind| self.files.get(kind).map(|file| (*kind, file)))
    }
}

/// Workflow states of one submission attempt. `Settled` and `Errored` are
/// terminal; a new attempt starts over from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    AwaitingUnderwriting,
    AwaitingScoring,
    Settled,
    Errored,
}

impl SubmissionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionPhase::Settled | SubmissionPhase::Errored)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::Submitting
                | SubmissionPhase::AwaitingUnderwriting
                | SubmissionPhase::AwaitingScoring
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Submitting => "submitting documents",
            SubmissionPhase::AwaitingUnderwriting => "awaiting underwriting",
            SubmissionPhase::AwaitingScoring => "awaiting scoring",
            SubmissionPhase::Settled => "settled",
            SubmissionPhase::Errored => "errored",
        }
    }
}

/// Errors accumulated across one attempt, grouped by failure domain. None
/// of these abort the attempt; they travel with the settled outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptErrors {
    /// Per-document encode or submit failures, keyed by kind.
    pub documents: BTreeMap<DocumentKind, String>,
    /// Ledger-path failure (identity, trigger, result, or refresh).
    pub ledger: Option<String>,
    /// Scoring-path failure.
    pub scoring: Option<String>,
}

impl AttemptErrors {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.ledger.is_none() && self.scoring.is_none()
    }

    pub fn record_document(&mut self, kind: DocumentKind, message: String) {
        self.documents.insert(kind, message);
    }

    pub fn record_ledger(&mut self, message: String) {
        match &mut self.ledger {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(&message);
            }
            slot => *slot = Some(message),
        }
    }

    pub fn record_scoring(&mut self, message: String) {
        match &mut self.scoring {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(&message);
            }
            slot => *slot = Some(message),
        }
    }

    /// Single user-readable line combining every recorded failure, or
    /// `None` when the attempt was clean.
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        for kind in DocumentKind::SUBMISSION_ORDER {
            if let Some(message) = self.documents.get(&kind) {
                parts.push(format!("{}: {}", kind.label(), message));
            }
        }
        if let Some(message) = &self.ledger {
            parts.push(format!("Underwriting: {message}"));
        }
        if let Some(message) = &self.scoring {
            parts.push(format!("AI scoring: {message}"));
        }
        Some(parts.join("; "))
    }
}

/// Snapshot handed to the presentation layer once both downstream paths
/// have resolved. Result slots are replaced wholesale per attempt, never
/// field-by-field.
#[derive(Debug, Clone)]
pub struct SettledAttempt {
    /// `Settled` when every step succeeded, `Errored` when anything was
    /// recorded in `errors`. Both carry whatever results were obtained.
    pub phase: SubmissionPhase,
    /// Documents the ledger accepted during this attempt, in submission order.
    pub submitted: Vec<(DocumentKind, DocumentId)>,
    pub underwriting: Option<UnderwritingResult>,
    pub ai_quotation: Option<AiQuotation>,
    /// Document log refreshed after settlement, regardless of outcome.
    pub documents: Vec<DocumentRecord>,
    pub errors: AttemptErrors,
}

impl SettledAttempt {
    pub fn error_summary(&self) -> Option<String> {
        self.errors.summary()
    }
}

/// Reasons a submit action is refused before any remote call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionRejected {
    #[error("no documents selected")]
    NothingSelected,
    #[error("a submission attempt is already in progress")]
    AttemptInFlight,
}
