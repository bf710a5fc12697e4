use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::codec;
use crate::config::LedgerConfig;
use crate::domain::{AiQuotation, UnderwritingResult};
use crate::ledger::LedgerGateway;
use crate::scoring::{DocumentBundle, ScoringGateway};

use super::attempt::{
    AttemptErrors, DocumentSelection, SettledAttempt, SubmissionPhase, SubmissionRejected,
};

/// Coordinates the ledger and scoring gateways into one user-initiated
/// submission workflow.
///
/// One attempt runs at a time. The ledger path and the scoring path are
/// decoupled failure domains: each always runs to a result or a recorded
/// error before the attempt settles, so a dead scoring service never hides
/// a successful underwriting decision, and vice versa.
pub struct SubmissionOrchestrator<L, S> {
    ledger: Arc<L>,
    scoring: Arc<S>,
    page_limit: u64,
    phase: Mutex<SubmissionPhase>,
}

impl<L, S> SubmissionOrchestrator<L, S>
where
    L: LedgerGateway + 'static,
    S: ScoringGateway + 'static,
{
    pub fn new(ledger: Arc<L>, scoring: Arc<S>, config: &LedgerConfig) -> Self {
        Self {
            ledger,
            scoring,
            page_limit: config.page_limit,
            phase: Mutex::new(SubmissionPhase::Idle),
        }
    }

    /// Read-only progress snapshot for the presentation layer.
    pub fn phase(&self) -> SubmissionPhase {
        match self.phase.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_phase(&self, next: SubmissionPhase) {
        let mut guard = match self.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    /// Claim the in-flight slot, refusing if an attempt is already running.
    fn begin(&self) -> Result<(), SubmissionRejected> {
        let mut guard = match self.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_in_flight() {
            return Err(SubmissionRejected::AttemptInFlight);
        }
        *guard = SubmissionPhase::Submitting;
        Ok(())
    }

    /// Run one submission attempt end to end and settle it.
    ///
    /// Rejected with no remote call and no state transition when nothing is
    /// selected or an attempt is already in flight.
    pub async fn submit(
        &self,
        selection: &DocumentSelection,
    ) -> Result<SettledAttempt, SubmissionRejected> {
        if selection.is_empty() {
            return Err(SubmissionRejected::NothingSelected);
        }
        self.begin()?;

        let settled = self.run(selection).await;
        self.set_phase(settled.phase);
        match settled.error_summary() {
            Some(summary) => info!(phase = settled.phase.label(), %summary, "attempt settled"),
            None => info!(phase = settled.phase.label(), "attempt settled"),
        }
        Ok(settled)
    }

    async fn run(&self, selection: &DocumentSelection) -> SettledAttempt {
        let mut errors = AttemptErrors::default();
        let mut submitted = Vec::new();
        let mut bundle = DocumentBundle::new();

        // Sequential, fixed-order submission so the underwriting trigger
        // observes every document this attempt managed to store.
        for (kind, file) in selection.populated() {
            match codec::encode(file).await {
                Ok(bytes) => match self.ledger.submit_document(kind, bytes.clone()).await {
                    Ok(id) => {
                        debug!(kind = kind.label(), id = %id, "document accepted by ledger");
                        bundle.insert(kind, file.file_name.clone(), bytes);
                        submitted.push((kind, id));
                    }
                    Err(err) => {
                        warn!(kind = kind.label(), error = %err, "document submission failed");
                        errors.record_document(kind, err.to_string());
                    }
                },
                Err(err) => {
                    warn!(kind = kind.label(), error = %err, "document encoding failed");
                    errors.record_document(kind, err.to_string());
                }
            }
        }

        self.set_phase(SubmissionPhase::AwaitingUnderwriting);
        let underwriting = self.ledger_path(&mut errors).await;

        self.set_phase(SubmissionPhase::AwaitingScoring);
        let ai_quotation = self.scoring_path(&bundle, &mut errors).await;

        // Refresh after settlement regardless of outcome so documents stored
        // by this attempt stay visible even when a later step failed.
        let documents = match self.ledger.list_documents(0, self.page_limit).await {
            Ok(documents) => documents,
            Err(err) => {
                warn!(error = %err, "document refresh failed");
                errors.record_ledger(err.to_string());
                Vec::new()
            }
        };

        let phase = if errors.is_empty() {
            SubmissionPhase::Settled
        } else {
            SubmissionPhase::Errored
        };

        SettledAttempt {
            phase,
            submitted,
            underwriting,
            ai_quotation,
            documents,
            errors,
        }
    }

    /// Ledger side: resolve identity, trigger the computation, fetch the
    /// decision. Any failure is recorded and the scoring path still runs.
    async fn ledger_path(&self, errors: &mut AttemptErrors) -> Option<UnderwritingResult> {
        let principal = match self.ledger.whoami().await {
            Ok(principal) => principal,
            Err(err) => {
                warn!(error = %err, "identity lookup failed");
                errors.record_ledger(err.to_string());
                return None;
            }
        };

        if let Err(err) = self.ledger.trigger_underwriting(&principal).await {
            warn!(error = %err, "underwriting trigger failed");
            errors.record_ledger(err.to_string());
            return None;
        }

        match self.ledger.underwriting_result().await {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(error = %err, "underwriting result unavailable");
                errors.record_ledger(err.to_string());
                None
            }
        }
    }

    /// Scoring side: forward only the documents the ledger accepted, then
    /// fetch the quotation. Independent of the ledger path's outcome.
    async fn scoring_path(
        &self,
        bundle: &DocumentBundle,
        errors: &mut AttemptErrors,
    ) -> Option<AiQuotation> {
        if bundle.is_empty() {
            errors.record_scoring("no documents reached the scoring service".to_string());
            return None;
        }

        if let Err(err) = self.scoring.submit_for_scoring(bundle).await {
            warn!(error = %err, "scoring submission failed");
            errors.record_scoring(err.to_string());
            return None;
        }

        match self.scoring.fetch_result().await {
            Ok(quotation) => Some(quotation),
            Err(err) => {
                warn!(error = %err, "scoring result unavailable");
                errors.record_scoring(err.to_string());
                None
            }
        }
    }
}
