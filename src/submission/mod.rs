//! The submission workflow: one user-initiated attempt that stores
//! documents on the ledger, triggers the underwriting decision, forwards
//! the same documents to the AI scoring service, and settles with both
//! outcomes merged into a single snapshot.

pub mod attempt;
pub mod orchestrator;


pub use attempt::{
    AttemptErrors, DocumentSelection, SettledAttempt, SubmissionPhase, SubmissionRejected,
};
pub use orchestrator::SubmissionOrchestrator;
