//! Orchestration core for a browser-based insurance underwriting client.
//!
//! The crate coordinates two independent backends on behalf of a UI: a
//! durable ledger holding accounts, compliance documents, and underwriting
//! decisions, and an external AI scoring service computing a model-derived
//! quotation from the same documents. The UI owns rendering and routing;
//! this crate owns the submission workflow, its state machine, and its
//! failure semantics.

pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod scoring;
pub mod submission;
pub mod telemetry;

pub use bootstrap::{ConnectivityError, SessionBootstrapper, SessionContext};
pub use codec::{ReadError, SelectedFile};
pub use config::{AppConfig, LedgerConfig, ScoringConfig};
pub use domain::{
    AiQuotation, DocumentId, DocumentKind, DocumentRecord, Principal, UnderwritingResult,
    UnderwritingStatus,
};
pub use ledger::LedgerGateway;
pub use scoring::{DocumentBundle, HttpScoringClient, ScoringGateway};
pub use submission::{
    DocumentSelection, SettledAttempt, SubmissionOrchestrator, SubmissionPhase, SubmissionRejected,
};
