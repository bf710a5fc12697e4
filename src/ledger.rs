use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DocumentId, DocumentKind, DocumentRecord, Principal, UnderwritingResult};

/// Tagged result envelope used by the ledger's remote procedure calls.
/// The backend answers every call with `{"ok": ...}` or `{"err": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireResult<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> WireResult<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            WireResult::Ok(value) => Ok(value),
            WireResult::Err(err) => Err(err),
        }
    }
}

/// Account creation failure. `AlreadyExists` is an expected outcome of the
/// idempotent bootstrap path, not a fault.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    #[error("account already exists")]
    AlreadyExists,
    #[error("account creation failed: {0}")]
    Backend(String),
}

impl AccountError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, AccountError::AlreadyExists)
    }
}

/// Per-document submission failure. Non-fatal to the attempt: sibling
/// documents are still submitted.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    #[error("document rejected by ledger: {0}")]
    Rejected(String),
    #[error("ledger unreachable: {0}")]
    Transport(String),
}

/// Failure of an identity or listing query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger call failed: {0}")]
    Backend(String),
    #[error("ledger unreachable: {0}")]
    Transport(String),
}

/// Failure to trigger the ledger-side underwriting computation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessError {
    #[error("underwriting trigger rejected: {0}")]
    Rejected(String),
    #[error("ledger unreachable: {0}")]
    Transport(String),
}

/// Failure to retrieve the underwriting decision.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResultError {
    #[error("no underwriting result available yet")]
    NotReady,
    #[error("underwriting result unavailable: {0}")]
    Backend(String),
}

/// Typed façade over the durable ledger backend.
///
/// Every operation is a remote suspension point and may fail independently
/// of the others; no two calls share a transaction. Timeouts belong to the
/// implementation behind this trait, not to callers.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Create an account for the caller. Idempotent from the caller's side:
    /// a second creation yields [`AccountError::AlreadyExists`].
    async fn create_account(&self) -> Result<(), AccountError>;

    /// Append one document to the caller's log.
    async fn submit_document(
        &self,
        kind: DocumentKind,
        payload: Vec<u8>,
    ) -> Result<DocumentId, SubmitError>;

    /// Page through the caller's document log, oldest first.
    async fn list_documents(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<DocumentRecord>, LedgerError>;

    /// Resolve the caller's principal.
    async fn whoami(&self) -> Result<Principal, LedgerError>;

    /// Ask the ledger to compute an underwriting decision for `principal`
    /// from the documents it holds.
    async fn trigger_underwriting(&self, principal: &Principal) -> Result<(), ProcessError>;

    /// Fetch the most recent underwriting decision for the caller.
    async fn underwriting_result(&self) -> Result<UnderwritingResult, ResultError>;
}
