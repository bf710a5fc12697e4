use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::domain::{DocumentRecord, Principal};
use crate::ledger::LedgerGateway;

/// Session state established before the first submission: the caller's
/// identity and the current document log.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub identity: Principal,
    pub documents: Vec<DocumentRecord>,
}

/// Bootstrap failure, reported to the user as a connectivity problem. Never
/// fatal to the process and never a gate on the orchestrator becoming
/// usable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectivityError {
    #[error("account setup failed: {0}")]
    Account(String),
    #[error("identity lookup failed: {0}")]
    Identity(String),
    #[error("document listing failed: {0}")]
    Documents(String),
}

/// Idempotent mount-time setup: ensure an account exists and the document
/// list is fresh. Safe to run again on a duplicate mount; the ledger owns
/// the durable state, so nothing here doubles.
pub struct SessionBootstrapper<L> {
    ledger: Arc<L>,
    page_limit: u64,
}

impl<L> SessionBootstrapper<L>
where
    L: LedgerGateway + 'static,
{
    pub fn new(ledger: Arc<L>, config: &LedgerConfig) -> Self {
        Self {
            ledger,
            page_limit: config.page_limit,
        }
    }

    pub async fn initialize(&self) -> Result<SessionContext, ConnectivityError> {
        match self.ledger.create_account().await {
            Ok(()) => info!("account created"),
            Err(err) if err.is_already_exists() => {
                debug!("account already present");
            }
            Err(err) => return Err(ConnectivityError::Account(err.to_string())),
        }

        let identity = self
            .ledger
            .whoami()
            .await
            .map_err(|err| ConnectivityError::Identity(err.to_string()))?;

        let documents = self
            .ledger
            .list_documents(0, self.page_limit)
            .await
            .map_err(|err| ConnectivityError::Documents(err.to_string()))?;

        debug!(identity = %identity, documents = documents.len(), "session ready");
        Ok(SessionContext {
            identity,
            documents,
        })
    }
}
