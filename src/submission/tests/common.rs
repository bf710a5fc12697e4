use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::codec::SelectedFile;
use crate::config::LedgerConfig;
use crate::domain::{
    AiQuotation, DocumentId, DocumentKind, DocumentRecord, Principal, UnderwritingResult,
    UnderwritingStatus,
};
use crate::ledger::{
    AccountError, LedgerError, LedgerGateway, ProcessError, ResultError, SubmitError,
};
use crate::scoring::{DocumentBundle, ScoringAck, ScoringError, ScoringGateway};
use crate::submission::{DocumentSelection, SubmissionOrchestrator};

pub(super) fn ledger_config() -> LedgerConfig {
    LedgerConfig { page_limit: 20 }
}

pub(super) fn approved_result() -> UnderwritingResult {
    UnderwritingResult {
        status: UnderwritingStatus::Approved,
        quotation: Some(5000),
        reason: None,
    }
}

pub(super) fn ai_result() -> AiQuotation {
    AiQuotation {
        status: "ok".to_string(),
        quotation: 4800.5,
        confidence: 0.91,
        model_predictions: BTreeMap::from([
            ("rf".to_string(), 4700.0),
            ("xgb".to_string(), 4900.0),
        ]),
    }
}

pub(super) fn orchestrator(
    ledger: Arc<MemoryLedger>,
    scoring: Arc<MemoryScoring>,
) -> SubmissionOrchestrator<MemoryLedger, MemoryScoring> {
    SubmissionOrchestrator::new(ledger, scoring, &ledger_config())
}

/// Build a selection backed by real files so the codec path is exercised.
/// The returned `TempDir` keeps the fixtures alive for the test's duration.
pub(super) fn selection_with(kinds: &[DocumentKind]) -> (DocumentSelection, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut selection = DocumentSelection::new();
    for kind in kinds {
        let path = dir.path().join(format!("{}.pdf", kind.form_field()));
        std::fs::write(&path, format!("{} payload", kind.label())).expect("write fixture");
        selection.select(*kind, SelectedFile::new(path));
    }
    (selection, dir)
}

/// In-memory ledger with scripted failures and call journals.
pub(super) struct MemoryLedger {
    pub(super) principal: Principal,
    pub(super) account_conflict: bool,
    pub(super) fail_account: bool,
    pub(super) fail_submit: BTreeSet<DocumentKind>,
    pub(super) fail_whoami: bool,
    pub(super) fail_trigger: bool,
    /// `None` means the decision is not ready yet.
    pub(super) result: Option<UnderwritingResult>,
    pub(super) fail_list: bool,
    /// When set, `submit_document` parks until the gate is notified.
    pub(super) hold_submit: Option<Arc<Notify>>,
    pub(super) create_calls: AtomicU32,
    pub(super) submissions: Mutex<Vec<DocumentKind>>,
    pub(super) triggered: Mutex<Vec<Principal>>,
    pub(super) account_exists: AtomicBool,
    pub(super) store: Mutex<Vec<DocumentRecord>>,
    pub(super) next_id: AtomicU64,
    pub(super) clock_ns: AtomicU64,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self {
            principal: Principal::from_bytes(vec![0xab, 0xcd, 0xef, 0x01]),
            account_conflict: false,
            fail_account: false,
            fail_submit: BTreeSet::new(),
            fail_whoami: false,
            fail_trigger: false,
            result: Some(approved_result()),
            fail_list: false,
            hold_submit: None,
            create_calls: AtomicU32::new(0),
            submissions: Mutex::new(Vec::new()),
            triggered: Mutex::new(Vec::new()),
            account_exists: AtomicBool::new(false),
            store: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            clock_ns: AtomicU64::new(1_700_000_000_000_000_000),
        }
    }
}

impl MemoryLedger {
    pub(super) fn accounts(&self) -> u32 {
        u32::from(self.account_exists.load(Ordering::SeqCst))
    }

    pub(super) fn documents(&self) -> Vec<DocumentRecord> {
        self.store.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn submitted_kinds(&self) -> Vec<DocumentKind> {
        self.submissions
            .lock()
            .expect("journal mutex poisoned")
            .clone()
    }

    pub(super) fn trigger_calls(&self) -> Vec<Principal> {
        self.triggered
            .lock()
            .expect("journal mutex poisoned")
            .clone()
    }

    pub(super) fn seed_document(&self, kind: DocumentKind) {
        let record = DocumentRecord {
            owner: self.principal.clone(),
            kind,
            payload: vec![0x00],
            timestamp_ns: self.clock_ns.fetch_add(1_000, Ordering::SeqCst),
        };
        self.store.lock().expect("store mutex poisoned").push(record);
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn create_account(&self) -> Result<(), AccountError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_account {
            return Err(AccountError::Backend("ledger offline".to_string()));
        }
        if self.account_conflict || self.account_exists.swap(true, Ordering::SeqCst) {
            return Err(AccountError::AlreadyExists);
        }
        Ok(())
    }

    async fn submit_document(
        &self,
        kind: DocumentKind,
        payload: Vec<u8>,
    ) -> Result<DocumentId, SubmitError> {
        if let Some(gate) = &self.hold_submit {
            gate.notified().await;
        }
        self.submissions
            .lock()
            .expect("journal mutex poisoned")
            .push(kind);
        if self.fail_submit.contains(&kind) {
            return Err(SubmitError::Transport("timeout".to_string()));
        }
        let record = DocumentRecord {
            owner: self.principal.clone(),
            kind,
            payload,
            timestamp_ns: self.clock_ns.fetch_add(1_000, Ordering::SeqCst),
        };
        self.store.lock().expect("store mutex poisoned").push(record);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(DocumentId(format!("D{id}")))
    }

    async fn list_documents(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<DocumentRecord>, LedgerError> {
        if self.fail_list {
            return Err(LedgerError::Transport("timeout".to_string()));
        }
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn whoami(&self) -> Result<Principal, LedgerError> {
        if self.fail_whoami {
            return Err(LedgerError::Transport("timeout".to_string()));
        }
        Ok(self.principal.clone())
    }

    async fn trigger_underwriting(&self, principal: &Principal) -> Result<(), ProcessError> {
        self.triggered
            .lock()
            .expect("journal mutex poisoned")
            .push(principal.clone());
        if self.fail_trigger {
            return Err(ProcessError::Rejected("no documents on file".to_string()));
        }
        Ok(())
    }

    async fn underwriting_result(&self) -> Result<UnderwritingResult, ResultError> {
        match &self.result {
            Some(result) => Ok(result.clone()),
            None => Err(ResultError::NotReady),
        }
    }
}

/// In-memory scoring service recording the kinds of each bundle it sees.
pub(super) struct MemoryScoring {
    pub(super) fail_submit: bool,
    pub(super) fail_fetch: bool,
    pub(super) result: AiQuotation,
    pub(super) bundles: Mutex<Vec<Vec<DocumentKind>>>,
}

impl Default for MemoryScoring {
    fn default() -> Self {
        Self {
            fail_submit: false,
            fail_fetch: false,
            result: ai_result(),
            bundles: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryScoring {
    pub(super) fn seen_bundles(&self) -> Vec<Vec<DocumentKind>> {
        self.bundles.lock().expect("journal mutex poisoned").clone()
    }
}

#[async_trait]
impl ScoringGateway for MemoryScoring {
    async fn submit_for_scoring(&self, bundle: &DocumentBundle) -> Result<ScoringAck, ScoringError> {
        if self.fail_submit {
            return Err(ScoringError::Transport("connection refused".to_string()));
        }
        self.bundles
            .lock()
            .expect("journal mutex poisoned")
            .push(bundle.kinds());
        Ok(ScoringAck {
            message: "Underwriting processed successfully".to_string(),
        })
    }

    async fn fetch_result(&self) -> Result<AiQuotation, ScoringError> {
        if self.fail_fetch {
            return Err(ScoringError::Transport("connection refused".to_string()));
        }
        Ok(self.result.clone())
    }
}
