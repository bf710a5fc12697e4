use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ScoringConfig;
use crate::domain::{AiQuotation, DocumentKind};

/// Raw document bytes keyed by kind, holding only the kinds that were
/// populated in the attempt and survived encoding and submission.
#[derive(Debug, Clone, Default)]
pub struct DocumentBundle {
    parts: BTreeMap<DocumentKind, BundlePart>,
}

#[derive(Debug, Clone)]
pub struct BundlePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DocumentKind, file_name: String, bytes: Vec<u8>) {
        self.parts.insert(kind, BundlePart { file_name, bytes });
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn kinds(&self) -> Vec<DocumentKind> {
        self.parts.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &BundlePart)> {
        self.parts.iter().map(|(kind, part)| (*kind, part))
    }
}

/// Acknowledgement body returned by the scoring submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringAck {
    pub message: String,
}

/// External scoring service failure. Independent infrastructure from the
/// ledger: none of these block the ledger-side flow.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring service unreachable: {0}")]
    Transport(String),
    #[error("scoring service returned status {0}")]
    Status(u16),
    #[error("scoring response malformed: {0}")]
    Decode(String),
}

/// Façade over the external AI scoring service.
#[async_trait]
pub trait ScoringGateway: Send + Sync {
    /// Forward the attempt's documents for model scoring.
    async fn submit_for_scoring(&self, bundle: &DocumentBundle) -> Result<ScoringAck, ScoringError>;

    /// Fetch the quotation computed from the last submitted bundle.
    async fn fetch_result(&self) -> Result<AiQuotation, ScoringError>;
}

/// HTTP client for the scoring service: multipart document upload plus a
/// JSON result fetch, both against the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ScoringError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ScoringGateway for HttpScoringClient {
    async fn submit_for_scoring(&self, bundle: &DocumentBundle) -> Result<ScoringAck, ScoringError> {
        let mut form = reqwest::multipart::Form::new();
        for (kind, part) in bundle.iter() {
            let file = reqwest::multipart::Part::bytes(part.bytes.clone())
                .file_name(part.file_name.clone())
                .mime_str(mime::APPLICATION_OCTET_STREAM.as_ref())
                .map_err(|err| ScoringError::Transport(err.to_string()))?;
            form = form.part(kind.form_field(), file);
        }

        let response = self
            .client
            .post(self.endpoint("process_underwriting"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| ScoringError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        response
            .json::<ScoringAck>()
            .await
            .map_err(|err| ScoringError::Decode(err.to_string()))
    }

    async fn fetch_result(&self) -> Result<AiQuotation, ScoringError> {
        let response = self
            .client
            .get(self.endpoint("get_underwriting_result"))
            .send()
            .await
            .map_err(|err| ScoringError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        response
            .json::<AiQuotation>()
            .await
            .map_err(|err| ScoringError::Decode(err.to_string()))
    }
}
