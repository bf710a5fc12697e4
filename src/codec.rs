use std::path::{Path, PathBuf};

/// A file the user picked for one document kind, prior to encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Display name carried through to the scoring upload.
    pub file_name: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Self { path, file_name }
    }
}

/// Failure to read a selected file from local storage.
#[derive(Debug, thiserror::Error)]
#[error("unable to read {}: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read the complete file content into a transport-ready byte sequence.
/// The whole payload is in memory before any ledger call is issued; there
/// are no partial reads.
pub async fn encode(file: &SelectedFile) -> Result<Vec<u8>, ReadError> {
    read_all(&file.path).await
}

async fn read_all(path: &Path) -> Result<Vec<u8>, ReadError> {
    tokio::fs::read(path).await.map_err(|source| ReadError {
        path: path.to_path_buf(),
        source,
    })
}
