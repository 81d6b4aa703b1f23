use super::ledger_models::CellRange;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Ledger API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Write shape mismatch: range {range} cannot hold {rows} row(s)")]
    ShapeMismatch { range: String, rows: usize },
}

/// The external spreadsheet holding the ledger.
///
/// Reads return a row-major grid of rendered cell text. Like the Sheets API,
/// trailing blank cells in a row and trailing blank rows may be omitted, so
/// callers must treat a missing cell as empty.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, LedgerStoreError>;

    /// Writes `values` (row-major) into `range` as one update.
    async fn write_range(
        &self,
        range: &CellRange,
        values: Vec<Vec<String>>,
    ) -> Result<(), LedgerStoreError>;
}

// Lets the composition root pick a backend at runtime.
#[async_trait]
impl LedgerStore for Box<dyn LedgerStore> {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, LedgerStoreError> {
        (**self).read_range(range).await
    }

    async fn write_range(
        &self,
        range: &CellRange,
        values: Vec<Vec<String>>,
    ) -> Result<(), LedgerStoreError> {
        (**self).write_range(range, values).await
    }
}
