// Alexa layer - request envelopes, the intent dispatcher, and its handlers.

pub mod dispatcher;
pub mod envelope;
pub mod lambda_runtime;

#[path = "handlers/handler_catalog.rs"]
pub mod handlers;

use crate::core::dates::{DateError, DateService};
use crate::core::ledger::{LedgerError, LedgerService, LedgerStore, LedgerStoreError};
use std::sync::Arc;

pub use dispatcher::Skill;

/// Ledger service over whichever store the composition root picked.
pub type DynLedgerService = LedgerService<Box<dyn LedgerStore>>;

/// Services shared by every handler.
pub struct Data {
    pub ledger: Arc<DynLedgerService>,
    pub dates: Arc<DateService>,
}

/// Everything that can go wrong while answering one request. Each variant is
/// turned into something speakable by `handlers::errors`.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("Required slot '{0}' was not filled")]
    UnresolvedSlot(&'static str),

    #[error(transparent)]
    DateParseFailure(#[from] DateError),

    #[error("No ledger row for {label}")]
    RowNotFound { label: String },

    #[error("No free expense column in row {row}")]
    ColumnCapacityExceeded { row: u32 },

    #[error("Ledger access failed: {0}")]
    LedgerAccessFailure(#[from] LedgerStoreError),

    #[error("No handler can answer this request")]
    NoHandler,

    #[error("Request addressed to application '{0}' was rejected")]
    UnverifiedApplication(String),
}

impl SkillError {
    /// Maps a ledger failure, using `label` to describe a missing day.
    pub fn from_ledger(err: LedgerError, label: &str) -> Self {
        match err {
            LedgerError::RowNotFound(_) => SkillError::RowNotFound {
                label: label.to_string(),
            },
            LedgerError::ColumnCapacityExceeded { row } => {
                SkillError::ColumnCapacityExceeded { row }
            }
            LedgerError::Store(store) => SkillError::LedgerAccessFailure(store),
        }
    }
}
