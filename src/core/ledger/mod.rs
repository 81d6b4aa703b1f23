pub mod ledger_models;
pub mod ledger_service;
pub mod ledger_store;

pub use ledger_models::{
    BudgetInfo, CellRange, Column, ExpenseEntry, ExpenseRecord, ExpenseSlot, LedgerLayout,
};
pub use ledger_service::{LedgerError, LedgerService};
pub use ledger_store::{LedgerStore, LedgerStoreError};
