// Implementations of the ledger store.

pub mod in_memory;

pub use in_memory::InMemoryLedgerStore;
