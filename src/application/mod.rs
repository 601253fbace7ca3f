//! Application layer: ledger operations over an injected store.
//!
//! `LedgerService` is the entry point. Payments and deposits run under
//! per-row locks from `locks`; reports are plain reads.

pub mod deposits;
pub mod locks;
pub mod payments;
pub mod reports;
pub mod service;
