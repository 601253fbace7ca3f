//! Adapters between the ledger service and the outside: CSV requests and
//! balances, JSON seeds, and HTTP-style replies.

pub mod csv;
pub mod reply;
pub mod request;
pub mod seed;
