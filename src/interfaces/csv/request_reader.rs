use crate::error::{LedgerError, Result};
use crate::interfaces::request::Request;
use std::io::Read;

/// Reads pay/deposit requests from a CSV source with the header
/// `op, profile, target, amount`.
///
/// Whitespace is trimmed and short rows are accepted, so a pay request may
/// leave the amount column off entirely.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes requests; a malformed row yields an error and
    /// the iteration carries on with the next one.
    pub fn requests(self) -> impl Iterator<Item = Result<Request>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
