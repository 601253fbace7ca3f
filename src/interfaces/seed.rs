use crate::domain::snapshot::LedgerSnapshot;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parses a JSON ledger seed: `{"profiles": [...], "contracts": [...], "jobs": [...]}`.
pub fn read_snapshot<R: Read>(source: R) -> Result<LedgerSnapshot> {
    Ok(serde_json::from_reader(source)?)
}

pub fn load_snapshot(path: &Path) -> Result<LedgerSnapshot> {
    read_snapshot(BufReader::new(File::open(path)?))
}
