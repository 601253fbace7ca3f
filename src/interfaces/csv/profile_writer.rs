use crate::domain::ProfileId;
use crate::domain::profile::{Profile, Role};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow {
    profile: ProfileId,
    role: Role,
    balance: Decimal,
}

/// Writes profile balances as CSV: `profile,role,balance`.
pub struct ProfileWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProfileWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_profiles(&mut self, profiles: impl IntoIterator<Item = Profile>) -> Result<()> {
        for profile in profiles {
            self.writer.serialize(BalanceRow {
                profile: profile.id,
                role: profile.role,
                balance: profile.balance.0.normalize(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
