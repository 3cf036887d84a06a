//! CSV history writers.
//!
//! Headers come from the record structs via serde, so the on-disk column
//! names track the schema types in one place.

use std::path::Path;

use serde::Serialize;

use firm_events::{AgentRecord, CensusRecord, FirmRecord};

use crate::error::SimError;

fn write_csv<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<(), SimError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full per-agent history to `agents.csv`.
pub fn write_agent_history(path: impl AsRef<Path>, records: &[AgentRecord]) -> Result<(), SimError> {
    write_csv(path, records)
}

/// Write the per-firm history to `firms.csv`.
pub fn write_firm_history(path: impl AsRef<Path>, records: &[FirmRecord]) -> Result<(), SimError> {
    write_csv(path, records)
}

/// Write the per-step census to `census.csv`.
pub fn write_census_history(
    path: impl AsRef<Path>,
    records: &[CensusRecord],
) -> Result<(), SimError> {
    write_csv(path, records)
}
