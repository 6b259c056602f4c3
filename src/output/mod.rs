pub mod csv;

pub use self::csv::{export_csv, export_filename, write_csv, CSV_COLUMNS};

use crate::error::Result;
use crate::model::VulnerabilityRecord;
use std::io::{self, Write};

/// One compact JSON object per line for each top-CVSS entry.
pub fn write_top_cvss<W: Write>(out: &mut W, entries: &[serde_json::Value]) -> Result<()> {
    for entry in entries {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

/// The repository listing, pretty-printed with two-space indentation.
pub fn write_repositories<W: Write>(out: &mut W, repositories: &serde_json::Value) -> Result<()> {
    let json = serde_json::to_string_pretty(repositories).map_err(io::Error::from)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

pub fn write_record<W: Write>(out: &mut W, record: &VulnerabilityRecord) -> Result<()> {
    let json = serde_json::to_string(record).map_err(io::Error::from)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
