pub(crate) mod expand;
pub(crate) mod filter;
pub(crate) mod generate;
pub(crate) mod triggers;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn emit(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
