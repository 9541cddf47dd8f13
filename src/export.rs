//! CSV export of the filtered, normalized table (continent column included).

use std::io::Write;

use anyhow::{Context, Result};

use crate::dataset::Subset;

pub fn write_subset<W: Write>(writer: &mut csv::Writer<W>, subset: &Subset<'_>) -> Result<usize> {
    let headers = subset.dataset().schema().keys();
    writer.write_record(&headers).context("Writing header row")?;
    let mut written = 0;
    for row in subset.rows() {
        let record: Vec<String> = row
            .cells()
            .iter()
            .map(|cell| cell.as_ref().map(|v| v.as_display()).unwrap_or_default())
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("Writing row for '{}'", row.country()))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
