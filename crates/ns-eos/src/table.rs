//! Whitespace EOS table shared with the structure integrator.
//!
//! One row per density sample, four columns in fixed scientific notation:
//! energy density, pressure, density, and a constant 0.0 column.

use crate::error::{EosError, EosResult};
use std::io::Write;
use std::path::Path;

/// One table line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EosTableRow {
    /// [MeV fm^-3]
    pub energy_density: f64,
    /// [MeV fm^-3]
    pub pressure: f64,
    /// [fm^-3]
    pub density: f64,
}

impl EosTableRow {
    pub fn format(&self) -> String {
        format!(
            "   {:.5e}   {:.5e}   {:.5e}   {:.5e}\n",
            self.energy_density, self.pressure, self.density, 0.0
        )
    }
}

/// Write rows in table format; the caller guarantees density ordering.
pub fn write_rows(out: &mut dyn Write, rows: &[EosTableRow]) -> EosResult<()> {
    for row in rows {
        out.write_all(row.format().as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Parse table text. Blank lines are ignored.
pub fn parse_table(content: &str) -> EosResult<Vec<EosTableRow>> {
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let columns = line
            .split_whitespace()
            .map(|c| c.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EosError::Table {
                line: index + 1,
                message: e.to_string(),
            })?;
        if columns.len() != 4 {
            return Err(EosError::Table {
                line: index + 1,
                message: format!("expected 4 columns, found {}", columns.len()),
            });
        }
        rows.push(EosTableRow {
            energy_density: columns[0],
            pressure: columns[1],
            density: columns[2],
        });
    }
    Ok(rows)
}

pub fn read_table(path: &Path) -> EosResult<Vec<EosTableRow>> {
    let content = std::fs::read_to_string(path)?;
    parse_table(&content)
}
