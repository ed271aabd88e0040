//! Error types for the tidal wrapper.

use ns_eos::EosError;
use ns_solver::SolverError;
use ns_structure::StructureError;
use thiserror::Error;

/// Errors raised by [`crate::TidalLoveWrapper`].
#[derive(Error, Debug)]
pub enum TidalError {
    /// The integrator could not produce a star at this central pressure.
    #[error(
        "Calculated mass is not positive: EOS exceeds its valid range at pc = {pc}, max pressure = {max_pressure}"
    )]
    PhysicalRange {
        pc: f64,
        max_pressure: f64,
        #[source]
        cause: Option<StructureError>,
    },

    /// Max-mass search ran out of restarts.
    #[error("Search exhausted after {attempts} attempts, last central pressure {last_pressure}")]
    SearchExhausted { attempts: usize, last_pressure: f64 },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("EOS error: {0}")]
    Eos(#[from] EosError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WrapperResult<T> = Result<T, TidalError>;

impl TidalError {
    pub fn is_physical_range(&self) -> bool {
        matches!(self, TidalError::PhysicalRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn physical_range_keeps_its_cause() {
        let err = TidalError::PhysicalRange {
            pc: -1.0,
            max_pressure: 1016.0,
            cause: Some(StructureError::OutOfRange {
                what: "central pressure",
                value: -1.0,
            }),
        };
        assert!(err.is_physical_range());
        assert!(err.to_string().contains("pc = -1"));
        assert!(err.source().is_some());
    }
}
