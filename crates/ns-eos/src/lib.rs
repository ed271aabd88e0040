//! ns-eos: equation-of-state capability layer.
//!
//! Provides:
//! - `EquationOfState` trait (pressure, energy density, derivative, validity bounds)
//! - `Polytrope` reference implementation
//! - Density grids covering an EOS's valid domain
//! - The whitespace table format shared with the structure integrator
//! - `TabulatedEos`, the interpolated pressure-indexed view of a table
//! - Sound-speed scans for causality checks
//!
//! # Architecture
//!
//! The nuclear model is an injected dependency. Everything downstream of this
//! crate (inversion, stellar structure, batch sweeps) talks to the trait only,
//! so a Skyrme or spline parameterization can be plugged in without touching
//! the solvers.
//!
//! # Example
//!
//! ```no_run
//! use ns_eos::{EquationOfState, Polytrope};
//!
//! let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
//! let p = eos.pressure(0.32, 0.0);
//! println!("P(2 n0) = {p} MeV/fm^3");
//! ```

pub mod error;
pub mod grid;
pub mod model;
pub mod polytrope;
pub mod sound;
pub mod table;
pub mod tabulated;

// Re-exports for ergonomics
pub use error::{EosError, EosResult};
pub use grid::{DensityGrid, GridSegment, Spacing};
pub use model::{EquationOfState, ValidityBounds};
pub use polytrope::Polytrope;
pub use sound::{SoundSpeedScan, scan_sound_speed};
pub use table::{EosTableRow, parse_table, read_table, write_rows};
pub use tabulated::TabulatedEos;
