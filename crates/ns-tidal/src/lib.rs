//! ns-tidal: mass, radius and tidal deformability of neutron stars for one EOS.
//!
//! Provides:
//! - `TidalLoveWrapper`, which binds an EOS to a stellar-structure integrator
//!   through a scoped table file
//! - `CheckpointSchedule`, the pressure/density checkpoints reported by the
//!   integrator
//! - Searches for a target mass and for the maximum mass
//!
//! # Example
//!
//! ```no_run
//! use ns_eos::Polytrope;
//! use ns_tidal::TidalLoveWrapper;
//!
//! let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
//! let mut wrapper = TidalLoveWrapper::new(eos).unwrap();
//! let star = wrapper.find_mass(10.0, 1.4);
//! println!("R = {} km, Lambda = {}", star.radius, star.lambda);
//! ```

pub mod checkpoint;
pub mod error;
pub mod result;
pub mod search;
pub mod table_file;
pub mod wrapper;

pub use checkpoint::CheckpointSchedule;
pub use error::{TidalError, WrapperResult};
pub use result::TidalResult;
pub use search::SearchConfig;
pub use table_file::TableFile;
pub use wrapper::{DEFAULT_SURFACE_PRESSURE, TidalLoveWrapper};
