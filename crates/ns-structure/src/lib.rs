//! ns-structure: stellar structure and tidal response of a cold neutron star.
//!
//! Provides:
//! - TOV + tidal (y) equations with x = ln P as the independent variable
//! - Fixed-step RK4 integrator with geometric step growth from the centre
//! - `StructureIntegrator`, the seam between the EOS wrapper and the solver
//! - `TovIntegrator`, the default file-driven implementation
//! - Radial profiles split into composition layers
//!
//! Units: pressures and energy densities in MeV fm^-3, radii in km, masses in
//! solar masses. Integration runs in geometric units internally.

pub mod equations;
pub mod error;
pub mod integrator;
pub mod profile;
pub mod solve;

pub use equations::{StarEquations, StructureState, love_number, tidal_deformability};
pub use error::{StructureError, StructureResult};
pub use integrator::{Integrator, RK4, RadialModel, StepConfig};
pub use profile::{ProfileLayer, StructureProfile};
pub use solve::{IntegrationOutput, IntegrationRequest, StructureIntegrator, TovIntegrator};
