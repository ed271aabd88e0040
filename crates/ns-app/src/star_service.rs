//! Single-star services for one EOS definition.

use crate::config::{EosDef, NamedDensity, SearchDef};
use crate::error::{AppError, AppResult};
use ns_eos::EquationOfState;
use ns_structure::{ProfileLayer, StructureProfile};
use ns_tidal::{TidalLoveWrapper, TidalResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

fn open(eos: &EosDef, checkpoints: &[NamedDensity]) -> AppResult<TidalLoveWrapper> {
    let mut wrapper = TidalLoveWrapper::new(eos.build("cli")?)?;
    if !checkpoints.is_empty() {
        let named: Vec<(&str, f64)> = checkpoints
            .iter()
            .map(|c| (c.name.as_str(), c.density))
            .collect();
        wrapper.set_named_checkpoint_by_density(&named);
    }
    Ok(wrapper)
}

/// Star of `search.target_mass`. A search that does not converge is an error
/// here, unlike in [`TidalLoveWrapper::find_mass`].
pub fn find_mass(
    eos: &EosDef,
    search: &SearchDef,
    checkpoints: &[NamedDensity],
) -> AppResult<TidalResult> {
    let mut wrapper = open(eos, checkpoints)?;
    let star = wrapper.find_mass_with(&search.to_search_config());
    wrapper.close()?;
    if star.central_pressure.is_nan() {
        return Err(AppError::Tidal(format!(
            "no star of {} M_sun found from central pressure {}",
            search.target_mass, search.central_pressure0
        )));
    }
    Ok(star)
}

pub fn find_max_mass(eos: &EosDef, search: &SearchDef) -> AppResult<TidalResult> {
    let mut wrapper = open(eos, &[])?;
    let star = wrapper.find_max_mass_with(&search.to_search_config())?;
    wrapper.close()?;
    Ok(star)
}

/// Star at a fixed central pressure together with its radial trace.
#[derive(Clone, Debug)]
pub struct StarProfile {
    pub star: TidalResult,
    pub profile: StructureProfile,
    /// Shells between consecutive transition densities, centre first
    pub layers: Vec<ProfileLayer>,
}

pub fn star_profile(
    eos: &EosDef,
    central_pressure: f64,
    transition_densities: &[f64],
) -> AppResult<StarProfile> {
    let mut wrapper = open(eos, &[])?;
    let star = wrapper.calculate(central_pressure)?;
    let profile = wrapper.profile(central_pressure)?;
    let transitions: Vec<f64> = transition_densities
        .iter()
        .map(|&n| wrapper.eos().pressure(n, 0.0))
        .collect();
    let layers = profile.split_at_pressures(&transitions);
    wrapper.close()?;
    Ok(StarProfile {
        star,
        profile,
        layers,
    })
}

/// Write the integrator table of `eos` to `path`; returns the row count.
pub fn write_table(eos: &EosDef, path: &Path) -> AppResult<usize> {
    let model = eos.build("cli")?;
    let mut out = BufWriter::new(File::create(path)?);
    let rows = model.write_table(&mut out)?;
    info!(path = %path.display(), rows, "EOS table written");
    Ok(rows)
}
