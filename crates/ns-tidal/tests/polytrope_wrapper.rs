//! End-to-end behaviour of the wrapper on a Γ = 2 polytrope.

use ns_core::{is_strictly_descending, solar_mass_km};
use ns_eos::{EquationOfState, Polytrope, ValidityBounds};
use ns_tidal::{CheckpointSchedule, TidalError, TidalLoveWrapper};

fn polytrope() -> Polytrope {
    Polytrope::new(254.0, 2.0, 2.0).unwrap()
}

fn wrapper() -> TidalLoveWrapper {
    TidalLoveWrapper::new(polytrope()).unwrap()
}

/// Dust: pressure identically zero.
struct ZeroPressure;

impl EquationOfState for ZeroPressure {
    fn name(&self) -> &str {
        "zero-pressure"
    }

    fn pressure(&self, _density: f64, _proton_fraction: f64) -> f64 {
        0.0
    }

    fn d_pressure(&self, _density: f64, _proton_fraction: f64) -> f64 {
        0.0
    }

    fn energy_density(&self, density: f64, _proton_fraction: f64) -> f64 {
        939.0 * density
    }

    fn validity(&self) -> ValidityBounds {
        ValidityBounds {
            max_density: 2.0,
            max_energy: 939.0 * 2.0,
            max_pressure: 0.0,
        }
    }
}

#[test]
fn stars_inside_the_valid_range() {
    let mut wrapper = wrapper();
    let max_pressure = wrapper.max_pressure();
    for pc in [1.0, 10.0, 57.0, 300.0, 0.9 * max_pressure] {
        let star = wrapper.calculate(pc).unwrap();
        assert!(star.mass > 0.0, "pc = {pc}");
        assert!(star.radius > 0.0, "pc = {pc}");
        assert!(star.lambda > 0.0, "pc = {pc}");
        assert_eq!(star.central_pressure, pc);
    }
}

#[test]
fn canonical_star_love_number() {
    let mut wrapper = wrapper();
    let star = wrapper.calculate(57.0).unwrap();
    let compactness = star.mass * solar_mass_km() / star.radius;
    let k2 = 1.5 * star.lambda * compactness.powi(5);
    assert!((compactness - 0.146).abs() < 2e-3, "C = {compactness}");
    assert!((k2 - 0.0738).abs() < 1e-3, "k2 = {k2}");
}

#[test]
fn stars_outside_the_valid_range() {
    let mut wrapper = wrapper();
    for pc in [0.0, -10.0, 1e5] {
        let err = wrapper.calculate(pc).unwrap_err();
        assert!(err.is_physical_range(), "pc = {pc}: {err}");
    }
}

#[test]
fn calculate_is_idempotent() {
    let mut wrapper = wrapper();
    wrapper.set_checkpoint_by_density(&[0.5, 0.16, 0.08]);
    let first = wrapper.calculate(80.0).unwrap();
    let second = wrapper.calculate(80.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn density_checkpoints_round_trip() {
    let mut wrapper = wrapper();
    wrapper.set_checkpoint_by_density(&[0.08, 0.32, 0.16]);
    assert_eq!(wrapper.density_checkpoints(), &[0.32, 0.16, 0.08]);

    let pressures = wrapper.checkpoint_pressures().to_vec();
    wrapper.set_checkpoint_by_pressure(&pressures);
    for (a, b) in wrapper.density_checkpoints().iter().zip([0.32, 0.16, 0.08]) {
        assert!((a - b).abs() < 1e-10);
    }

    let densities = wrapper.density_checkpoints().to_vec();
    wrapper.set_checkpoint_by_density(&densities);
    for (a, b) in wrapper.checkpoint_pressures().iter().zip(&pressures) {
        assert!((a - b).abs() <= 1e-9 * b);
    }
}

#[test]
fn checkpoints_trace_the_star() {
    let mut wrapper = wrapper();
    wrapper.set_named_checkpoint_by_density(&[("half", 0.08), ("saturation", 0.16), ("double", 0.32)]);
    assert_eq!(
        wrapper.named_density_checkpoints()[0],
        ("double".to_string(), 0.32)
    );
    assert!(is_strictly_descending(wrapper.checkpoint_pressures()));

    let star = wrapper.calculate(57.0).unwrap();
    assert_eq!(star.checkpoint_density, vec![0.32, 0.16, 0.08]);
    for (m, r) in star.checkpoint_mass.windows(2).zip(star.checkpoint_radius.windows(2)) {
        assert!(m[0] < m[1]);
        assert!(r[0] < r[1]);
    }
    assert!(star.checkpoint_radius[2] < star.radius);
}

#[test]
fn explicit_schedule_replaces_the_surface() {
    let mut wrapper = wrapper();
    let schedule = CheckpointSchedule::from_pressures(wrapper.eos(), &[1.0, 100.0]);
    wrapper.set_checkpoints(schedule.clone());
    assert_eq!(wrapper.checkpoints(), &schedule);
    let star = wrapper.calculate(50.0).unwrap();
    // 100 lies above the centre
    assert_eq!(star.checkpoint_mass[0], 0.0);
    assert!(star.checkpoint_mass[1] > 0.0);
}

#[test]
fn find_mass_hits_the_target() {
    let mut wrapper = wrapper();
    let star = wrapper.find_mass(10.0, 1.4);
    assert!(!star.is_nan());
    assert!((star.central_pressure - 57.2).abs() < 0.5, "pc = {}", star.central_pressure);
    assert!((star.mass - 1.4).abs() < 1e-3);
    assert!((star.central_density - polytrope().density_at_pressure(star.central_pressure)).abs() < 1e-8);

    let check = wrapper.calculate(star.central_pressure).unwrap();
    assert!((check.mass - 1.4).abs() < 1e-3);
}

#[test]
fn find_mass_snapshot_is_independent() {
    let mut wrapper = wrapper();
    let star = wrapper.find_mass(10.0, 1.2);
    let kept = star.clone();
    wrapper.calculate(300.0).unwrap();
    assert_eq!(star, kept);
    assert!(wrapper.result().mass > star.mass);
}

#[test]
fn find_mass_never_raises() {
    // clamped to 0.7 max_pressure, from where the secant leaves the table
    let mut wrapper = wrapper();
    let star = wrapper.find_mass(5000.0, 1.4);
    assert!(star.central_pressure.is_nan());
    assert!(star.central_density.is_nan());

    // unreachable target
    let star = wrapper.find_mass(10.0, 3.0);
    assert!(star.central_pressure.is_nan());
}

#[test]
fn find_max_mass_respects_the_bound() {
    let mut wrapper = wrapper();
    let upper = 0.95 * wrapper.max_pressure();
    let star = wrapper.find_max_mass(10.0).unwrap();
    assert!(star.central_pressure < upper);
    assert!((star.central_pressure - 351.0).abs() < 20.0, "pc = {}", star.central_pressure);

    let best = wrapper.calculate(star.central_pressure).unwrap().mass;
    assert!((best - 1.6356).abs() < 5e-3, "M_max = {best}");
    for pc in [5.0, 50.0, 150.0, 250.0, 450.0, 700.0, upper] {
        let m = wrapper.calculate(pc).unwrap().mass;
        assert!(best >= m - 1e-9, "M({pc}) = {m} > {best}");
    }
}

#[test]
fn degenerate_eos_always_raises() {
    let mut wrapper = TidalLoveWrapper::new(ZeroPressure).unwrap();
    for pc in [1e-6, 1.0, 10.0, 1000.0] {
        let err = wrapper.calculate(pc).unwrap_err();
        assert!(err.is_physical_range(), "pc = {pc}");
    }
    assert!(wrapper.find_mass(10.0, 1.4).central_pressure.is_nan());
    assert!(matches!(
        wrapper.find_max_mass(10.0),
        Err(TidalError::SearchExhausted { .. })
    ));
}

#[test]
fn named_table_file_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polytrope.dat");
    let mut wrapper = TidalLoveWrapper::with_table_path(
        polytrope(),
        ns_structure::TovIntegrator::default(),
        &path,
    )
    .unwrap();
    assert_eq!(wrapper.table_path(), path.as_path());
    assert!(wrapper.calculate(57.0).unwrap().mass > 1.3);
    wrapper.close().unwrap();
    assert!(path.exists());
}

#[test]
fn profile_matches_calculate() {
    let mut wrapper = wrapper();
    let star = wrapper.calculate(57.0).unwrap();
    let profile = wrapper.profile(57.0).unwrap();
    let (radius, mass) = profile.surface().unwrap();
    assert!((radius - star.radius).abs() < 1e-12);
    assert!((mass - star.mass).abs() < 1e-12);
    assert!(wrapper.profile(-1.0).unwrap_err().is_physical_range());
}
