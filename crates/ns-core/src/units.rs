// ns-core/src/units.rs
//
// EOS quantities are carried as plain f64 in nuclear units (fm^-3, MeV fm^-3);
// uom is used at the boundary to geometric units (G = c = 1, lengths in km).

use uom::si::f64::{Mass as UomMass, Pressure as UomPressure};

// Public canonical unit types (SI, f64)
pub type Mass = UomMass;
pub type Pressure = UomPressure;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

/// Pressure (or energy density) given in MeV fm^-3.
#[inline]
pub fn mev_per_fm3(v: f64) -> Pressure {
    pa(v * constants::MEV_PER_FM3_PA)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn in_solar_masses(m: Mass) -> f64 {
    use uom::si::mass::kilogram;
    m.get::<kilogram>() / constants::SOLAR_MASS_KG
}

/// Pressure in geometric units, km^-2.
#[inline]
pub fn geometric_km2(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    let per_m2 = p.get::<pascal>() * constants::G_SI / constants::C_SI.powi(4);
    per_m2 * 1.0e6
}

/// Geometric mass (km) to physical mass.
#[inline]
pub fn mass_from_geometric(m_km: f64) -> Mass {
    kg(m_km * 1.0e3 * constants::C_SI.powi(2) / constants::G_SI)
}

/// Conversion factor MeV fm^-3 -> km^-2.
#[inline]
pub fn mev_fm3_to_km2() -> f64 {
    geometric_km2(mev_per_fm3(1.0))
}

/// Geometric length of one solar mass, G M_sun / c^2 in km.
#[inline]
pub fn solar_mass_km() -> f64 {
    1.0 / in_solar_masses(mass_from_geometric(1.0))
}

pub mod constants {
    /// Newtonian constant of gravitation, m^3 kg^-1 s^-2.
    pub const G_SI: f64 = 6.674_30e-11;
    /// Speed of light, m s^-1.
    pub const C_SI: f64 = 299_792_458.0;
    pub const SOLAR_MASS_KG: f64 = 1.988_47e30;
    /// 1 MeV fm^-3 expressed in Pa.
    pub const MEV_PER_FM3_PA: f64 = 1.602_176_634e32;
    /// Averaged nucleon rest mass, MeV.
    pub const NUCLEON_MASS_MEV: f64 = 939.0;
    /// Nuclear saturation density, fm^-3.
    pub const SATURATION_DENSITY: f64 = 0.16;
}
