//! Radial profiles and composition layers.

/// Radial trace of one star from the centre outwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructureProfile {
    /// [km]
    pub radius: Vec<f64>,
    /// Enclosed mass [M_sun]
    pub mass: Vec<f64>,
    /// [MeV fm^-3], descending
    pub pressure: Vec<f64>,
}

/// A shell between two pressures, e.g. the crust or the core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileLayer {
    pub inner_pressure: f64,
    pub outer_pressure: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner_mass: f64,
    pub outer_mass: f64,
}

impl ProfileLayer {
    pub fn thickness(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Mass contained in the shell [M_sun].
    pub fn mass(&self) -> f64 {
        self.outer_mass - self.inner_mass
    }
}

impl StructureProfile {
    pub fn push(&mut self, radius: f64, mass: f64, pressure: f64) {
        self.radius.push(radius);
        self.mass.push(mass);
        self.pressure.push(pressure);
    }

    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    /// (R [km], M [M_sun]) at the outermost point.
    pub fn surface(&self) -> Option<(f64, f64)> {
        Some((*self.radius.last()?, *self.mass.last()?))
    }

    /// (radius, mass) where the pressure first drops to `p`, interpolated in ln P.
    pub fn at_pressure(&self, p: f64) -> Option<(f64, f64)> {
        let first = *self.pressure.first()?;
        if p >= first {
            return Some((self.radius[0], self.mass[0]));
        }
        let i = self.pressure.iter().position(|&q| q <= p)?;
        let (p0, p1) = (self.pressure[i - 1], self.pressure[i]);
        let t = if p0 == p1 {
            1.0
        } else {
            (p.ln() - p0.ln()) / (p1.ln() - p0.ln())
        };
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Some((
            lerp(self.radius[i - 1], self.radius[i]),
            lerp(self.mass[i - 1], self.mass[i]),
        ))
    }

    /// Split the star into shells at the given transition pressures.
    ///
    /// Transitions outside the profile are ignored; n usable transitions give
    /// n + 1 layers, innermost first.
    pub fn split_at_pressures(&self, transitions: &[f64]) -> Vec<ProfileLayer> {
        let (Some(&center), Some(&surface)) = (self.pressure.first(), self.pressure.last()) else {
            return Vec::new();
        };

        let mut bounds = vec![center];
        bounds.extend(
            ns_core::sorted_descending(transitions)
                .into_iter()
                .filter(|&p| p < center && p > surface),
        );
        bounds.push(surface);

        bounds
            .windows(2)
            .filter_map(|w| {
                let (inner_radius, inner_mass) = self.at_pressure(w[0])?;
                let (outer_radius, outer_mass) = self.at_pressure(w[1])?;
                Some(ProfileLayer {
                    inner_pressure: w[0],
                    outer_pressure: w[1],
                    inner_radius,
                    outer_radius,
                    inner_mass,
                    outer_mass,
                })
            })
            .collect()
    }
}
