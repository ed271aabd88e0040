//! Sound-speed scans (causality and stability of an EOS).

use crate::model::EquationOfState;

/// Extremes of c_s^2 = dP/dε over a density interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundSpeedScan {
    pub max_cs2: f64,
    pub min_cs2: f64,
    /// Density at which `max_cs2` occurs [fm^-3]
    pub density_at_max: f64,
}

impl SoundSpeedScan {
    /// c_s exceeds the speed of light somewhere in the interval.
    pub fn violates_causality(&self) -> bool {
        self.max_cs2 > 1.0
    }

    /// c_s^2 turns negative somewhere in the interval (mechanical instability).
    pub fn negative_sound(&self) -> bool {
        self.min_cs2 < 0.0
    }
}

/// c_s^2 at a single density; dε/dn from a central difference.
pub fn sound_speed_squared<E: EquationOfState + ?Sized>(eos: &E, density: f64) -> f64 {
    let h = 1e-6 * density.abs().max(1e-6);
    let de_dn =
        (eos.energy_density(density + h, 0.0) - eos.energy_density(density - h, 0.0)) / (2.0 * h);
    eos.d_pressure(density, 0.0) / de_dn
}

/// Scan `samples` evenly spaced densities in `[start, end]`.
///
/// Non-finite samples are skipped; `None` when nothing finite was seen.
pub fn scan_sound_speed<E: EquationOfState + ?Sized>(
    eos: &E,
    start: f64,
    end: f64,
    samples: usize,
) -> Option<SoundSpeedScan> {
    let samples = samples.max(2);
    let step = (end - start) / (samples - 1) as f64;
    let mut scan: Option<SoundSpeedScan> = None;

    for i in 0..samples {
        let n = start + i as f64 * step;
        let cs2 = sound_speed_squared(eos, n);
        if !cs2.is_finite() {
            continue;
        }
        scan = Some(match scan {
            None => SoundSpeedScan {
                max_cs2: cs2,
                min_cs2: cs2,
                density_at_max: n,
            },
            Some(mut s) => {
                if cs2 > s.max_cs2 {
                    s.max_cs2 = cs2;
                    s.density_at_max = n;
                }
                s.min_cs2 = s.min_cs2.min(cs2);
                s
            }
        });
    }
    scan
}
