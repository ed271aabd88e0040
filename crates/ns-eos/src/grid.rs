//! Density grid generation.
//!
//! A grid is a list of segments, each linear or logarithmic. The standard grid
//! resolves the low-density crust logarithmically and the core linearly.

use std::fmt;

/// Lowest density written to a table [fm^-3].
pub const GRID_MIN_DENSITY: f64 = 1e-10;
/// End of the logarithmic (crust) part of the standard grid [fm^-3].
pub const GRID_LOG_END: f64 = 3.76e-4;
/// Start of the linear (core) part of the standard grid [fm^-3].
pub const GRID_LINEAR_START: f64 = 3.77e-4;

const GRID_LOG_POINTS: usize = 2000;
const GRID_LINEAR_POINTS: usize = 18000;

/// Type of point progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// One contiguous run of density samples.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSegment {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub spacing: Spacing,
}

impl GridSegment {
    /// Generate all points in the segment.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.spacing {
            Spacing::Linear => self.generate_linear(),
            Spacing::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end;
        points
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        // For logarithmic spacing, both start and end must be positive
        if self.start <= 0.0 || self.end <= 0.0 {
            return self.generate_linear();
        }

        let log_start = self.start.ln();
        let log_delta = (self.end.ln() - log_start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| (log_start + i as f64 * log_delta).exp())
            .collect();

        points[self.num_points - 1] = self.end;
        points
    }
}

/// Ordered density samples [fm^-3].
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    segments: Vec<GridSegment>,
}

impl DensityGrid {
    /// Grid of the structure tables: 2000 logarithmic samples up to
    /// 3.76e-4 fm^-3 followed by 18000 linear samples up to `max_density`.
    pub fn standard(max_density: f64) -> Self {
        if max_density <= GRID_LINEAR_START {
            return Self::from_segment(GridSegment {
                start: GRID_MIN_DENSITY,
                end: max_density.max(GRID_MIN_DENSITY),
                num_points: GRID_LOG_POINTS,
                spacing: Spacing::Logarithmic,
            });
        }
        Self {
            segments: vec![
                GridSegment {
                    start: GRID_MIN_DENSITY,
                    end: GRID_LOG_END,
                    num_points: GRID_LOG_POINTS,
                    spacing: Spacing::Logarithmic,
                },
                GridSegment {
                    start: GRID_LINEAR_START,
                    end: max_density,
                    num_points: GRID_LINEAR_POINTS,
                    spacing: Spacing::Linear,
                },
            ],
        }
    }

    pub fn linear(start: f64, end: f64, num_points: usize) -> Self {
        Self::from_segment(GridSegment {
            start,
            end,
            num_points,
            spacing: Spacing::Linear,
        })
    }

    pub fn logarithmic(start: f64, end: f64, num_points: usize) -> Self {
        Self::from_segment(GridSegment {
            start,
            end,
            num_points,
            spacing: Spacing::Logarithmic,
        })
    }

    pub fn from_segment(segment: GridSegment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    /// Append a segment; points are concatenated in insertion order.
    pub fn then(mut self, segment: GridSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[GridSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.num_points.max(1))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn points(&self) -> Vec<f64> {
        let mut points = Vec::with_capacity(self.len());
        for segment in &self.segments {
            points.extend(segment.generate_points());
        }
        points
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for GridSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points from {:e} to {:e} fm^-3 ({})",
            self.num_points, self.start, self.end, self.spacing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_segment_generation() {
        let grid = DensityGrid::linear(0.1, 0.5, 5);
        let points = grid.points();
        assert_eq!(points.len(), 5);
        assert!((points[0] - 0.1).abs() < 1e-12);
        assert!((points[2] - 0.3).abs() < 1e-12);
        assert_eq!(points[4], 0.5);
    }

    #[test]
    fn logarithmic_segment_generation() {
        let grid = DensityGrid::logarithmic(1e-6, 1e-2, 3);
        let points = grid.points();
        assert_eq!(points.len(), 3);
        assert!((points[1] - 1e-4).abs() / 1e-4 < 1e-9);
        assert_eq!(points[2], 1e-2);
    }

    #[test]
    fn standard_grid_is_increasing() {
        let grid = DensityGrid::standard(2.0);
        let points = grid.points();
        assert_eq!(points.len(), 20000);
        assert_eq!(points[0], GRID_MIN_DENSITY);
        assert_eq!(*points.last().unwrap(), 2.0);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn standard_grid_for_dilute_eos() {
        let grid = DensityGrid::standard(1e-4);
        assert_eq!(grid.segments().len(), 1);
        assert_eq!(*grid.points().last().unwrap(), 1e-4);
    }

    #[test]
    fn single_point_segment() {
        let grid = DensityGrid::linear(0.3, 0.3, 1);
        assert_eq!(grid.points(), vec![0.3]);
    }
}
