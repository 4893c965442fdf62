//! Toy Vietoris-Rips complex
//!
//! A small 2D point cloud sampled along a wavy closed curve, used to illustrate how balls of
//! radius ε around the points turn into the simplices of a Vietoris-Rips complex.

use crate::topology::{RipsComplex, SimplicialComplex, TopologyError};
use std::f64::consts::PI;

/// Ball radius
pub const EPSILON: f64 = 0.35;
/// Tolerance on the edge length
pub const TOLERANCE: f64 = 1e-8;

/// Samples `n_points` at equally spaced angles t ∈ [0,2π) along the curve r(t) = 1 + a cos(k t)
pub fn wavy_ring(n_points: usize, amplitude: f64, lobes: usize) -> Vec<[f64; 2]> {
    (0..n_points)
        .map(|i| {
            let t = 2. * PI * i as f64 / n_points as f64;
            let r = 1. + amplitude * (lobes as f64 * t).cos();
            let (s, c) = t.sin_cos();
            [r * c, r * s]
        })
        .collect()
}

/// Vietoris-Rips complex, up to triangles, of the points whose balls of radius `epsilon` intersect
pub fn epsilon_complex(
    points: &[[f64; 2]],
    epsilon: f64,
    tolerance: f64,
) -> Result<SimplicialComplex, TopologyError> {
    RipsComplex::new(points)
        .max_edge_length(2. * epsilon + tolerance)
        .max_dimension(2)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{betti_numbers, euclidean};

    #[test]
    fn ring_radii() {
        let points = wavy_ring(30, 0.3, 5);
        assert_eq!(points.len(), 30);
        assert!((points[0][0] - 1.3).abs() < 1e-12 && points[0][1] == 0.);
        assert!(points
            .iter()
            .map(|p| euclidean(p, &[0., 0.]))
            .all(|r| r > 0.7 - 1e-12 && r < 1.3 + 1e-12));
    }

    #[test]
    fn ring_complex() -> Result<(), TopologyError> {
        let points = wavy_ring(30, 0.3, 5);
        let complex = epsilon_complex(&points, EPSILON, TOLERANCE)?;
        assert_eq!(complex.num_vertices(), 30);
        assert!(complex.edges().count() >= 30);
        assert!(complex
            .edges()
            .all(|(i, j)| euclidean(&points[i], &points[j]) <= 2. * EPSILON + TOLERANCE));
        let betti = betti_numbers(&complex);
        assert_eq!(betti[0], 1);
        assert!(betti[1] >= 1);
        Ok(())
    }
}
