//! O(N^2) reference implementations of potential and acceleration, used
//! as correctness oracles for the tree-accelerated dual walk. Not a
//! `Quantity`: these loop directly over points rather than nodes, since
//! there is no tree to walk.

use crate::point::{distance2, Point};

/// Unit convention: `G * m_particle = 1`. Per-particle mass and any
/// physical `G` only reenter at [`crate::binding`]'s level.
const G: f64 = 1.0;

/// `phi[i] = -G * sum_{j != i} 1 / sqrt(|x_i - x_j|^2 + eps^2)`.
pub fn brute_force_potential(points: &[Point], eps: f64, phi: &mut [f64]) {
    assert_eq!(points.len(), phi.len());
    let eps2 = eps * eps;
    for i in 0..points.len() {
        let mut acc = 0.0;
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            let r2 = distance2(&points[i], &points[j]) + eps2;
            if r2 > 0.0 {
                acc += -G / r2.sqrt();
            }
        }
        phi[i] = acc;
    }
}

/// `acc[i] = G * sum_{j != i} (x_j - x_i) / (|x_i - x_j|^2 + eps^2)^(3/2)`.
pub fn brute_force_acceleration(points: &[Point], eps: f64, acc: &mut [Point]) {
    assert_eq!(points.len(), acc.len());
    let eps2 = eps * eps;
    for i in 0..points.len() {
        let mut a = [0.0, 0.0, 0.0];
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            let r2 = distance2(&points[i], &points[j]) + eps2;
            if r2 > 0.0 {
                let inv_r3 = G / (r2 * r2.sqrt());
                for k in 0..3 {
                    a[k] += inv_r3 * (points[j][k] - points[i][k]);
                }
            }
        }
        acc[i] = a;
    }
}

/// Potential at every `target` point due to every `source` point, with
/// no self-interaction skipping (sources and targets are disjoint sets).
pub fn brute_force_potential_at(sources: &[Point], targets: &[Point], eps: f64, phi: &mut [f64]) {
    assert_eq!(targets.len(), phi.len());
    let eps2 = eps * eps;
    for (i, target) in targets.iter().enumerate() {
        let mut acc = 0.0;
        for source in sources {
            let r2 = distance2(target, source) + eps2;
            if r2 > 0.0 {
                acc += -G / r2.sqrt();
            }
        }
        phi[i] = acc;
    }
}

/// Acceleration at every `target` point due to every `source` point.
pub fn brute_force_acceleration_at(sources: &[Point], targets: &[Point], eps: f64, acc: &mut [Point]) {
    assert_eq!(targets.len(), acc.len());
    let eps2 = eps * eps;
    for (i, target) in targets.iter().enumerate() {
        let mut a = [0.0, 0.0, 0.0];
        for source in sources {
            let r2 = distance2(target, source) + eps2;
            if r2 > 0.0 {
                let inv_r3 = G / (r2 * r2.sqrt());
                for k in 0..3 {
                    a[k] += inv_r3 * (source[k] - target[k]);
                }
            }
        }
        acc[i] = a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_two_point_potential_matches_closed_form() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let mut phi = vec![0.0; 2];
        brute_force_potential(&points, 0.0, &mut phi);
        assert!(approx_eq!(f64, phi[0], -G, epsilon = 1e-15));
        assert!(approx_eq!(f64, phi[0], phi[1], epsilon = 1e-15));
    }

    #[test]
    fn test_single_source_closed_form() {
        // Single point at the origin, test point at (0,0,2), softening 1:
        // potential = -1/sqrt(5), acceleration magnitude = 2 / 5^1.5,
        // pointing toward the origin.
        let sources = vec![[0.0, 0.0, 0.0]];
        let targets = vec![[0.0, 0.0, 2.0]];

        let mut phi = vec![0.0; 1];
        brute_force_potential_at(&sources, &targets, 1.0, &mut phi);
        assert!(approx_eq!(f64, phi[0], -1.0 / 5.0_f64.sqrt(), epsilon = 1e-12));

        let mut acc = vec![[0.0; 3]; 1];
        brute_force_acceleration_at(&sources, &targets, 1.0, &mut acc);
        let expected = 2.0 / 5.0_f64.powf(1.5);
        assert!(approx_eq!(f64, acc[0][2], -expected, epsilon = 1e-12));
        assert!(approx_eq!(f64, acc[0][0], 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, acc[0][1], 0.0, epsilon = 1e-12));
    }

    #[test]
    fn test_two_symmetric_sources_cancel_at_midpoint() {
        // Two equal points at (0,0,+-1), test point at the origin,
        // softening 1: potential = -sqrt(2), net acceleration zero.
        let sources = vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];
        let targets = vec![[0.0, 0.0, 0.0]];

        let mut phi = vec![0.0; 1];
        brute_force_potential_at(&sources, &targets, 1.0, &mut phi);
        assert!(approx_eq!(f64, phi[0], -2.0_f64.sqrt(), epsilon = 1e-12));

        let mut acc = vec![[0.0; 3]; 1];
        brute_force_acceleration_at(&sources, &targets, 1.0, &mut acc);
        for k in 0..3 {
            assert!(approx_eq!(f64, acc[0][k], 0.0, epsilon = 1e-12));
        }
    }

    #[test]
    fn test_acceleration_at_skips_no_self_interaction() {
        let sources = vec![[0.0, 0.0, 0.0]];
        let targets = vec![[2.0, 0.0, 0.0]];
        let mut acc = vec![[0.0; 3]; 1];
        brute_force_acceleration_at(&sources, &targets, 0.0, &mut acc);
        assert!(acc[0][0] < 0.0);
        assert!(approx_eq!(f64, acc[0][0], -G / 4.0, epsilon = 1e-15));
    }
}
