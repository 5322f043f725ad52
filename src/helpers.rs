//! Small numeric helpers shared by the criterion and builder code.

use crate::point::{distance2, Point};

/// Mean squared distance from `center` to each point — the `sigma_x^2`
/// term in the Salmon-Warren opening criterion.
pub fn mean_squared_distance(center: &Point, points: &[Point]) -> f64 {
    let sum: f64 = points.iter().map(|p| distance2(center, p)).sum();
    sum / points.len() as f64
}
