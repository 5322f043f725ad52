//! The three opening criteria a tree may be built with. Each sets
//! `r_open2` at build time so the runtime opening test ([`crate::walk`])
//! is a single squared-distance comparison.

use crate::helpers::mean_squared_distance;
use crate::point::Point;

/// Which monopole-opening rule a [`crate::Tree`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningCriterion {
    /// Monopole error bound of Salmon & Warren (1994); `theta` is the
    /// allowed relative error.
    SalmonWarren,
    /// Classic Barnes-Hut, but using the bounding box's *minimum* side
    /// rather than its maximum — a deliberate deviation from the
    /// textbook criterion.
    BarnesHut,
    /// `1.5 * r_max / theta`; the default.
    PKDGRAV3,
}

impl Default for OpeningCriterion {
    fn default() -> Self {
        OpeningCriterion::PKDGRAV3
    }
}

/// Computes `r_open^2` for a node with the given center, `r_max2`,
/// bounding box, and point slice, under `criterion` and opening angle
/// `theta`.
pub fn r_open2(
    criterion: OpeningCriterion,
    center: &Point,
    r_max2: f64,
    bbox: &[Point; 2],
    points: &[Point],
    theta: f64,
) -> f64 {
    match criterion {
        OpeningCriterion::SalmonWarren => {
            let r_max = r_max2.sqrt();
            let sigma_x2 = mean_squared_distance(center, points);
            let r_open = r_max / 2.0 + (r_max * r_max / 4.0 + sigma_x2 / theta).sqrt();
            r_open * r_open
        }
        OpeningCriterion::BarnesHut => {
            // W is the *minimum* side of the bounding box (intentional).
            let [low, high] = bbox;
            let mut w = high[0] - low[0];
            for k in 1..3 {
                let dk = high[k] - low[k];
                if dk < w {
                    w = dk;
                }
            }
            w * w / (theta * theta)
        }
        OpeningCriterion::PKDGRAV3 => 2.25 * r_max2 / (theta * theta),
    }
}

/// Chooses the split dimension for a node's bounding box: the widest
/// side, ties broken y > z > x.
pub fn choose_split_dimension(bbox: &[Point; 2]) -> usize {
    let [low, high] = bbox;
    let width = [high[0] - low[0], high[1] - low[1], high[2] - low[2]];
    if width[1] >= width[0] && width[1] >= width[2] {
        1
    } else if width[2] >= width[0] && width[2] >= width[1] {
        2
    } else {
        0
    }
}

/// The geometric midpoint of `bbox`'s span along `dim`.
pub fn choose_pivot(bbox: &[Point; 2], dim: usize) -> f64 {
    let [low, high] = bbox;
    low[dim] + (high[dim] - low[dim]) / 2.0
}
