use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayView1, ArrayView2};

use crate::error::KMeansError;

/// Distance metric used for assignment, initialization weighting and
/// convergence checks.
///
/// Currently only Euclidean distance is supported; the enum exists so new
/// metrics can be added without touching the assignment or update logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Euclidean,
}

impl DistanceMetric {
    /// Squared distance between two points.
    ///
    /// Preserves the ordering of the true metric, so nearest-centroid
    /// searches and k-means++ weights use this form and skip the root.
    #[inline]
    pub fn squared(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum(),
        }
    }

    /// True distance between two points, used wherever a magnitude is
    /// compared against a caller-supplied threshold.
    #[inline]
    pub fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        match self {
            DistanceMetric::Euclidean => self.squared(a, b).sqrt(),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            other => Err(KMeansError::InvalidConfig(format!(
                "unknown distance metric {other:?}, expected \"euclidean\""
            ))),
        }
    }
}

/// Find the nearest centroid for a single sample.
///
/// Returns the centroid index and the squared distance to it. Ties are
/// broken by the lowest centroid index (strict `<` comparison), which keeps
/// assignment deterministic regardless of execution order.
pub fn nearest_centroid(
    metric: DistanceMetric,
    sample: &ArrayView1<f64>,
    centroids: &ArrayView2<f64>,
) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;

    for (idx, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = metric.squared(sample, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }

    (best_idx, best_dist)
}

/// Maximum per-centroid movement between two centroid sets, as a true
/// distance so it is comparable against the configured tolerance.
pub fn max_centroid_movement(
    metric: DistanceMetric,
    old_centroids: &ArrayView2<f64>,
    new_centroids: &ArrayView2<f64>,
) -> f64 {
    old_centroids
        .rows()
        .into_iter()
        .zip(new_centroids.rows())
        .map(|(old, new)| metric.distance(&old, &new))
        .fold(0.0, f64::max)
}
