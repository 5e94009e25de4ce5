use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::distance::DistanceMetric;
use crate::error::KMeansError;

/// Strategy used to seed the initial centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidInit {
    /// Uniformly sample k distinct dataset points
    Random,
    /// k-means++: weight candidates by squared distance to the nearest
    /// already-chosen centroid
    KmeansPlusPlus,
}

impl fmt::Display for CentroidInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentroidInit::Random => write!(f, "random"),
            CentroidInit::KmeansPlusPlus => write!(f, "kmeans++"),
        }
    }
}

impl FromStr for CentroidInit {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(CentroidInit::Random),
            "kmeans++" => Ok(CentroidInit::KmeansPlusPlus),
            other => Err(KMeansError::InvalidConfig(format!(
                "unknown centroid init method {other:?}, expected \"random\" or \"kmeans++\""
            ))),
        }
    }
}

/// Produce k initial centroids by copying the selected dataset rows.
///
/// Callers have already validated `1 <= k <= data.nrows()`. For a fixed RNG
/// seed and dataset ordering the selection is deterministic.
pub(crate) fn initial_centroids(
    data: &ArrayView2<f64>,
    k: usize,
    method: CentroidInit,
    metric: DistanceMetric,
    rng: &mut ChaCha8Rng,
) -> Array2<f64> {
    let indices = match method {
        CentroidInit::Random => random_indices(data.nrows(), k, rng),
        CentroidInit::KmeansPlusPlus => kmeans_plus_plus_indices(data, k, metric, rng),
    };
    debug!(?indices, method = %method, "selected initial centroids");

    let mut centroids = Array2::zeros((k, data.ncols()));
    for (row, &idx) in indices.iter().enumerate() {
        centroids.row_mut(row).assign(&data.row(idx));
    }
    centroids
}

/// Sample k distinct row indices without replacement.
fn random_indices(n_samples: usize, k: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let indices: Vec<usize> = (0..n_samples).collect();
    indices.choose_multiple(rng, k).copied().collect()
}

/// k-means++ seeding over row indices.
///
/// The first centroid is uniform; each subsequent one is sampled with
/// probability proportional to the squared distance to the nearest chosen
/// centroid. Points coincident with a chosen centroid carry weight 0 and
/// cannot be re-chosen; if every weight is 0 (duplicate-heavy data) the
/// pick falls back to a uniform draw among not-yet-chosen indices so the
/// selection always progresses.
fn kmeans_plus_plus_indices(
    data: &ArrayView2<f64>,
    k: usize,
    metric: DistanceMetric,
    rng: &mut ChaCha8Rng,
) -> Vec<usize> {
    let n_samples = data.nrows();

    let first = rng.gen_range(0..n_samples);
    let mut chosen = Vec::with_capacity(k);
    chosen.push(first);

    // Squared distance from each sample to its nearest chosen centroid,
    // updated incrementally as centroids are added.
    let mut min_sq: Vec<f64> = (0..n_samples)
        .map(|i| metric.squared(&data.row(i), &data.row(first)))
        .collect();

    while chosen.len() < k {
        let total: f64 = min_sq.iter().sum();
        let next = if total > 0.0 {
            weighted_pick(&min_sq, total, rng)
        } else {
            let remaining: Vec<usize> = (0..n_samples).filter(|i| !chosen.contains(i)).collect();
            *remaining
                .choose(rng)
                .expect("k <= n_samples guarantees an unchosen index")
        };
        chosen.push(next);

        for i in 0..n_samples {
            let d = metric.squared(&data.row(i), &data.row(next));
            if d < min_sq[i] {
                min_sq[i] = d;
            }
        }
    }

    chosen
}

/// Draw an index with probability proportional to its weight.
fn weighted_pick(weights: &[f64], total: f64, rng: &mut ChaCha8Rng) -> usize {
    let mut r = rng.gen_range(0.0..total);
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            last_positive = i;
            r -= w;
            if r < 0.0 {
                return i;
            }
        }
    }
    // Float accumulation can leave r marginally non-negative at the end.
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn test_data() -> Array2<f64> {
        array![
            [1.0, 0.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [10.0, 0.0],
            [10.0, 1.0],
            [10.0, 2.0],
        ]
    }

    #[test]
    fn test_init_parse_and_display() {
        assert_eq!("random".parse::<CentroidInit>().unwrap(), CentroidInit::Random);
        assert_eq!(
            "kmeans++".parse::<CentroidInit>().unwrap(),
            CentroidInit::KmeansPlusPlus
        );
        assert_eq!(CentroidInit::Random.to_string(), "random");
        assert_eq!(CentroidInit::KmeansPlusPlus.to_string(), "kmeans++");

        let err = "farthest".parse::<CentroidInit>().unwrap_err();
        assert!(matches!(err, KMeansError::InvalidConfig(_)));
    }

    #[test]
    fn test_random_indices_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut indices = random_indices(6, 4, &mut rng);
        assert_eq!(indices.len(), 4);
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 4);
        assert!(indices.iter().all(|&i| i < 6));
    }

    #[test]
    fn test_random_init_copies_dataset_rows() {
        let data = test_data();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let centroids = initial_centroids(
            &data.view(),
            3,
            CentroidInit::Random,
            DistanceMetric::Euclidean,
            &mut rng,
        );

        assert_eq!(centroids.nrows(), 3);
        assert_eq!(centroids.ncols(), 2);
        for centroid in centroids.rows() {
            assert!(data.rows().into_iter().any(|row| row == centroid));
        }
    }

    #[test]
    fn test_kmeans_plus_plus_indices_distinct() {
        let data = test_data();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut indices =
            kmeans_plus_plus_indices(&data.view(), 6, DistanceMetric::Euclidean, &mut rng);

        // With all points distinct and k == n, the selection must be a
        // permutation of the row indices.
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_kmeans_plus_plus_zero_weight_fallback() {
        // Two coincident points plus one distant point, k = 3: after the
        // distant point is taken every weight is 0 and the uniform
        // fallback must still pick the remaining index.
        let data = array![[0.0, 0.0], [0.0, 0.0], [5.0, 5.0]];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut indices =
            kmeans_plus_plus_indices(&data.view(), 3, DistanceMetric::Euclidean, &mut rng);

        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_seeded_init_is_deterministic() {
        let data = test_data();
        for method in [CentroidInit::Random, CentroidInit::KmeansPlusPlus] {
            let mut rng_a = ChaCha8Rng::seed_from_u64(99);
            let mut rng_b = ChaCha8Rng::seed_from_u64(99);
            let a = initial_centroids(
                &data.view(),
                3,
                method,
                DistanceMetric::Euclidean,
                &mut rng_a,
            );
            let b = initial_centroids(
                &data.view(),
                3,
                method,
                DistanceMetric::Euclidean,
                &mut rng_b,
            );
            assert_eq!(a, b);
        }
    }
}
