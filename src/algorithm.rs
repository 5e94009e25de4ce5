use ndarray::{Array2, ArrayView2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::KMeansConfig;
use crate::distance::{max_centroid_movement, nearest_centroid, DistanceMetric};
use crate::error::KMeansError;
use crate::init::initial_centroids;

/// Frozen result of a single k-means run
#[derive(Debug)]
pub struct KMeansFit {
    pub centroids: Array2<f64>,
    pub labels: Vec<usize>,
    pub clusters: Vec<Vec<usize>>,
    pub n_iterations: usize,
    pub converged: bool,
}

/// Run Lloyd's algorithm: seed centroids, then iterate assignment and
/// update until the centroids stop moving, the labels stabilize, or the
/// iteration cap is reached. At least one full cycle always runs.
pub fn run_lloyd(data: &ArrayView2<f64>, config: &KMeansConfig) -> Result<KMeansFit, KMeansError> {
    config.validate()?;

    let n_samples = data.nrows();
    let k = config.k;

    if n_samples == 0 {
        return Err(KMeansError::InsufficientData("dataset is empty".to_string()));
    }
    if data.ncols() == 0 {
        return Err(KMeansError::InsufficientData(
            "samples have zero features".to_string(),
        ));
    }
    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "number of samples ({n_samples}) is less than k ({k})"
        )));
    }

    let mut rng = match config.random_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let metric = config.distance_metric;
    let mut centroids = initial_centroids(
        data,
        k,
        config.centroids_init_method,
        metric,
        &mut rng,
    );

    let mut labels: Vec<usize> = Vec::new();
    let mut n_iterations = 0;
    let mut converged = false;

    for iteration in 1..=config.max_iter {
        n_iterations = iteration;

        let mut new_labels = assign_labels(data, &centroids.view(), metric);
        let labels_stable = !labels.is_empty() && new_labels == labels;

        let prev_centroids = centroids.clone();
        update_centroids(data, &mut new_labels, &mut centroids, metric);
        let movement = max_centroid_movement(metric, &prev_centroids.view(), &centroids.view());

        labels = new_labels;
        debug!(iteration, movement, labels_stable, "lloyd iteration complete");

        if labels_stable || movement <= config.tolerance {
            converged = true;
            break;
        }
    }

    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (sample_idx, &label) in labels.iter().enumerate() {
        clusters[label].push(sample_idx);
    }

    Ok(KMeansFit {
        centroids,
        labels,
        clusters,
        n_iterations,
        converged,
    })
}

/// Assign each sample to its nearest centroid.
///
/// The per-sample search is an independent map, parallelized with rayon.
/// Ties depend only on centroid index, so the result does not depend on
/// thread scheduling.
fn assign_labels(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    metric: DistanceMetric,
) -> Vec<usize> {
    (0..data.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(metric, &data.row(i), centroids).0)
        .collect()
}

/// Recompute each centroid as the mean of its assigned samples.
///
/// A cluster left with zero members is re-seeded with the sample currently
/// farthest from its own assigned centroid; that sample's label moves to
/// the re-seeded cluster so a later empty cluster picks a different donor.
fn update_centroids(
    data: &ArrayView2<f64>,
    labels: &mut [usize],
    centroids: &mut Array2<f64>,
    metric: DistanceMetric,
) {
    let k = centroids.nrows();
    let n_features = data.ncols();

    let mut sums = Array2::<f64>::zeros((k, n_features));
    let mut counts = vec![0usize; k];
    for (i, &label) in labels.iter().enumerate() {
        counts[label] += 1;
        let row = data.row(i);
        for j in 0..n_features {
            sums[[label, j]] += row[j];
        }
    }

    let mut empty_clusters = Vec::new();
    for cluster_idx in 0..k {
        if counts[cluster_idx] == 0 {
            empty_clusters.push(cluster_idx);
            continue;
        }
        let count = counts[cluster_idx] as f64;
        for j in 0..n_features {
            centroids[[cluster_idx, j]] = sums[[cluster_idx, j]] / count;
        }
    }

    for empty_idx in empty_clusters {
        reseed_empty_cluster(data, labels, centroids, &mut counts, empty_idx, metric);
    }
}

/// Move the sample farthest from its assigned centroid into the empty
/// cluster, using it verbatim as the new centroid. Donor clusters must keep
/// at least one member.
fn reseed_empty_cluster(
    data: &ArrayView2<f64>,
    labels: &mut [usize],
    centroids: &mut Array2<f64>,
    counts: &mut [usize],
    empty_idx: usize,
    metric: DistanceMetric,
) {
    let mut farthest: Option<(usize, f64)> = None;
    for (i, &label) in labels.iter().enumerate() {
        if counts[label] <= 1 {
            continue;
        }
        let dist = metric.squared(&data.row(i), &centroids.row(label));
        match farthest {
            Some((_, best)) if dist <= best => {}
            _ => farthest = Some((i, dist)),
        }
    }

    // Every donor is a singleton only when k == n_samples, in which case an
    // empty cluster cannot arise in the first place.
    if let Some((sample_idx, dist)) = farthest {
        debug!(
            empty_cluster = empty_idx,
            donor_cluster = labels[sample_idx],
            sample = sample_idx,
            dist,
            "re-seeded empty cluster"
        );
        counts[labels[sample_idx]] -= 1;
        labels[sample_idx] = empty_idx;
        counts[empty_idx] = 1;
        centroids.row_mut(empty_idx).assign(&data.row(sample_idx));
    }
}
