use std::fmt;

use crate::distance::DistanceMetric;
use crate::error::KMeansError;
use crate::init::CentroidInit;

/// Configuration for the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of iterations
    pub max_iter: usize,

    /// Convergence tolerance. The algorithm stops early once the maximum
    /// per-centroid movement between iterations drops to this threshold.
    pub tolerance: f64,

    /// Strategy used to seed the initial centroids
    pub centroids_init_method: CentroidInit,

    /// Distance metric used throughout the run
    pub distance_metric: DistanceMetric,

    /// Random seed for centroid initialization. `Some` makes the run fully
    /// reproducible; `None` seeds from entropy.
    pub random_seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_iter: 100,
            tolerance: 1e-4,
            centroids_init_method: CentroidInit::Random,
            distance_metric: DistanceMetric::Euclidean,
            random_seed: None,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the centroid initialization strategy
    pub fn with_init_method(mut self, method: CentroidInit) -> Self {
        self.centroids_init_method = method;
        self
    }

    /// Set the distance metric
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// Set the random seed
    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    /// Validate all parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::InvalidConfig`] if `k` is 0, `max_iter` is 0,
    /// or `tolerance` is negative or NaN.
    pub fn validate(&self) -> Result<(), KMeansError> {
        if self.k == 0 {
            return Err(KMeansError::InvalidConfig(
                "k must be greater than 0".to_string(),
            ));
        }
        if self.max_iter == 0 {
            return Err(KMeansError::InvalidConfig(
                "max_iter must be greater than 0".to_string(),
            ));
        }
        if !(self.tolerance >= 0.0) {
            return Err(KMeansError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl fmt::Display for KMeansConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KMeansConfig(k={}, max_iter={}, centroids_init_method={}, distance_metric={})",
            self.k, self.max_iter, self.centroids_init_method, self.distance_metric
        )
    }
}
