use std::fmt;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::algorithm::{run_lloyd, KMeansFit};
use crate::config::KMeansConfig;
use crate::distance::nearest_centroid;
use crate::error::KMeansError;

/// K-means clustering model.
///
/// Created unfit from a validated configuration; `fit` freezes centroids,
/// per-sample labels and per-cluster index groups into the model, and
/// `predict` reads that frozen state without mutating it.
///
/// # Example
///
/// ```
/// use clusterkit::{KMeans, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0], [0.0], [10.0], [10.0]];
/// let config = KMeansConfig::new(2).with_random_seed(Some(42));
/// let mut model = KMeans::new(config)?;
///
/// let labels = model.fit_predict(&data.view())?;
/// assert_eq!(labels[0], labels[1]);
/// assert_eq!(labels[2], labels[3]);
/// assert_ne!(labels[0], labels[2]);
/// # Ok::<(), clusterkit::KMeansError>(())
/// ```
#[derive(Debug)]
pub struct KMeans {
    config: KMeansConfig,
    fitted: Option<FittedState>,
}

/// State frozen by a successful fit
#[derive(Debug)]
struct FittedState {
    n_features: usize,
    centroids: Array2<f64>,
    labels: Vec<usize>,
    clusters: Vec<Vec<usize>>,
    n_iterations: usize,
}

impl KMeans {
    /// Create an unfit model from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::InvalidConfig`] if any configuration value is
    /// out of range.
    pub fn new(config: KMeansConfig) -> Result<Self, KMeansError> {
        config.validate()?;
        Ok(Self {
            config,
            fitted: None,
        })
    }

    /// Fit the model to the dataset (one sample per row).
    ///
    /// Runs the configured initializer once, then the assignment/update
    /// loop until convergence or the iteration cap. A successful fit fully
    /// replaces any previous fitted state; a failed fit leaves it
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::InsufficientData`] if the dataset is empty or
    /// has fewer samples than `k`.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self, KMeansError> {
        let KMeansFit {
            centroids,
            labels,
            clusters,
            n_iterations,
            ..
        } = run_lloyd(data, &self.config)?;

        self.fitted = Some(FittedState {
            n_features: data.ncols(),
            centroids,
            labels,
            clusters,
            n_iterations,
        });
        Ok(self)
    }

    /// Return the index of the nearest centroid for a single sample.
    ///
    /// Uses the configured metric and the same lowest-index tie-break as
    /// the assignment step. Pure read; never mutates the model.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::NotFitted`] before a successful fit, or
    /// [`KMeansError::DimensionMismatch`] if the sample width differs from
    /// the fitted dataset's.
    pub fn predict(&self, sample: &ArrayView1<f64>) -> Result<usize, KMeansError> {
        let fitted = self.fitted.as_ref().ok_or(KMeansError::NotFitted)?;

        if sample.len() != fitted.n_features {
            return Err(KMeansError::DimensionMismatch(format!(
                "expected {} features, got {}",
                fitted.n_features,
                sample.len()
            )));
        }

        let (label, _) = nearest_centroid(
            self.config.distance_metric,
            sample,
            &fitted.centroids.view(),
        );
        Ok(label)
    }

    /// Fit the model and return the labels of the training samples.
    ///
    /// Returns the labels already frozen by the final iteration of `fit`;
    /// no second assignment pass is made, so the result always agrees with
    /// the stored state.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Vec<usize>, KMeansError> {
        self.fit(data)?;
        self.labels().map(<[usize]>::to_vec)
    }

    /// Fitted centroids, one row per cluster.
    pub fn centroids(&self) -> Result<&Array2<f64>, KMeansError> {
        self.fitted
            .as_ref()
            .map(|f| &f.centroids)
            .ok_or(KMeansError::NotFitted)
    }

    /// Per-sample labels from the final fit iteration.
    pub fn labels(&self) -> Result<&[usize], KMeansError> {
        self.fitted
            .as_ref()
            .map(|f| f.labels.as_slice())
            .ok_or(KMeansError::NotFitted)
    }

    /// Cluster index → ordered member sample indices; the groups partition
    /// the dataset.
    pub fn clusters(&self) -> Result<&[Vec<usize>], KMeansError> {
        self.fitted
            .as_ref()
            .map(|f| f.clusters.as_slice())
            .ok_or(KMeansError::NotFitted)
    }

    /// Number of assignment/update iterations the last fit performed.
    pub fn n_iterations(&self) -> Result<usize, KMeansError> {
        self.fitted
            .as_ref()
            .map(|f| f.n_iterations)
            .ok_or(KMeansError::NotFitted)
    }

    /// Whether the model has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

impl fmt::Display for KMeans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KMeans(k={}, max_iter={}, centroids_init_method={}, distance_metric={})",
            self.config.k,
            self.config.max_iter,
            self.config.centroids_init_method,
            self.config.distance_metric
        )
    }
}

/// Build an `Array2` dataset from row vectors, as produced by host
/// bindings.
///
/// # Errors
///
/// Returns [`KMeansError::InsufficientData`] for an empty input and
/// [`KMeansError::DimensionMismatch`] if the rows have unequal lengths.
pub fn dataset_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>, KMeansError> {
    let n_samples = rows.len();
    if n_samples == 0 {
        return Err(KMeansError::InsufficientData("dataset is empty".to_string()));
    }

    let n_features = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_features {
            return Err(KMeansError::DimensionMismatch(format!(
                "sample 0 has {} features but sample {} has {}",
                n_features,
                i,
                row.len()
            )));
        }
    }

    let mut data = Array2::zeros((n_samples, n_features));
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            data[[i, j]] = value;
        }
    }
    Ok(data)
}
