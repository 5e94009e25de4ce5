//! # clusterkit
//!
//! A configurable k-means clustering engine compatible with ndarray.
//!
//! ## Features
//!
//! - **Two initialization strategies**: uniform random selection and
//!   k-means++ weighted seeding
//! - **Deterministic runs**: a fixed `random_seed` reproduces centroids and
//!   labels exactly, including tie-breaks
//! - **Explicit empty-cluster policy**: a cluster emptied mid-iteration is
//!   re-seeded with the sample farthest from its assigned centroid, so the
//!   cluster count never silently drops below k
//! - **Parallel assignment**: the per-sample nearest-centroid search uses
//!   rayon without affecting determinism
//! - **scikit-learn style API**: `fit()`, `predict()`, `fit_predict()` plus
//!   accessors for centroids, labels and cluster memberships
//!
//! ## Example
//!
//! ```rust
//! use clusterkit::{CentroidInit, KMeans, KMeansConfig};
//! use ndarray::array;
//!
//! let data = array![
//!     [1.0, 0.0],
//!     [1.0, 1.0],
//!     [1.0, 2.0],
//!     [10.0, 0.0],
//!     [10.0, 1.0],
//!     [10.0, 2.0],
//! ];
//!
//! let config = KMeansConfig::new(2)
//!     .with_init_method(CentroidInit::KmeansPlusPlus)
//!     .with_random_seed(Some(42));
//!
//! let mut model = KMeans::new(config)?;
//! let labels = model.fit_predict(&data.view())?;
//!
//! assert_eq!(labels.len(), 6);
//! assert!(labels.iter().all(|&label| label < 2));
//! assert_eq!(model.centroids()?.nrows(), 2);
//! # Ok::<(), clusterkit::KMeansError>(())
//! ```

mod algorithm;
mod config;
mod distance;
mod error;
mod init;
mod kmeans;

pub use config::KMeansConfig;
pub use distance::DistanceMetric;
pub use error::KMeansError;
pub use init::CentroidInit;
pub use kmeans::{dataset_from_rows, KMeans};
