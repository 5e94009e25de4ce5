//! Basic example demonstrating clusterkit usage
//!
//! Run with: cargo run --example basic --release

use clusterkit::{CentroidInit, KMeans, KMeansConfig};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== clusterkit example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!(
        "Generating {} samples with {} features...",
        n_samples, n_features
    );

    // Create clustered data by generating points around 3 centers
    let mut data = Array2::<f64>::zeros((n_samples, n_features));
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];

    for i in 0..n_samples {
        let cluster_idx = i % 3;
        let noise = Array2::random((1, n_features), Uniform::new(-1.0, 1.0));
        data[[i, 0]] = centers[cluster_idx][0] + noise[[0, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[0, 1]];
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    // Configure and run k-means
    let config = KMeansConfig::new(n_clusters)
        .with_max_iter(100)
        .with_tolerance(1e-6)
        .with_init_method(CentroidInit::KmeansPlusPlus)
        .with_random_seed(Some(42));

    println!("Running {}...\n", config);

    let mut model = KMeans::new(config).expect("valid configuration");
    let labels = model.fit_predict(&data.view()).expect("fit failed");

    println!(
        "Converged in {} iterations",
        model.n_iterations().expect("model is fitted")
    );

    // Print learned centroids
    println!("\nLearned centroids:");
    let centroids = model.centroids().expect("model is fitted");
    for i in 0..centroids.nrows() {
        println!(
            "  Centroid {}: ({:.4}, {:.4})",
            i,
            centroids[[i, 0]],
            centroids[[i, 1]]
        );
    }
    println!();

    // Count samples per cluster
    let clusters = model.clusters().expect("model is fitted");
    println!("Cluster distribution:");
    for (i, members) in clusters.iter().enumerate() {
        println!(
            "  Cluster {}: {} samples ({:.1}%)",
            i,
            members.len(),
            (members.len() as f64 / n_samples as f64) * 100.0
        );
    }
    println!();

    // Show first few predictions
    println!("First 10 sample assignments:");
    for i in 0..10 {
        println!(
            "  Sample {} at ({:.2}, {:.2}) -> Cluster {}",
            i,
            data[[i, 0]],
            data[[i, 1]],
            labels[i]
        );
    }

    println!("\n=== Done! ===");
}
