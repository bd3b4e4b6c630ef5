//! Pairwise Euclidean distances between expression profiles

use ndarray::{ArrayView1, ArrayView2};

/// Euclidean distance between two profiles of equal length
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Condensed distance matrix over the rows of `values`.
///
/// Pairs are laid out row-major over the upper triangle:
/// (0,1), (0,2), ..., (0,n-1), (1,2), ..., (n-2,n-1).
pub fn condensed_distances(values: ArrayView2<'_, f64>) -> Vec<f64> {
    let n = values.nrows();
    let mut distances = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            distances.push(euclidean(values.row(i), values.row(j)));
        }
    }
    distances
}
