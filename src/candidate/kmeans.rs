use rand::{Rng, SeedableRng, rngs::StdRng};

/// Lloyd's k-means with k-means++ seeding over 2-d coordinates.
///
/// Deterministic for a given seed and input order.
#[derive(Debug, Clone)]
pub(crate) struct KMeans {
    k: usize,
    max_iter: usize,
    tolerance: f64,
    seed: u64,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub(crate) struct Clustering {
    pub(crate) centroids: Vec<[f64; 2]>,
    pub(crate) labels: Vec<usize>, // labels[i] = cluster of data[i]
    pub(crate) iterations: usize,
}

#[inline]
fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Index of the nearest centroid; ties keep the lowest index.
fn nearest(point: &[f64; 2], centroids: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

impl KMeans {
    pub(crate) fn new(k: usize, seed: u64) -> Self {
        Self { k, max_iter: 300, tolerance: 1e-9, seed }
    }

    pub(crate) fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// k-means++: spread initial centroids with probability proportional to squared distance.
    fn seed_centroids(&self, data: &[[f64; 2]], rng: &mut StdRng) -> Vec<[f64; 2]> {
        let mut centroids = Vec::with_capacity(self.k);
        centroids.push(data[rng.random_range(0..data.len())]);

        let mut dist = data.iter().map(|p| squared_distance(p, &centroids[0])).collect::<Vec<_>>();
        while centroids.len() < self.k {
            let total: f64 = dist.iter().sum();
            let chosen = if total > 0.0 {
                let target = rng.random::<f64>() * total;
                let mut acc = 0.0;
                dist.iter()
                    .position(|&d| { acc += d; acc > target })
                    .or_else(|| dist.iter().rposition(|&d| d > 0.0))
                    .unwrap_or(data.len() - 1)
            } else {
                rng.random_range(0..data.len())
            };

            let centroid = data[chosen];
            for (d, p) in dist.iter_mut().zip(data) {
                *d = d.min(squared_distance(p, &centroid));
            }
            centroids.push(centroid);
        }
        centroids
    }

    /// Fit `k` clusters to `data`. Requires `1 <= k <= data.len()`.
    pub(crate) fn fit(&self, data: &[[f64; 2]]) -> Clustering {
        assert!(self.k >= 1 && self.k <= data.len(), "k must be in 1..=data.len()");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.seed_centroids(data, &mut rng);
        let mut labels = vec![0; data.len()];
        let mut iterations = 0;

        while iterations < self.max_iter {
            iterations += 1;

            for (label, point) in labels.iter_mut().zip(data) {
                *label = nearest(point, &centroids);
            }

            let mut sums = vec![[0.0, 0.0]; self.k];
            let mut counts = vec![0usize; self.k];
            for (&label, point) in labels.iter().zip(data) {
                sums[label][0] += point[0];
                sums[label][1] += point[1];
                counts[label] += 1;
            }

            // Empty clusters keep their previous centroid.
            let mut shift: f64 = 0.0;
            for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count == 0 { continue }
                let updated = [sum[0] / count as f64, sum[1] / count as f64];
                shift = shift.max(squared_distance(centroid, &updated));
                *centroid = updated;
            }

            if shift <= self.tolerance * self.tolerance { break }
        }

        // Final labels must agree with the final centroids.
        for (label, point) in labels.iter_mut().zip(data) {
            *label = nearest(point, &centroids);
        }

        Clustering { centroids, labels, iterations }
    }
}
