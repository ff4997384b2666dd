//! Seeded k-means color reduction.
//!
//! Clustering runs over the image's distinct colors weighted by pixel count,
//! which yields the same centroids as clustering every pixel while touching
//! each distinct color once per iteration. Initialization is k-means++ driven
//! by a `StdRng` seeded from configuration, so identical input always reduces
//! to identical colors.

use super::color::Rgb;
use super::kdtree::KdTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A distinct color and the number of pixels that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedColor {
    pub color: Rgb,
    pub count: u64,
}

/// K-means parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeans {
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: u32,
}

/// Result of clustering: one label per input sample, indexing `centroids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorClusters {
    pub centroids: Vec<Rgb>,
    pub labels: Vec<usize>,
}

#[cfg(test)]
impl ColorClusters {
    /// Representative color for the sample at `sample_index`.
    pub fn color_of(&self, sample_index: usize) -> Rgb {
        self.centroids[self.labels[sample_index]]
    }
}

impl KMeans {
    /// Cluster `samples` into at most `self.clusters` representative colors.
    ///
    /// When there are no more distinct colors than clusters, each color is its
    /// own centroid and no randomness is involved.
    pub fn fit(&self, samples: &[WeightedColor]) -> ColorClusters {
        if samples.is_empty() || self.clusters == 0 {
            return ColorClusters {
                centroids: Vec::new(),
                labels: Vec::new(),
            };
        }

        if samples.len() <= self.clusters {
            return ColorClusters {
                centroids: samples.iter().map(|s| s.color).collect(),
                labels: (0..samples.len()).collect(),
            };
        }

        let points: Vec<[f64; 3]> = samples.iter().map(|s| s.color.to_point()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = init_plus_plus(&points, samples, self.clusters, &mut rng);
        let mut labels = assign(&centroids, &points);

        for _ in 0..self.max_iterations {
            centroids = update(&centroids, &points, samples, &labels);
            let next = assign(&centroids, &points);
            if next == labels {
                break;
            }
            labels = next;
        }

        ColorClusters {
            centroids: centroids.into_iter().map(to_rgb).collect(),
            labels,
        }
    }
}

/// k-means++ seeding weighted by pixel count.
fn init_plus_plus(
    points: &[[f64; 3]],
    samples: &[WeightedColor],
    k: usize,
    rng: &mut StdRng,
) -> Vec<[f64; 3]> {
    let weights: Vec<f64> = samples.iter().map(|s| s.count as f64).collect();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[pick_weighted(&weights, rng)]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(*p, centroids[0]))
        .collect();

    while centroids.len() < k {
        let scores: Vec<f64> = nearest.iter().zip(&weights).map(|(d, w)| d * w).collect();
        if scores.iter().sum::<f64>() <= 0.0 {
            break;
        }

        let chosen = points[pick_weighted(&scores, rng)];
        centroids.push(chosen);
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(*p, chosen));
        }
    }

    centroids
}

fn pick_weighted(weights: &[f64], rng: &mut StdRng) -> usize {
    let total: f64 = weights.iter().sum();
    let mut target = rng.r#gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if target < *w {
            return i;
        }
        target -= w;
    }
    // Rounding can leave `target` past the last bucket.
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

fn assign(centroids: &[[f64; 3]], points: &[[f64; 3]]) -> Vec<usize> {
    let tree = KdTree::build(centroids);
    points
        .iter()
        .map(|p| tree.nearest(*p).unwrap_or(0))
        .collect()
}

fn update(
    previous: &[[f64; 3]],
    points: &[[f64; 3]],
    samples: &[WeightedColor],
    labels: &[usize],
) -> Vec<[f64; 3]> {
    let mut sums = vec![[0.0f64; 3]; previous.len()];
    let mut totals = vec![0.0f64; previous.len()];

    for ((point, sample), &label) in points.iter().zip(samples).zip(labels) {
        let weight = sample.count as f64;
        for axis in 0..3 {
            sums[label][axis] += point[axis] * weight;
        }
        totals[label] += weight;
    }

    previous
        .iter()
        .enumerate()
        .map(|(i, old)| {
            if totals[i] > 0.0 {
                [
                    sums[i][0] / totals[i],
                    sums[i][1] / totals[i],
                    sums[i][2] / totals[i],
                ]
            } else {
                *old
            }
        })
        .collect()
}

/// Truncate a centroid to 8-bit channels.
fn to_rgb(point: [f64; 3]) -> Rgb {
    let channel = |v: f64| v.clamp(0.0, 255.0) as u8;
    Rgb([channel(point[0]), channel(point[1]), channel(point[2])])
}

fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(r: u8, g: u8, b: u8, count: u64) -> WeightedColor {
        WeightedColor {
            color: Rgb([r, g, b]),
            count,
        }
    }

    fn two_blobs() -> Vec<WeightedColor> {
        vec![
            sample(10, 10, 10, 5),
            sample(12, 10, 8, 5),
            sample(8, 12, 10, 5),
            sample(240, 240, 240, 3),
            sample(244, 238, 242, 3),
        ]
    }

    #[test]
    fn few_colors_become_their_own_centroids() {
        let samples = vec![sample(1, 2, 3, 10), sample(200, 100, 0, 1)];
        let km = KMeans {
            clusters: 10,
            seed: 42,
            max_iterations: 50,
        };
        let clusters = km.fit(&samples);
        assert_eq!(clusters.centroids, vec![Rgb([1, 2, 3]), Rgb([200, 100, 0])]);
        assert_eq!(clusters.color_of(1), Rgb([200, 100, 0]));
    }

    #[test]
    fn separates_distant_groups() {
        let km = KMeans {
            clusters: 2,
            seed: 42,
            max_iterations: 50,
        };
        let samples = two_blobs();
        let clusters = km.fit(&samples);

        assert_eq!(clusters.labels[0], clusters.labels[1]);
        assert_eq!(clusters.labels[1], clusters.labels[2]);
        assert_eq!(clusters.labels[3], clusters.labels[4]);
        assert_ne!(clusters.labels[0], clusters.labels[3]);

        // Weighted mean of the dark group is exactly (10, 10.67, 9.33), truncated.
        assert_eq!(clusters.color_of(0), Rgb([10, 10, 9]));
        assert_eq!(clusters.color_of(3), Rgb([242, 239, 241]));
    }

    #[test]
    fn same_seed_gives_same_clusters() {
        let samples: Vec<WeightedColor> = (0..64u8)
            .map(|i| sample(i.wrapping_mul(37), i.wrapping_mul(11), i.wrapping_mul(53), 1 + i as u64))
            .collect();
        let km = KMeans {
            clusters: 6,
            seed: 42,
            max_iterations: 50,
        };
        assert_eq!(km.fit(&samples), km.fit(&samples));
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        let km = KMeans {
            clusters: 4,
            seed: 1,
            max_iterations: 10,
        };
        let clusters = km.fit(&[]);
        assert!(clusters.centroids.is_empty());
        assert!(clusters.labels.is_empty());
    }
}
