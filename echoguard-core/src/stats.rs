//! Statistics Over Ping Samples
//!
//! ## Overview
//!
//! Pure functions shared by the aggregator. All of them work on borrowed
//! slices and allocate nothing, so they can run on the stack buffers used
//! in `no_std` builds.
//!
//! ## Conventions
//!
//! - Standard deviation is the *population* standard deviation (divide by n).
//!   A batch is the whole population of pings we took; there is no larger
//!   population to estimate.
//! - The median of an even-length set is the *upper* median, `sorted[n / 2]`.
//!   It is always one of the measured values.
//! - Reductions that need order take `&mut [f32]` and sort in place with
//!   `total_cmp`, so NaN cannot break the sort.
//!
//! ## Dominant Cluster
//!
//! ```text
//! sorted:   10.0  49.8  49.9  50.1  50.2  50.5  400.0
//! run @0:   [10.0]                                      size 1
//! run @1:         [49.8  49.9  50.1  50.2  50.5]        size 5  <- winner
//! run @2:               [49.9  50.1  50.2  50.5]        size 4
//! ...
//! result:   mean(49.8 .. 50.5) = 50.1
//! ```
//!
//! Each run starts at an index and grows while the next value is within
//! `delta` of the run's first (smallest) value. The largest run wins; on a
//! tie the earliest run is kept.

use crate::constants::quality::{CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE};
use crate::reading::Filter;

/// Arithmetic mean; 0 for an empty slice
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Population standard deviation; 0 for an empty slice
pub fn std_dev(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mean = mean(samples);
    let variance = samples
        .iter()
        .map(|s| {
            let d = s - mean;
            d * d
        })
        .sum::<f32>()
        / samples.len() as f32;

    libm::sqrtf(variance)
}

/// Sort ascending in place
pub fn sort_samples(samples: &mut [f32]) {
    samples.sort_unstable_by(|a, b| a.total_cmp(b));
}

/// Upper median; `None` for an empty slice
pub fn median(samples: &mut [f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }

    sort_samples(samples);
    Some(samples[samples.len() / 2])
}

/// Mean of the largest run spanning at most `delta`
///
/// Runs smaller than `min_size` never qualify. Returns `None` when no run
/// qualifies, including for an empty slice.
pub fn dominant_cluster(samples: &mut [f32], delta: f32, min_size: usize) -> Option<f32> {
    sort_samples(samples);

    let mut best: Option<(usize, f32)> = None;

    for (start, &first) in samples.iter().enumerate() {
        let mut size = 0;
        let mut sum = 0.0;

        for &value in &samples[start..] {
            if value - first > delta {
                break; // sorted, nothing further can join
            }
            size += 1;
            sum += value;
        }

        let beats_best = best.map_or(true, |(best_size, _)| size > best_size);
        if size >= min_size && beats_best {
            best = Some((size, sum));
        }
    }

    best.map(|(size, sum)| sum / size as f32)
}

/// Reduce samples to one distance with the configured filter
///
/// `DominantCluster` falls back to the median when no cluster qualifies.
/// Returns `None` only for an empty slice.
pub fn reduce(filter: Filter, samples: &mut [f32]) -> Option<f32> {
    match filter {
        Filter::Median => median(samples),
        Filter::DominantCluster => {
            dominant_cluster(samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE)
                .or_else(|| {
                    warn!("No dominant cluster among {} samples, using median", samples.len());
                    median(samples)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        libm::fabsf(a - b) <= tol
    }

    #[test]
    fn mean_and_std_dev() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&samples), 5.0);
        assert_eq!(std_dev(&samples), 2.0);
    }

    #[test]
    fn empty_slices_are_safe() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(median(&mut []), None);
        assert_eq!(dominant_cluster(&mut [], CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE), None);
        assert_eq!(reduce(Filter::DominantCluster, &mut []), None);
    }

    #[test]
    fn std_dev_of_identical_samples_is_zero() {
        assert_eq!(std_dev(&[50.0; 7]), 0.0);
    }

    #[test]
    fn median_odd_and_even() {
        let mut odd = [25.0, 35.0, 20.0, 40.0, 30.0];
        assert_eq!(median(&mut odd), Some(30.0));

        // Upper median for even counts
        let mut even = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut even), Some(3.0));
    }

    #[test]
    fn cluster_rejects_outliers() {
        let mut samples = [50.1, 50.5, 49.8, 5.0, 50.2, 400.0, 49.9];
        let cm = dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE).unwrap();
        assert!(close(cm, 50.1, 0.01), "got {}", cm);
    }

    #[test]
    fn cluster_picks_larger_group() {
        let mut samples = [50.1, 50.5, 49.8, 100.0, 50.2, 100.5, 49.9];
        let cm = dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE).unwrap();
        assert!(close(cm, 50.1, 0.2));
    }

    #[test]
    fn cluster_tie_keeps_first_run() {
        let mut samples = [100.0, 101.0, 20.0, 21.0];
        let cm = dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE).unwrap();
        assert_eq!(cm, 20.5);
    }

    #[test]
    fn cluster_delta_is_inclusive() {
        let mut samples = [10.0, 15.0];
        let cm = dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE).unwrap();
        assert_eq!(cm, 12.5);
    }

    #[test]
    fn cluster_spread_measured_from_first_member() {
        // 10 -> 14 -> 18: consecutive gaps are small but 18 is 8 away from 10
        let mut samples = [10.0, 14.0, 18.0];
        let cm = dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE).unwrap();
        assert_eq!(cm, 12.0);
    }

    #[test]
    fn single_sample_has_no_cluster() {
        let mut samples = [42.0];
        assert_eq!(dominant_cluster(&mut samples, CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE), None);
        assert_eq!(reduce(Filter::DominantCluster, &mut samples), Some(42.0));
    }

    #[test]
    fn scattered_samples_fall_back_to_median() {
        let mut samples = [300.0, 10.0, 200.0, 100.0];
        assert_eq!(reduce(Filter::DominantCluster, &mut samples), Some(200.0));
    }

    #[test]
    fn identical_samples_cluster_to_themselves() {
        let mut samples = [50.0; 4];
        assert_eq!(reduce(Filter::DominantCluster, &mut samples), Some(50.0));
    }
}
