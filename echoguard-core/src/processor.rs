//! Sample Aggregator
//!
//! Turns a batch of per-ping [`Reading`]s into one classified reading.
//!
//! ## Decision Pipeline
//!
//! ```text
//!  batch ──► ratio gate ──► variance gate ──► reduce ──► quality
//!              │ < 0.4         │ σ > max_dev     │           │
//!              ▼               ▼                 │           ├─ ratio ≥ 0.7, σ ≤ 0.6·max_dev ─► OK
//!          refine:        HIGH_VARIANCE          │           ├─ ratio ≥ 0.7, σ > 0.6·max_dev ─► WEAK_SIGNAL
//!          OUT_OF_RANGE                   median │ cluster   └─ 0.4 ≤ ratio < 0.7 ──────────► WEAK_SIGNAL
//!          TIMEOUT
//!          INSUFFICIENT_SAMPLES
//! ```
//!
//! Rejected batches are refined by their dominant failure, because
//! "insufficient samples" alone tells the caller nothing: out-of-range wins
//! ties against timeouts, and a batch with neither stays
//! `InsufficientSamples`.
//!
//! ## Input Encodings
//!
//! The orchestrator hands over the full per-ping array
//! ([`UsProcessor::process`]). Callers that already filtered their pings can
//! build a [`SampleSet`] from the valid distances plus counts instead; both
//! paths run the same classifier.
//!
//! ```rust
//! use echoguard_core::{SampleSet, SensorConfig, Reading, Outcome, UsProcessor};
//! use echoguard_core::traits::SampleProcessor;
//!
//! let config = SensorConfig::default();
//! let pings = [
//!     Reading::ok(50.0),
//!     Reading::ok(50.2),
//!     Reading::failed(Outcome::Timeout),
//! ];
//!
//! let from_pings = UsProcessor.process(&pings, &config);
//! let from_counts = SampleSet::from_distances(&[50.0, 50.2], 3)
//!     .with_failures(1, 0)
//!     .classify(&config);
//!
//! assert_eq!(from_pings, from_counts);
//! assert_eq!(from_pings.outcome(), Outcome::WeakSignal);
//! ```
//!
//! ## Capacity
//!
//! Batches are held on the stack, at most `MAX_PINGS` entries. Longer inputs
//! are truncated to their first `MAX_PINGS` entries.

use heapless::Vec;

use crate::{
    config::SensorConfig,
    constants::{
        quality::{INVALID_PING_RATIO, VALID_PING_RATIO, WEAK_VARIANCE_RATIO},
        sensors::MAX_PINGS,
    },
    reading::{Outcome, Reading},
    stats,
    traits::SampleProcessor,
};

/// Valid distances of a batch plus what happened to the other pings
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<f32, MAX_PINGS>,
    total_pings: usize,
    timeouts: usize,
    out_of_range: usize,
}

impl SampleSet {
    /// Split a per-ping batch into valid distances and failure counts
    pub fn from_pings(pings: &[Reading]) -> Self {
        let pings = &pings[..pings.len().min(MAX_PINGS)];
        let mut set = Self::empty(pings.len());

        for ping in pings {
            match ping.outcome() {
                outcome if outcome.is_success() => {
                    // Capacity equals the truncated batch length
                    let _ = set.samples.push(ping.cm());
                }
                Outcome::Timeout => set.timeouts += 1,
                Outcome::OutOfRange => set.out_of_range += 1,
                _ => {}
            }
        }

        set
    }

    /// Build from already-filtered valid distances
    ///
    /// `total_pings` is the number of pings attempted, valid or not. Add the
    /// failure breakdown with [`SampleSet::with_failures`] to get refined
    /// rejections.
    pub fn from_distances(distances: &[f32], total_pings: usize) -> Self {
        let total_pings = total_pings.min(MAX_PINGS);
        let mut set = Self::empty(total_pings);

        for &cm in distances.iter().take(total_pings) {
            let _ = set.samples.push(cm);
        }

        set
    }

    /// Record how many of the invalid pings timed out or fell out of range
    pub fn with_failures(mut self, timeouts: usize, out_of_range: usize) -> Self {
        self.timeouts = timeouts;
        self.out_of_range = out_of_range;
        self
    }

    fn empty(total_pings: usize) -> Self {
        Self {
            samples: Vec::new(),
            total_pings,
            timeouts: 0,
            out_of_range: 0,
        }
    }

    /// Valid distances in insertion order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of pings attempted
    pub fn total_pings(&self) -> usize {
        self.total_pings
    }

    /// Fraction of pings that produced a distance; 0 for an empty batch
    pub fn valid_ratio(&self) -> f32 {
        if self.total_pings == 0 {
            return 0.0;
        }

        self.samples.len() as f32 / self.total_pings as f32
    }

    /// Classify the batch
    pub fn classify(&self, config: &SensorConfig) -> Reading {
        if self.total_pings == 0 {
            return Reading::failed(Outcome::InsufficientSamples);
        }

        let ratio = self.valid_ratio();
        if ratio < INVALID_PING_RATIO {
            debug!(
                "Rejected batch: {} of {} valid (ratio {})",
                self.samples.len(),
                self.total_pings,
                ratio
            );
            return Reading::failed(self.rejection());
        }

        let std_dev = stats::std_dev(&self.samples);
        if std_dev > config.max_dev_cm {
            debug!("High variance: std_dev {} cm, limit {} cm", std_dev, config.max_dev_cm);
            return Reading::failed(Outcome::HighVariance);
        }

        // Reduce a copy so `classify` stays callable on a shared set
        let mut scratch = self.samples.clone();
        let cm = match stats::reduce(config.filter, &mut scratch) {
            Some(cm) => cm,
            None => return Reading::failed(Outcome::InsufficientSamples),
        };

        if ratio >= VALID_PING_RATIO {
            if std_dev > config.max_dev_cm * WEAK_VARIANCE_RATIO {
                debug!("Weak signal: elevated std_dev {} cm", std_dev);
                return Reading::weak(cm);
            }
            return Reading::ok(cm);
        }

        debug!("Weak signal: ratio {}", ratio);
        Reading::weak(cm)
    }

    /// Most informative failure for a rejected batch
    fn rejection(&self) -> Outcome {
        if self.out_of_range > 0 && self.out_of_range >= self.timeouts {
            Outcome::OutOfRange
        } else if self.timeouts > 0 {
            Outcome::Timeout
        } else {
            Outcome::InsufficientSamples
        }
    }
}

/// Default aggregator: ratio gate, variance gate, filter, quality
#[derive(Debug, Clone, Copy, Default)]
pub struct UsProcessor;

impl SampleProcessor for UsProcessor {
    fn process(&self, pings: &[Reading], config: &SensorConfig) -> Reading {
        SampleSet::from_pings(pings).classify(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Filter;

    fn process(pings: &[Reading], config: &SensorConfig) -> Reading {
        UsProcessor.process(pings, config)
    }

    fn batch(valid: &[f32], failures: &[Outcome]) -> heapless::Vec<Reading, MAX_PINGS> {
        valid
            .iter()
            .map(|cm| Reading::ok(*cm))
            .chain(failures.iter().map(|o| Reading::failed(*o)))
            .collect()
    }

    #[test]
    fn median_filter() {
        let config = SensorConfig::default().with_filter(Filter::Median);
        let pings = batch(&[25.0, 35.0, 20.0, 40.0, 30.0], &[]);

        assert_eq!(process(&pings, &config), Reading::ok(30.0));
    }

    #[test]
    fn empty_batch_is_insufficient() {
        let config = SensorConfig::default();
        assert_eq!(
            process(&[], &config),
            Reading::failed(Outcome::InsufficientSamples)
        );
    }

    #[test]
    fn outliers_with_median_downgrade_to_weak() {
        let config = SensorConfig::default().with_max_dev(200.0);
        let pings = batch(&[50.1, 50.5, 49.8, 5.0, 50.2, 400.0, 49.9], &[]);

        let reading = process(&pings, &config);
        assert_eq!(reading.outcome(), Outcome::WeakSignal);
        assert!(libm::fabsf(reading.cm() - 50.1) < 0.1);
    }

    #[test]
    fn dominant_cluster_all_valid() {
        let config = SensorConfig::default()
            .with_filter(Filter::DominantCluster)
            .with_max_dev(200.0);
        let pings = batch(&[50.1, 50.2, 49.9, 50.0, 50.3], &[]);

        let reading = process(&pings, &config);
        assert_eq!(reading.outcome(), Outcome::Ok);
        assert!(libm::fabsf(reading.cm() - 50.1) < 0.1);
    }

    #[test]
    fn dominant_cluster_without_cluster_uses_median() {
        let config = SensorConfig::default()
            .with_filter(Filter::DominantCluster)
            .with_max_dev(200.0);
        let pings = batch(&[10.0, 100.0, 200.0, 300.0], &[]);

        assert_eq!(process(&pings, &config).cm(), 200.0);
    }

    #[test]
    fn low_ratio_generic_failures() {
        let config = SensorConfig::default();
        let pings = batch(&[50.0, 50.1], &[Outcome::InsufficientSamples; 8]);

        assert_eq!(
            process(&pings, &config),
            Reading::failed(Outcome::InsufficientSamples)
        );
    }

    #[test]
    fn low_ratio_refined_to_out_of_range() {
        let config = SensorConfig::default();
        let pings = batch(&[50.0], &[Outcome::OutOfRange; 4]);

        assert_eq!(process(&pings, &config).outcome(), Outcome::OutOfRange);
    }

    #[test]
    fn low_ratio_refined_to_timeout() {
        let config = SensorConfig::default();
        let pings = batch(
            &[50.0],
            &[Outcome::Timeout, Outcome::Timeout, Outcome::Timeout, Outcome::OutOfRange],
        );

        assert_eq!(process(&pings, &config).outcome(), Outcome::Timeout);
    }

    #[test]
    fn refinement_tie_prefers_out_of_range() {
        let config = SensorConfig::default();
        let pings = batch(
            &[],
            &[Outcome::Timeout, Outcome::OutOfRange, Outcome::Timeout, Outcome::OutOfRange],
        );

        assert_eq!(process(&pings, &config).outcome(), Outcome::OutOfRange);
    }

    #[test]
    fn ratio_exactly_at_lower_threshold_is_weak() {
        let config = SensorConfig::default();
        let pings = batch(&[50.0, 50.1, 50.2, 49.9], &[Outcome::Timeout; 6]);

        let reading = process(&pings, &config);
        assert_eq!(reading.outcome(), Outcome::WeakSignal);
    }

    #[test]
    fn ratio_exactly_at_upper_threshold_is_ok() {
        let config = SensorConfig::default();
        let pings = batch(
            &[50.0, 50.1, 50.2, 49.9, 50.0, 50.1, 49.8],
            &[Outcome::Timeout; 3],
        );

        assert_eq!(process(&pings, &config).outcome(), Outcome::Ok);
    }

    #[test]
    fn std_dev_equal_to_limit_passes() {
        // Population std_dev of {40, 60} is exactly 10
        let config = SensorConfig::default().with_max_dev(10.0);
        let pings = batch(&[40.0, 60.0], &[]);

        let reading = process(&pings, &config);
        // Passes the hard gate, but 10 > 0.6 * 10
        assert_eq!(reading.outcome(), Outcome::WeakSignal);
        assert_eq!(reading.cm(), 60.0);
    }

    #[test]
    fn std_dev_above_limit_is_high_variance() {
        let config = SensorConfig::default().with_max_dev(9.99);
        let pings = batch(&[40.0, 60.0], &[]);

        assert_eq!(
            process(&pings, &config),
            Reading::failed(Outcome::HighVariance)
        );
    }

    #[test]
    fn variance_gate_ignores_ratio_band() {
        let config = SensorConfig::default().with_max_dev(1.0);
        let pings = batch(&[10.0, 30.0, 50.0, 70.0, 90.0], &[Outcome::Timeout; 5]);

        assert_eq!(process(&pings, &config).outcome(), Outcome::HighVariance);
    }

    #[test]
    fn encodings_agree() {
        let config = SensorConfig::default();
        let pings = batch(
            &[80.0, 80.4, 79.9, 81.0, 80.2],
            &[Outcome::Timeout, Outcome::OutOfRange, Outcome::OutOfRange],
        );

        let from_pings = process(&pings, &config);
        let from_counts = SampleSet::from_distances(&[80.0, 80.4, 79.9, 81.0, 80.2], 8)
            .with_failures(1, 2)
            .classify(&config);

        assert_eq!(from_pings, from_counts);
    }

    #[test]
    fn oversized_batches_are_truncated() {
        let mut pings: heapless::Vec<Reading, 20> = heapless::Vec::new();
        for _ in 0..MAX_PINGS {
            let _ = pings.push(Reading::ok(60.0));
        }
        for _ in 0..5 {
            let _ = pings.push(Reading::failed(Outcome::Timeout));
        }

        let set = SampleSet::from_pings(&pings);
        assert_eq!(set.total_pings(), MAX_PINGS);
        assert_eq!(set.valid_ratio(), 1.0);
        assert_eq!(set.classify(&SensorConfig::default()), Reading::ok(60.0));
    }

    #[test]
    fn hardware_faults_count_as_invalid() {
        let config = SensorConfig::default();
        let pings = batch(&[50.0], &[Outcome::HwFault, Outcome::EchoStuck, Outcome::HwFault]);

        assert_eq!(
            process(&pings, &config),
            Reading::failed(Outcome::InsufficientSamples)
        );
    }
}
