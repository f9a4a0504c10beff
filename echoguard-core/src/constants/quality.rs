//! Quality Thresholds for Sample Aggregation
//!
//! Ratio and variance thresholds used to turn a batch of pings into one
//! classified reading.

// ===== PING RATIO =====

/// Valid ping ratio at or above which a batch is considered strong.
///
/// Strong batches may still be downgraded to `WeakSignal` by variance.
pub const VALID_PING_RATIO: f32 = 0.7;

/// Valid ping ratio below which a batch is rejected outright.
///
/// Between this and [`VALID_PING_RATIO`] the batch is usable but always
/// reported as `WeakSignal`.
pub const INVALID_PING_RATIO: f32 = 0.4;

// ===== VARIANCE =====

/// Fraction of `max_dev_cm` above which a strong batch is downgraded.
pub const WEAK_VARIANCE_RATIO: f32 = 0.6;

// ===== DOMINANT CLUSTER =====

/// Maximum spread of a cluster, measured from its smallest member (cm).
pub const CLUSTER_DELTA_CM: f32 = 5.0;

/// Minimum number of members for a run to count as a cluster.
pub const CLUSTER_MIN_SIZE: usize = 2;
