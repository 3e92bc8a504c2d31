//! Metric helpers for fragment reassembly.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

/// Name of the counter tracking fragments accepted into a sequence.
pub const FRAGMENTS_ACCEPTED: &str = "otr_fragments_accepted_total";
/// Name of the counter tracking dropped fragments, labelled by `reason`.
pub const FRAGMENTS_DROPPED: &str = "otr_fragments_dropped_total";
/// Name of the counter tracking fully reassembled messages.
pub const MESSAGES_REASSEMBLED: &str = "otr_messages_reassembled_total";

/// Record a fragment that extended or started a sequence.
pub fn inc_accepted() {
    #[cfg(feature = "metrics")]
    metrics::counter!(FRAGMENTS_ACCEPTED).increment(1);
}

/// Record a dropped fragment.
pub fn inc_dropped(reason: &'static str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(FRAGMENTS_DROPPED, "reason" => reason).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record a completed message.
pub fn inc_reassembled() {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_REASSEMBLED).increment(1);
}
