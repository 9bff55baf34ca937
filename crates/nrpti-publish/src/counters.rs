//! Publication counters, recorded through the `metrics` facade. Nothing is
//! exported unless the host process installs a recorder.

use nrpti_core::RecordType;

/// Record sets written successfully, labelled by `record_type`.
pub const PUBLICATIONS_TOTAL: &str = "nrpti_publications_total";
/// Failed persistence phases, labelled by `outcome` (`clean` / `orphaned`).
pub const ROLLBACKS_TOTAL: &str = "nrpti_rollbacks_total";
/// Operations rejected by a builder before any write.
pub const VALIDATION_REJECTIONS_TOTAL: &str = "nrpti_validation_rejections_total";

pub(crate) fn publication(record_type: RecordType) {
    metrics::counter!(PUBLICATIONS_TOTAL, "record_type" => record_type.as_str()).increment(1);
}

pub(crate) fn rollback(outcome: &'static str) {
    metrics::counter!(ROLLBACKS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn validation_rejection() {
    metrics::counter!(VALIDATION_REJECTIONS_TOTAL).increment(1);
}
