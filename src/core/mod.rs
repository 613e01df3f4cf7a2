/// Company lifecycle, children, and the business-key rename cascade
pub mod company;

/// Monthly insight snapshots counted by attention bucket
pub mod insights;

/// Practice invoices and their flag-pair bucketing
pub mod invoice;

/// Obligation creation, flags, rollover, and status sweeps
pub mod obligation;

/// Pure due-date classification against the per-kind thresholds
pub mod status;

/// Ad-hoc practice tasks and their workflow states
pub mod task;
