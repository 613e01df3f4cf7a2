//! Obligation vocabulary - kinds, statuses, flags, and per-kind parameters.
//!
//! Everything that varies between the five statutory obligation kinds lives
//! in this module's [`KindSpec`] table: filing period length, the sign-off
//! flags a kind requires before it may roll forward, the classifier day
//! windows, and whether the kind tracks the start of its current period.
//! The rest of the engine reads this table instead of matching on kinds,
//! so adding a kind or changing a window is a registry-only edit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five recurring statutory obligation kinds tracked per company.
///
/// Stored as strings in the `obligations.kind` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ObligationKind {
    /// Annual statutory accounts filing
    #[sea_orm(string_value = "Account")]
    Account,
    /// Annual confirmation statement filing
    #[sea_orm(string_value = "ConfirmationStatement")]
    ConfirmationStatement,
    /// Monthly Construction Industry Scheme return
    #[sea_orm(string_value = "CIS")]
    Cis,
    /// Monthly payroll run
    #[sea_orm(string_value = "PayRun")]
    PayRun,
    /// Quarterly VAT return
    #[sea_orm(string_value = "VAT")]
    Vat,
}

/// Urgency classification of an obligation relative to its due date.
///
/// Stored as strings in the `obligations.status` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    /// Due date is comfortably far out
    #[sea_orm(string_value = "Early")]
    Early,
    /// Due date is inside the soon window
    #[sea_orm(string_value = "Soon")]
    Soon,
    /// Due date is inside the urgent window
    #[sea_orm(string_value = "Urgent")]
    Urgent,
    /// Due date is today or has passed
    #[sea_orm(string_value = "Overdue")]
    Overdue,
}

/// Names of the per-obligation sign-off flags.
///
/// Every obligation row carries all three flag columns; each kind requires
/// only the subset listed in its [`KindSpec`]. Setting a flag a kind does
/// not track is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    /// The client has been advised of the upcoming deadline
    AdvisorySent,
    /// The practice has raised its invoice for the work
    InvoiceRaised,
    /// The filing work itself is complete
    WorkCompleted,
}

/// Tally bucket used by the insights aggregator.
///
/// Obligation statuses map onto the first four buckets one-to-one; `Paid`
/// exists for the task workflow only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Counted under `early_count`
    Early,
    /// Counted under `soon_count`
    Soon,
    /// Counted under `urgent_count`
    Urgent,
    /// Counted under `overdue_count`
    Overdue,
    /// Counted under `paid_count`
    Paid,
}

/// Day-window boundaries the classifier applies for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Days remaining at or below which an unfiled obligation is `Urgent`
    pub urgent_within: i64,
    /// Days remaining at or below which it is `Soon`
    pub soon_within: i64,
}

/// Per-kind parameter record: everything that varies between kinds.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    /// Length of one filing period in calendar months
    pub period_months: u32,
    /// Sign-off flags that must all be set before the obligation can roll
    pub required_flags: &'static [FlagName],
    /// Classifier day windows
    pub thresholds: Thresholds,
    /// Whether the kind tracks the start of its current period
    pub tracks_period_start: bool,
}

impl ObligationKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 5] = [
        Self::Account,
        Self::ConfirmationStatement,
        Self::Cis,
        Self::PayRun,
        Self::Vat,
    ];

    /// Returns the parameter record for this kind.
    #[must_use]
    pub const fn spec(self) -> KindSpec {
        match self {
            Self::Account => KindSpec {
                period_months: 12,
                required_flags: &[FlagName::AdvisorySent, FlagName::InvoiceRaised],
                thresholds: Thresholds {
                    urgent_within: 2,
                    soon_within: 7,
                },
                tracks_period_start: false,
            },
            Self::ConfirmationStatement => KindSpec {
                period_months: 12,
                required_flags: &[FlagName::InvoiceRaised, FlagName::WorkCompleted],
                thresholds: Thresholds {
                    urgent_within: 2,
                    soon_within: 7,
                },
                tracks_period_start: false,
            },
            Self::Cis => KindSpec {
                period_months: 1,
                required_flags: &[FlagName::AdvisorySent, FlagName::WorkCompleted],
                thresholds: Thresholds {
                    urgent_within: 2,
                    soon_within: 7,
                },
                tracks_period_start: true,
            },
            Self::PayRun => KindSpec {
                period_months: 1,
                required_flags: &[
                    FlagName::AdvisorySent,
                    FlagName::InvoiceRaised,
                    FlagName::WorkCompleted,
                ],
                thresholds: Thresholds {
                    urgent_within: 2,
                    soon_within: 7,
                },
                tracks_period_start: false,
            },
            Self::Vat => KindSpec {
                period_months: 3,
                required_flags: &[FlagName::InvoiceRaised, FlagName::WorkCompleted],
                thresholds: Thresholds {
                    urgent_within: 2,
                    soon_within: 7,
                },
                tracks_period_start: true,
            },
        }
    }

    /// Whether `flag` is part of this kind's sign-off checklist.
    #[must_use]
    pub fn requires(self, flag: FlagName) -> bool {
        self.spec().required_flags.contains(&flag)
    }

    /// Stable name matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::ConfirmationStatement => "ConfirmationStatement",
            Self::Cis => "CIS",
            Self::PayRun => "PayRun",
            Self::Vat => "VAT",
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Status {
    /// Sort rank for presentation reads, most pressing first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Overdue => 0,
            Self::Urgent => 1,
            Self::Soon => 2,
            Self::Early => 3,
        }
    }

    /// Stable name matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::Soon => "Soon",
            Self::Urgent => "Urgent",
            Self::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FlagName {
    /// Column-style name used in messages and seed files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdvisorySent => "advisory_sent",
            Self::InvoiceRaised => "invoice_raised",
            Self::WorkCompleted => "work_completed",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for Bucket {
    fn from(status: Status) -> Self {
        match status {
            Status::Early => Self::Early,
            Status::Soon => Self::Soon,
            Status::Urgent => Self::Urgent,
            Status::Overdue => Self::Overdue,
        }
    }
}
