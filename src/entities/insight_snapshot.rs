//! Insight snapshot entity - Per-category status counts for one month.
//!
//! Logically keyed by (category, month, year); the aggregator upserts by
//! that key so the current month is overwritten in place while past months
//! form an append-only history.

use crate::registry::ObligationKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reporting category of a snapshot row: the five obligation kinds plus
/// the invoice and task tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum InsightCategory {
    /// Annual accounts obligations
    #[sea_orm(string_value = "Account")]
    Account,
    /// Confirmation statement obligations
    #[sea_orm(string_value = "ConfirmationStatement")]
    ConfirmationStatement,
    /// CIS return obligations
    #[sea_orm(string_value = "CIS")]
    Cis,
    /// Payroll run obligations
    #[sea_orm(string_value = "PayRun")]
    PayRun,
    /// VAT return obligations
    #[sea_orm(string_value = "VAT")]
    Vat,
    /// Practice invoices
    #[sea_orm(string_value = "Invoice")]
    Invoice,
    /// Ad-hoc tasks
    #[sea_orm(string_value = "Task")]
    Task,
}

impl InsightCategory {
    /// Every category, in the order bulk refreshes process them.
    pub const ALL: [Self; 7] = [
        Self::Cis,
        Self::Vat,
        Self::Account,
        Self::PayRun,
        Self::ConfirmationStatement,
        Self::Invoice,
        Self::Task,
    ];

    /// The obligation kind backing this category, if it is kind-backed.
    #[must_use]
    pub const fn obligation_kind(self) -> Option<ObligationKind> {
        match self {
            Self::Account => Some(ObligationKind::Account),
            Self::ConfirmationStatement => Some(ObligationKind::ConfirmationStatement),
            Self::Cis => Some(ObligationKind::Cis),
            Self::PayRun => Some(ObligationKind::PayRun),
            Self::Vat => Some(ObligationKind::Vat),
            Self::Invoice | Self::Task => None,
        }
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
            Self::Invoice => "Invoice",
            Self::Task => "Task",
        }
    }
}

impl From<ObligationKind> for InsightCategory {
    fn from(kind: ObligationKind) -> Self {
        match kind {
            ObligationKind::Account => Self::Account,
            ObligationKind::ConfirmationStatement => Self::ConfirmationStatement,
            ObligationKind::Cis => Self::Cis,
            ObligationKind::PayRun => Self::PayRun,
            ObligationKind::Vat => Self::Vat,
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insight snapshot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insight_snapshots")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Which table the counts were taken from
    pub category: InsightCategory,
    /// Calendar month of the snapshot (1-12)
    pub month: i32,
    /// Calendar year of the snapshot
    pub year: i32,
    /// Instances counted as Early
    pub early_count: i32,
    /// Instances counted as Soon
    pub soon_count: i32,
    /// Instances counted as Urgent
    pub urgent_count: i32,
    /// Instances counted as Overdue
    pub overdue_count: i32,
    /// Instances counted as Paid (tasks only; zero elsewhere)
    pub paid_count: i32,
    /// Total instances considered for this category and month
    pub total_count: i32,
}

/// Snapshots reference no other entity
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
