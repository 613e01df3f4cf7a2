//! Obligation entity - One live filing obligation per (company, kind).
//!
//! All five statutory kinds share this table; the `kind` column selects the
//! per-kind parameters from the registry. Each row carries all three
//! sign-off flag columns even though each kind only requires a subset -
//! untracked columns simply stay false for that kind.

use crate::registry::{ObligationKind, Status};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Obligation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "obligations")]
pub struct Model {
    /// Unique identifier for the obligation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the owning company
    pub company_utr: String,
    /// Which statutory obligation this row tracks
    pub kind: ObligationKind,
    /// Deadline of the current filing period
    pub due_date: Date,
    /// Start of the current period, for the kinds that track one (CIS, VAT)
    pub period_start: Option<Date>,
    /// Last classified urgency status
    pub status: Status,
    /// Sign-off: the client has been advised of the deadline
    pub advisory_sent: bool,
    /// Sign-off: the practice has raised its invoice
    pub invoice_raised: bool,
    /// Sign-off: the filing work is complete
    pub work_completed: bool,
}

/// References its company by `company_utr` without a declared relation;
/// the engine owns referential integrity.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
