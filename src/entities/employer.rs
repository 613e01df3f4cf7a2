//! Employer entity - A payroll employee recorded against a company.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employers")]
pub struct Model {
    /// Unique identifier for the employer record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the owning company
    pub company_utr: String,
    /// Employee name
    pub name: String,
    /// Employment start date
    pub start_date: Date,
}

/// References its company by `company_utr` without a declared relation.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
