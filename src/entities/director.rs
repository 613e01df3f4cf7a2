//! Director entity - A company officer recorded against a company.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Director database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "directors")]
pub struct Model {
    /// Unique identifier for the director record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the owning company
    pub company_utr: String,
    /// Director name
    pub name: String,
    /// Contact email, if recorded
    pub email: Option<String>,
}

/// References its company by `company_utr` without a declared relation.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
