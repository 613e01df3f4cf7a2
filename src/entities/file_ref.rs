//! File reference entity - A pointer to a document held for a company.
//!
//! Only the reference is stored; file content lives outside the engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// File reference database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_refs")]
pub struct Model {
    /// Unique identifier for the file reference
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the owning company
    pub company_utr: String,
    /// Display name of the document
    pub name: String,
    /// Where the document is stored
    pub path: String,
}

/// References its company by `company_utr` without a declared relation.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
