//! Company entity - Represents a client company of the practice.
//!
//! The primary key is the company's Unique Taxpayer Reference, a user-entered
//! business code. Because clients occasionally correct it, every dependent
//! table stores it as a plain `company_utr` column and key edits go through
//! the rename cascade rather than a schema-level foreign key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique Taxpayer Reference - the user-entered business key
    #[sea_orm(primary_key, auto_increment = false)]
    pub utr: String,
    /// Registered company name
    pub name: String,
    /// Trading address, if recorded
    pub address: Option<String>,
    /// Contact email, if recorded
    pub email: Option<String>,
    /// Contact phone number, if recorded
    pub contact_number: Option<String>,
    /// Whether the company files monthly CIS returns
    pub cis_enabled: bool,
    /// Whether the company files quarterly VAT returns
    pub vat_enabled: bool,
    /// Date the company was added to the portfolio
    pub date_added: Date,
}

/// Dependent rows reference the company by `company_utr` without a declared
/// relation; the engine owns referential integrity.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
