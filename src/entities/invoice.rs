//! Invoice entity - A billing record raised by the practice.
//!
//! Invoices store no status column; the aggregator derives a bucket from
//! the `sent` and `paid` flags. The company reference is optional because
//! the practice also bills individuals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the billed company, if the client is a company
    pub company_utr: Option<String>,
    /// What the invoice covers
    pub description: String,
    /// Invoice date, if issued
    pub date: Option<Date>,
    /// Invoice amount, if priced
    pub amount: Option<f64>,
    /// Whether the invoice has been sent to the client
    pub sent: bool,
    /// Whether the invoice has been paid
    pub paid: bool,
}

/// References its company by `company_utr` without a declared relation.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
