//! Shared test utilities for duebook.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. Every fixture deadline
//! is laid out relative to [`test_today`] so classifications are stable.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{company, invoice, obligation, task},
    entities,
    errors::{Error, Result},
    registry::ObligationKind,
};
use chrono::{Duration, NaiveDate};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed reference date all fixtures are laid out against.
#[must_use]
pub fn test_today() -> NaiveDate {
    date(2025, 3, 15)
}

/// Builds a date from literal parts.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Returns a [`company::NewCompany`] ready to hand to `create_company`.
///
/// # Defaults
/// * `name`: "Test Company"
/// * accounts due 60 days out, confirmation statement 30, payroll 10
/// * CIS and VAT disabled
#[must_use]
pub fn test_new_company(utr: &str) -> company::NewCompany {
    let today = test_today();
    company::NewCompany {
        utr: utr.to_string(),
        name: "Test Company".to_string(),
        address: None,
        email: None,
        contact_number: None,
        cis_enabled: false,
        vat_enabled: false,
        accounts_due: today + Duration::days(60),
        confirmation_due: today + Duration::days(30),
        payroll_due: today + Duration::days(10),
        cis_due: None,
        vat_due: None,
    }
}

/// Creates a test company holding the three always-present obligations,
/// all comfortably in the future.
pub async fn create_test_company(
    db: &DatabaseConnection,
    utr: &str,
) -> Result<entities::company::Model> {
    company::create_company(db, test_new_company(utr), test_today()).await
}

/// Creates a test company that also files CIS and VAT, five obligations
/// in total. The CIS deadline lands five days out (Soon) and the VAT
/// deadline one day out (Urgent).
pub async fn create_full_company(
    db: &DatabaseConnection,
    utr: &str,
) -> Result<entities::company::Model> {
    let today = test_today();
    let mut new = test_new_company(utr);
    new.cis_enabled = true;
    new.vat_enabled = true;
    new.cis_due = Some(today + Duration::days(5));
    new.vat_due = Some(today + Duration::days(1));
    company::create_company(db, new, today).await
}

/// Fetches the one obligation a company holds for a kind, failing the
/// test if it is missing.
pub async fn find_obligation(
    db: &DatabaseConnection,
    utr: &str,
    kind: ObligationKind,
) -> Result<entities::obligation::Model> {
    obligation::get_for_company(db, utr, kind)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("expected {utr} to hold a {kind} obligation"),
        })
}

/// Creates a test task with sensible defaults.
///
/// # Defaults
/// * `done_by`: "Priya"
/// * `price`: None
pub async fn create_test_task(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::task::Model> {
    task::create_task(db, name.to_string(), "Priya".to_string(), None, test_today()).await
}

/// Creates a test invoice with sensible defaults, unsent and unpaid.
///
/// # Defaults
/// * `date`: [`test_today`]
/// * `amount`: 100.0
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    company_utr: Option<String>,
    description: &str,
) -> Result<entities::invoice::Model> {
    invoice::create_invoice(
        db,
        company_utr,
        description.to_string(),
        Some(test_today()),
        Some(100.0),
    )
    .await
}
