//! Client portfolio loading from portfolio.toml
//!
//! This module provides functionality to load an initial client portfolio
//! from a TOML configuration file. The companies defined in portfolio.toml
//! are used to seed the database on first run; companies already on the
//! books are left alone, so reseeding is safe.

use crate::core::company::{NewCompany, create_company, get_company};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire portfolio.toml file
#[derive(Debug, Deserialize)]
pub struct Portfolio {
    /// List of companies to seed
    pub companies: Vec<CompanySeed>,
}

/// Configuration for a single company
#[derive(Debug, Deserialize, Clone)]
pub struct CompanySeed {
    /// Business key (Unique Taxpayer Reference)
    pub utr: String,
    /// Registered company name
    pub name: String,
    /// Trading address
    #[serde(default)]
    pub address: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Whether the company files monthly CIS returns
    #[serde(default)]
    pub cis_enabled: bool,
    /// Whether the company files quarterly VAT returns
    #[serde(default)]
    pub vat_enabled: bool,
    /// First annual accounts deadline, ISO format (e.g. "2025-09-30")
    pub accounts_due: String,
    /// First confirmation statement deadline, ISO format
    pub confirmation_due: String,
    /// First payroll deadline, ISO format
    pub payroll_due: String,
    /// First CIS deadline, ISO format; required when `cis_enabled`
    #[serde(default)]
    pub cis_due: Option<String>,
    /// First VAT deadline, ISO format; required when `vat_enabled`
    #[serde(default)]
    pub vat_due: Option<String>,
}

fn parse_seed_date(utr: &str, field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| Error::Config {
        message: format!("Bad {field} date {value:?} for company {utr}: {e}"),
    })
}

impl CompanySeed {
    /// Converts the seed into the form `create_company` accepts, parsing
    /// every deadline string.
    pub fn to_new_company(&self) -> Result<NewCompany> {
        let cis_due = self
            .cis_due
            .as_deref()
            .map(|v| parse_seed_date(&self.utr, "cis_due", v))
            .transpose()?;
        let vat_due = self
            .vat_due
            .as_deref()
            .map(|v| parse_seed_date(&self.utr, "vat_due", v))
            .transpose()?;

        Ok(NewCompany {
            utr: self.utr.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
            contact_number: self.contact_number.clone(),
            cis_enabled: self.cis_enabled,
            vat_enabled: self.vat_enabled,
            accounts_due: parse_seed_date(&self.utr, "accounts_due", &self.accounts_due)?,
            confirmation_due: parse_seed_date(
                &self.utr,
                "confirmation_due",
                &self.confirmation_due,
            )?,
            payroll_due: parse_seed_date(&self.utr, "payroll_due", &self.payroll_due)?,
            cis_due,
            vat_due,
        })
    }
}

/// Loads a client portfolio from a TOML file
///
/// # Arguments
/// * `path` - Path to the portfolio.toml file
///
/// # Returns
/// * `Ok(Portfolio)` - Successfully parsed portfolio
/// * `Err(Error)` - Failed to read or parse the portfolio file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Portfolio> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read portfolio file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse portfolio.toml: {e}"),
    })
}

/// Loads the client portfolio from the default location (./portfolio.toml)
pub fn load_default_portfolio() -> Result<Portfolio> {
    load_portfolio("portfolio.toml")
}

/// Outcome of seeding the database from a portfolio file
#[derive(Debug, Clone, Copy)]
pub struct SeedSummary {
    /// Companies created on this run
    pub created: usize,
    /// Companies skipped because their key was already on the books
    pub skipped: usize,
}

/// Seeds the database with every company in the portfolio.
///
/// Companies whose key already exists are skipped, so this is safe to run
/// on every startup. A malformed seed entry aborts the run instead of
/// silently dropping the company.
pub async fn seed_portfolio(
    db: &DatabaseConnection,
    portfolio: &Portfolio,
    today: NaiveDate,
) -> Result<SeedSummary> {
    let mut created = 0;
    let mut skipped = 0;

    for seed in &portfolio.companies {
        if get_company(db, &seed.utr).await?.is_some() {
            debug!("Company {} already on the books, skipping seed", seed.utr);
            skipped += 1;
            continue;
        }
        create_company(db, seed.to_new_company()?, today).await?;
        created += 1;
    }

    info!("Seeded {created} companies from the portfolio file ({skipped} already present)");
    Ok(SeedSummary { created, skipped })
}
