//! Company lifecycle operations and the business-key rename cascade.
//!
//! A company row owns one live obligation per enabled kind plus employer,
//! director, and file-reference children, all keyed by the company's
//! user-entered business key. Because that key is mutable, editing it
//! rewrites every dependent table and the owner row inside one
//! transaction; no schema-level foreign keys exist, so the engine is the
//! sole guardian of referential integrity.

use crate::{
    core::obligation::create_obligation,
    entities::{
        Company, Director, Employer, FileRef, Invoice, Obligation, company, director, employer,
        file_ref, invoice, obligation,
    },
    errors::{Error, Result},
    registry::ObligationKind,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Everything needed to take a new client company onto the books.
#[derive(Debug, Clone)]
pub struct NewCompany {
    /// Business key (Unique Taxpayer Reference)
    pub utr: String,
    /// Registered company name
    pub name: String,
    /// Trading address, if known
    pub address: Option<String>,
    /// Contact email, if known
    pub email: Option<String>,
    /// Contact phone number, if known
    pub contact_number: Option<String>,
    /// Whether the company files monthly CIS returns
    pub cis_enabled: bool,
    /// Whether the company files quarterly VAT returns
    pub vat_enabled: bool,
    /// First annual accounts deadline
    pub accounts_due: NaiveDate,
    /// First confirmation statement deadline
    pub confirmation_due: NaiveDate,
    /// First payroll run deadline
    pub payroll_due: NaiveDate,
    /// First CIS deadline; required when CIS is enabled
    pub cis_due: Option<NaiveDate>,
    /// First VAT deadline; required when VAT is enabled
    pub vat_due: Option<NaiveDate>,
}

/// Creates a company together with its initial obligations.
///
/// Account, confirmation statement and payroll obligations are always
/// created; CIS and VAT only when the matching flag is enabled, in which
/// case the corresponding due date is mandatory. Each obligation is
/// classified against `today` immediately. One transaction covers the
/// company row and all its obligations.
pub async fn create_company(
    db: &DatabaseConnection,
    new: NewCompany,
    today: NaiveDate,
) -> Result<company::Model> {
    let utr = new.utr.trim().to_string();
    if utr.is_empty() {
        return Err(Error::Validation {
            message: "Company key cannot be empty".to_string(),
        });
    }
    if new.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Company name cannot be empty".to_string(),
        });
    }
    if new.cis_enabled && new.cis_due.is_none() {
        return Err(Error::Validation {
            message: format!("CIS is enabled for {utr} but no CIS due date was given"),
        });
    }
    if new.vat_enabled && new.vat_due.is_none() {
        return Err(Error::Validation {
            message: format!("VAT is enabled for {utr} but no VAT due date was given"),
        });
    }

    let txn = db.begin().await?;

    if Company::find_by_id(utr.clone()).one(&txn).await?.is_some() {
        return Err(Error::CompanyKeyInUse { utr });
    }

    let created = company::ActiveModel {
        utr: Set(utr.clone()),
        name: Set(new.name.trim().to_string()),
        address: Set(new.address),
        email: Set(new.email),
        contact_number: Set(new.contact_number),
        cis_enabled: Set(new.cis_enabled),
        vat_enabled: Set(new.vat_enabled),
        date_added: Set(today),
    }
    .insert(&txn)
    .await?;

    create_obligation(&txn, &utr, ObligationKind::Account, new.accounts_due, today).await?;
    create_obligation(
        &txn,
        &utr,
        ObligationKind::ConfirmationStatement,
        new.confirmation_due,
        today,
    )
    .await?;
    create_obligation(&txn, &utr, ObligationKind::PayRun, new.payroll_due, today).await?;
    if let Some(cis_due) = new.cis_due.filter(|_| new.cis_enabled) {
        create_obligation(&txn, &utr, ObligationKind::Cis, cis_due, today).await?;
    }
    if let Some(vat_due) = new.vat_due.filter(|_| new.vat_enabled) {
        create_obligation(&txn, &utr, ObligationKind::Vat, vat_due, today).await?;
    }

    txn.commit().await?;

    info!("Added company {} ({})", created.name, created.utr);
    Ok(created)
}

/// Finds a company by its business key.
pub async fn get_company(db: &DatabaseConnection, utr: &str) -> Result<Option<company::Model>> {
    Company::find_by_id(utr).one(db).await.map_err(Into::into)
}

/// Retrieves the whole portfolio, ordered alphabetically by name.
pub async fn list_companies(db: &DatabaseConnection) -> Result<Vec<company::Model>> {
    Company::find()
        .order_by_asc(company::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a company's descriptive fields. The business key is never
/// touched here; that goes through [`rename_company_key`].
pub async fn update_company_details(
    db: &DatabaseConnection,
    utr: &str,
    name: String,
    address: Option<String>,
    email: Option<String>,
    contact_number: Option<String>,
) -> Result<company::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Company name cannot be empty".to_string(),
        });
    }

    let current = Company::find_by_id(utr)
        .one(db)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: utr.to_string(),
        })?;

    let mut active: company::ActiveModel = current.into();
    active.name = Set(name.trim().to_string());
    active.address = Set(address);
    active.email = Set(email);
    active.contact_number = Set(contact_number);
    Ok(active.update(db).await?)
}

/// Turns a company's CIS and VAT filing on or off.
///
/// Enabling a kind the company does not yet file creates its obligation
/// (the matching due date is then mandatory); disabling one deletes the
/// obligation. Obligations of kinds that stay enabled are untouched. One
/// transaction covers the flag change and the obligation edits.
pub async fn set_company_flags(
    db: &DatabaseConnection,
    utr: &str,
    cis_enabled: bool,
    vat_enabled: bool,
    cis_due: Option<NaiveDate>,
    vat_due: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<company::Model> {
    let txn = db.begin().await?;

    let current = Company::find_by_id(utr)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: utr.to_string(),
        })?;

    toggle_kind(&txn, utr, ObligationKind::Cis, cis_enabled, cis_due, today).await?;
    toggle_kind(&txn, utr, ObligationKind::Vat, vat_enabled, vat_due, today).await?;

    let mut active: company::ActiveModel = current.into();
    active.cis_enabled = Set(cis_enabled);
    active.vat_enabled = Set(vat_enabled);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

async fn toggle_kind<C>(
    db: &C,
    utr: &str,
    kind: ObligationKind,
    enabled: bool,
    due: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = Obligation::find()
        .filter(obligation::Column::CompanyUtr.eq(utr))
        .filter(obligation::Column::Kind.eq(kind))
        .one(db)
        .await?;

    match (enabled, existing) {
        (true, None) => {
            let due = due.ok_or_else(|| Error::Validation {
                message: format!("enabling {kind} for {utr} requires a due date"),
            })?;
            create_obligation(db, utr, kind, due, today).await?;
        }
        (false, Some(row)) => {
            Obligation::delete_by_id(row.id).exec(db).await?;
        }
        // Already in the requested state
        (true, Some(_)) | (false, None) => {}
    }
    Ok(())
}

/// Removes a company and everything that hangs off it.
///
/// Obligations, employers, directors and file references are deleted with
/// the owner. Invoices are practice-level billing history, so their rows
/// survive with the company reference cleared. One transaction.
pub async fn delete_company(db: &DatabaseConnection, utr: &str) -> Result<()> {
    use sea_orm::sea_query::Expr;

    let txn = db.begin().await?;

    let company = Company::find_by_id(utr)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: utr.to_string(),
        })?;

    Obligation::delete_many()
        .filter(obligation::Column::CompanyUtr.eq(utr))
        .exec(&txn)
        .await?;
    Employer::delete_many()
        .filter(employer::Column::CompanyUtr.eq(utr))
        .exec(&txn)
        .await?;
    Director::delete_many()
        .filter(director::Column::CompanyUtr.eq(utr))
        .exec(&txn)
        .await?;
    FileRef::delete_many()
        .filter(file_ref::Column::CompanyUtr.eq(utr))
        .exec(&txn)
        .await?;
    Invoice::update_many()
        .col_expr(invoice::Column::CompanyUtr, Expr::value(None::<String>))
        .filter(invoice::Column::CompanyUtr.eq(utr))
        .exec(&txn)
        .await?;

    Company::delete_by_id(utr).exec(&txn).await?;

    txn.commit().await?;

    info!("Removed company {} ({utr})", company.name);
    Ok(())
}

/// Rewrites a company's business key everywhere it appears.
///
/// Preconditions: the new key is non-empty and differs from the old one,
/// the old key exists, and no other company already holds the new key.
/// All dependent tables are rewritten first and the owner row last, inside
/// one transaction, so a failure anywhere leaves every reference on the
/// old key.
pub async fn rename_company_key(
    db: &DatabaseConnection,
    old_utr: &str,
    new_utr: &str,
) -> Result<company::Model> {
    use sea_orm::sea_query::Expr;

    let new_utr = new_utr.trim();
    if new_utr.is_empty() {
        return Err(Error::Validation {
            message: "Company key cannot be empty".to_string(),
        });
    }
    if new_utr == old_utr {
        return Err(Error::Validation {
            message: format!("Company key is already {old_utr}"),
        });
    }

    let txn = db.begin().await?;

    Company::find_by_id(old_utr)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: old_utr.to_string(),
        })?;

    if Company::find_by_id(new_utr).one(&txn).await?.is_some() {
        return Err(Error::CompanyKeyInUse {
            utr: new_utr.to_string(),
        });
    }

    let obligations = Obligation::update_many()
        .col_expr(obligation::Column::CompanyUtr, Expr::value(new_utr))
        .filter(obligation::Column::CompanyUtr.eq(old_utr))
        .exec(&txn)
        .await?
        .rows_affected;
    let employers = Employer::update_many()
        .col_expr(employer::Column::CompanyUtr, Expr::value(new_utr))
        .filter(employer::Column::CompanyUtr.eq(old_utr))
        .exec(&txn)
        .await?
        .rows_affected;
    let directors = Director::update_many()
        .col_expr(director::Column::CompanyUtr, Expr::value(new_utr))
        .filter(director::Column::CompanyUtr.eq(old_utr))
        .exec(&txn)
        .await?
        .rows_affected;
    let files = FileRef::update_many()
        .col_expr(file_ref::Column::CompanyUtr, Expr::value(new_utr))
        .filter(file_ref::Column::CompanyUtr.eq(old_utr))
        .exec(&txn)
        .await?
        .rows_affected;
    let invoices = Invoice::update_many()
        .col_expr(invoice::Column::CompanyUtr, Expr::value(new_utr))
        .filter(invoice::Column::CompanyUtr.eq(old_utr))
        .exec(&txn)
        .await?
        .rows_affected;

    // Owner row last; dependents already point at the new key
    Company::update_many()
        .col_expr(company::Column::Utr, Expr::value(new_utr))
        .filter(company::Column::Utr.eq(old_utr))
        .exec(&txn)
        .await?;

    let renamed = Company::find_by_id(new_utr)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: new_utr.to_string(),
        })?;

    txn.commit().await?;

    info!(
        "Renamed company key {old_utr} -> {new_utr} \
         ({obligations} obligations, {employers} employers, {directors} directors, \
         {files} files, {invoices} invoices)"
    );
    Ok(renamed)
}

/// Records a payroll employee against a company.
pub async fn add_employer(
    db: &DatabaseConnection,
    utr: &str,
    name: String,
    start_date: NaiveDate,
) -> Result<employer::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Employer name cannot be empty".to_string(),
        });
    }
    require_company(db, utr).await?;

    let row = employer::ActiveModel {
        company_utr: Set(utr.to_string()),
        name: Set(name.trim().to_string()),
        start_date: Set(start_date),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Records a company officer against a company.
pub async fn add_director(
    db: &DatabaseConnection,
    utr: &str,
    name: String,
    email: Option<String>,
) -> Result<director::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Director name cannot be empty".to_string(),
        });
    }
    require_company(db, utr).await?;

    let row = director::ActiveModel {
        company_utr: Set(utr.to_string()),
        name: Set(name.trim().to_string()),
        email: Set(email),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Records a document reference against a company.
pub async fn add_file_ref(
    db: &DatabaseConnection,
    utr: &str,
    name: String,
    path: String,
) -> Result<file_ref::Model> {
    if name.trim().is_empty() || path.trim().is_empty() {
        return Err(Error::Validation {
            message: "File references need both a name and a path".to_string(),
        });
    }
    require_company(db, utr).await?;

    let row = file_ref::ActiveModel {
        company_utr: Set(utr.to_string()),
        name: Set(name.trim().to_string()),
        path: Set(path.trim().to_string()),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

async fn require_company(db: &DatabaseConnection, utr: &str) -> Result<company::Model> {
    Company::find_by_id(utr)
        .one(db)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: utr.to_string(),
        })
}
