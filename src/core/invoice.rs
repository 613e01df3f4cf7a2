//! Practice invoices.
//!
//! Invoices bill clients for work done. They optionally reference a
//! company by business key; the reference is advisory and survives as
//! `None` when the company is later removed. Two flags, sent and paid,
//! drive the insight bucket: an invoice never reaches `Urgent`, it jumps
//! straight from untouched to done.

use crate::{
    entities::{Company, Invoice, invoice},
    errors::{Error, Result},
    registry::Bucket,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Raises an invoice, optionally tied to a company.
///
/// The company reference is validated at creation time so a typo in the
/// key is caught here rather than surfacing as a silent orphan.
pub async fn create_invoice(
    db: &DatabaseConnection,
    company_utr: Option<String>,
    description: String,
    date: Option<NaiveDate>,
    amount: Option<f64>,
) -> Result<invoice::Model> {
    if description.trim().is_empty() {
        return Err(Error::Validation {
            message: "Invoice description cannot be empty".to_string(),
        });
    }
    if let Some(amount) = amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if let Some(utr) = &company_utr {
        Company::find_by_id(utr)
            .one(db)
            .await?
            .ok_or_else(|| Error::CompanyNotFound { utr: utr.clone() })?;
    }

    let row = invoice::ActiveModel {
        company_utr: Set(company_utr),
        description: Set(description.trim().to_string()),
        date: Set(date),
        amount: Set(amount),
        sent: Set(false),
        paid: Set(false),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Sets an invoice's sent and paid flags.
pub async fn set_invoice_flags(
    db: &DatabaseConnection,
    invoice_id: i64,
    sent: bool,
    paid: bool,
) -> Result<invoice::Model> {
    let current = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let mut active: invoice::ActiveModel = current.into();
    active.sent = Set(sent);
    active.paid = Set(paid);
    Ok(active.update(db).await?)
}

/// Finds an invoice by id.
pub async fn get_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
) -> Result<Option<invoice::Model>> {
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every invoice, most recent billing date first.
pub async fn list_invoices(db: &DatabaseConnection) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .order_by_desc(invoice::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Maps an invoice's flag pair onto the shared attention buckets.
///
/// Neither flag set means the invoice needs chasing (`Overdue`); exactly
/// one set means it is mid-flight (`Soon`); both set means the money is
/// in (`Early`). No flag combination lands in `Urgent` or `Paid`.
#[must_use]
pub fn invoice_bucket(sent: bool, paid: bool) -> Bucket {
    match (sent, paid) {
        (false, false) => Bucket::Overdue,
        (true, true) => Bucket::Early,
        (true, false) | (false, true) => Bucket::Soon,
    }
}
