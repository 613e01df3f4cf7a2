//! Obligation flag and rollover state machine.
//!
//! An obligation accumulates sign-off flags while its period is being
//! worked; once every flag its kind requires is set, it is ready to roll.
//! Confirming the rollover advances the due date by exactly one kind
//! period, clears the flags, and reclassifies the status from the new
//! date. Every mutation here runs in its own database transaction and the
//! status recompute rides inside it.

use crate::{
    core::status::{classify, presentation_order},
    entities::{Company, Obligation, obligation},
    errors::{Error, Result},
    registry::{FlagName, ObligationKind},
};
use chrono::{Months, NaiveDate};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Result of mutating a single sign-off flag.
#[derive(Debug, Clone)]
pub struct FlagUpdate {
    /// The obligation after the mutation
    pub obligation: obligation::Model,
    /// Whether every required flag is now set, i.e. the caller should
    /// offer the rollover confirmation prompt
    pub ready_to_roll: bool,
}

/// Per-kind summary of a bulk status sweep.
#[derive(Debug, Clone)]
pub struct KindSweep {
    /// The kind this summary covers
    pub kind: ObligationKind,
    /// Obligations examined
    pub checked: usize,
    /// Obligations whose stored status was stale and got rewritten
    pub changed: usize,
}

/// Result of sweeping stored statuses across every kind.
#[derive(Debug, Clone)]
pub struct StatusSweep {
    /// Per-kind detail in registry order
    pub kinds: Vec<KindSweep>,
    /// Total obligations examined
    pub total_checked: usize,
    /// Total statuses rewritten
    pub total_changed: usize,
    /// The date the sweep classified against
    pub run_date: NaiveDate,
}

/// Reads one sign-off flag from a model.
#[must_use]
pub const fn flag_value(model: &obligation::Model, flag: FlagName) -> bool {
    match flag {
        FlagName::AdvisorySent => model.advisory_sent,
        FlagName::InvoiceRaised => model.invoice_raised,
        FlagName::WorkCompleted => model.work_completed,
    }
}

/// Whether every flag the kind requires is set, i.e. the obligation is in
/// the ready-to-roll state rather than pending.
#[must_use]
pub fn flags_complete(model: &obligation::Model) -> bool {
    model
        .kind
        .spec()
        .required_flags
        .iter()
        .all(|flag| flag_value(model, *flag))
}

fn apply_flag(active: &mut obligation::ActiveModel, flag: FlagName, value: bool) {
    match flag {
        FlagName::AdvisorySent => active.advisory_sent = Set(value),
        FlagName::InvoiceRaised => active.invoice_raised = Set(value),
        FlagName::WorkCompleted => active.work_completed = Set(value),
    }
}

const fn flag_column(flag: FlagName) -> obligation::Column {
    match flag {
        FlagName::AdvisorySent => obligation::Column::AdvisorySent,
        FlagName::InvoiceRaised => obligation::Column::InvoiceRaised,
        FlagName::WorkCompleted => obligation::Column::WorkCompleted,
    }
}

fn advance_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| Error::Validation {
            message: format!("cannot advance {date} by {months} months"),
        })
}

fn retreat_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| Error::Validation {
            message: format!("cannot retreat {date} by {months} months"),
        })
}

/// Creates the live obligation of `kind` for a company.
///
/// Enforces the one-live-obligation-per-kind invariant and classifies the
/// row immediately. For period-tracking kinds the initial `period_start`
/// is derived as one period before the due date so windows are contiguous
/// from the start. Usable inside a caller's transaction.
pub async fn create_obligation<C>(
    db: &C,
    company_utr: &str,
    kind: ObligationKind,
    due_date: NaiveDate,
    today: NaiveDate,
) -> Result<obligation::Model>
where
    C: ConnectionTrait,
{
    let _company = Company::find_by_id(company_utr)
        .one(db)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: company_utr.to_string(),
        })?;

    let existing = Obligation::find()
        .filter(obligation::Column::CompanyUtr.eq(company_utr))
        .filter(obligation::Column::Kind.eq(kind))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::ObligationExists {
            utr: company_utr.to_string(),
            kind,
        });
    }

    let spec = kind.spec();
    let period_start = if spec.tracks_period_start {
        Some(retreat_months(due_date, spec.period_months)?)
    } else {
        None
    };

    let row = obligation::ActiveModel {
        company_utr: Set(company_utr.to_string()),
        kind: Set(kind),
        due_date: Set(due_date),
        period_start: Set(period_start),
        status: Set(classify(kind, due_date, today)),
        advisory_sent: Set(false),
        invoice_raised: Set(false),
        work_completed: Set(false),
        ..Default::default()
    };

    Ok(row.insert(db).await?)
}

/// Finds an obligation by its unique ID.
pub async fn get_obligation(
    db: &DatabaseConnection,
    obligation_id: i64,
) -> Result<Option<obligation::Model>> {
    Obligation::find_by_id(obligation_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a company's obligation of a given kind, if it has one.
pub async fn get_for_company(
    db: &DatabaseConnection,
    company_utr: &str,
    kind: ObligationKind,
) -> Result<Option<obligation::Model>> {
    Obligation::find()
        .filter(obligation::Column::CompanyUtr.eq(company_utr))
        .filter(obligation::Column::Kind.eq(kind))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every obligation of one kind in presentation order: most pressing
/// status first, then earliest due date.
pub async fn list_by_kind(
    db: &DatabaseConnection,
    kind: ObligationKind,
) -> Result<Vec<obligation::Model>> {
    let mut rows = Obligation::find()
        .filter(obligation::Column::Kind.eq(kind))
        .all(db)
        .await?;

    rows.sort_by(|a, b| presentation_order((a.status, a.due_date), (b.status, b.due_date)));
    Ok(rows)
}

/// Sets or clears one sign-off flag and reports whether the obligation is
/// now ready to roll.
///
/// The flag must belong to the kind's checklist and the owning company
/// must still exist. Readiness is recomputed on every call, so completing
/// the checklist a second time after a declined rollover signals again.
pub async fn set_flag(
    db: &DatabaseConnection,
    obligation_id: i64,
    flag: FlagName,
    value: bool,
) -> Result<FlagUpdate> {
    let txn = db.begin().await?;

    let current = Obligation::find_by_id(obligation_id)
        .one(&txn)
        .await?
        .ok_or(Error::ObligationNotFound { id: obligation_id })?;

    let _company = Company::find_by_id(current.company_utr.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: current.company_utr.clone(),
        })?;

    if !current.kind.requires(flag) {
        return Err(Error::FlagNotTracked {
            kind: current.kind,
            flag,
        });
    }

    let kind = current.kind;
    let mut active: obligation::ActiveModel = current.into();
    apply_flag(&mut active, flag, value);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    let ready_to_roll = flags_complete(&updated);
    debug!(
        "Set {flag}={value} on {kind} obligation {}; ready_to_roll={ready_to_roll}",
        updated.id
    );

    Ok(FlagUpdate {
        obligation: updated,
        ready_to_roll,
    })
}

/// Rolls an obligation forward into its next filing period.
///
/// Requires every flag the kind tracks to be set. Advances the due date by
/// exactly one kind period (month-end dates clamp, so 31 January plus one
/// month lands on the last day of February), moves `period_start` up to
/// the old due date for period-tracking kinds, clears all sign-off flags,
/// and reclassifies the status from the new due date. All in one
/// transaction; on any failure the obligation is untouched.
pub async fn confirm_rollover(
    db: &DatabaseConnection,
    obligation_id: i64,
    today: NaiveDate,
) -> Result<obligation::Model> {
    let txn = db.begin().await?;

    let current = Obligation::find_by_id(obligation_id)
        .one(&txn)
        .await?
        .ok_or(Error::ObligationNotFound { id: obligation_id })?;

    let _company = Company::find_by_id(current.company_utr.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            utr: current.company_utr.clone(),
        })?;

    if !flags_complete(&current) {
        return Err(Error::RolloverNotReady {
            id: current.id,
            kind: current.kind,
        });
    }

    let spec = current.kind.spec();
    let old_due = current.due_date;
    let new_due = advance_months(old_due, spec.period_months)?;
    let new_status = classify(current.kind, new_due, today);
    let kind = current.kind;

    let mut active: obligation::ActiveModel = current.into();
    active.due_date = Set(new_due);
    if spec.tracks_period_start {
        // The finished period's deadline becomes the next period's start,
        // keeping windows contiguous even when confirmation happens late.
        active.period_start = Set(Some(old_due));
    }
    active.status = Set(new_status);
    active.advisory_sent = Set(false);
    active.invoice_raised = Set(false);
    active.work_completed = Set(false);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        "Rolled {kind} obligation {}: due {old_due} -> {new_due}, status {new_status}",
        updated.id
    );
    Ok(updated)
}

/// Reclassifies one obligation against `today` and stores the result if it
/// changed.
pub async fn recompute_status(
    db: &DatabaseConnection,
    obligation_id: i64,
    today: NaiveDate,
) -> Result<obligation::Model> {
    let current = Obligation::find_by_id(obligation_id)
        .one(db)
        .await?
        .ok_or(Error::ObligationNotFound { id: obligation_id })?;

    let fresh = classify(current.kind, current.due_date, today);
    if fresh == current.status {
        return Ok(current);
    }

    let mut active: obligation::ActiveModel = current.into();
    active.status = Set(fresh);
    Ok(active.update(db).await?)
}

/// Sweeps every obligation of every kind, rewriting stale stored statuses.
///
/// Runs one transaction per kind, so a failure partway leaves earlier
/// kinds committed and later kinds untouched.
pub async fn run_status_check(db: &DatabaseConnection, today: NaiveDate) -> Result<StatusSweep> {
    let mut kinds = Vec::new();
    let mut total_checked = 0;
    let mut total_changed = 0;

    for kind in ObligationKind::ALL {
        let txn = db.begin().await?;

        let rows = Obligation::find()
            .filter(obligation::Column::Kind.eq(kind))
            .all(&txn)
            .await?;

        let checked = rows.len();
        let mut changed = 0;
        for row in rows {
            let fresh = classify(kind, row.due_date, today);
            if fresh != row.status {
                let mut active: obligation::ActiveModel = row.into();
                active.status = Set(fresh);
                active.update(&txn).await?;
                changed += 1;
            }
        }

        txn.commit().await?;

        debug!("Status check for {kind}: {checked} checked, {changed} restated");
        total_checked += checked;
        total_changed += changed;
        kinds.push(KindSweep {
            kind,
            checked,
            changed,
        });
    }

    info!("Status sweep complete: {total_checked} checked, {total_changed} restated");
    Ok(StatusSweep {
        kinds,
        total_checked,
        total_changed,
        run_date: today,
    })
}

/// Clears one sign-off flag across every obligation of a kind, e.g. the
/// year-end reset of a payroll checklist item. Returns how many rows
/// actually had the flag set.
pub async fn clear_flag_for_kind(
    db: &DatabaseConnection,
    kind: ObligationKind,
    flag: FlagName,
) -> Result<u64> {
    use sea_orm::sea_query::Expr;

    if !kind.requires(flag) {
        return Err(Error::FlagNotTracked { kind, flag });
    }

    let column = flag_column(flag);
    let result = Obligation::update_many()
        .col_expr(column, Expr::value(false))
        .filter(obligation::Column::Kind.eq(kind))
        .filter(column.eq(true))
        .exec(db)
        .await?;

    info!(
        "Cleared {flag} on {} {kind} obligations",
        result.rows_affected
    );
    Ok(result.rows_affected)
}
