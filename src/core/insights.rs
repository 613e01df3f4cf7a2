//! Portfolio insight snapshots.
//!
//! Each snapshot row counts one category's records by attention bucket
//! for one calendar month. The current month is always recomputed from
//! the underlying rows on read and the result written back, so the live
//! row tracks reality; once the month has passed the stored row becomes
//! the permanent record and is served verbatim.

use crate::{
    core::{invoice::invoice_bucket, status::classify, task::task_bucket},
    entities::{
        InsightCategory, InsightSnapshot, Invoice, Obligation, Task, insight_snapshot, obligation,
    },
    errors::{Error, Result},
    registry::Bucket,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Bucket counters for one category in one month.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    early: i32,
    soon: i32,
    urgent: i32,
    overdue: i32,
    paid: i32,
}

impl Tally {
    fn add(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Early => self.early += 1,
            Bucket::Soon => self.soon += 1,
            Bucket::Urgent => self.urgent += 1,
            Bucket::Overdue => self.overdue += 1,
            Bucket::Paid => self.paid += 1,
        }
    }

    const fn total(&self) -> i32 {
        self.early + self.soon + self.urgent + self.overdue + self.paid
    }
}

// Calendar months fit comfortably in i32
#[allow(clippy::cast_possible_wrap)]
fn snapshot_key(today: NaiveDate) -> (i32, i32) {
    (today.month() as i32, today.year())
}

/// Whether `(month, year)` is the month `today` falls in, i.e. the one
/// month whose counts are recomputed on every read.
#[must_use]
pub fn is_live(month: i32, year: i32, today: NaiveDate) -> bool {
    snapshot_key(today) == (month, year)
}

/// Counts one category's rows by bucket, classifying deadline-backed
/// categories fresh against `today` rather than trusting the stored
/// status column.
async fn tally_category<C>(db: &C, category: InsightCategory, today: NaiveDate) -> Result<Tally>
where
    C: ConnectionTrait,
{
    let mut tally = Tally::default();

    if let Some(kind) = category.obligation_kind() {
        let rows = Obligation::find()
            .filter(obligation::Column::Kind.eq(kind))
            .all(db)
            .await?;
        for row in rows {
            tally.add(Bucket::from(classify(kind, row.due_date, today)));
        }
    } else if category == InsightCategory::Task {
        for row in Task::find().all(db).await? {
            tally.add(task_bucket(row.status));
        }
    } else {
        for row in Invoice::find().all(db).await? {
            tally.add(invoice_bucket(row.sent, row.paid));
        }
    }

    Ok(tally)
}

/// Returns the snapshot for one category and month.
///
/// For the live month the counts are recomputed from the source rows and
/// written back through the usual find-then-update-or-insert, so the
/// caller and the stored row always agree; a category with nothing to
/// count yields `None` and writes nothing. For any other month the
/// stored row is returned as-is, or `None` if that month was never
/// captured.
pub async fn get_counts(
    db: &DatabaseConnection,
    category: InsightCategory,
    month: i32,
    year: i32,
    today: NaiveDate,
) -> Result<Option<insight_snapshot::Model>> {
    if !(1..=12).contains(&month) || year < 1 {
        return Err(Error::Validation {
            message: format!("{month}/{year} is not a valid snapshot month"),
        });
    }

    if !is_live(month, year, today) {
        return InsightSnapshot::find()
            .filter(insight_snapshot::Column::Category.eq(category))
            .filter(insight_snapshot::Column::Month.eq(month))
            .filter(insight_snapshot::Column::Year.eq(year))
            .one(db)
            .await
            .map_err(Into::into);
    }

    let txn = db.begin().await?;

    let tally = tally_category(&txn, category, today).await?;
    if tally.total() == 0 {
        txn.commit().await?;
        return Ok(None);
    }

    let existing = InsightSnapshot::find()
        .filter(insight_snapshot::Column::Category.eq(category))
        .filter(insight_snapshot::Column::Month.eq(month))
        .filter(insight_snapshot::Column::Year.eq(year))
        .one(&txn)
        .await?;

    let saved = match existing {
        Some(row) => {
            let mut active: insight_snapshot::ActiveModel = row.into();
            active.early_count = Set(tally.early);
            active.soon_count = Set(tally.soon);
            active.urgent_count = Set(tally.urgent);
            active.overdue_count = Set(tally.overdue);
            active.paid_count = Set(tally.paid);
            active.total_count = Set(tally.total());
            active.update(&txn).await?
        }
        None => {
            insight_snapshot::ActiveModel {
                category: Set(category),
                month: Set(month),
                year: Set(year),
                early_count: Set(tally.early),
                soon_count: Set(tally.soon),
                urgent_count: Set(tally.urgent),
                overdue_count: Set(tally.overdue),
                paid_count: Set(tally.paid),
                total_count: Set(tally.total()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;
    Ok(Some(saved))
}

/// One category's contribution to a refresh run.
#[derive(Debug, Clone)]
pub struct CategoryRefresh {
    /// Category whose snapshot was rewritten
    pub category: InsightCategory,
    /// Records counted for the category this month
    pub total: i32,
}

/// Result of refreshing every category for the current month.
#[derive(Debug, Clone)]
pub struct RefreshSummary {
    /// Categories that had rows to count, in refresh order
    pub refreshed: Vec<CategoryRefresh>,
    /// Categories skipped because nothing was on the books for them
    pub skipped_empty: usize,
    /// Month the snapshots cover
    pub month: i32,
    /// Year the snapshots cover
    pub year: i32,
}

/// Recomputes the current month's snapshot for every category.
///
/// Each category runs in its own transaction, so one failing category
/// does not take down counts already captured for the others.
pub async fn refresh_all(db: &DatabaseConnection, today: NaiveDate) -> Result<RefreshSummary> {
    let (month, year) = snapshot_key(today);
    let mut refreshed = Vec::new();
    let mut skipped_empty = 0;

    for category in InsightCategory::ALL {
        match get_counts(db, category, month, year, today).await? {
            Some(snapshot) => refreshed.push(CategoryRefresh {
                category,
                total: snapshot.total_count,
            }),
            None => {
                debug!("No {} rows to count, skipping its snapshot", category);
                skipped_empty += 1;
            }
        }
    }

    info!(
        "Refreshed {} insight snapshots for {month}/{year} ({} empty categories skipped)",
        refreshed.len(),
        skipped_empty
    );
    Ok(RefreshSummary {
        refreshed,
        skipped_empty,
        month,
        year,
    })
}

/// Refreshes every snapshot when the month is drawing to a close.
///
/// From the 27th onward each run rewrites the current month's counts, so
/// whatever the final run of the month captures becomes that month's
/// permanent record. Earlier in the month this does nothing.
pub async fn auto_close_out(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Option<RefreshSummary>> {
    if today.day() >= 27 {
        Ok(Some(refresh_all(db, today).await?))
    } else {
        debug!("Day {} is before the close-out window", today.day());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::task::{create_task, set_task_status};
    use crate::entities::task::TaskStatus;
    use crate::registry::{ObligationKind, Status};
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_get_counts_validates_month_and_year() -> Result<()> {
        let db = setup_test_db().await?;

        for (month, year) in [(0, 2025), (13, 2025), (3, 0)] {
            let result =
                get_counts(&db, InsightCategory::Account, month, year, test_today()).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_live_counts_are_computed_and_persisted() -> Result<()> {
        let db = setup_test_db().await?;
        create_full_company(&db, "1111111111").await?;

        // CIS deadline sits five days out
        let snapshot = get_counts(&db, InsightCategory::Cis, 3, 2025, test_today())
            .await?
            .unwrap();
        assert_eq!(snapshot.soon_count, 1);
        assert_eq!(snapshot.early_count, 0);
        assert_eq!(snapshot.paid_count, 0);
        assert_eq!(snapshot.total_count, 1);

        // The row was written back
        let stored = InsightSnapshot::find().all(&db).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].category, InsightCategory::Cis);
        assert_eq!(stored[0].month, 3);
        assert_eq!(stored[0].year, 2025);

        Ok(())
    }

    #[tokio::test]
    async fn test_live_counts_rewrite_one_row() -> Result<()> {
        let db = setup_test_db().await?;
        create_full_company(&db, "1111111111").await?;

        let first = get_counts(&db, InsightCategory::Vat, 3, 2025, test_today())
            .await?
            .unwrap();
        let second = get_counts(&db, InsightCategory::Vat, 3, 2025, test_today())
            .await?
            .unwrap();

        assert_eq!(first.urgent_count, second.urgent_count);
        assert_eq!(first.total_count, second.total_count);
        assert_eq!(InsightSnapshot::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_live_counts_ignore_stored_status() -> Result<()> {
        let db = setup_test_db().await?;
        create_full_company(&db, "1111111111").await?;

        // Corrupt the stored status; the tally must not believe it
        let vat = find_obligation(&db, "1111111111", ObligationKind::Vat).await?;
        let mut active: obligation::ActiveModel = vat.into();
        active.status = Set(Status::Early);
        active.update(&db).await?;

        let snapshot = get_counts(&db, InsightCategory::Vat, 3, 2025, test_today())
            .await?
            .unwrap();
        assert_eq!(snapshot.urgent_count, 1);
        assert_eq!(snapshot.early_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_live_category_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let counts = get_counts(&db, InsightCategory::Task, 3, 2025, test_today()).await?;
        assert!(counts.is_none());
        assert_eq!(InsightSnapshot::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_past_month_reads_stored_row_verbatim() -> Result<()> {
        let db = setup_test_db().await?;

        // A January capture predating all current obligations
        insight_snapshot::ActiveModel {
            category: Set(InsightCategory::Account),
            month: Set(1),
            year: Set(2025),
            early_count: Set(4),
            soon_count: Set(2),
            urgent_count: Set(1),
            overdue_count: Set(0),
            paid_count: Set(0),
            total_count: Set(7),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        create_full_company(&db, "1111111111").await?;

        let january = get_counts(&db, InsightCategory::Account, 1, 2025, test_today())
            .await?
            .unwrap();
        assert_eq!(january.early_count, 4);
        assert_eq!(january.total_count, 7);

        // A month never captured stays absent rather than reading as zeros
        let february = get_counts(&db, InsightCategory::Account, 2, 2025, test_today()).await?;
        assert!(february.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_task_and_invoice_categories_tally_by_state() -> Result<()> {
        let db = setup_test_db().await?;

        let open = create_task(
            &db,
            "Chase VAT receipts".to_string(),
            "Priya".to_string(),
            None,
            test_today(),
        )
        .await?;
        set_task_status(&db, open.id, TaskStatus::InProcess, test_today()).await?;
        let settled = create_test_task(&db, "Reference letter").await?;
        set_task_status(&db, settled.id, TaskStatus::Paid, test_today()).await?;

        let tasks = get_counts(&db, InsightCategory::Task, 3, 2025, test_today())
            .await?
            .unwrap();
        assert_eq!(tasks.urgent_count, 1);
        assert_eq!(tasks.paid_count, 1);
        assert_eq!(tasks.total_count, 2);

        let unsent = create_test_invoice(&db, None, "Consultation").await?;
        crate::core::invoice::set_invoice_flags(&db, unsent.id, true, false).await?;
        create_test_invoice(&db, None, "Second consultation").await?;

        let invoices = get_counts(&db, InsightCategory::Invoice, 3, 2025, test_today())
            .await?
            .unwrap();
        assert_eq!(invoices.soon_count, 1);
        assert_eq!(invoices.overdue_count, 1);
        assert_eq!(invoices.urgent_count, 0);
        assert_eq!(invoices.total_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_all_covers_every_category() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_company(&db, "1111111111").await?;
        create_test_task(&db, "Reference letter").await?;

        let summary = refresh_all(&db, test_today()).await?;

        assert_eq!(summary.month, 3);
        assert_eq!(summary.year, 2025);
        // Account, ConfirmationStatement, PayRun and Task had rows;
        // CIS, VAT and Invoice had nothing on the books
        assert_eq!(summary.refreshed.len(), 4);
        assert_eq!(summary.skipped_empty, 3);
        for refresh in &summary.refreshed {
            assert_eq!(refresh.total, 1);
        }
        assert_eq!(InsightSnapshot::find().count(&db).await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_auto_close_out_waits_for_month_end() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_company(&db, "1111111111").await?;

        let early_in_month = auto_close_out(&db, test_today()).await?;
        assert!(early_in_month.is_none());
        assert_eq!(InsightSnapshot::find().count(&db).await?, 0);

        let closing = auto_close_out(&db, date(2025, 3, 28)).await?.unwrap();
        assert_eq!(closing.month, 3);
        assert!(!closing.refreshed.is_empty());
        assert!(InsightSnapshot::find().count(&db).await? > 0);

        Ok(())
    }
}
