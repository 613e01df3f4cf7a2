//! Internal practice tasks.
//!
//! Tasks are one-off jobs (a tax query, a reference letter) tracked
//! outside the statutory deadline cycle. They have no due dates; their
//! workflow status maps straight onto the attention buckets so they can
//! sit alongside obligations in the insight counts.

use crate::{
    entities::{Task, task},
    errors::{Error, Result},
    registry::Bucket,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a task in the `NotStarted` state, stamped with today's date.
pub async fn create_task(
    db: &DatabaseConnection,
    name: String,
    done_by: String,
    price: Option<f64>,
    today: NaiveDate,
) -> Result<task::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Task name cannot be empty".to_string(),
        });
    }
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidAmount { amount: price });
        }
    }

    let row = task::ActiveModel {
        name: Set(name.trim().to_string()),
        done_by: Set(done_by.trim().to_string()),
        status: Set(task::TaskStatus::NotStarted),
        date_added: Set(Some(today)),
        date_finished: Set(None),
        price: Set(price),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Moves a task to a new workflow status.
///
/// The first transition into a finished state (`Done` or `Paid`) stamps
/// the completion date; later transitions leave the original stamp alone
/// so reopening and re-closing a task does not rewrite history.
pub async fn set_task_status(
    db: &DatabaseConnection,
    task_id: i64,
    status: task::TaskStatus,
    today: NaiveDate,
) -> Result<task::Model> {
    let current = Task::find_by_id(task_id)
        .one(db)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;

    let stamp_finished = status.is_finished() && current.date_finished.is_none();

    let mut active: task::ActiveModel = current.into();
    active.status = Set(status);
    if stamp_finished {
        active.date_finished = Set(Some(today));
    }
    Ok(active.update(db).await?)
}

/// Finds a task by id.
pub async fn get_task(db: &DatabaseConnection, task_id: i64) -> Result<Option<task::Model>> {
    Task::find_by_id(task_id).one(db).await.map_err(Into::into)
}

/// Lists every task, open work first, newest additions at the top of
/// each group.
pub async fn list_tasks(db: &DatabaseConnection) -> Result<Vec<task::Model>> {
    let mut tasks = Task::find()
        .order_by_desc(task::Column::DateAdded)
        .all(db)
        .await?;
    tasks.sort_by_key(|t| t.status.is_finished());
    Ok(tasks)
}

/// Maps a task's workflow status onto the shared attention buckets.
///
/// Untouched work is the most pressing, so `NotStarted` lands in
/// `Overdue` and the scale climbs from there; `Done` counts as settled
/// and `Paid` as fully closed.
#[must_use]
pub fn task_bucket(status: task::TaskStatus) -> Bucket {
    match status {
        task::TaskStatus::NotStarted => Bucket::Overdue,
        task::TaskStatus::InProcess => Bucket::Urgent,
        task::TaskStatus::DetailsMissing => Bucket::Soon,
        task::TaskStatus::Done => Bucket::Early,
        task::TaskStatus::Paid => Bucket::Paid,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_task_bucket_mapping() {
        assert_eq!(task_bucket(task::TaskStatus::NotStarted), Bucket::Overdue);
        assert_eq!(task_bucket(task::TaskStatus::InProcess), Bucket::Urgent);
        assert_eq!(task_bucket(task::TaskStatus::DetailsMissing), Bucket::Soon);
        assert_eq!(task_bucket(task::TaskStatus::Done), Bucket::Early);
        assert_eq!(task_bucket(task::TaskStatus::Paid), Bucket::Paid);
    }

    #[tokio::test]
    async fn test_create_task() -> Result<()> {
        let db = setup_test_db().await?;

        let task = create_task(
            &db,
            "Draft reference letter".to_string(),
            "Priya".to_string(),
            Some(75.0),
            test_today(),
        )
        .await?;

        assert_eq!(task.status, task::TaskStatus::NotStarted);
        assert_eq!(task.date_added, Some(test_today()));
        assert_eq!(task.date_finished, None);
        assert_eq!(task.price, Some(75.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_task_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let blank = create_task(
            &db,
            "  ".to_string(),
            "Priya".to_string(),
            None,
            test_today(),
        )
        .await;
        assert!(matches!(blank.unwrap_err(), Error::Validation { .. }));

        let negative = create_task(
            &db,
            "Draft reference letter".to_string(),
            "Priya".to_string(),
            Some(-10.0),
            test_today(),
        )
        .await;
        assert!(matches!(
            negative.unwrap_err(),
            Error::InvalidAmount { amount } if amount == -10.0
        ));

        let nan = create_task(
            &db,
            "Draft reference letter".to_string(),
            "Priya".to_string(),
            Some(f64::NAN),
            test_today(),
        )
        .await;
        assert!(matches!(nan.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_task_status_stamps_first_finish() -> Result<()> {
        let db = setup_test_db().await?;
        let task = create_test_task(&db, "Quarterly review").await?;

        let in_process =
            set_task_status(&db, task.id, task::TaskStatus::InProcess, test_today()).await?;
        assert_eq!(in_process.status, task::TaskStatus::InProcess);
        assert_eq!(in_process.date_finished, None);

        let finish_day = test_today() + chrono::Duration::days(3);
        let done = set_task_status(&db, task.id, task::TaskStatus::Done, finish_day).await?;
        assert_eq!(done.date_finished, Some(finish_day));

        // Moving on to Paid later keeps the original completion date
        let paid_day = finish_day + chrono::Duration::days(14);
        let paid = set_task_status(&db, task.id, task::TaskStatus::Paid, paid_day).await?;
        assert_eq!(paid.status, task::TaskStatus::Paid);
        assert_eq!(paid.date_finished, Some(finish_day));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_task_status_missing_task() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_task_status(&db, 424_242, task::TaskStatus::Done, test_today()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TaskNotFound { id: 424_242 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_tasks_open_work_first() -> Result<()> {
        let db = setup_test_db().await?;

        let finished = create_test_task(&db, "Closed query").await?;
        set_task_status(&db, finished.id, task::TaskStatus::Paid, test_today()).await?;
        create_test_task(&db, "Open query").await?;

        let listed = list_tasks(&db).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Open query");
        assert_eq!(listed[1].name, "Closed query");

        Ok(())
    }
}
