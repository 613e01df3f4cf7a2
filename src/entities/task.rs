//! Task entity - An ad-hoc piece of work tracked outside the obligation
//! lifecycle.
//!
//! Tasks move through a five-state manual workflow rather than being
//! classified from a due date. The insights aggregator maps each state
//! onto a tally bucket.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow state of a task. Stored as strings in the `tasks.status` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TaskStatus {
    /// Work has not begun
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    /// Work is underway
    #[sea_orm(string_value = "in_process")]
    InProcess,
    /// Blocked waiting on information from the client
    #[sea_orm(string_value = "details_missing")]
    DetailsMissing,
    /// Work is finished
    #[sea_orm(string_value = "done")]
    Done,
    /// Finished and the fee has been collected
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl TaskStatus {
    /// Whether the task has reached a terminal state.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Paid)
    }
}

/// Task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// What the task is
    pub name: String,
    /// Who the work is assigned to
    pub done_by: String,
    /// Current workflow state
    pub status: TaskStatus,
    /// When the task was created
    pub date_added: Option<Date>,
    /// When the task reached a terminal state
    pub date_finished: Option<Date>,
    /// Agreed fee, if priced
    pub price: Option<f64>,
}

/// Tasks are practice-level and reference no other entity
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
