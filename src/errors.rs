//! Unified error types and result handling.
//!
//! All fallible operations return the crate-wide [`Result`] alias. Storage
//! failures convert from `sea_orm::DbErr` automatically; domain failures
//! carry enough context to tell the caller which record was involved.
//! Errors are scoped to the operation that raised them and never retried.

use crate::registry::{FlagName, ObligationKind};
use thiserror::Error;

/// All error conditions the engine can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input failed domain validation
    #[error("Validation error: {message}")]
    Validation {
        /// What was rejected and why
        message: String,
    },

    /// A monetary amount was negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No company holds the given business key
    #[error("Company not found: {utr}")]
    CompanyNotFound {
        /// The business key that was looked up
        utr: String,
    },

    /// Another company already holds the given business key
    #[error("Company key already in use: {utr}")]
    CompanyKeyInUse {
        /// The conflicting business key
        utr: String,
    },

    /// The company already has a live obligation of this kind
    #[error("Company {utr} already has a {kind} obligation")]
    ObligationExists {
        /// Owning company's business key
        utr: String,
        /// The duplicated kind
        kind: ObligationKind,
    },

    /// No obligation with the given id
    #[error("Obligation not found: {id}")]
    ObligationNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Rollover was confirmed before every required sign-off flag was set
    #[error("{kind} obligation {id} is not ready to roll over")]
    RolloverNotReady {
        /// Obligation id
        id: i64,
        /// Obligation kind
        kind: ObligationKind,
    },

    /// The flag is not part of the kind's sign-off checklist
    #[error("{kind} obligations do not track the {flag} flag")]
    FlagNotTracked {
        /// Obligation kind
        kind: ObligationKind,
        /// The rejected flag
        flag: FlagName,
    },

    /// No task with the given id
    #[error("Task not found: {id}")]
    TaskNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No invoice with the given id
    #[error("Invoice not found: {id}")]
    InvoiceNotFound {
        /// The id that was looked up
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
