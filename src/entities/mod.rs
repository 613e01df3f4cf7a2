//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod company;
pub mod director;
pub mod employer;
pub mod file_ref;
pub mod insight_snapshot;
pub mod invoice;
pub mod obligation;
pub mod task;

// Re-export specific types to avoid conflicts
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use director::{Column as DirectorColumn, Entity as Director, Model as DirectorModel};
pub use employer::{Column as EmployerColumn, Entity as Employer, Model as EmployerModel};
pub use file_ref::{Column as FileRefColumn, Entity as FileRef, Model as FileRefModel};
pub use insight_snapshot::{
    Column as InsightSnapshotColumn, Entity as InsightSnapshot, InsightCategory,
    Model as InsightSnapshotModel,
};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel};
pub use obligation::{Column as ObligationColumn, Entity as Obligation, Model as ObligationModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel, TaskStatus};
