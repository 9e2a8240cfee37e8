//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod attendance;
pub mod ledger_entry;
pub mod message;
pub mod mission;
pub mod mission_submission;
pub mod product;
pub mod purchase;
pub mod training_session;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel, Role};
pub use attendance::{Column as AttendanceColumn, Entity as Attendance, Model as AttendanceModel};
pub use ledger_entry::{
    Column as LedgerEntryColumn, Entity as LedgerEntry, Model as LedgerEntryModel, TokenType,
};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use mission::{
    Column as MissionColumn, Entity as Mission, MissionCategory, Model as MissionModel,
};
pub use mission_submission::{
    Column as MissionSubmissionColumn, Entity as MissionSubmission,
    Model as MissionSubmissionModel, SubmissionStatus,
};
pub use product::{
    Column as ProductColumn, Entity as Product, Model as ProductModel, ProductCategory,
};
pub use purchase::{
    Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel, PurchaseStatus,
};
pub use training_session::{
    Column as TrainingSessionColumn, Entity as TrainingSession, Model as TrainingSessionModel,
};
