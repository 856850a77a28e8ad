pub mod accounts;
pub mod bank;
pub mod customers;
pub mod error;
pub mod journal;
pub mod money;
pub mod orchestrator;

pub use accounts::Account;
pub use bank::Bank;
pub use customers::{AccountNumbers, Customer};
pub use error::{BankError, ValidationError};
pub use journal::JournalEntry;
pub use orchestrator::run;
