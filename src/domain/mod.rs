pub mod commands;
pub mod errors;
pub mod loan;
pub mod staging;
pub mod value_objects;

pub use errors::*;
pub use loan::{DisplayStatus, Loan, LoanItem, LoanStatus};
pub use staging::{BookSnapshot, DraftError, LoanDraft, LoanItemRequest, QuantityOutcome};
pub use value_objects::*;
