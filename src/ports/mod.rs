pub mod book_catalog;
pub mod inventory_ledger;
pub mod loan_store;
pub mod member_directory;

pub use book_catalog::BookCatalog;
pub use inventory_ledger::{InventoryError, InventoryLedger};
pub use loan_store::{LoanStore, LoanSummary};
pub use member_directory::{Member, MemberDirectory};
