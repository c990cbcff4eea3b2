pub mod inventory;
pub mod loan_store;
pub mod member_directory;

pub use inventory::MemoryInventory;
pub use loan_store::MemoryLoanStore;
pub use member_directory::MemoryMemberDirectory;
