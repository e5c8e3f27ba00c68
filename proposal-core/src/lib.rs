pub mod calculations;
pub mod db;
pub mod error;
pub mod models;
pub mod proposal;

pub use calculations::{LedgerField, QuotationLedger, QuotationTotals};
pub use db::repository::{ProposalRepository, RepositoryError};
pub use error::{ProposalError, ValidationError};
pub use models::*;
pub use proposal::{ProposalService, RecycleBin};
