//! Submission and lifecycle of proposals.

pub mod fields;
mod recycle_bin;
mod service;

pub use fields::{REQUIRED_FIELDS, build_content, missing_fields};
pub use recycle_bin::RecycleBin;
pub use service::ProposalService;
