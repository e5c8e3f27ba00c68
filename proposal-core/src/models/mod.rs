mod draft;
pub(crate) mod line_item;
mod projection;
mod proposal;

pub use draft::ProposalDraft;
pub use line_item::LineItem;
pub use projection::{ProjectionDirection, ProjectionInput, ProjectionPoint};
pub use proposal::{
    ClientDetails, ExtraFieldValue, ExtraFields, LifecycleState, Proposal, ProposalContent,
    SystemDetails,
};
