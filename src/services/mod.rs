pub mod agreement_filter;
pub mod agreement_service;

pub use agreement_filter::AgreementSearchFilter;
pub use agreement_service::{AgreementSearchOutcome, AgreementService};
