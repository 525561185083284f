//! Idempotent journal posting planner.
//!
//! Given a source event and resolved category mappings, the planner decides
//! which journal lines are still missing for the source. Creating the lines
//! (and holding the transaction scope plus the storage uniqueness backstop)
//! is the repository's job.

pub mod error;
pub mod service;
pub mod types;

pub use error::PostingError;
pub use service::PostingService;
pub use types::{
    EntryType, JournalTotals, PlannedLine, PostingPlan, PostingRequest, SourceRef,
};
