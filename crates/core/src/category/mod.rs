//! Cost categories and their account-pair mapping.
//!
//! A cost category classifies a business cost (biaya / pendapatan / aset)
//! and optionally maps to a default debit and credit account. The posting
//! service resolves these mappings when turning source events into journal
//! lines.

pub mod error;
pub mod types;

pub use error::CategoryError;
pub use types::{CategoryKind, CategoryMapping, CostCategory};
