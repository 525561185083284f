//! Hierarchical chart of accounts.
//!
//! Accounts form a forest via nullable parent references. The registry
//! validates structural rules (no self-parenting, no cycles) and resolves
//! ancestor chains on demand with a cycle guard.

pub mod error;
pub mod registry;
pub mod types;

pub use error::AccountError;
pub use registry::{AccountRegistry, MAX_ANCESTOR_DEPTH};
pub use types::{AccountMeta, AccountType, NormalBalance};
