//! Account registry validation and ancestor resolution.
//!
//! The registry contains pure business logic with no database dependencies.
//! Callers inject a lookup closure so the same rules apply to in-memory
//! fixtures and persisted accounts alike.

use std::collections::HashSet;

use tirta_shared::types::AccountId;

use super::error::AccountError;
use super::types::{AccountMeta, AccountType, NormalBalance};

/// Maximum parent-chain depth tolerated before a hierarchy is considered
/// broken. Real charts of accounts stay in single digits.
pub const MAX_ANCESTOR_DEPTH: usize = 32;

/// Account registry validation and traversal.
pub struct AccountRegistry;

impl AccountRegistry {
    /// Validates the fields for creating or updating an account.
    ///
    /// `account_id` is the account being updated (None on create); a parent
    /// equal to it is rejected.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if code or name is empty, or the parent is the
    /// account itself.
    pub fn validate_fields(
        code: &str,
        name: &str,
        account_id: Option<AccountId>,
        parent_id: Option<AccountId>,
    ) -> Result<(), AccountError> {
        if code.trim().is_empty() {
            return Err(AccountError::EmptyCode);
        }
        if name.trim().is_empty() {
            return Err(AccountError::EmptyName);
        }
        if let (Some(id), Some(parent)) = (account_id, parent_id)
            && id == parent
        {
            return Err(AccountError::SelfParent(id));
        }
        Ok(())
    }

    /// Parses and validates the type/normal-balance pair from wire strings.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if either string is not in the enumerated set.
    pub fn parse_classification(
        account_type: &str,
        normal_balance: &str,
    ) -> Result<(AccountType, NormalBalance), AccountError> {
        let account_type = AccountType::parse(account_type)
            .ok_or_else(|| AccountError::InvalidAccountType(account_type.to_string()))?;
        let normal_balance = NormalBalance::parse(normal_balance)
            .ok_or_else(|| AccountError::InvalidNormalBalance(normal_balance.to_string()))?;
        Ok((account_type, normal_balance))
    }

    /// Resolves the ancestor chain of an account, nearest parent first.
    ///
    /// The walk is iterative with a visited set and a depth cap, so a
    /// corrupted hierarchy (cycle or runaway chain) fails instead of
    /// spinning.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::CycleDetected` or
    /// `AccountError::AncestorChainTooDeep` on a broken hierarchy.
    pub fn ancestor_chain<F>(
        start: &AccountMeta,
        lookup: F,
    ) -> Result<Vec<AccountMeta>, AccountError>
    where
        F: Fn(AccountId) -> Option<AccountMeta>,
    {
        let mut chain = Vec::new();
        let mut visited: HashSet<AccountId> = HashSet::new();
        visited.insert(start.id);

        let mut next = start.parent_id;
        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                return Err(AccountError::CycleDetected(parent_id));
            }
            if chain.len() >= MAX_ANCESTOR_DEPTH {
                return Err(AccountError::AncestorChainTooDeep(start.id));
            }
            let Some(parent) = lookup(parent_id) else {
                // Dangling parent references terminate the chain; deletion
                // detaches children, so these should not occur, but a
                // missing row must not fail the read path.
                break;
            };
            next = parent.parent_id;
            chain.push(parent);
        }

        Ok(chain)
    }

    /// Checks whether setting `parent_id` on `account_id` would make the
    /// account its own ancestor.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::WouldCreateCycle` when the proposed parent's
    /// chain already contains the account, and propagates hierarchy
    /// corruption errors from the walk.
    pub fn validate_reparent<F>(
        account_id: AccountId,
        parent_id: AccountId,
        lookup: F,
    ) -> Result<(), AccountError>
    where
        F: Fn(AccountId) -> Option<AccountMeta>,
    {
        if account_id == parent_id {
            return Err(AccountError::SelfParent(account_id));
        }

        let Some(parent) = lookup(parent_id) else {
            // Parent existence is checked by the caller against storage.
            return Ok(());
        };

        if parent.id == account_id {
            return Err(AccountError::SelfParent(account_id));
        }

        let chain = Self::ancestor_chain(&parent, &lookup)?;
        if chain.iter().any(|a| a.id == account_id) {
            return Err(AccountError::WouldCreateCycle {
                account_id,
                parent_id,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn account(id: AccountId, code: &str, parent_id: Option<AccountId>) -> AccountMeta {
        AccountMeta {
            id,
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            normal_balance: NormalBalance::Debit,
            parent_id,
            is_active: true,
        }
    }

    fn lookup_in(map: &HashMap<AccountId, AccountMeta>) -> impl Fn(AccountId) -> Option<AccountMeta> {
        move |id| map.get(&id).cloned()
    }

    #[test]
    fn test_validate_fields_ok() {
        assert!(AccountRegistry::validate_fields("1101", "Kas", None, None).is_ok());
    }

    #[test]
    fn test_validate_fields_empty_code() {
        assert!(matches!(
            AccountRegistry::validate_fields("  ", "Kas", None, None),
            Err(AccountError::EmptyCode)
        ));
    }

    #[test]
    fn test_validate_fields_empty_name() {
        assert!(matches!(
            AccountRegistry::validate_fields("1101", "", None, None),
            Err(AccountError::EmptyName)
        ));
    }

    #[test]
    fn test_validate_fields_self_parent() {
        let id = AccountId::new();
        assert!(matches!(
            AccountRegistry::validate_fields("1101", "Kas", Some(id), Some(id)),
            Err(AccountError::SelfParent(_))
        ));
    }

    #[test]
    fn test_parse_classification() {
        let (t, n) = AccountRegistry::parse_classification("contra_asset", "credit").unwrap();
        assert_eq!(t, AccountType::ContraAsset);
        assert_eq!(n, NormalBalance::Credit);

        assert!(matches!(
            AccountRegistry::parse_classification("bogus", "credit"),
            Err(AccountError::InvalidAccountType(_))
        ));
        assert!(matches!(
            AccountRegistry::parse_classification("asset", "sideways"),
            Err(AccountError::InvalidNormalBalance(_))
        ));
    }

    #[test]
    fn test_ancestor_chain_resolves_to_root() {
        let root_id = AccountId::new();
        let mid_id = AccountId::new();
        let leaf_id = AccountId::new();

        let mut map = HashMap::new();
        map.insert(root_id, account(root_id, "1", None));
        map.insert(mid_id, account(mid_id, "12", Some(root_id)));
        map.insert(leaf_id, account(leaf_id, "1201", Some(mid_id)));

        let leaf = map[&leaf_id].clone();
        let chain = AccountRegistry::ancestor_chain(&leaf, lookup_in(&map)).unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].code, "12");
        assert_eq!(chain[1].code, "1");
    }

    #[test]
    fn test_ancestor_chain_detects_cycle() {
        let a = AccountId::new();
        let b = AccountId::new();

        let mut map = HashMap::new();
        map.insert(a, account(a, "A", Some(b)));
        map.insert(b, account(b, "B", Some(a)));

        let start = map[&a].clone();
        assert!(matches!(
            AccountRegistry::ancestor_chain(&start, lookup_in(&map)),
            Err(AccountError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_ancestor_chain_tolerates_dangling_parent() {
        let leaf_id = AccountId::new();
        let missing = AccountId::new();

        let mut map = HashMap::new();
        map.insert(leaf_id, account(leaf_id, "1201", Some(missing)));

        let leaf = map[&leaf_id].clone();
        let chain = AccountRegistry::ancestor_chain(&leaf, lookup_in(&map)).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_reparent_to_descendant_rejected() {
        let root_id = AccountId::new();
        let child_id = AccountId::new();

        let mut map = HashMap::new();
        map.insert(root_id, account(root_id, "1", None));
        map.insert(child_id, account(child_id, "11", Some(root_id)));

        // Making the root a child of its own child is a cycle.
        assert!(matches!(
            AccountRegistry::validate_reparent(root_id, child_id, lookup_in(&map)),
            Err(AccountError::WouldCreateCycle { .. })
        ));
    }

    #[test]
    fn test_reparent_to_sibling_ok() {
        let root_id = AccountId::new();
        let a = AccountId::new();
        let b = AccountId::new();

        let mut map = HashMap::new();
        map.insert(root_id, account(root_id, "1", None));
        map.insert(a, account(a, "11", Some(root_id)));
        map.insert(b, account(b, "12", Some(root_id)));

        assert!(AccountRegistry::validate_reparent(a, b, lookup_in(&map)).is_ok());
    }
}
