//! Posting planner.
//!
//! Pure decision logic: given the category tags already present for a
//! source, work out which side(s) of the entry are missing. The repository
//! executes the plan inside a storage transaction; a uniqueness constraint
//! on (source tag, category) is the last line of defense against a
//! concurrent double post.

use rust_decimal::Decimal;
use tirta_shared::types::CostCategoryId;

use super::error::PostingError;
use super::types::{JournalTotals, PlannedLine, PostingPlan, PostingRequest};

/// Journal posting planner.
pub struct PostingService;

impl PostingService {
    /// Plans the lines to create for a posting request.
    ///
    /// `existing_category_ids` are the category tags of lines already
    /// recorded for this source. When both the debit and the credit
    /// category are present the posting is a no-op success; otherwise
    /// exactly the missing side(s) are planned, each for the same amount,
    /// yielding a balanced entry once all lines exist.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` on a non-positive amount or when both sides
    /// reference the same category.
    pub fn plan(
        request: &PostingRequest,
        existing_category_ids: &[CostCategoryId],
    ) -> Result<PostingPlan, PostingError> {
        if request.amount <= Decimal::ZERO {
            return Err(PostingError::NonPositiveAmount(request.amount));
        }
        if request.debit.category_id == request.credit.category_id {
            return Err(PostingError::SameCategory(request.debit.category_id));
        }

        let amount = request.amount.round_dp(2);
        let has_debit = existing_category_ids.contains(&request.debit.category_id);
        let has_credit = existing_category_ids.contains(&request.credit.category_id);

        if has_debit && has_credit {
            return Ok(PostingPlan {
                lines: Vec::new(),
                already_posted: true,
            });
        }

        let mut lines = Vec::with_capacity(2);
        if !has_debit {
            lines.push(PlannedLine {
                account_id: request.debit.account_id,
                cost_category_id: request.debit.category_id,
                debit: amount,
                credit: Decimal::ZERO,
            });
        }
        if !has_credit {
            lines.push(PlannedLine {
                account_id: request.credit.account_id,
                cost_category_id: request.credit.category_id,
                debit: Decimal::ZERO,
                credit: amount,
            });
        }

        Ok(PostingPlan {
            lines,
            already_posted: false,
        })
    }

    /// Computes the derived balance over a header's (debit, credit) lines.
    #[must_use]
    pub fn totals(lines: &[(Decimal, Decimal)]) -> JournalTotals {
        let debit: Decimal = lines.iter().map(|(d, _)| *d).sum();
        let credit: Decimal = lines.iter().map(|(_, c)| *c).sum();
        JournalTotals::new(debit, credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryMapping;
    use crate::posting::types::SourceRef;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tirta_shared::types::AccountId;
    use uuid::Uuid;

    fn request(amount: Decimal) -> PostingRequest {
        PostingRequest {
            source: SourceRef::new("depreciation", Uuid::new_v4()),
            debit: CategoryMapping {
                category_id: CostCategoryId::new(),
                account_id: AccountId::new(),
            },
            credit: CategoryMapping {
                category_id: CostCategoryId::new(),
                account_id: AccountId::new(),
            },
            amount,
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            description: None,
            cost_unit_id: None,
            asset_id: None,
        }
    }

    #[test]
    fn test_plan_fresh_posting_creates_both_sides() {
        let req = request(dec!(1000000));
        let plan = PostingService::plan(&req, &[]).unwrap();

        assert!(!plan.already_posted);
        assert_eq!(plan.created(), 2);
        assert_eq!(plan.lines[0].debit, dec!(1000000));
        assert_eq!(plan.lines[0].credit, dec!(0));
        assert_eq!(plan.lines[0].account_id, req.debit.account_id);
        assert_eq!(plan.lines[1].credit, dec!(1000000));
        assert_eq!(plan.lines[1].account_id, req.credit.account_id);
    }

    #[test]
    fn test_plan_is_idempotent_when_both_sides_exist() {
        let req = request(dec!(1000000));
        let existing = vec![req.debit.category_id, req.credit.category_id];
        let plan = PostingService::plan(&req, &existing).unwrap();

        assert!(plan.already_posted);
        assert_eq!(plan.created(), 0);
    }

    #[test]
    fn test_plan_completes_a_half_posted_entry() {
        let req = request(dec!(250000));

        let plan = PostingService::plan(&req, &[req.debit.category_id]).unwrap();
        assert!(!plan.already_posted);
        assert_eq!(plan.created(), 1);
        assert_eq!(plan.lines[0].cost_category_id, req.credit.category_id);
        assert_eq!(plan.lines[0].credit, dec!(250000));

        let plan = PostingService::plan(&req, &[req.credit.category_id]).unwrap();
        assert_eq!(plan.created(), 1);
        assert_eq!(plan.lines[0].cost_category_id, req.debit.category_id);
        assert_eq!(plan.lines[0].debit, dec!(250000));
    }

    #[test]
    fn test_posting_twice_creates_no_further_lines() {
        // Idempotence: the second plan over the first plan's tags is empty.
        let req = request(dec!(1000000));
        let first = PostingService::plan(&req, &[]).unwrap();
        let tags: Vec<CostCategoryId> =
            first.lines.iter().map(|l| l.cost_category_id).collect();

        let second = PostingService::plan(&req, &tags).unwrap();
        assert!(second.already_posted);
        assert_eq!(
            first.created() + second.created(),
            PostingService::plan(&req, &[]).unwrap().created()
        );
    }

    #[test]
    fn test_plan_rejects_non_positive_amount() {
        assert!(matches!(
            PostingService::plan(&request(dec!(0)), &[]),
            Err(PostingError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            PostingService::plan(&request(dec!(-5)), &[]),
            Err(PostingError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_plan_rejects_same_category_on_both_sides() {
        let mut req = request(dec!(100));
        req.credit.category_id = req.debit.category_id;
        assert!(matches!(
            PostingService::plan(&req, &[]),
            Err(PostingError::SameCategory(_))
        ));
    }

    #[test]
    fn test_planned_lines_balance() {
        let req = request(dec!(1000000));
        let plan = PostingService::plan(&req, &[]).unwrap();
        let totals = PostingService::totals(
            &plan
                .lines
                .iter()
                .map(|l| (l.debit, l.credit))
                .collect::<Vec<_>>(),
        );
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_amount_is_rounded_to_cents() {
        let plan = PostingService::plan(&request(dec!(100.005)), &[]).unwrap();
        // Banker's rounding at 2 decimals.
        assert_eq!(plan.lines[0].debit, dec!(100.00));
    }
}
