//! Trial balance aggregation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tirta_shared::types::AccountId;

use crate::account::{AccountMeta, AccountType, NormalBalance};

use super::types::{
    LineAmount, TrialBalanceReport, TrialBalanceRow, TrialBalanceSection, TrialBalanceSections,
    TrialBalanceTotals,
};

/// Balances smaller than this are dropped from the report (and the balance
/// check tolerates differences below it).
fn threshold() -> Decimal {
    Decimal::new(5, 3)
}

/// Service for deriving financial reports from journal lines.
pub struct ReportService;

impl ReportService {
    /// Derives the trial balance from lines dated on or before the cutoff.
    ///
    /// `accounts` must contain the metadata for every account referenced by
    /// `lines`; it may additionally contain ancestors loaded for display,
    /// which appear as zero-balance rows when `show_zero` is set. Lines
    /// referencing accounts absent from the map are ignored.
    ///
    /// The result is invariant under the ordering of `lines`.
    #[must_use]
    pub fn trial_balance(
        as_of: NaiveDate,
        accounts: &HashMap<AccountId, AccountMeta>,
        lines: &[LineAmount],
        show_zero: bool,
    ) -> TrialBalanceReport {
        let mut sums: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            if !accounts.contains_key(&line.account_id) {
                continue;
            }
            let entry = sums.entry(line.account_id).or_default();
            entry.0 += line.debit;
            entry.1 += line.credit;
        }

        let mut sections = TrialBalanceSections::default();

        for account in accounts.values() {
            let (total_debit, total_credit) =
                sums.get(&account.id).copied().unwrap_or_default();

            let normal_signed = match account.normal_balance {
                NormalBalance::Debit => total_debit - total_credit,
                NormalBalance::Credit => total_credit - total_debit,
            }
            .round_dp(2);

            let balance = if account.account_type.is_contra() {
                -normal_signed
            } else {
                normal_signed
            };

            if !show_zero && balance.abs() < threshold() {
                continue;
            }

            let row = TrialBalanceRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                normal_balance: account.normal_balance,
                total_debit,
                total_credit,
                balance,
            };

            let section = match account.account_type {
                AccountType::Asset | AccountType::ContraAsset => &mut sections.assets,
                AccountType::Liability => &mut sections.liabilities,
                AccountType::Equity => &mut sections.equity,
                AccountType::Revenue | AccountType::ContraRevenue => &mut sections.revenue,
                AccountType::Expense => &mut sections.expense,
            };
            section.total += row.balance;
            section.rows.push(row);
        }

        for section in [
            &mut sections.assets,
            &mut sections.liabilities,
            &mut sections.equity,
            &mut sections.revenue,
            &mut sections.expense,
        ] {
            section.rows.sort_by(|a, b| a.code.cmp(&b.code));
        }

        let totals = Self::totals(&sections);

        TrialBalanceReport {
            as_of,
            sections,
            totals,
        }
    }

    fn totals(sections: &TrialBalanceSections) -> TrialBalanceTotals {
        let assets = sections.assets.total;
        let liabilities = sections.liabilities.total;
        let equity = sections.equity.total;
        let net_revenue = sections.revenue.total;
        let total_expense = sections.expense.total;
        let profit_loss = net_revenue - total_expense;
        let liabilities_plus_equity = liabilities + equity + profit_loss;
        let difference = assets - liabilities_plus_equity;

        TrialBalanceTotals {
            assets,
            liabilities,
            equity,
            net_revenue,
            total_expense,
            profit_loss,
            liabilities_plus_equity,
            balanced: difference.abs() < threshold(),
            difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn account(code: &str, account_type: AccountType) -> AccountMeta {
        AccountMeta {
            id: AccountId::new(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            normal_balance: account_type.default_normal_balance(),
            parent_id: None,
            is_active: true,
        }
    }

    fn account_map(accounts: &[AccountMeta]) -> HashMap<AccountId, AccountMeta> {
        accounts.iter().map(|a| (a.id, a.clone())).collect()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    #[test]
    fn test_depreciation_posting_scenario() {
        // Expense 5101 debited, accumulated-depreciation 1209 credited.
        let expense = account("5101", AccountType::Expense);
        let accum = account("1209", AccountType::ContraAsset);
        let accounts = account_map(&[expense.clone(), accum.clone()]);

        let lines = vec![
            LineAmount {
                account_id: expense.id,
                debit: dec!(1000000),
                credit: dec!(0),
            },
            LineAmount {
                account_id: accum.id,
                debit: dec!(0),
                credit: dec!(1000000),
            },
        ];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);

        assert_eq!(report.sections.expense.rows.len(), 1);
        assert_eq!(report.sections.expense.rows[0].balance, dec!(1000000.00));

        // Credit-normal contra-asset nets negatively inside assets.
        assert_eq!(report.sections.assets.rows.len(), 1);
        assert_eq!(report.sections.assets.rows[0].code, "1209");
        assert_eq!(report.sections.assets.rows[0].balance, dec!(-1000000.00));

        // Assets -1M vs liabilities + equity + (0 - 1M expense) = -1M.
        assert_eq!(report.totals.assets, dec!(-1000000.00));
        assert_eq!(report.totals.profit_loss, dec!(-1000000.00));
        assert!(report.totals.balanced);
        assert_eq!(report.totals.difference, dec!(0));
    }

    #[test]
    fn test_balanced_books() {
        let cash = account("1101", AccountType::Asset);
        let capital = account("3101", AccountType::Equity);
        let revenue = account("4101", AccountType::Revenue);
        let expense = account("5101", AccountType::Expense);
        let accounts = account_map(&[cash.clone(), capital.clone(), revenue.clone(), expense.clone()]);

        let lines = vec![
            // Opening capital 10,000.
            LineAmount { account_id: cash.id, debit: dec!(10000), credit: dec!(0) },
            LineAmount { account_id: capital.id, debit: dec!(0), credit: dec!(10000) },
            // Water sales 2,500 cash.
            LineAmount { account_id: cash.id, debit: dec!(2500), credit: dec!(0) },
            LineAmount { account_id: revenue.id, debit: dec!(0), credit: dec!(2500) },
            // Maintenance cost 700 cash.
            LineAmount { account_id: expense.id, debit: dec!(700), credit: dec!(0) },
            LineAmount { account_id: cash.id, debit: dec!(0), credit: dec!(700) },
        ];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);

        assert_eq!(report.totals.assets, dec!(11800.00));
        assert_eq!(report.totals.equity, dec!(10000.00));
        assert_eq!(report.totals.profit_loss, dec!(1800.00));
        assert_eq!(report.totals.liabilities_plus_equity, dec!(11800.00));
        assert!(report.totals.balanced);
    }

    #[test]
    fn test_unbalanced_books_report_difference() {
        let cash = account("1101", AccountType::Asset);
        let accounts = account_map(&[cash.clone()]);

        // A one-sided line from a foreign event source.
        let lines = vec![LineAmount {
            account_id: cash.id,
            debit: dec!(500),
            credit: dec!(0),
        }];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);
        assert!(!report.totals.balanced);
        assert_eq!(report.totals.difference, dec!(500.00));
    }

    #[test]
    fn test_zero_rows_dropped_unless_requested() {
        let cash = account("1101", AccountType::Asset);
        let parent = account("11", AccountType::Asset);
        let accounts = account_map(&[cash.clone(), parent.clone()]);

        let lines = vec![
            LineAmount { account_id: cash.id, debit: dec!(100), credit: dec!(0) },
            LineAmount { account_id: cash.id, debit: dec!(0), credit: dec!(100) },
        ];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);
        assert!(report.sections.assets.rows.is_empty());

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, true);
        assert_eq!(report.sections.assets.rows.len(), 2);
        // Zero-balance ancestor appears with its code for display.
        assert_eq!(report.sections.assets.rows[0].code, "11");
    }

    #[test]
    fn test_rows_sorted_by_code() {
        let a = account("1201", AccountType::Asset);
        let b = account("1101", AccountType::Asset);
        let accounts = account_map(&[a.clone(), b.clone()]);

        let lines = vec![
            LineAmount { account_id: a.id, debit: dec!(10), credit: dec!(0) },
            LineAmount { account_id: b.id, debit: dec!(20), credit: dec!(0) },
        ];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);
        let codes: Vec<&str> = report
            .sections
            .assets
            .rows
            .iter()
            .map(|r| r.code.as_str())
            .collect();
        assert_eq!(codes, vec!["1101", "1201"]);
    }

    #[test]
    fn test_lines_for_unknown_accounts_are_ignored() {
        let cash = account("1101", AccountType::Asset);
        let accounts = account_map(&[cash.clone()]);

        let lines = vec![
            LineAmount { account_id: cash.id, debit: dec!(100), credit: dec!(0) },
            LineAmount { account_id: AccountId::new(), debit: dec!(999), credit: dec!(0) },
        ];

        let report = ReportService::trial_balance(as_of(), &accounts, &lines, false);
        assert_eq!(report.totals.assets, dec!(100.00));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Summing lines in any order yields the same per-account balances
        /// and totals.
        #[test]
        fn prop_order_invariant(
            amounts in proptest::collection::vec((0u8..4, 0i64..1_000_000_00), 1..40),
            rotation in 0usize..40,
        ) {
            let accounts_vec = vec![
                account("1101", AccountType::Asset),
                account("1209", AccountType::ContraAsset),
                account("4101", AccountType::Revenue),
                account("5101", AccountType::Expense),
            ];
            let accounts = account_map(&accounts_vec);

            let lines: Vec<LineAmount> = amounts
                .iter()
                .map(|(idx, cents)| {
                    let acct = &accounts_vec[*idx as usize];
                    let amount = Decimal::new(*cents, 2);
                    // Alternate sides by parity to mix debits and credits.
                    if cents % 2 == 0 {
                        LineAmount { account_id: acct.id, debit: amount, credit: Decimal::ZERO }
                    } else {
                        LineAmount { account_id: acct.id, debit: Decimal::ZERO, credit: amount }
                    }
                })
                .collect();

            let mut rotated = lines.clone();
            rotated.rotate_left(rotation % lines.len().max(1));
            let mut reversed = lines.clone();
            reversed.reverse();

            let base = ReportService::trial_balance(as_of(), &accounts, &lines, true);
            let rot = ReportService::trial_balance(as_of(), &accounts, &rotated, true);
            let rev = ReportService::trial_balance(as_of(), &accounts, &reversed, true);

            for other in [&rot, &rev] {
                prop_assert_eq!(base.totals.assets, other.totals.assets);
                prop_assert_eq!(base.totals.profit_loss, other.totals.profit_loss);
                prop_assert_eq!(base.totals.difference, other.totals.difference);
                for (a, b) in base.sections.assets.rows.iter().zip(&other.sections.assets.rows) {
                    prop_assert_eq!(&a.code, &b.code);
                    prop_assert_eq!(a.balance, b.balance);
                }
            }
        }
    }
}
