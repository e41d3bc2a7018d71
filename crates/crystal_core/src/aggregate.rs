use crate::ledger::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: u64,
}

/// Per-category expense totals, listed in the order each category was first
/// seen in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub totals: Vec<CategoryTotal>,
    pub grand_total: u64,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.grand_total == 0
    }
}

pub fn aggregate(transactions: &[Transaction]) -> Aggregation {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut grand_total = 0u64;

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let slot = *slots.entry(tx.category.as_str()).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: tx.category.clone(),
                amount: 0,
            });
            totals.len() - 1
        });
        totals[slot].amount = totals[slot].amount.saturating_add(tx.amount);
        grand_total = grand_total.saturating_add(tx.amount);
    }

    Aggregation {
        totals,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate, CategoryTotal};
    use crate::ledger::Transaction;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).expect("valid date")
    }

    #[test]
    fn ignores_income_and_sums_expenses_per_category() {
        let txs = vec![
            Transaction::expense(1, 5500, "Food", day(27)),
            Transaction::expense(2, 3000, "Transport", day(26)),
            Transaction::income(3, 150_000, "Investments", day(25)),
        ];
        let agg = aggregate(&txs);
        assert_eq!(
            agg.totals,
            vec![
                CategoryTotal {
                    category: "Food".to_string(),
                    amount: 5500
                },
                CategoryTotal {
                    category: "Transport".to_string(),
                    amount: 3000
                },
            ]
        );
        assert_eq!(agg.grand_total, 8500);
    }

    #[test]
    fn merges_repeated_categories_in_first_seen_order() {
        let txs = vec![
            Transaction::expense(1, 5500, "Food", day(27)),
            Transaction::expense(2, 3000, "Transport", day(26)),
            Transaction::expense(6, 4200, "Food", day(22)),
            Transaction::expense(7, 750, "Transport", day(21)),
        ];
        let agg = aggregate(&txs);
        assert_eq!(agg.totals.len(), 2);
        assert_eq!(agg.totals[0].category, "Food");
        assert_eq!(agg.totals[0].amount, 9700);
        assert_eq!(agg.totals[1].amount, 3750);
        assert_eq!(agg.grand_total, 13_450);
    }

    #[test]
    fn totals_always_sum_to_grand_total() {
        let categories = ["Food", "Health", "Food", "Other", "Shopping", "Health"];
        let txs: Vec<Transaction> = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| {
                if i % 4 == 3 {
                    Transaction::income(i as u64, 999, cat, day(1))
                } else {
                    Transaction::expense(i as u64, (i as u64 + 1) * 137, cat, day(1))
                }
            })
            .collect();
        let agg = aggregate(&txs);
        let sum: u64 = agg.totals.iter().map(|t| t.amount).sum();
        assert_eq!(sum, agg.grand_total);
    }

    #[test]
    fn no_expenses_yields_empty_aggregation() {
        let txs = vec![Transaction::income(1, 100, "Salary", day(1))];
        let agg = aggregate(&txs);
        assert!(agg.totals.is_empty());
        assert_eq!(agg.grand_total, 0);
        assert!(agg.is_empty());
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn zero_amount_expense_still_creates_a_category() {
        let txs = vec![Transaction::expense(1, 0, "Food", day(1))];
        let agg = aggregate(&txs);
        assert_eq!(agg.totals.len(), 1);
        assert_eq!(agg.grand_total, 0);
    }
}
