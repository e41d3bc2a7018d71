//! Transaction records as handed over by the ledger that owns them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(alias = "type")]
    pub kind: TransactionKind,
    /// Minor currency units.
    pub amount: u64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn expense(id: u64, amount: u64, category: &str, date: NaiveDate) -> Self {
        Self {
            id,
            kind: TransactionKind::Expense,
            amount,
            category: category.to_string(),
            date,
            description: String::new(),
        }
    }

    pub fn income(id: u64, amount: u64, category: &str, date: NaiveDate) -> Self {
        Self {
            id,
            kind: TransactionKind::Income,
            amount,
            category: category.to_string(),
            date,
            description: String::new(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::{Transaction, TransactionKind};

    #[test]
    fn deserializes_ledger_payload_with_type_field() {
        let json = r#"{
            "id": 4,
            "type": "expense",
            "description": "Electricity Bill",
            "amount": 8500,
            "category": "Utilities",
            "date": "2025-09-24"
        }"#;
        let tx: Transaction = serde_json::from_str(json).expect("payload should parse");
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, 8500);
        assert_eq!(tx.category, "Utilities");
        assert_eq!(tx.date.to_string(), "2025-09-24");
        assert!(tx.is_expense());
    }

    #[test]
    fn description_is_optional() {
        let json =
            r#"{"id":1,"kind":"income","amount":10,"category":"Salary","date":"2025-09-25"}"#;
        let tx: Transaction = serde_json::from_str(json).expect("payload should parse");
        assert_eq!(tx.kind, TransactionKind::Income);
        assert!(tx.description.is_empty());
        assert!(!tx.is_expense());
    }
}
