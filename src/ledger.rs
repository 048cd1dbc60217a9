//! In-memory transaction ledger tool
//!
//! The reference data tool for the accounting-assistant graph wiring: takes
//! a single JSON command string and returns the standard outcome envelope.
//! Commands it does not understand come back as a `failure` outcome so the
//! calling agent can recover in-conversation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tool::{Tool, ToolOutcome};

/// One ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub item: String,
    pub amount: f64,
    pub date: String,
    pub transaction_type: String,
}

fn default_transaction_type() -> String {
    "Expense".to_string()
}

/// Command grammar accepted by the ledger
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum LedgerCommand {
    Insert {
        item: String,
        amount: f64,
        date: String,
        #[serde(default = "default_transaction_type")]
        transaction_type: String,
    },
    Select {
        #[serde(default)]
        item: Option<String>,
        #[serde(default)]
        date: Option<String>,
        #[serde(default)]
        transaction_type: Option<String>,
    },
}

/// Tool holding the transaction table for the process lifetime
#[derive(Default)]
pub struct LedgerTool {
    records: Mutex<Vec<Transaction>>,
}

impl LedgerTool {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Number of recorded transactions
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn insert(&self, transaction: Transaction) -> ToolOutcome {
        debug!(item = %transaction.item, amount = transaction.amount, "Recording transaction");
        self.records.lock().push(transaction);
        ToolOutcome::success("Transaction recorded successfully.")
    }

    fn select(
        &self,
        item: Option<String>,
        date: Option<String>,
        transaction_type: Option<String>,
    ) -> ToolOutcome {
        let records = self.records.lock();
        let mut rows = Vec::new();
        for record in records.iter() {
            if item.as_deref().is_some_and(|i| !record.item.contains(i)) {
                continue;
            }
            if date.as_deref().is_some_and(|d| record.date != d) {
                continue;
            }
            if transaction_type
                .as_deref()
                .is_some_and(|t| record.transaction_type != t)
            {
                continue;
            }
            match serde_json::to_value(record) {
                Ok(value) => rows.push(value),
                Err(e) => return ToolOutcome::failure(format!("Error serializing record: {e}")),
            }
        }
        debug!(matched = rows.len(), "Ledger query");
        ToolOutcome::records(rows)
    }
}

#[async_trait]
impl Tool for LedgerTool {
    fn name(&self) -> &str {
        "ledger"
    }

    async fn call(&self, command: &str) -> ToolOutcome {
        match serde_json::from_str::<LedgerCommand>(command) {
            Ok(LedgerCommand::Insert {
                item,
                amount,
                date,
                transaction_type,
            }) => self.insert(Transaction {
                item,
                amount,
                date,
                transaction_type,
            }),
            Ok(LedgerCommand::Select {
                item,
                date,
                transaction_type,
            }) => self.select(item, date, transaction_type),
            Err(e) => ToolOutcome::failure(format!("Error executing command: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolStatus;

    #[tokio::test]
    async fn test_insert_then_select() {
        let ledger = LedgerTool::new();

        let outcome = ledger
            .call(r#"{"op":"insert","item":"coffee","amount":80.0,"date":"2026-08-27"}"#)
            .await;
        assert_eq!(outcome.status, ToolStatus::Success);
        assert_eq!(ledger.len(), 1);

        let outcome = ledger.call(r#"{"op":"select"}"#).await;
        let rows = outcome.results.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["item"], "coffee");
        assert_eq!(rows[0]["transaction_type"], "Expense");
    }

    #[tokio::test]
    async fn test_select_filters() {
        let ledger = LedgerTool::new();
        ledger
            .call(r#"{"op":"insert","item":"coffee","amount":80.0,"date":"2026-08-27"}"#)
            .await;
        ledger
            .call(r#"{"op":"insert","item":"salary","amount":3000.0,"date":"2026-08-01","transaction_type":"Income"}"#)
            .await;

        let expenses = ledger
            .call(r#"{"op":"select","transaction_type":"Expense"}"#)
            .await;
        assert_eq!(expenses.results.unwrap().len(), 1);

        let on_date = ledger.call(r#"{"op":"select","date":"2026-08-01"}"#).await;
        let rows = on_date.results.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["item"], "salary");
    }

    #[tokio::test]
    async fn test_read_queries_are_idempotent() {
        let ledger = LedgerTool::new();
        ledger
            .call(r#"{"op":"insert","item":"coffee","amount":80.0,"date":"2026-08-27"}"#)
            .await;

        let first = ledger.call(r#"{"op":"select"}"#).await;
        let second = ledger.call(r#"{"op":"select"}"#).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_command_is_failure_not_panic() {
        let ledger = LedgerTool::new();

        let outcome = ledger.call("DROP TABLE transactions").await;
        assert!(outcome.is_failure());
        assert!(outcome.message.unwrap().starts_with("Error executing command"));

        let outcome = ledger.call(r#"{"op":"truncate"}"#).await;
        assert!(outcome.is_failure());
        assert!(ledger.is_empty());
    }
}
