use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Customer,
    Open,
    Deposit,
    Withdraw,
    Rename,
}

/// One line of a journal replay file.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub national_id: String,
    pub name: Option<String>,
    pub account: Option<String>,
    pub text: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub national_id: String,
    pub name: String,
    pub account: String,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FlaggedEntryRow {
    pub national_id: String,
    pub name: String,
    pub account: String,
    pub entry_id: String,
    pub entry_time: DateTime<Utc>,
    pub text: String,
    pub amount: Decimal,
}
