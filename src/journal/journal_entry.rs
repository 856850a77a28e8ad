use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};

use crate::accounts::Account;

/// One immutable ledger line. Positive amounts are credits, negative are debits.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    account: Weak<Account>,
    id: String,
    entry_time: DateTime<Utc>,
    text: String,
    amount: f64,
}

impl JournalEntry {
    pub(crate) fn new(
        account: Weak<Account>,
        id: String,
        entry_time: DateTime<Utc>,
        text: String,
        amount: f64,
    ) -> Self {
        Self {
            account,
            id,
            entry_time,
            text,
            amount,
        }
    }

    /// The account this entry was journaled on, if it is still alive.
    pub fn account(&self) -> Option<Arc<Account>> {
        self.account.upgrade()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}
