use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::customers::Customer;
use crate::error::{BankError, ValidationError};
use crate::journal::JournalEntry;
use crate::money::{fuzzy_cmp, fuzzy_eq, PENNY_TOLERANCE};

/// An account with an append-only journal. The balance is never stored,
/// it is folded from the entries on demand.
#[derive(Debug)]
pub struct Account {
    this: Weak<Account>,
    customer: Weak<Customer>,
    account_number: String,
    entries: Mutex<Vec<JournalEntry>>,
}

impl Account {
    pub(crate) fn new(customer: Weak<Customer>, account_number: String) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            customer,
            account_number,
            entries: Mutex::new(Vec::new()),
        })
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// The owning customer, if it is still alive.
    pub fn customer(&self) -> Option<Arc<Customer>> {
        self.customer.upgrade()
    }

    /// Snapshot of the journal in insertion order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn deposit(&self, text: &str, amount: f64) -> Result<(), BankError> {
        check_text(text)?;
        check_amount(amount, ValidationError::NegativeDeposit)?;
        self.add_journal_entry(Utc::now(), text, amount)
    }

    pub fn withdraw(&self, text: &str, amount: f64) -> Result<(), BankError> {
        check_text(text)?;
        check_amount(amount, ValidationError::NegativeWithdrawal)?;
        self.add_journal_entry(Utc::now(), text, -amount)
    }

    pub fn calculate_balance(&self) -> f64 {
        self.entries().iter().map(JournalEntry::amount).sum()
    }

    fn add_journal_entry(
        &self,
        entry_time: DateTime<Utc>,
        text: &str,
        amount: f64,
    ) -> Result<(), BankError> {
        if fuzzy_eq(amount, 0.0, PENNY_TOLERANCE) {
            return Err(ValidationError::NearZeroAmount(amount).into());
        }
        let entry = JournalEntry::new(
            self.this.clone(),
            next_journal_id(),
            entry_time,
            text.to_string(),
            amount,
        );

        debug!(
            "account {}: journal entry {} amount {}",
            self.account_number,
            entry.id(),
            amount
        );
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }
}

fn next_journal_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn check_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingText);
    }
    Ok(())
}

fn check_amount(
    amount: f64,
    negative: fn(f64) -> ValidationError,
) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount(amount));
    }
    if fuzzy_cmp(amount, 0.0, PENNY_TOLERANCE).is_lt() {
        return Err(negative(amount));
    }
    Ok(())
}
