use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::info;

use crate::customers::{AccountNumbers, Customer};
use crate::error::{BankError, ValidationError};
use crate::journal::JournalEntry;
use crate::money::{fuzzy_cmp, MONEY_LAUNDERING_LIMIT, PENNY_TOLERANCE};

/// Registry of customers keyed by national id.
#[derive(Debug, Default)]
pub struct Bank {
    customers: Mutex<HashMap<String, Arc<Customer>>>,
    account_numbers: Arc<AccountNumbers>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer. Fails if the national id is malformed or taken.
    pub fn add_customer(&self, name: &str, national_id: &str) -> Result<Arc<Customer>, BankError> {
        validate_national_id(national_id)?;

        let mut customers = self
            .customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if customers.contains_key(national_id) {
            return Err(BankError::DuplicateCustomer(national_id.to_string()));
        }
        let customer = Customer::new(
            name.to_string(),
            national_id.to_string(),
            Arc::clone(&self.account_numbers),
        );
        customers.insert(national_id.to_string(), Arc::clone(&customer));

        info!("registered customer {}", national_id);
        Ok(customer)
    }

    /// Look up a customer. A well-formed but unknown id gives `Ok(None)`.
    pub fn find_customer(&self, national_id: &str) -> Result<Option<Arc<Customer>>, BankError> {
        validate_national_id(national_id)?;
        Ok(self
            .customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(national_id)
            .cloned())
    }

    /// Snapshot of every registered customer, in no particular order.
    pub fn customers(&self) -> Vec<Arc<Customer>> {
        self.customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Find all credits above the money-laundering limit made at or after `since`,
    /// grouped by customer. Within a customer, entries follow account order and
    /// then journal order. Withdrawals are never reported.
    ///
    /// Each customer and account is locked only while it is snapshotted, so
    /// entries appended during the scan may or may not show up.
    pub fn find_potential_money_laundering_customers(
        &self,
        since: DateTime<Utc>,
    ) -> HashMap<Arc<Customer>, Vec<JournalEntry>> {
        let mut flagged: HashMap<Arc<Customer>, Vec<JournalEntry>> = HashMap::new();

        let entries = self
            .customers()
            .into_iter()
            .flat_map(|customer| customer.accounts())
            .flat_map(|account| account.entries())
            .filter(|entry| entry.entry_time() >= since)
            .filter(|entry| {
                fuzzy_cmp(entry.amount(), MONEY_LAUNDERING_LIMIT, PENNY_TOLERANCE)
                    == Ordering::Greater
            });

        for entry in entries {
            if let Some(customer) = entry.account().and_then(|account| account.customer()) {
                flagged.entry(customer).or_default().push(entry);
            }
        }

        if !flagged.is_empty() {
            info!(
                "money laundering scan since {}: {} customer(s) flagged",
                since,
                flagged.len()
            );
        }
        flagged
    }
}

fn validate_national_id(national_id: &str) -> Result<(), ValidationError> {
    if national_id.len() != 10 || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidNationalId(national_id.to_string()));
    }
    Ok(())
}


/// ------------------------
/// Inline Unit Tests
/// ------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::fuzzy_eq;
    use chrono::Duration;
    use std::thread;

    const KLAUS: &str = "0123456789";
    const PETER: &str = "0012345678";

    #[test]
    fn test_add_and_find_customer() {
        let bank = Bank::new();
        bank.add_customer("Klaus", KLAUS).unwrap();

        let customer = bank.find_customer(KLAUS).unwrap().unwrap();
        assert_eq!(customer.name(), "Klaus");
        assert_eq!(customer.national_id(), KLAUS);

        customer.set_name("Peter");
        assert_eq!(bank.find_customer(KLAUS).unwrap().unwrap().name(), "Peter");

        assert!(bank.find_customer("1234567890").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_customer() {
        let bank = Bank::new();
        bank.add_customer("Klaus", KLAUS).unwrap();

        let err = bank.add_customer("Same id", KLAUS).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(bank.find_customer(KLAUS).unwrap().unwrap().name(), "Klaus");
        assert_eq!(bank.customers().len(), 1);
    }

    #[test]
    fn test_concurrent_duplicate_registration() {
        let bank = Bank::new();
        let results: Vec<Result<Arc<Customer>, BankError>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let bank = &bank;
                    s.spawn(move || bank.add_customer(&format!("Klaus {}", i), KLAUS))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(BankError::is_duplicate));
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 7);

        let winner = results.into_iter().find_map(Result::ok).unwrap();
        let registered = bank.find_customer(KLAUS).unwrap().unwrap();
        assert!(Arc::ptr_eq(&winner, &registered));
        assert_eq!(bank.customers().len(), 1);
    }

    #[test]
    fn test_invalid_national_id() {
        let bank = Bank::new();
        for bad in ["not a cpr", "", "012345678", "01234567890", "012345678x", "０１２３４５６７８９"] {
            assert!(bank.add_customer("Klaus", bad).unwrap_err().is_validation());
            assert!(bank.find_customer(bad).unwrap_err().is_validation());
        }
        assert!(bank.customers().is_empty());
    }

    #[test]
    fn test_account_numbers_are_bank_wide() {
        let bank = Bank::new();
        let klaus = bank.add_customer("Klaus", KLAUS).unwrap();
        let peter = bank.add_customer("Peter", PETER).unwrap();

        let a = klaus.add_account();
        let b = peter.add_account();
        let c = klaus.add_account();
        assert!(a.account_number() < b.account_number());
        assert!(b.account_number() < c.account_number());
        assert_eq!(c.account_number(), "000000003");
    }

    #[test]
    fn test_money_laundering() {
        let start = Utc::now() - Duration::milliseconds(1);

        let bank = Bank::new();
        let klaus_account = bank.add_customer("Klaus", KLAUS).unwrap().add_account();
        let peter_account = bank.add_customer("peter", PETER).unwrap().add_account();

        klaus_account.deposit("below 10K", 100.0).unwrap();
        klaus_account.deposit("exactly 10K", 10000.0).unwrap();
        klaus_account.deposit("above 10K", 10000.01).unwrap();
        klaus_account.withdraw("above 10K", 10010.0).unwrap();

        peter_account.deposit("below 10K", 50.0).unwrap();

        let flagged = bank.find_potential_money_laundering_customers(start);
        assert_eq!(flagged.len(), 1);

        let klaus = klaus_account.customer().unwrap();
        let entries = flagged.get(&klaus).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text(), "above 10K");
        assert!(fuzzy_eq(entries[0].amount(), 10000.01, PENNY_TOLERANCE));
        assert!(entries[0].entry_time() > start);
    }

    #[test]
    fn test_money_laundering_respects_since() {
        let bank = Bank::new();
        let account = bank.add_customer("Klaus", KLAUS).unwrap().add_account();
        account.deposit("big", 20000.0).unwrap();

        let later = Utc::now() + Duration::seconds(60);
        assert!(bank.find_potential_money_laundering_customers(later).is_empty());

        let entry_time = account.entries()[0].entry_time();
        assert_eq!(bank.find_potential_money_laundering_customers(entry_time).len(), 1);
    }

    #[test]
    fn test_money_laundering_keeps_account_order() {
        let start = Utc::now() - Duration::seconds(1);
        let bank = Bank::new();
        let klaus = bank.add_customer("Klaus", KLAUS).unwrap();
        let first = klaus.add_account();
        let second = klaus.add_account();

        second.deposit("second-a", 20000.0).unwrap();
        first.deposit("first-a", 30000.0).unwrap();
        second.deposit("second-b", 40000.0).unwrap();
        first.deposit("first-b", 50000.0).unwrap();

        let flagged = bank.find_potential_money_laundering_customers(start);
        let texts: Vec<&str> = flagged[&klaus].iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["first-a", "first-b", "second-a", "second-b"]);
    }

    #[test]
    fn test_scan_runs_alongside_deposits() {
        let start = Utc::now() - Duration::seconds(1);
        let bank = Bank::new();
        let account = bank.add_customer("Klaus", KLAUS).unwrap().add_account();

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..200 {
                    account.deposit("large", 20000.0).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..50 {
                    let flagged = bank.find_potential_money_laundering_customers(start);
                    assert!(flagged.values().all(|entries| entries.len() <= 200));
                }
            });
        });

        let flagged = bank.find_potential_money_laundering_customers(start);
        assert_eq!(flagged.values().next().unwrap().len(), 200);
    }
}
