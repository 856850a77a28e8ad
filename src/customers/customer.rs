use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use log::debug;

use crate::accounts::Account;
use crate::customers::AccountNumbers;

/// A bank customer, identified by national id. The display name can be
/// changed at any time; the id never changes.
#[derive(Debug)]
pub struct Customer {
    this: Weak<Customer>,
    name: RwLock<String>,
    national_id: String,
    accounts: Mutex<Vec<Arc<Account>>>,
    account_numbers: Arc<AccountNumbers>,
}

impl Customer {
    pub(crate) fn new(
        name: String,
        national_id: String,
        account_numbers: Arc<AccountNumbers>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            name: RwLock::new(name),
            national_id,
            accounts: Mutex::new(Vec::new()),
            account_numbers,
        })
    }

    pub fn name(&self) -> String {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write().unwrap_or_else(PoisonError::into_inner) = name.into();
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    /// Open a new account with the next bank-wide account number.
    pub fn add_account(&self) -> Arc<Account> {
        let mut accounts = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Allocated under the list lock so list order follows number order.
        let account_number = self.account_numbers.allocate();
        let account = Account::new(self.this.clone(), account_number);
        accounts.push(Arc::clone(&account));

        debug!(
            "customer {}: opened account {}",
            self.national_id,
            account.account_number()
        );
        account
    }

    pub fn find_account(&self, account_number: &str) -> Option<Arc<Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|account| account.account_number() == account_number)
            .cloned()
    }

    /// Snapshot of the accounts in opening order.
    pub fn accounts(&self) -> Vec<Arc<Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.national_id == other.national_id
    }
}

impl Eq for Customer {}

impl Hash for Customer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.national_id.hash(state);
    }
}
