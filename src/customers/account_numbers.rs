use std::sync::atomic::{AtomicU64, Ordering};

/// Width of a rendered account number, zero-padded.
pub const ACCOUNT_NUMBER_WIDTH: usize = 9;

/// Bank-wide account number sequence shared by every customer of one bank.
/// Numbers start at 1 and are never handed out twice.
#[derive(Debug)]
pub struct AccountNumbers {
    next: AtomicU64,
}

impl AccountNumbers {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> String {
        let number = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{:0width$}", number, width = ACCOUNT_NUMBER_WIDTH)
    }
}

impl Default for AccountNumbers {
    fn default() -> Self {
        Self::new()
    }
}
