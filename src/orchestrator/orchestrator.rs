use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Writer};
use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::bank::Bank;
use crate::customers::Customer;
use crate::orchestrator::record::{BalanceRow, FlaggedEntryRow, LedgerRecord, RecordType};

/// Replay `filename` into a fresh bank and print either the balances or,
/// when `since` is given, the money-laundering report.
pub fn run(filename: &str, since: Option<DateTime<Utc>>) -> Result<(), Box<dyn Error>> {
    let file = File::open(filename)?;
    let bank = Bank::new();
    let applied = replay(&bank, file)?;
    info!("replayed {} record(s) from {}", applied, filename);

    match since {
        Some(since) => write_flagged_entries(&bank, since, io::stdout()),
        None => write_balances(&bank, io::stdout()),
    }
}

/// Apply every record in `input` to `bank`. Records the bank rejects are
/// logged and skipped; malformed CSV aborts the replay.
/// Returns the number of records applied.
pub fn replay<R: Read>(bank: &Bank, input: R) -> Result<usize, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut applied = 0;

    for result in rdr.deserialize() {
        let record: LedgerRecord = result?;
        match apply_record(bank, &record) {
            Ok(()) => applied += 1,
            Err(e) => warn!("skipping {:?}: {}", record, e),
        }
    }

    Ok(applied)
}

/// Apply a single record. Unknown customers and accounts, and missing
/// amounts, are reported as errors.
pub fn apply_record(bank: &Bank, record: &LedgerRecord) -> Result<(), Box<dyn Error>> {
    match record.kind {
        RecordType::Customer => {
            bank.add_customer(record.name.as_deref().unwrap_or_default(), &record.national_id)?;
        }
        RecordType::Open => {
            customer_of(bank, record)?.add_account();
        }
        RecordType::Rename => {
            customer_of(bank, record)?.set_name(record.name.clone().unwrap_or_default());
        }
        RecordType::Deposit | RecordType::Withdraw => {
            let customer = customer_of(bank, record)?;
            let number = record.account.as_deref().unwrap_or_default();
            let account = customer
                .find_account(number)
                .ok_or_else(|| format!("unknown account {:?} for {}", number, record.national_id))?;
            let text = record.text.as_deref().unwrap_or_default();
            let amount = record.amount.ok_or("amount is required")?;

            if record.kind == RecordType::Deposit {
                account.deposit(text, amount)?;
            } else {
                account.withdraw(text, amount)?;
            }
        }
    }
    Ok(())
}

fn customer_of(bank: &Bank, record: &LedgerRecord) -> Result<Arc<Customer>, Box<dyn Error>> {
    let customer = bank
        .find_customer(&record.national_id)?
        .ok_or_else(|| format!("unknown customer {}", record.national_id))?;
    Ok(customer)
}

/// Write one row per account with its balance, ordered by national id
/// and then account number.
pub fn write_balances<W: Write>(bank: &Bank, output: W) -> Result<(), Box<dyn Error>> {
    let mut customers = bank.customers();
    customers.sort_by(|a, b| a.national_id().cmp(b.national_id()));

    let mut wtr = Writer::from_writer(output);
    for customer in customers {
        let name = customer.name();
        for account in customer.accounts() {
            wtr.serialize(BalanceRow {
                national_id: customer.national_id().to_string(),
                name: name.clone(),
                account: account.account_number().to_string(),
                balance: money(account.calculate_balance())?,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write the entries flagged by the money-laundering scan since `since`,
/// ordered by national id; each customer's entries keep their scan order.
pub fn write_flagged_entries<W: Write>(
    bank: &Bank,
    since: DateTime<Utc>,
    output: W,
) -> Result<(), Box<dyn Error>> {
    let mut flagged: Vec<_> = bank
        .find_potential_money_laundering_customers(since)
        .into_iter()
        .collect();
    flagged.sort_by(|(a, _), (b, _)| a.national_id().cmp(b.national_id()));

    let mut wtr = Writer::from_writer(output);
    for (customer, entries) in flagged {
        let name = customer.name();
        for entry in entries {
            let account = entry
                .account()
                .map(|account| account.account_number().to_string())
                .unwrap_or_default();
            wtr.serialize(FlaggedEntryRow {
                national_id: customer.national_id().to_string(),
                name: name.clone(),
                account,
                entry_id: entry.id().to_string(),
                entry_time: entry.entry_time(),
                text: entry.text().to_string(),
                amount: money(entry.amount())?,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn money(amount: f64) -> Result<Decimal, Box<dyn Error>> {
    let value = Decimal::from_f64(amount)
        .ok_or_else(|| format!("amount {} cannot be rendered", amount))?;
    Ok(value.round_dp(2))
}
