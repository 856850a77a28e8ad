pub mod orchestrator;
pub mod record;

pub use orchestrator::{apply_record, replay, run, write_balances, write_flagged_entries};
pub use record::{LedgerRecord, RecordType};
