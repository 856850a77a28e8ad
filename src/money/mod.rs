pub mod fuzzy;

pub use fuzzy::{fuzzy_cmp, fuzzy_eq, MONEY_LAUNDERING_LIMIT, PENNY_TOLERANCE};
