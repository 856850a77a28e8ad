pub mod account_numbers;
pub mod customer;

pub use account_numbers::AccountNumbers;
pub use customer::Customer;
