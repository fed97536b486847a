//! Aggregate query module
//!
//! Reads the most recently modified clean artifact and counts today's
//! logins. Nothing is cached; each call lists and reads storage afresh.

mod logins;

pub use logins::{count_logins, LoginCount, LoginQuery, LOGIN_ACTION};

#[cfg(test)]
mod tests;
