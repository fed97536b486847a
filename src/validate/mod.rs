//! Record validation module
//!
//! Turns one raw log line into either a [`NormalizedRecord`] or a
//! [`RejectionReason`].
//!
//! # Rules
//!
//! Checked in order, the first failure wins:
//! 1. The line must parse as JSON (`Invalid JSON`)
//! 2. `timestamp`, `user_id` and `action` must all be present (`Missing fields`)
//! 3. `timestamp` must match `YYYY-MM-DDTHH:MM:SSZ` (`Invalid timestamp format`)
//!
//! A passing record has its timestamp rewritten to `YYYY-MM-DD HH:MM:SS`
//! and gains a `day_of_week` field. Unknown keys pass through untouched.

mod types;
mod validator;

pub use types::{NormalizedRecord, RejectionReason, REQUIRED_FIELDS};
pub use validator::{parse_timestamp, validate, CANONICAL_TIMESTAMP_FORMAT, INPUT_TIMESTAMP_FORMAT};

#[cfg(test)]
mod tests;
