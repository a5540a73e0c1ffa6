//! Persistent run counter
//!
//! A single non-negative integer stored as decimal text in `logs/run.txt`.
//! It tags every log panel of a process and is bumped once when the process
//! completes. There is no locking: two processes finishing at the same time
//! can lose an increment.

mod store;

pub use store::{InitOutcome, RunCounter};
