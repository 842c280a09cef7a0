//! AI polish integration for polish.
//!
//! A dedicated `std::thread` owns the blocking HTTP client. Requests arrive
//! over a crossbeam channel and replies go back to the UI as
//! `AppEvent::PolishResult`; segment computation stays on the UI thread.
pub mod types;
pub mod worker;
