//! One-shot maintenance jobs, invoked by an external scheduler through the
//! `crm_jobs` binary. Each job talks to the API over HTTP and appends
//! human-readable lines to its own log file.

pub mod client;
pub mod heartbeat;
pub mod log_file;
pub mod low_stock;
pub mod order_reminders;
pub mod report;
