//! Persistence operations over the entity store.
//!
//! Every function takes a plain `AsyncPgConnection` so callers decide whether it
//! runs on a pooled connection or inside an outer transaction. Writes that touch
//! more than one row open their own transaction.

pub mod customers;
pub mod orders;
pub mod products;
