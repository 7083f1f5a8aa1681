use chrono::{Datelike, Utc};

use crate::db_types::OrderReference;

/// Generates a new order reference of the form `ORD-{year}-{epoch_millis}-{nonce}`.
///
/// The reference doubles as the payment gateway's `transaction_uuid`, so it must be unique across all orders. The
/// timestamp alone is not enough under concurrent creation (every order placed in the same millisecond would share
/// it), so a random 32-bit nonce is appended. The unique `reference` column is the backstop.
pub fn generate_reference() -> OrderReference {
    let now = Utc::now();
    let nonce = rand::random::<u32>();
    OrderReference(format!("ORD-{}-{}-{nonce:08x}", now.year(), now.timestamp_millis()))
}
