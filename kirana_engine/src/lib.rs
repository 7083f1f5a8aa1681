//! Kirana Order Engine
//!
//! The order engine owns the hard part of the Kirana storefront backend: the order lifecycle and its reconciliation
//! with the eSewa payment gateway. It keeps local database state consistent with an untrusted external payment
//! callback while preventing oversell of stock and double-processing of confirmations.
//!
//! The library is split along two seams:
//! 1. Storage. Backends implement [`traits::OrderGatewayDatabase`]; SQLite is the bundled implementation
//!    ([`SqliteDatabase`]). Callers should never reach for the database directly; the public API goes through
//!    [`OrderFlowApi`]. The data types stored in the database live in [`db_types`] and are public.
//! 2. The gateway boundary. Callback payloads, HMAC signing and the verification pipeline live in [`esewa`];
//!    cross-verification against the gateway's status API goes through [`traits::EsewaStatusGateway`] so that
//!    servers and tests can supply their own transport.

mod api;
mod sqlite;

pub mod db_types;
pub mod esewa;
pub mod helpers;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{CreatedOrder, NewOrderRequest, OrderFlowApi, OrderWithItems, PaymentVerification};
pub use sqlite::{db, SqliteDatabase};
