//! The seams between the engine and the outside world.
//!
//! [`OrderGatewayDatabase`] is the persistence boundary: everything the order flow needs from storage, expressed as
//! atomic operations so that backends can enforce the stock and payment invariants inside their own transactions.
//! [`EsewaStatusGateway`] is the cross-verification boundary to the payment gateway's status API.

mod order_gateway_database;
mod status_gateway;

pub use order_gateway_database::{OrderGatewayDatabase, OrderGatewayError, PaymentOutcome};
pub use status_gateway::{EsewaStatusGateway, GatewayStatus, StatusGatewayError};
