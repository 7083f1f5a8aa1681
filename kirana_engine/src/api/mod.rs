mod objects;
mod order_flow_api;

pub use objects::{CreatedOrder, NewOrderRequest, OrderWithItems, PaymentVerification};
pub use order_flow_api::OrderFlowApi;
