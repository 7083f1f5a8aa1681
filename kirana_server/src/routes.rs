//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the storage backend and the status gateway so that tests can supply their own; the
//! concrete types are fixed when the routes are registered in [`crate::server`].

use actix_web::{get, web, HttpResponse, Responder};
use kirana_engine::{
    db_types::OrderReference,
    traits::{EsewaStatusGateway, OrderGatewayDatabase},
    NewOrderRequest, OrderFlowApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{JsonResponse, OrderListQuery, UpdateStatusRequest, VerifyEsewaRequest},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------

/// Route handler for `POST /api/orders`.
///
/// Places an order for the authenticated user. The response carries the order, its lines and, for eSewa orders,
/// the signed payment request the client must post to the gateway.
pub async fn create_order<B, G>(
    claims: JwtClaims,
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    debug!("💻️ POST order for user #{}", claims.sub);
    let created = api.create_order(claims.sub, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Route handler for `POST /api/orders/verify-esewa`.
///
/// Takes the base64 payload from the gateway redirect and runs the full verification pipeline over it. Replays of
/// an already-verified payment return 200 with `already_verified: true`.
pub async fn verify_esewa<B, G>(
    claims: JwtClaims,
    body: web::Json<VerifyEsewaRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    debug!("💻️ POST verify eSewa payment from user #{}", claims.sub);
    let result = api.verify_esewa_payment(&body.data).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Route handler for `GET /api/orders/my-orders`.
pub async fn my_orders<B, G>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    debug!("💻️ GET my orders for user #{}", claims.sub);
    let orders = api.my_orders(claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Route handler for `GET /api/orders/{id}`. Only the order's owner can see it.
pub async fn order_by_id<B, G>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    let order_id = path.into_inner();
    debug!("💻️ GET order #{order_id} for user #{}", claims.sub);
    let order = api.order_by_id(order_id, claims.sub).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// Route handler for `GET /api/orders/track/{reference}`.
///
/// The post-payment landing page looks orders up by their public reference before the buyer has re-authenticated,
/// so this endpoint is deliberately unauthenticated.
pub async fn track_order<B, G>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    let reference = OrderReference::from(path.into_inner());
    debug!("💻️ GET tracking info for order [{reference}]");
    let order = api.track_order(&reference).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// Route handler for `PATCH /api/orders/{id}/cancel`.
pub async fn cancel_order<B, G>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    let order_id = path.into_inner();
    debug!("💻️ PATCH cancel order #{order_id} for user #{}", claims.sub);
    let order = api.cancel_order(order_id, claims.sub).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// Route handler for `DELETE /api/orders/{id}`. Only cancelled orders can be deleted.
pub async fn delete_order<B, G>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    let order_id = path.into_inner();
    debug!("💻️ DELETE order #{order_id} for user #{}", claims.sub);
    api.delete_order(order_id, claims.sub).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Order deleted")))
}

/// Route handler for `GET /api/admin/orders`. Lists every order in the system, newest first; a `payment_status`
/// query parameter narrows the listing. Admin only.
pub async fn admin_orders<B, G>(
    claims: JwtClaims,
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    claims.require_admin()?;
    debug!("💻️ GET all orders (filter: {:?}) by admin #{}", query.payment_status, claims.sub);
    let orders = api.all_orders(query.payment_status).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Route handler for `PUT /api/orders/{id}/status`. Admins move orders through fulfilment; only forward moves are
/// accepted and cancellation is rejected here because it must go through the cancel endpoint.
pub async fn update_order_status<B, G>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    claims.require_admin()?;
    let order_id = path.into_inner();
    debug!("💻️ PUT order #{order_id} status to {} by admin #{}", body.status, claims.sub);
    let order = api.advance_order_status(order_id, body.status).await?;
    Ok(HttpResponse::Ok().json(order))
}
