use actix_web::{http::StatusCode, test::TestRequest};
use kirana_engine::{
    esewa::DEFAULT_ESEWA_SECRET,
    test_utils::{
        callbacks::{encode_callback, signed_callback},
        mock_gateway::{MockGatewayResponse, MockStatusGateway},
    },
};
use serde_json::Value;

use super::helpers::{init_orders_app, issue_token, order_body, send};
use crate::auth::Role;

#[actix_web::test]
async fn health_check() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let (status, body) = send(&app, TestRequest::get().uri("/health"), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn create_order_requires_a_token() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 1, "cash"));
    let (status, body) = send(&app, req, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"));
}

#[actix_web::test]
async fn create_and_fetch_an_order() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 2, "esewa"));
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    let order_id = created["order"]["id"].as_i64().unwrap();
    let reference = created["order"]["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("ORD-"));
    assert_eq!(created["esewa"]["total_amount"], "2400");
    assert_eq!(created["esewa"]["transaction_uuid"].as_str().unwrap(), reference);

    let (status, body) = send(&app, TestRequest::get().uri("/api/orders/my-orders"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&reference));

    let (status, _) = send(&app, TestRequest::get().uri(&format!("/api/orders/{order_id}")), &token).await;
    assert_eq!(status, StatusCode::OK);

    // Another user cannot see it
    let stranger = issue_token(2, Role::User);
    let (status, _) = send(&app, TestRequest::get().uri(&format!("/api/orders/{order_id}")), &stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn short_stock_is_a_bad_request() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[2].id, 1, "cash"));
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Insufficient stock"));
}

#[actix_web::test]
async fn verify_esewa_payment_end_to_end() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 2, "esewa"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let reference = created["order"]["reference"].as_str().unwrap().to_string().into();

    let cb = signed_callback(&reference, "2400", "000AWEO", DEFAULT_ESEWA_SECRET);
    let payload = serde_json::json!({ "data": encode_callback(&cb) });
    let req = TestRequest::post().uri("/api/orders/verify-esewa").set_json(&payload);
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["already_verified"], false);
    assert_eq!(result["order"]["payment_status"], "done");
    assert_eq!(result["order"]["transaction_code"], "000AWEO");

    // Replays are acknowledged, not re-applied
    let req = TestRequest::post().uri("/api/orders/verify-esewa").set_json(&payload);
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["already_verified"], true);
}

#[actix_web::test]
async fn tampered_callback_gets_a_vague_answer() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 2, "esewa"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let reference = created["order"]["reference"].as_str().unwrap().to_string().into();

    let mut cb = signed_callback(&reference, "2400", "000AWEO", DEFAULT_ESEWA_SECRET);
    cb.total_amount = "1".to_string();
    let payload = serde_json::json!({ "data": encode_callback(&cb) });
    let req = TestRequest::post().uri("/api/orders/verify-esewa").set_json(&payload);
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // No detail about which check failed
    assert!(body.contains("Payment could not be verified"));
    assert!(!body.contains("ignature"));
}

#[actix_web::test]
async fn gateway_disagreement_is_a_bad_request() {
    let gateway = MockStatusGateway::with_response(MockGatewayResponse::Other("PENDING".to_string()));
    let (app, products) = init_orders_app(gateway).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 2, "esewa"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let reference = created["order"]["reference"].as_str().unwrap().to_string().into();

    let cb = signed_callback(&reference, "2400", "000AWEO", DEFAULT_ESEWA_SECRET);
    let payload = serde_json::json!({ "data": encode_callback(&cb) });
    let req = TestRequest::post().uri("/api/orders/verify-esewa").set_json(&payload);
    let (status, body) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Payment is not complete"));
}

#[actix_web::test]
async fn tracking_needs_no_token() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 1, "cash"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let reference = created["order"]["reference"].as_str().unwrap();

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/api/orders/track/{reference}")), "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(reference));

    let (status, _) = send(&app, TestRequest::get().uri("/api/orders/track/ORD-0000-0"), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn cancel_then_delete() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 1, "cash"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let order_id = created["order"]["id"].as_i64().unwrap();

    // Deleting before cancelling is refused
    let (status, _) = send(&app, TestRequest::delete().uri(&format!("/api/orders/{order_id}")), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send(&app, TestRequest::patch().uri(&format!("/api/orders/{order_id}/cancel")), &token).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["order_status"], "cancelled");

    let (status, body) = send(&app, TestRequest::delete().uri(&format!("/api/orders/{order_id}")), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order deleted"));
}

#[actix_web::test]
async fn admin_listing_is_admin_only_and_filters_by_payment_status() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 1, "cash"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let reference = created["order"]["reference"].as_str().unwrap().to_string();

    let (status, _) = send(&app, TestRequest::get().uri("/api/admin/orders"), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = issue_token(99, Role::Admin);
    let (status, body) = send(&app, TestRequest::get().uri("/api/admin/orders"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&reference));

    let (status, body) =
        send(&app, TestRequest::get().uri("/api/admin/orders?payment_status=pending"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&reference));

    let (status, body) = send(&app, TestRequest::get().uri("/api/admin/orders?payment_status=done"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn fulfilment_updates_are_admin_only() {
    let (app, products) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::post().uri("/api/orders").set_json(order_body(products[0].id, 1, "cash"));
    let (_, body) = send(&app, req, &token).await;
    let created: Value = serde_json::from_str(&body).unwrap();
    let order_id = created["order"]["id"].as_i64().unwrap();

    let update = serde_json::json!({ "status": "processing" });
    let req = TestRequest::put().uri(&format!("/api/orders/{order_id}/status")).set_json(&update);
    let (status, _) = send(&app, req, &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = issue_token(99, Role::Admin);
    let req = TestRequest::put().uri(&format!("/api/orders/{order_id}/status")).set_json(&update);
    let (status, body) = send(&app, req, &admin).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["order_status"], "processing");

    // Backwards moves are refused
    let update = serde_json::json!({ "status": "pending" });
    let req = TestRequest::put().uri(&format!("/api/orders/{order_id}/status")).set_json(&update);
    let (status, _) = send(&app, req, &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
