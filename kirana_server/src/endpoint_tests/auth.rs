use actix_web::{http::StatusCode, test::TestRequest};
use kirana_common::Secret;
use kirana_engine::test_utils::mock_gateway::MockStatusGateway;

use super::helpers::{init_orders_app, issue_expired_token, issue_token, send};
use crate::{
    auth::{Role, TokenIssuer},
    config::AuthConfig,
};

#[actix_web::test]
async fn bare_token_without_bearer_prefix_is_rejected() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let req = TestRequest::get().uri("/api/orders/my-orders").insert_header(("Authorization", token));
    let (status, body) = send(&app, req, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Expected a Bearer token"));
}

#[actix_web::test]
async fn forged_signature_is_rejected() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let forged = TokenIssuer::new(&AuthConfig { jwt_secret: Secret::new("a-completely-different-signing-key-here".to_string()) })
        .issue_token(1, Role::Admin, None)
        .unwrap();
    let (status, body) = send(&app, TestRequest::get().uri("/api/orders/my-orders"), &forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Access token signature is invalid"));
}

#[actix_web::test]
async fn corrupted_token_is_rejected() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let mut token = issue_token(1, Role::User);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let (status, _) = send(&app, TestRequest::get().uri("/api/orders/my-orders"), &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_expired_token(1, Role::User);
    let (status, body) = send(&app, TestRequest::get().uri("/api/orders/my-orders"), &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Access token has expired"));
}

#[actix_web::test]
async fn valid_token_passes() {
    let (app, _) = init_orders_app(MockStatusGateway::confirming()).await;
    let token = issue_token(1, Role::User);
    let (status, body) = send(&app, TestRequest::get().uri("/api/orders/my-orders"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
