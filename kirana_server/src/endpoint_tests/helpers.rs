use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
};
use chrono::Duration;
use kirana_common::Secret;
use kirana_engine::{
    db_types::Product,
    esewa::EsewaConfig,
    test_utils::{
        mock_gateway::MockStatusGateway,
        prepare_env::{prepare_test_env, random_db_path, seed_products},
    },
    OrderFlowApi, SqliteDatabase,
};

use crate::{
    auth::{Role, TokenIssuer, TokenVerifier},
    config::AuthConfig,
    routes::health,
    server::configure_order_routes,
};

// Test signing key. DO NOT re-use this key anywhere.
const TEST_JWT_SECRET: &str = "kirana-endpoint-tests-signing-key-0000";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()) }
}

pub fn issue_token(user_id: i64, role: Role) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(user_id, role, None).expect("Failed to sign token")
}

pub fn issue_expired_token(user_id: i64, role: Role) -> String {
    TokenIssuer::new(&test_auth_config())
        .issue_token(user_id, role, Some(Duration::hours(-2)))
        .expect("Failed to sign token")
}

/// Spins up the full routing table against a fresh seeded database and the given mock gateway.
pub async fn init_orders_app(
    gateway: MockStatusGateway,
) -> (impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>, Vec<Product>)
{
    let _ = env_logger::try_init().ok();
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let products = seed_products(&db).await;
    let api = OrderFlowApi::new(db, gateway, EsewaConfig::default());
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(TokenVerifier::new(&test_auth_config())))
        .service(health)
        .service(web::scope("/api").configure(configure_order_routes::<SqliteDatabase, MockStatusGateway>));
    (test::init_service(app).await, products)
}

pub async fn send<S, B>(service: &S, mut req: TestRequest, token: &str) -> (StatusCode, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
    B::Error: std::fmt::Debug,
{
    if !token.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    let res = test::call_service(service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn order_body(product_id: i64, quantity: i64, mode: &str) -> serde_json::Value {
    serde_json::json!({
        "items": [{ "product_id": product_id, "quantity": quantity }],
        "buyer_name": "Asha Gurung",
        "address": "Thamel, Kathmandu",
        "payment_mode": mode,
    })
}
