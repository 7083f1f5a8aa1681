use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use kirana_engine::{
    traits::{EsewaStatusGateway, OrderGatewayDatabase},
    OrderFlowApi, SqliteDatabase,
};

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::esewa::EsewaStatusClient,
    routes::{
        admin_orders,
        cancel_order,
        create_order,
        delete_order,
        health,
        my_orders,
        order_by_id,
        track_order,
        update_order_status,
        verify_esewa,
    },
};

/// The concrete API type the production server runs on.
pub type OrderApi = OrderFlowApi<SqliteDatabase, EsewaStatusClient>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let gateway = EsewaStatusClient::new(&config.esewa)?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = OrderFlowApi::new(db.clone(), gateway.clone(), config.esewa.clone());
        let verifier = TokenVerifier::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("kps::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(verifier))
            .service(health)
            .service(web::scope("/api").configure(configure_order_routes::<SqliteDatabase, EsewaStatusClient>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Registers the order routes under the current scope. Generic so that tests can run the same routing table
/// against a mock status gateway. Literal paths must be registered before the `{id}` matcher.
pub fn configure_order_routes<B, G>(cfg: &mut web::ServiceConfig)
where
    B: OrderGatewayDatabase + 'static,
    G: EsewaStatusGateway + 'static,
{
    cfg.service(
        web::resource("/orders")
            .route(web::post().to(create_order::<B, G>))
            .route(web::get().to(my_orders::<B, G>)),
    )
    .service(web::resource("/orders/verify-esewa").route(web::post().to(verify_esewa::<B, G>)))
    .service(web::resource("/orders/my-orders").route(web::get().to(my_orders::<B, G>)))
    .service(web::resource("/orders/track/{reference}").route(web::get().to(track_order::<B, G>)))
    .service(web::resource("/orders/{id}/cancel").route(web::patch().to(cancel_order::<B, G>)))
    .service(web::resource("/orders/{id}/status").route(web::put().to(update_order_status::<B, G>)))
    .service(
        web::resource("/orders/{id}")
            .route(web::get().to(order_by_id::<B, G>))
            .route(web::delete().to(delete_order::<B, G>)),
    )
    .service(web::resource("/admin/orders").route(web::get().to(admin_orders::<B, G>)));
}
