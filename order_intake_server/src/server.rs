use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpServer,
};
use log::*;
use order_intake_engine::{OrderIntakeApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, preflight, AutomationOrderRoute, VoiceAgentWebhookRoute},
};

pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.auto_migrate {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ POI_AUTO_MIGRATE is off. Assuming the schema of {} is up to date.", config.database_url);
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let intake_api = OrderIntakeApi::new(db.clone(), config.pricing_policy());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("poi::access_log"))
            .wrap(cors_headers(&config.cors_allow_origin))
            .app_data(json_config())
            .app_data(web::Data::new(intake_api))
            .service(health)
            .service(preflight)
            .service(AutomationOrderRoute::<SqliteDatabase>::new())
            .service(VoiceAgentWebhookRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// The permissive cross-origin headers that are attached to every response.
pub fn cors_headers(allow_origin: &str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", allow_origin.to_string()))
        .add(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS))
        .add(("Access-Control-Allow-Methods", CORS_ALLOW_METHODS))
}

/// Webhook senders do not always set a JSON content type, so it is not required. Bodies that cannot be decoded are
/// answered with a `400` in the same `{ "error": ... }` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().content_type_required(false).error_handler(|err, req| {
        warn!("💻️ Could not decode the request body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
