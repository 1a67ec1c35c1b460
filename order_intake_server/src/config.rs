use std::env;

use intake_common::{helpers::parse_boolean_flag, Money};
use log::*;
use order_intake_engine::{intake_api::pricing::DEFAULT_EXTRA_CHEESE_SURCHARGE, PricingPolicy};

const DEFAULT_POI_HOST: &str = "127.0.0.1";
const DEFAULT_POI_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/pizzeria.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_CORS_ALLOW_ORIGIN: &str = "*";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, the embedded database migrations are run when the server starts.
    pub auto_migrate: bool,
    /// Added to the unit price of an item for every "extra cheese" modifier.
    pub extra_cheese_surcharge: Money,
    /// The value of the `Access-Control-Allow-Origin` header sent with every response.
    pub cors_allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_POI_HOST.to_string(),
            port: DEFAULT_POI_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
            extra_cheese_surcharge: DEFAULT_EXTRA_CHEESE_SURCHARGE,
            cors_allow_origin: DEFAULT_CORS_ALLOW_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("POI_HOST").ok().unwrap_or_else(|| DEFAULT_POI_HOST.into());
        let port = env::var("POI_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for POI_PORT. {e} Using the default, {DEFAULT_POI_PORT}, instead."
                    );
                    DEFAULT_POI_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_POI_PORT);
        let database_url = env::var("POI_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ POI_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("POI_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for POI_DB_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let auto_migrate = parse_boolean_flag(env::var("POI_AUTO_MIGRATE").ok(), true);
        let extra_cheese_surcharge = configure_surcharge();
        let cors_allow_origin = env::var("POI_CORS_ALLOW_ORIGIN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CORS_ALLOW_ORIGIN.to_string());
        Self { host, port, database_url, max_connections, auto_migrate, extra_cheese_surcharge, cors_allow_origin }
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy::new(self.extra_cheese_surcharge)
    }
}

fn configure_surcharge() -> Money {
    env::var("POI_EXTRA_CHEESE_SURCHARGE")
        .map_err(|_| {
            info!(
                "🪛️ POI_EXTRA_CHEESE_SURCHARGE is not set. Using the default value of {DEFAULT_EXTRA_CHEESE_SURCHARGE}."
            )
        })
        .and_then(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| e.to_string())
                .and_then(|v| Money::try_from(v).map_err(|e| e.to_string()))
                .map_err(|e| warn!("🪛️ Invalid configuration value for POI_EXTRA_CHEESE_SURCHARGE. {e}"))
        })
        .ok()
        .filter(|m| !m.value().is_negative())
        .unwrap_or(DEFAULT_EXTRA_CHEESE_SURCHARGE)
}
