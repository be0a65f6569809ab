//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `gate::GateError` and `kernel::error::AppError`.

use anyhow::Context;
use gate::{
    Credentials, GateConfig, Pipeline, PresignedUrlIssuer, Services, StorageConfig, gate_router,
};
use platform::clock::{Clock, SystemClock};
use platform::crypto::from_base64;
use pow::{ExpiryStrategy, PowConfig};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gate=info,pow=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pow_config = load_pow_config()?;
    pow_config
        .validate()
        .context("Invalid PoW configuration")?;

    let storage = load_storage_config();
    storage
        .validate()
        .context("Object storage configuration missing")?;

    let gate_config = load_gate_config();
    tracing::info!(
        debug = gate_config.debug,
        expiry_strategy = pow_config.expiry_strategy.as_str(),
        web_root = ?gate_config.web_root,
        bucket = %storage.bucket,
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let credentials = Arc::new(storage.credentials.clone());
    let issuer = PresignedUrlIssuer::new(
        Arc::new(storage),
        gate_config.signed_url_expires,
        clock.clone(),
    );

    let pipeline = Pipeline::new(Services {
        config: Arc::new(gate_config),
        pow: Arc::new(pow_config),
        issuer: Arc::new(issuer),
        clock,
        credentials,
    });

    // CORS preflight is answered by the pipeline itself
    let app = gate_router(pipeline).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .context("LISTEN_ADDR must be host:port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// PoW settings; the secret is mandatory outside debug builds
fn load_pow_config() -> anyhow::Result<PowConfig> {
    let mut config = match env_opt("CHALLENGE_SECRET") {
        Some(secret_b64) => {
            let secret =
                from_base64(secret_b64.trim()).context("CHALLENGE_SECRET must be base64")?;
            PowConfig::with_secret(secret)
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("CHALLENGE_SECRET not set, using a random secret for this process");
            PowConfig::with_random_secret()
        }
        None => anyhow::bail!("CHALLENGE_SECRET must be set in production"),
    };

    if let Some(strategy) = env_opt("POW_EXPIRY_STRATEGY") {
        config.expiry_strategy = strategy.parse::<ExpiryStrategy>()?;
    }
    if let Some(rate) = env_opt("HASHRATE_MIN") {
        config.hashrate_min = rate.parse().context("HASHRATE_MIN must be an integer")?;
    }
    if let Some(rate) = env_opt("HASHRATE_AVG") {
        config.hashrate_avg = rate.parse().context("HASHRATE_AVG must be an integer")?;
    }

    Ok(config)
}

fn load_storage_config() -> StorageConfig {
    StorageConfig {
        base_url: env_opt("BASE_URL").unwrap_or_default(),
        bucket: env_opt("BUCKET").unwrap_or_default(),
        region: env_opt("REGION").unwrap_or_default(),
        credentials: Credentials {
            access_key_id: env_opt("ACCESS_KEY_ID").unwrap_or_default(),
            access_key_secret: env_opt("ACCESS_KEY_SECRET").unwrap_or_default(),
            security_token: env_opt("SECURITY_TOKEN"),
        },
    }
}

fn load_gate_config() -> GateConfig {
    GateConfig {
        debug: env_flag("DEBUG"),
        web_root: env_opt("WEB_ROOT").map(PathBuf::from),
        favorite_character: env_opt("FAC"),
        easter_egg: env_flag("EASTER_EGG"),
        ..GateConfig::default()
    }
}

/// Non-empty environment variable
fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str) -> bool {
    env_opt(name).is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}
