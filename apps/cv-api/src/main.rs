mod attachments;
mod config;
mod cv;
mod db;
mod errors;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::attachments::S3AttachmentStore;
use crate::config::Config;
use crate::cv::progress::RedisProgressStore;
use crate::cv::repository::PgCvRepository;
use crate::db::connect_and_migrate;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL holds one JSONB document per user
    let db = connect_and_migrate(&config.database_url, config.database_max_connections).await?;

    // Redis backs the step-completion hook
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let state = AppState {
        cvs: Arc::new(PgCvRepository::new(db)),
        progress: Arc::new(RedisProgressStore::new(redis)),
        attachments: Arc::new(S3AttachmentStore::new(
            s3,
            config.s3_bucket.clone(),
            config.s3_public_url.clone(),
        )),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds an S3 client against MinIO locally or AWS in production.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "cv-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not virtual host
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
