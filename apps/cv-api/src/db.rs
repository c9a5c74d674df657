use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Opens the Postgres pool and brings the `cv_documents` schema up to date.
pub async fn connect_and_migrate(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max {max_connections} connections)...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("could not connect to PostgreSQL")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("could not apply cv_documents migrations")?;

    info!("PostgreSQL ready, migrations applied");
    Ok(pool)
}
