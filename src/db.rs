use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteConnectOptions};
use std::str::FromStr;
use std::time::Duration;

pub async fn establish_connection(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        // Bound every persistence call; a timed-out acquire surfaces as a
        // 503 instead of hanging the request.
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    // Ejecutar migraciones
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("migrations executed successfully");

    Ok(pool)
}
