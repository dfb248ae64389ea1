use sqlx::PgPool;

use crate::errors::AppError;

pub async fn initialize_schema(postgres: &PgPool) -> Result<(), AppError> {
    tracing::info!("Ensuring beer_ratings table exists...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS beer_ratings (
            id SERIAL PRIMARY KEY,
            beer_name TEXT NOT NULL,
            brewery TEXT NOT NULL DEFAULT '',
            style TEXT NOT NULL DEFAULT '',
            rating INTEGER NOT NULL
        )",
    )
    .execute(postgres)
    .await
    .map_err(|e| AppError::StorageFailure(format!("Failed to create beer_ratings: {}", e)))?;

    Ok(())
}
