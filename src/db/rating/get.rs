use sqlx::PgPool;

use crate::{errors::AppError, models::Rating};

pub async fn get_all_ratings(postgres: &PgPool) -> Result<Vec<Rating>, AppError> {
    let ratings = sqlx::query_as::<_, Rating>(
        "SELECT id, beer_name, brewery, style, rating
			FROM beer_ratings
			ORDER BY id DESC",
    )
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::StorageFailure(format!("Failed to fetch ratings: {}", e)))?;

    Ok(ratings)
}
