use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{NewRating, Rating},
};

pub async fn insert_rating(rating: NewRating, postgres: &PgPool) -> Result<Rating, AppError> {
    let rating = sqlx::query_as::<_, Rating>(
        "INSERT INTO beer_ratings (beer_name, brewery, style, rating)
        VALUES ($1, $2, $3, $4)
        RETURNING id, beer_name, brewery, style, rating",
    )
    .bind(&rating.beer_name)
    .bind(&rating.brewery)
    .bind(&rating.style)
    .bind(rating.rating)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::StorageFailure(format!("Failed to insert rating: {}", e)))?;

    tracing::info!("Inserted rating for {} (ID: {})", rating.beer_name, rating.id);

    Ok(rating)
}
