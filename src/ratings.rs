use crate::{
    db::RatingStore,
    errors::AppError,
    export::ratings_to_csv,
    models::{Rating, RatingStats},
    stats::compute_stats,
    submission::{RawSubmission, normalize},
};

pub async fn list_ratings(store: &dyn RatingStore) -> Result<Vec<Rating>, AppError> {
    let ratings = store.list_all().await?;

    tracing::debug!("Loaded {} ratings", ratings.len());

    Ok(ratings)
}

pub async fn submit_rating(
    store: &dyn RatingStore,
    submission: &RawSubmission,
) -> Result<Rating, AppError> {
    let rating = normalize(submission)?;

    store.insert(rating).await
}

pub async fn get_stats(store: &dyn RatingStore) -> Result<RatingStats, AppError> {
    let ratings = store.list_all().await?;

    Ok(compute_stats(&ratings))
}

pub async fn export_ratings_csv(store: &dyn RatingStore) -> Result<String, AppError> {
    let ratings = store.list_all().await?;

    Ok(ratings_to_csv(&ratings))
}
