use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::rating::{get_all_ratings, insert_rating},
    errors::AppError,
    models::{NewRating, Rating},
};

/// Append-only storage for ratings.
///
/// Implementations assign ids themselves and must keep them unique and
/// increasing under concurrent inserts. Nothing is ever updated or deleted.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Append a rating and return it with its assigned id.
    async fn insert(&self, rating: NewRating) -> Result<Rating, AppError>;

    /// Every stored rating, highest id first.
    async fn list_all(&self) -> Result<Vec<Rating>, AppError>;
}

#[derive(Clone)]
pub struct PgRatingStore {
    postgres: PgPool,
}

impl PgRatingStore {
    pub fn new(postgres: PgPool) -> Self {
        Self { postgres }
    }
}

#[async_trait]
impl RatingStore for PgRatingStore {
    async fn insert(&self, rating: NewRating) -> Result<Rating, AppError> {
        insert_rating(rating, &self.postgres).await
    }

    async fn list_all(&self) -> Result<Vec<Rating>, AppError> {
        get_all_ratings(&self.postgres).await
    }
}
