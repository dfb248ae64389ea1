use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    db::store::RatingStore,
    errors::AppError,
    models::{NewRating, Rating},
};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRatingStore {
    inner: Mutex<MemoryLog>,
}

#[derive(Default)]
struct MemoryLog {
    last_id: i32,
    ratings: Vec<Rating>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    async fn insert(&self, rating: NewRating) -> Result<Rating, AppError> {
        let mut log = self.inner.lock().await;

        // id and append happen under one lock
        let id = log
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::StorageFailure("Rating id space exhausted".into()))?;
        let rating = rating.with_id(id);

        log.last_id = id;
        log.ratings.push(rating.clone());

        tracing::info!("Inserted rating for {} (ID: {})", rating.beer_name, rating.id);

        Ok(rating)
    }

    async fn list_all(&self) -> Result<Vec<Rating>, AppError> {
        let log = self.inner.lock().await;

        Ok(log.ratings.iter().rev().cloned().collect())
    }
}
