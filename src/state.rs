use std::sync::Arc;

use crate::db::RatingStore;

#[derive(Clone)]
pub struct AppState {
    pub ratings: SharedRatingStore,
}

impl AppState {
    pub fn new(ratings: SharedRatingStore) -> Self {
        Self { ratings }
    }
}

pub type SharedRatingStore = Arc<dyn RatingStore>;
