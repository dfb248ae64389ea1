use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const NO_RATINGS_YET: &str = "No ratings yet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_beers: usize,
    pub most_popular_style: String,
    pub most_rated_brewery: String,
    // Integer keys serialize as JSON object keys ("1", "2", ...).
    pub rating_counts: BTreeMap<i32, usize>,
}

impl Default for RatingStats {
    fn default() -> Self {
        Self {
            total_beers: 0,
            most_popular_style: NO_RATINGS_YET.to_string(),
            most_rated_brewery: NO_RATINGS_YET.to_string(),
            rating_counts: BTreeMap::new(),
        }
    }
}
