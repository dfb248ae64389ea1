use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored beer rating.
///
/// `brewery` is filled from the submission's `notes` field; there is no
/// separate brewery input. Clients read it under this name, so keep it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i32,
    pub beer_name: String,
    pub brewery: String,
    pub style: String,
    pub rating: i32,
}

/// A validated rating that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub beer_name: String,
    pub brewery: String,
    pub style: String,
    pub rating: i32,
}

impl NewRating {
    pub fn with_id(self, id: i32) -> Rating {
        Rating {
            id,
            beer_name: self.beer_name,
            brewery: self.brewery,
            style: self.style,
            rating: self.rating,
        }
    }
}
