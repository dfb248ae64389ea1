pub mod rating;
pub mod stats;

pub use rating::{NewRating, Rating};
pub use stats::{NO_RATINGS_YET, RatingStats};
