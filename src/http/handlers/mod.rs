pub mod rating;

pub use rating::{
    export_ratings_handler, get_stats_handler, list_ratings_handler, submit_rating_handler,
};
