pub mod get;
pub mod init;
pub mod post;

pub use get::get_all_ratings;
pub use init::initialize_schema;
pub use post::insert_rating;
