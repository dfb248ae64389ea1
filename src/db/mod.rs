pub mod memory;
pub mod rating;
pub mod store;

pub use memory::MemoryRatingStore;
pub use rating::initialize_schema;
pub use store::{PgRatingStore, RatingStore};
