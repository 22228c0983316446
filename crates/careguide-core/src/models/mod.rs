pub mod assessment;
pub mod cost;
pub mod recommendation;
pub mod record;
pub mod report;
pub mod summary;
pub mod token_count;
pub mod transaction;
