mod batch;
mod query;

pub use crate::statement::batch::{Batch, BatchEntry, MAX_BATCH_STATEMENTS};
pub use crate::statement::query::Query;
