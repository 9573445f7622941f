pub mod query;
pub mod source;

pub use query::BoundsQuery;
pub use source::{HttpRecordSource, RecordSource};
