pub mod get;
pub mod list;
pub mod outstanding;

pub use get::{GetFeeRecordError, GetFeeRecordQuery};
pub use list::{FeeRecordDetail, ListFeeRecordsError, ListFeeRecordsQuery};
pub use outstanding::OutstandingFees;
