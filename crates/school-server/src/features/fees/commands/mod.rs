pub mod create;
pub mod delete;
pub mod mark_overdue;
pub mod pay;
pub mod update;

pub use create::{CreateFeeRecordCommand, CreateFeeRecordError};
pub use delete::{DeleteFeeRecordCommand, DeleteFeeRecordError, DeleteFeeRecordResponse};
pub use mark_overdue::{MarkOverdueCommand, MarkOverdueError, MarkOverdueResponse};
pub use pay::{PayFeeRecordCommand, PayFeeRecordError};
pub use update::{UpdateFeeRecordCommand, UpdateFeeRecordError};
