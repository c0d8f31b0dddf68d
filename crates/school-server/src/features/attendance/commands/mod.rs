pub mod delete;
pub mod mark;
pub mod update;

pub use delete::{DeleteAttendanceCommand, DeleteAttendanceError, DeleteAttendanceResponse};
pub use mark::{MarkAttendanceCommand, MarkAttendanceError, MarkAttendanceResponse, MarkEntry};
pub use update::{UpdateAttendanceCommand, UpdateAttendanceError};
