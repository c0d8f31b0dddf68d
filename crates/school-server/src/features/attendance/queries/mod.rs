pub mod list;
pub mod report;
pub mod student_summary;

pub use list::{AttendanceDetail, ListAttendanceError, ListAttendanceQuery};
pub use report::{AttendanceReportError, AttendanceReportQuery, ClassAttendanceReport};
pub use student_summary::{StudentSummary, StudentSummaryError, StudentSummaryQuery};
