pub mod export;
pub mod get;
pub mod list;
pub mod overview;

pub use get::{GetStudentError, GetStudentQuery};
pub use list::{ListStudentsError, ListStudentsQuery, StudentFilter};
pub use overview::{StudentOverview, StudentOverviewError, StudentOverviewQuery};
