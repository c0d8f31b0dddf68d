pub mod export;
pub mod get;
pub mod list;

pub use get::{GetTeacherError, GetTeacherQuery};
pub use list::{ListTeachersError, ListTeachersQuery, TeacherFilter};
