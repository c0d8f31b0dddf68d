pub mod get;
pub mod list;

pub use get::{GetClassError, GetClassQuery};
pub use list::{ListClassesError, ListClassesQuery};
