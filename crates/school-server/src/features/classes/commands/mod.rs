pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateClassCommand, CreateClassError};
pub use delete::{DeleteClassCommand, DeleteClassError, DeleteClassResponse};
pub use update::{UpdateClassCommand, UpdateClassError};
