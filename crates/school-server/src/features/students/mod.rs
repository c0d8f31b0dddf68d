//! Student records
//!
//! Creating, moving and deleting a student keeps the owning class's
//! `current_students` count in step inside the same transaction
//! (see [`enrollment`]).

pub mod commands;
pub mod enrollment;
pub mod queries;
pub mod routes;

pub use routes::students_routes;
