//! Class management
//!
//! Classes are unique per (name, section, academic year). The enrolment
//! count is maintained by the student commands; the incharge is maintained
//! by the class-incharge commands.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::classes_routes;
pub use types::ClassDetail;
