pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateTeacherCommand, CreateTeacherError};
pub use delete::{DeleteTeacherCommand, DeleteTeacherError, DeleteTeacherResponse};
pub use update::{UpdateTeacherCommand, UpdateTeacherError};

/// Which unique key a duplicate insert or update hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateTeacherField {
    EmployeeId,
    Email,
}

impl DuplicateTeacherField {
    pub(crate) fn from_constraint(constraint: Option<&str>) -> Self {
        match constraint {
            Some("teachers_email_key") => DuplicateTeacherField::Email,
            _ => DuplicateTeacherField::EmployeeId,
        }
    }
}

impl std::fmt::Display for DuplicateTeacherField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateTeacherField::EmployeeId => write!(f, "employee id"),
            DuplicateTeacherField::Email => write!(f, "email"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_from_constraint() {
        assert_eq!(
            DuplicateTeacherField::from_constraint(Some("teachers_email_key")),
            DuplicateTeacherField::Email
        );
        assert_eq!(
            DuplicateTeacherField::from_constraint(Some("teachers_employee_id_key")),
            DuplicateTeacherField::EmployeeId
        );
    }
}
