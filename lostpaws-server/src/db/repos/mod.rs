//! Repository implementations for database access
//!
//! One repository per table. Every entity is create-then-immutable:
//! there are no update operations, and deletion exists only for pets
//! (reports go away through the ON DELETE CASCADE on their pet).
//! Constraint violations are classified here so callers can tell a
//! duplicate e-mail from a dangling reference without parsing
//! SQLSTATEs themselves.

pub mod pets;
pub mod reports;
pub mod users;

pub use pets::{NewPet, PetRepo, PetWithOwner};
pub use reports::{NewReport, ReportRepo, ReportView};
pub use users::{NewUser, User, UserRepo};

/// Database error type shared by all repositories
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    #[error("foreign key '{constraint}' violated")]
    ForeignKeyViolation { constraint: String },

    #[error("check constraint '{constraint}' violated")]
    CheckViolation { constraint: String },

    #[error("corrupt row: column '{column}' held '{value}'")]
    Decode { column: &'static str, value: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        // PostgreSQL SQLSTATE class 23: integrity constraint violation
        if let sqlx::Error::Database(ref db) = e {
            let constraint = db.constraint().unwrap_or("<unnamed>").to_owned();
            match db.code().as_deref() {
                Some("23505") => return Self::UniqueViolation { constraint },
                Some("23503") => return Self::ForeignKeyViolation { constraint },
                Some("23514") => return Self::CheckViolation { constraint },
                _ => {}
            }
        }
        Self::Sqlx(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_errors_name_the_constraint() {
        let err = DbError::UniqueViolation {
            constraint: "usuario_e_mail_key".into(),
        };
        assert_eq!(
            err.to_string(),
            "unique constraint 'usuario_e_mail_key' violated"
        );

        let err = DbError::ForeignKeyViolation {
            constraint: "pet_id_usuario_fkey".into(),
        };
        assert!(err.to_string().contains("pet_id_usuario_fkey"));
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = DbError::NotFound {
            resource: "pet",
            id: "42".into(),
        };
        assert_eq!(err.to_string(), "not found: pet '42'");
    }
}
