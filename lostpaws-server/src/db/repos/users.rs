//! User repository
//!
//! Registration and e-mail lookup. There is no password column:
//! presence of a matching e-mail is the whole login check (a known
//! product defect, preserved on purpose - see DESIGN.md).

use sqlx::{FromRow, PgPool};

use super::DbError;

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id_usuario: i32,
    pub nome: String,
    pub sobrenome: String,
    pub e_mail: String,
    pub telefone: String,
    pub is_admin: bool,
}

/// Fields required to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nome: String,
    pub sobrenome: String,
    pub e_mail: String,
    pub telefone: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user, returning the generated id.
    ///
    /// A duplicate e-mail surfaces as `DbError::UniqueViolation`; the
    /// datastore's unique index is the authoritative duplicate check,
    /// so two simultaneous registrations race there and the loser gets
    /// the violation.
    pub async fn create(&self, user: &NewUser) -> Result<i32, DbError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO usuario (nome, sobrenome, e_mail, telefone)
            VALUES ($1, $2, $3, $4)
            RETURNING id_usuario
            "#,
        )
        .bind(&user.nome)
        .bind(&user.sobrenome)
        .bind(&user.e_mail)
        .bind(&user.telefone)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Look up a user by e-mail, admin flag included.
    ///
    /// Returns `Ok(None)` when no user matches; a row is always mapped
    /// in full, never partially. Rows predating the is_admin upgrade
    /// may hold NULL there, which reads as false.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id_usuario, nome, sobrenome, e_mail, telefone,
                   COALESCE(is_admin, FALSE) AS is_admin
            FROM usuario
            WHERE e_mail = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
