//! Report repository
//!
//! Reports flag a listing for moderator review. They are never updated
//! or individually deleted; they disappear when their pet (or author)
//! is removed, through ON DELETE CASCADE.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Fields required to file a report. The creation timestamp is
/// assigned by the datastore default, never by the caller.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub id_pet: i32,
    pub id_usuario: i32,
    pub motivo: String,
}

/// Denormalized report row for the moderation panel: the report joined
/// with the reported pet's name/photo and the reporting user's e-mail.
#[derive(Debug, Clone, FromRow)]
pub struct ReportView {
    pub id_denuncia: i32,
    pub motivo: String,
    pub data_denuncia: DateTime<Utc>,
    pub id_pet: i32,
    pub pet_nome: String,
    pub foto: Option<String>,
    pub id_usuario: i32,
    pub usuario_email: String,
}

/// Report repository
pub struct ReportRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a report, returning the generated id.
    ///
    /// A dangling pet or user id surfaces as
    /// `DbError::ForeignKeyViolation`.
    pub async fn create(&self, report: &NewReport) -> Result<i32, DbError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO denuncia (id_pet, id_usuario, motivo)
            VALUES ($1, $2, $3)
            RETURNING id_denuncia
            "#,
        )
        .bind(report.id_pet)
        .bind(report.id_usuario)
        .bind(&report.motivo)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// List all reports for moderator review, newest first.
    pub async fn list_all(&self) -> Result<Vec<ReportView>, DbError> {
        let reports = sqlx::query_as::<_, ReportView>(
            r#"
            SELECT
                d.id_denuncia, d.motivo, d.data_denuncia,
                p.id_pet, p.nome AS pet_nome, p.foto,
                u.id_usuario, u.e_mail AS usuario_email
            FROM denuncia d
            JOIN pet p ON d.id_pet = p.id_pet
            JOIN usuario u ON d.id_usuario = u.id_usuario
            ORDER BY d.data_denuncia DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(reports)
    }
}
