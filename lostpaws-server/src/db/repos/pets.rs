//! Pet repository
//!
//! Listings joined with their owner's display name. The especie,
//! situacao, and sexo columns come back as text and are parsed into
//! their enums at the row boundary; a label outside the CHECK sets
//! (which would mean a corrupted row) is a `DbError::Decode`, never a
//! partially-populated entity.

use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::{PetStatus, Sex, Species, ValidationError};

use super::DbError;

/// Fields required to create a listing
#[derive(Debug, Clone)]
pub struct NewPet {
    pub nome: String,
    pub especie: Species,
    pub raca: Option<String>,
    pub situacao: PetStatus,
    pub foto: Option<String>,
    pub data: NaiveDate,
    pub sexo: Sex,
    pub descricao: String,
    pub mensagem_dono: Option<String>,
    pub nome_tutor: String,
    pub telefone_tutor: String,
    pub visto_em: String,
    pub id_usuario: i32,
}

/// Pet row joined with its owner's display name
#[derive(Debug, Clone)]
pub struct PetWithOwner {
    pub id_pet: i32,
    pub nome: String,
    pub especie: Species,
    pub raca: Option<String>,
    pub situacao: PetStatus,
    pub foto: Option<String>,
    pub data: NaiveDate,
    pub sexo: Sex,
    pub descricao: String,
    pub mensagem_dono: Option<String>,
    pub nome_tutor: String,
    pub telefone_tutor: String,
    pub visto_em: String,
    pub id_usuario: i32,
    pub nome_usuario: String,
}

const PET_WITH_OWNER_COLUMNS: &str = r#"
    p.id_pet, p.nome, p.especie, p.raca, p.situacao, p.foto, p.data,
    p.sexo, p.descricao, p.mensagem_dono, p.nome_tutor, p.telefone_tutor,
    p.visto_em, p.id_usuario, u.nome AS nome_usuario
"#;

fn decode<T>(
    column: &'static str,
    value: String,
    parse: fn(&str) -> Result<T, ValidationError>,
) -> Result<T, DbError> {
    parse(&value).map_err(|_| DbError::Decode { column, value })
}

fn map_pet_row(row: &PgRow) -> Result<PetWithOwner, DbError> {
    Ok(PetWithOwner {
        id_pet: row.get("id_pet"),
        nome: row.get("nome"),
        especie: decode("especie", row.get("especie"), Species::parse)?,
        raca: row.get("raca"),
        situacao: decode("situacao", row.get("situacao"), PetStatus::parse)?,
        foto: row.get("foto"),
        data: row.get("data"),
        sexo: decode("sexo", row.get("sexo"), Sex::parse)?,
        descricao: row.get("descricao"),
        mensagem_dono: row.get("mensagem_dono"),
        nome_tutor: row.get("nome_tutor"),
        telefone_tutor: row.get("telefone_tutor"),
        visto_em: row.get("visto_em"),
        id_usuario: row.get("id_usuario"),
        nome_usuario: row.get("nome_usuario"),
    })
}

/// Pet repository
pub struct PetRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PetRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a listing, returning the generated id.
    ///
    /// A dangling id_usuario surfaces as `DbError::ForeignKeyViolation`.
    pub async fn create(&self, pet: &NewPet) -> Result<i32, DbError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO pet (nome, especie, raca, situacao, foto, data, sexo,
                             descricao, mensagem_dono, nome_tutor, telefone_tutor,
                             visto_em, id_usuario)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id_pet
            "#,
        )
        .bind(&pet.nome)
        .bind(pet.especie.as_str())
        .bind(pet.raca.as_deref())
        .bind(pet.situacao.as_str())
        .bind(pet.foto.as_deref())
        .bind(pet.data)
        .bind(pet.sexo.as_str())
        .bind(&pet.descricao)
        .bind(pet.mensagem_dono.as_deref())
        .bind(&pet.nome_tutor)
        .bind(&pet.telefone_tutor)
        .bind(&pet.visto_em)
        .bind(pet.id_usuario)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// List all listings with their owner's name, most recent sighting
    /// date first.
    pub async fn list_all(&self) -> Result<Vec<PetWithOwner>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PET_WITH_OWNER_COLUMNS}
            FROM pet p
            JOIN usuario u ON p.id_usuario = u.id_usuario
            ORDER BY p.data DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_pet_row).collect()
    }

    /// Get a single listing by id with the owner's name, or `None`.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PetWithOwner>, DbError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {PET_WITH_OWNER_COLUMNS}
            FROM pet p
            JOIN usuario u ON p.id_usuario = u.id_usuario
            WHERE p.id_pet = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_pet_row).transpose()
    }

    /// Delete a listing row, returning whether a row was removed.
    ///
    /// Dependent reports go away through ON DELETE CASCADE. Removing
    /// the uploaded photo file is the storage collaborator's job and
    /// must never block this deletion.
    pub async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM pet WHERE id_pet = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
