//! Schema management for the lostpaws tables
//!
//! `ensure_schema` is idempotent and safe to run on every startup: each
//! step is a "create if missing" (plus one "add column if missing" for
//! deployments that predate the admin flag). All steps run inside a
//! single transaction, so a failed step rolls the whole pass back and
//! leaves an older schema untouched.

use sqlx::PgPool;

use super::repos::DbError;

/// Create the usuario, pet, and denuncia tables if missing, and upgrade
/// older databases that lack the `is_admin` column.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Ensuring database schema...");

    let mut tx = pool.begin().await.map_err(DbError::from)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usuario (
            id_usuario      INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            nome            VARCHAR(255) NOT NULL,
            sobrenome       VARCHAR(255) NOT NULL,
            e_mail          VARCHAR(100) NOT NULL UNIQUE,
            telefone        VARCHAR(20) NOT NULL,
            is_admin        BOOLEAN DEFAULT FALSE
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Upgrade path: usuario tables created before the moderation panel
    // existed have no is_admin column.
    sqlx::query(
        r#"
        DO $$
        BEGIN
            IF NOT EXISTS (SELECT 1 FROM information_schema.columns
                           WHERE table_name='usuario' AND column_name='is_admin') THEN
                ALTER TABLE usuario ADD COLUMN is_admin BOOLEAN DEFAULT FALSE;
            END IF;
        END$$;
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pet (
            id_pet              INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            nome                VARCHAR(100) NOT NULL,
            especie             VARCHAR(30) NOT NULL CHECK (especie IN ('Cachorro', 'Gato', 'Outros')),
            raca                VARCHAR(100) NULL,
            situacao            VARCHAR(15) NOT NULL CHECK (situacao IN ('Achado', 'Perdido')),
            foto                VARCHAR(255) NULL,
            data                DATE NOT NULL,
            sexo                VARCHAR(15) NOT NULL CHECK (sexo IN ('Macho', 'Fêmea')),
            descricao           TEXT NOT NULL,
            mensagem_dono       TEXT NULL,
            nome_tutor          VARCHAR(255) NOT NULL,
            telefone_tutor      VARCHAR(20) NOT NULL,
            visto_em            VARCHAR(255) NOT NULL,
            id_usuario          INTEGER NOT NULL,
            FOREIGN KEY (id_usuario) REFERENCES usuario (id_usuario) ON DELETE CASCADE
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS denuncia (
            id_denuncia     INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            id_pet          INTEGER NOT NULL REFERENCES pet(id_pet) ON DELETE CASCADE,
            id_usuario      INTEGER NOT NULL REFERENCES usuario(id_usuario) ON DELETE CASCADE,
            motivo          TEXT NOT NULL,
            data_denuncia   TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Database schema is current");
    Ok(())
}
