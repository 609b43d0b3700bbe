//! Pet listing endpoints
//!
//! The public feed (`GET /api/pets`) is the JSON read view consumed by
//! the frontend; creation is a multipart form because a listing may
//! carry a photo upload.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::repos::{NewPet, PetRepo, PetWithOwner};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{PetStatus, Sex, Species, ValidationError};

/// Listing item for the public pets feed
#[derive(Serialize)]
pub struct PetListing {
    pub id: i32,
    pub nome: String,
    pub especie: String,
    pub raca: Option<String>,
    pub situacao: String,
    /// Stored photo name, or the placeholder when none was uploaded
    pub foto: String,
    /// Sighting/loss date, day/month/year
    pub data: String,
    pub sexo: String,
    pub descricao: String,
    pub mensagem_dono: Option<String>,
    pub nome_tutor: String,
    pub telefone_tutor: String,
    pub visto_em: String,
    pub nome_usuario: String,
}

impl From<PetWithOwner> for PetListing {
    fn from(p: PetWithOwner) -> Self {
        Self {
            id: p.id_pet,
            nome: p.nome,
            especie: p.especie.as_str().to_owned(),
            raca: p.raca,
            situacao: p.situacao.as_str().to_owned(),
            foto: p.foto.unwrap_or_else(|| "default-pet.jpg".to_owned()),
            data: p.data.format("%d/%m/%Y").to_string(),
            sexo: p.sexo.as_str().to_owned(),
            descricao: p.descricao,
            mensagem_dono: p.mensagem_dono,
            nome_tutor: p.nome_tutor,
            telefone_tutor: p.telefone_tutor,
            visto_em: p.visto_em,
            nome_usuario: p.nome_usuario,
        }
    }
}

/// Created-listing response
#[derive(Serialize)]
pub struct CreatedPet {
    pub id_pet: i32,
}

/// GET /api/pets - the public listing feed, most recent first
///
/// A repository failure degrades to an empty feed (logged) instead of
/// an error page; this read path is deliberately forgiving.
async fn list_pets(State(state): State<Arc<AppState>>) -> Json<Vec<PetListing>> {
    let pets = match PetRepo::new(&state.pool).list_all().await {
        Ok(pets) => pets,
        Err(e) => {
            tracing::error!("listing pets failed: {}", e);
            Vec::new()
        }
    };

    Json(pets.into_iter().map(PetListing::from).collect())
}

/// GET /api/pets/{id} - one listing
async fn get_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<PetListing>, ApiError> {
    let pet = PetRepo::new(&state.pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "pet",
            id: id.to_string(),
        })?;

    Ok(Json(pet.into()))
}

/// POST /api/pets - create a listing from a multipart form
///
/// The optional `foto` part goes through the photo store; a file
/// failing the extension check is skipped and the listing is created
/// without a photo. `id_usuario` is the already-resolved identity of
/// the poster.
async fn create_pet(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedPet>), ApiError> {
    let mut form = PetForm::default();
    let mut foto = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "foto" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !bytes.is_empty() {
                foto = state
                    .photos
                    .save(&file_name, &bytes)
                    .await
                    .map_err(|e| ApiError::Internal {
                        message: format!("storing photo failed: {}", e),
                    })?;
            }
        } else {
            let value = field.text().await.map_err(bad_multipart)?;
            form.set(&name, value);
        }
    }

    let new_pet = form.into_new_pet(foto)?;
    let id_pet = PetRepo::new(&state.pool).create(&new_pet).await?;

    Ok((StatusCode::CREATED, Json(CreatedPet { id_pet })))
}

/// DELETE /api/pets/{id} - moderation delete
///
/// Removes the photo file best-effort first, then the row; dependent
/// reports go away through the datastore cascade.
async fn delete_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let repo = PetRepo::new(&state.pool);

    let pet = repo.find_by_id(id).await?.ok_or_else(|| ApiError::NotFound {
        resource: "pet",
        id: id.to_string(),
    })?;

    if let Some(foto) = &pet.foto {
        state.photos.remove(foto).await;
    }

    if repo.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        // raced with another delete between the lookup and here
        Err(ApiError::NotFound {
            resource: "pet",
            id: id.to_string(),
        })
    }
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::debug!("malformed multipart body: {}", e);
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "form",
        reason: "malformed multipart body",
    })
}

/// Accumulates text fields from the multipart form until all required
/// listing fields can be checked at once.
#[derive(Default)]
struct PetForm {
    nome_pet: Option<String>,
    especie: Option<String>,
    raca: Option<String>,
    situacao: Option<String>,
    data: Option<String>,
    sexo: Option<String>,
    descricao: Option<String>,
    mensagem_dono: Option<String>,
    nome_tutor: Option<String>,
    telefone_tutor: Option<String>,
    visto_em: Option<String>,
    id_usuario: Option<String>,
}

impl PetForm {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "nome_pet" => self.nome_pet = Some(value),
            "especie" => self.especie = Some(value),
            "raca" => self.raca = Some(value),
            "situacao" => self.situacao = Some(value),
            "data" => self.data = Some(value),
            "sexo" => self.sexo = Some(value),
            "descricao" => self.descricao = Some(value),
            "mensagem_dono" => self.mensagem_dono = Some(value),
            "nome_tutor" => self.nome_tutor = Some(value),
            "telefone_tutor" => self.telefone_tutor = Some(value),
            "visto_em" => self.visto_em = Some(value),
            "id_usuario" => self.id_usuario = Some(value),
            // unknown fields are ignored
            _ => {}
        }
    }

    fn into_new_pet(self, foto: Option<String>) -> Result<NewPet, ValidationError> {
        fn required(
            field: &'static str,
            value: Option<String>,
        ) -> Result<String, ValidationError> {
            match value {
                Some(s) if !s.is_empty() => Ok(s),
                _ => Err(ValidationError::Empty { field }),
            }
        }

        let data = NaiveDate::parse_from_str(&required("data", self.data)?, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidFormat {
                field: "data",
                reason: "expected YYYY-MM-DD",
            })?;

        let id_usuario = required("id_usuario", self.id_usuario)?
            .parse::<i32>()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id_usuario",
                reason: "expected an integer id",
            })?;

        Ok(NewPet {
            nome: required("nome_pet", self.nome_pet)?,
            especie: Species::parse(&required("especie", self.especie)?)?,
            raca: self.raca.filter(|s| !s.is_empty()),
            situacao: PetStatus::parse(&required("situacao", self.situacao)?)?,
            foto,
            data,
            sexo: Sex::parse(&required("sexo", self.sexo)?)?,
            descricao: required("descricao", self.descricao)?,
            mensagem_dono: self.mensagem_dono.filter(|s| !s.is_empty()),
            nome_tutor: required("nome_tutor", self.nome_tutor)?,
            telefone_tutor: required("telefone_tutor", self.telefone_tutor)?,
            visto_em: required("visto_em", self.visto_em)?,
            id_usuario,
        })
    }
}

/// Pet routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/{id}", get(get_pet).delete(delete_pet))
}
