//! Registration and login endpoints
//!
//! Login is by e-mail presence alone; there is no password anywhere in
//! the system. The response carries the id and admin flag the caller
//! needs for subsequent requests.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewUser, User, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub sobrenome: String,
    pub e_mail: String,
    pub telefone: String,
}

/// Login request: the e-mail is the whole credential
#[derive(Deserialize)]
pub struct LoginRequest {
    pub e_mail: String,
}

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub id_usuario: i32,
    pub nome: String,
    pub sobrenome: String,
    pub e_mail: String,
    pub telefone: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id_usuario: u.id_usuario,
            nome: u.nome,
            sobrenome: u.sobrenome,
            e_mail: u.e_mail,
            telefone: u.telefone,
            is_admin: u.is_admin,
        }
    }
}

/// POST /api/users - register a new account
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let repo = UserRepo::new(&state.pool);

    // Pre-flight duplicate check for a friendly message; the unique
    // index still backstops concurrent registrations.
    if repo.find_by_email(&req.e_mail).await?.is_some() {
        return Err(ApiError::Conflict {
            message: "e-mail already registered".into(),
        });
    }

    let e_mail = req.e_mail.clone();
    repo.create(&NewUser {
        nome: req.nome,
        sobrenome: req.sobrenome,
        e_mail: req.e_mail,
        telefone: req.telefone,
    })
    .await?;

    // Re-read to return the row as stored, admin flag included
    let user = repo
        .find_by_email(&e_mail)
        .await?
        .ok_or(ApiError::Internal {
            message: "registered user vanished before read-back".into(),
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/login - e-mail-only pseudo-login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .find_by_email(&req.e_mail)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "user",
            id: req.e_mail.clone(),
        })?;

    Ok(Json(user.into()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/login", post(login))
}
