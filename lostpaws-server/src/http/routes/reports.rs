//! Report endpoints
//!
//! A logged-in user flags a listing with a reason; administrators read
//! the denormalized report list to decide what to delete. The caller
//! supplies the already-resolved user id.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewReport, ReportRepo, ReportView};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Report creation request
#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub id_pet: i32,
    pub id_usuario: i32,
    pub motivo: String,
}

/// Created-report response
#[derive(Serialize)]
pub struct CreatedReport {
    pub id_denuncia: i32,
}

/// Report item for the moderation panel
#[derive(Serialize)]
pub struct ReportItem {
    pub id_denuncia: i32,
    pub motivo: String,
    pub data_denuncia: String,
    pub id_pet: i32,
    pub pet_nome: String,
    pub foto: Option<String>,
    pub id_usuario: i32,
    pub usuario_email: String,
}

impl From<ReportView> for ReportItem {
    fn from(r: ReportView) -> Self {
        Self {
            id_denuncia: r.id_denuncia,
            motivo: r.motivo,
            data_denuncia: r.data_denuncia.to_rfc3339(),
            id_pet: r.id_pet,
            pet_nome: r.pet_nome,
            foto: r.foto,
            id_usuario: r.id_usuario,
            usuario_email: r.usuario_email,
        }
    }
}

/// POST /api/reports - flag a listing for moderation
async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<CreatedReport>), ApiError> {
    if req.motivo.trim().is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "motivo",
        }));
    }

    let id_denuncia = ReportRepo::new(&state.pool)
        .create(&NewReport {
            id_pet: req.id_pet,
            id_usuario: req.id_usuario,
            motivo: req.motivo,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedReport { id_denuncia })))
}

/// GET /api/reports - moderation panel feed, newest first
async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportItem>>, ApiError> {
    let reports = ReportRepo::new(&state.pool).list_all().await?;
    Ok(Json(reports.into_iter().map(ReportItem::from).collect()))
}

/// Report routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/reports", get(list_reports).post(create_report))
}
