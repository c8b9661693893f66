// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    metrics::{ListFilter, SortKey, TimeWindow},
    middleware::auth::AuthenticatedUser,
    models::lead::{Lead, LeadChanges, LeadStatus, NewLead},
    models::dashboard::LeadOverview,
};

// =============================================================================
//  QUERY STRING DA LISTAGEM
// =============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Busca por substring no nome do cliente ou no tipo de evento.
    pub q: Option<String>,
    /// Rótulo pt-BR do status, ou "all" para todos.
    pub status: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub window: TimeWindow,
}

impl ListQuery {
    // "all" e ausência significam o mesmo; qualquer outro rótulo precisa ser
    // um dos cinco status do pipeline.
    fn status_filter(&self) -> Result<Option<LeadStatus>, AppError> {
        match self.status.as_deref() {
            None | Some("all") => Ok(None),
            Some(label) => LeadStatus::from_label(label)
                .map(Some)
                .ok_or_else(|| AppError::UnknownStatus(label.to_string())),
        }
    }
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    /// Rótulo pt-BR de um dos cinco status do pipeline.
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Em Negociação")]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNotePayload {
    #[validate(length(min = 1, message = "A nota não pode ser vazia"))]
    #[schema(example = "Cliente pediu degustação antes de fechar")]
    pub note: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextStepPayload {
    #[schema(example = "2026-09-10")]
    pub next_step_date: Option<String>,
    #[schema(example = "Ligar para confirmar o cardápio")]
    pub next_step_description: Option<String>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(ListQuery),
    responses(
        (status = 200, description = "Lista filtrada e ordenada de leads", body = Vec<Lead>),
        (status = 400, description = "Status desconhecido"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ListFilter {
        search: query.q.clone(),
        status: query.status_filter()?,
        sort: query.sort,
    };

    let leads = app_state
        .dashboard_service
        .filtered_list(query.window, &filter)
        .await?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/overview
#[utoipa::path(
    get,
    path = "/api/leads/overview",
    tag = "Leads",
    responses(
        (status = 200, description = "Contadores do cabeçalho da lista", body = LeadOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn lead_overview(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.overview().await?;
    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead encontrado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.get(id).await?;
    Ok((StatusCode::OK, Json(lead)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = NewLead,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewLead>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = app_state.lead_service.create(payload).await?;
    tracing::info!(user = %user.0.sub, lead_id = %created.id, "lead criado");
    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = LeadChanges,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadChanges>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let updated = app_state.lead_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(updated)))
}

// PATCH /api/leads/{id}/status
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Lead),
        (status = 400, description = "Status desconhecido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let status = LeadStatus::from_label(&payload.status)
        .ok_or_else(|| AppError::UnknownStatus(payload.status.clone()))?;
    let updated = app_state.lead_service.update_status(id, status).await?;
    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/leads/{id}/notes
#[utoipa::path(
    post,
    path = "/api/leads/{id}/notes",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = AddNotePayload,
    responses(
        (status = 200, description = "Nota acrescentada ao histórico", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_lead_note(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let updated = app_state.lead_service.append_note(id, &payload.note).await?;
    Ok((StatusCode::OK, Json(updated)))
}

// PUT /api/leads/{id}/next-step
#[utoipa::path(
    put,
    path = "/api/leads/{id}/next-step",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = NextStepPayload,
    responses(
        (status = 200, description = "Próximo passo atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_next_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NextStepPayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state
        .lead_service
        .update_next_step(id, payload.next_step_date, payload.next_step_description)
        .await?;
    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Lead removido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.delete(id).await?;
    tracing::info!(user = %user.0.sub, lead_id = %id, "lead removido");
    Ok(StatusCode::NO_CONTENT)
}
