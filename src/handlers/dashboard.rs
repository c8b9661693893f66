// src/handlers/dashboard.rs

use axum::{Json, extract::{Query, State}, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    metrics::TimeWindow,
    models::dashboard::{DashboardCharts, LeadStats},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    /// Janela temporal: all, last30, last90, thisMonth, thisQuarter, thisYear.
    #[serde(default)]
    pub window: TimeWindow,
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "KPIs da janela selecionada", body = LeadStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary(query.window).await;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/charts
#[utoipa::path(
    get,
    path = "/api/dashboard/charts",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "Séries dos gráficos na janela selecionada", body = DashboardCharts),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_charts(
    State(app_state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let charts = app_state.dashboard_service.charts(query.window).await;
    Ok((StatusCode::OK, Json(charts)))
}
