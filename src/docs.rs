// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::metrics;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::lead_overview,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::update_lead_status,
        handlers::leads::add_lead_note,
        handlers::leads::update_next_step,
        handlers::leads::delete_lead,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_charts,
    ),
    components(
        schemas(
            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::NewLead,
            models::lead::LeadChanges,
            handlers::leads::UpdateStatusPayload,
            handlers::leads::AddNotePayload,
            handlers::leads::NextStepPayload,

            // --- Dashboard ---
            models::dashboard::LeadStats,
            models::dashboard::DashboardCharts,
            models::dashboard::BreakdownEntry,
            models::dashboard::StatusCount,
            models::dashboard::LeadOverview,

            // --- Filtros ---
            metrics::TimeWindow,
            metrics::SortKey,
        )
    ),
    tags(
        (name = "Leads", description = "Gestão do funil de leads de eventos"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
