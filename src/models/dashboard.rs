// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::lead::LeadStatus;

/// Um ponto de série categórica pronto para o gráfico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub label: String,
    pub count: u64,
}

impl BreakdownEntry {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: u64,
}

// 1. Os cards do topo do dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: u64,
    pub leads_this_month: u64,
    pub value_in_negotiation: Decimal,
    /// Percentual (0–100); 0 quando não há leads.
    pub conversion_rate: f64,
    /// Média dos negócios fechados; 0 quando não há nenhum.
    pub average_ticket: Decimal,
    /// Pipeline ponderado sobre os leads ainda abertos.
    pub revenue_forecast: Decimal,
    /// Contagem por status, apenas os que ocorrem, na ordem de primeira
    /// aparição (usada pelo gráfico de pizza).
    pub status_distribution: Vec<StatusCount>,
}

// 2. Todas as séries de gráfico, recomputadas a cada mudança de janela.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    /// 12 baldes fixos Jan–Dez, sempre presentes.
    pub monthly_volume: Vec<BreakdownEntry>,
    /// 5 etapas fixas na ordem do pipeline, zeros incluídos.
    pub funnel: Vec<BreakdownEntry>,
    pub status_distribution: Vec<StatusCount>,
    pub event_types: Vec<BreakdownEntry>,
    /// Top 10 locais por contagem decrescente.
    pub venues: Vec<BreakdownEntry>,
}

// 3. Contadores rápidos do cabeçalho da lista (coleção completa, sem filtro).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadOverview {
    pub total: u64,
    pub new: u64,
    pub negotiating: u64,
    pub closed_won: u64,
}
