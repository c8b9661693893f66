// src/services/dashboard_service.rs

use chrono::{Local, NaiveDateTime};

use crate::{
    common::error::AppError,
    db::LeadStore,
    metrics::{self, TimeWindow, breakdown, stats, window},
    models::dashboard::{DashboardCharts, LeadOverview, LeadStats},
    models::lead::Lead,
    services::lead_service::LeadService,
};

/// Compositor das visões: busca o snapshot corrente, aplica a janela de
/// tempo e recomputa tudo do zero a cada requisição. Não há atualização
/// incremental — as coleções são pequenas e a recomputação é O(n).
#[derive(Clone)]
pub struct DashboardService<S: LeadStore> {
    leads: LeadService<S>,
}

impl<S: LeadStore> DashboardService<S> {
    pub fn new(leads: LeadService<S>) -> Self {
        Self { leads }
    }

    /// Uma falha de transporte degrada para a coleção vazia: o dashboard
    /// sempre responde com um conjunto completo de KPIs (zerados), nunca
    /// com erro.
    async fn snapshot(&self) -> Vec<Lead> {
        match self.leads.list().await {
            Ok(leads) => leads,
            Err(err) => {
                tracing::warn!("falha ao buscar leads para o dashboard: {err}; usando coleção vazia");
                Vec::new()
            }
        }
    }

    pub async fn summary(&self, window_sel: TimeWindow) -> LeadStats {
        let now = Self::now();
        let filtered = window::filter_by_window(&self.snapshot().await, window_sel, now);
        stats::compute(&filtered, now)
    }

    pub async fn charts(&self, window_sel: TimeWindow) -> DashboardCharts {
        let now = Self::now();
        let filtered = window::filter_by_window(&self.snapshot().await, window_sel, now);
        DashboardCharts {
            monthly_volume: breakdown::by_month(&filtered),
            funnel: breakdown::funnel(&filtered),
            status_distribution: stats::status_distribution(&filtered),
            event_types: breakdown::by_event_type(&filtered),
            venues: breakdown::by_venue(&filtered),
        }
    }

    /// Contadores do cabeçalho da lista: sempre sobre a coleção completa.
    pub async fn overview(&self) -> Result<LeadOverview, AppError> {
        let leads = self.leads.list().await?;
        Ok(stats::overview(&leads))
    }

    /// Lista filtrada e ordenada da página inicial.
    pub async fn filtered_list(
        &self,
        window_sel: TimeWindow,
        filter: &metrics::ListFilter,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = self.leads.list().await?;
        let windowed = window::filter_by_window(&leads, window_sel, Self::now());
        Ok(metrics::filter::apply(&windowed, filter))
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::memory::InMemoryLeadStore;
    use crate::metrics::testutil::lead;
    use crate::models::lead::LeadStatus;
    use rust_decimal::Decimal;

    fn service_with(
        leads: Vec<Lead>,
    ) -> (DashboardService<Arc<InMemoryLeadStore>>, Arc<InMemoryLeadStore>) {
        let store = Arc::new(InMemoryLeadStore::with_leads(leads));
        let lead_service = LeadService::new(Arc::clone(&store));
        (DashboardService::new(lead_service), store)
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_zeroed_kpis() {
        let (dashboard, store) = service_with(vec![lead(
            LeadStatus::Negotiating,
            Some(Decimal::from(1000)),
        )]);
        store.fail_next_list();

        let stats = dashboard.summary(TimeWindow::All).await;
        assert_eq!(stats.total_leads, 0);
        assert_eq!(stats.value_in_negotiation, Decimal::ZERO);

        // A injeção de falha é de disparo único; rearma para a segunda busca.
        store.fail_next_list();
        let charts = dashboard.charts(TimeWindow::All).await;
        assert_eq!(charts.monthly_volume.len(), 12);
        assert_eq!(charts.funnel.len(), 5);
        assert!(charts.status_distribution.is_empty());
    }

    #[tokio::test]
    async fn summary_and_charts_are_derived_from_the_same_snapshot() {
        let leads = vec![
            lead(LeadStatus::Negotiating, Some(Decimal::from(1000))),
            lead(LeadStatus::New, Some(Decimal::from(500))),
            lead(LeadStatus::ClosedWon, Some(Decimal::from(2000))),
        ];
        let (dashboard, _) = service_with(leads);

        let stats = dashboard.summary(TimeWindow::All).await;
        assert_eq!(stats.total_leads, 3);
        assert_eq!(stats.revenue_forecast, Decimal::from(625));

        let charts = dashboard.charts(TimeWindow::All).await;
        let funnel_total: u64 = charts.funnel.iter().map(|e| e.count).sum();
        assert_eq!(funnel_total, 3);

        let overview = dashboard.overview().await.unwrap();
        assert_eq!(overview.closed_won, 1);
    }
}
