// src/metrics/stats.rs

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;

use crate::metrics::window::parse_local_date;
use crate::models::dashboard::{LeadOverview, LeadStats, StatusCount};
use crate::models::lead::{Lead, LeadStatus};

/// Valor monetário do lead para fins de soma. Um campo ausente (registro
/// escrito por outro caminho, coluna anulável) vira zero com um aviso em vez
/// de contaminar os KPIs exibidos.
fn total_cost(lead: &Lead) -> Decimal {
    match lead.total_cost {
        Some(total) => total,
        None => {
            tracing::warn!(lead_id = %lead.id, "lead sem valor total; somando como zero");
            Decimal::ZERO
        }
    }
}

/// Contagem por status na ordem de primeira aparição. As contagens somam
/// exatamente o tamanho da coleção.
pub fn status_distribution(leads: &[Lead]) -> Vec<StatusCount> {
    let mut distribution: Vec<StatusCount> = Vec::new();
    for lead in leads {
        match distribution.iter_mut().find(|e| e.status == lead.status) {
            Some(entry) => entry.count += 1,
            None => distribution.push(StatusCount {
                status: lead.status,
                count: 1,
            }),
        }
    }
    distribution
}

/// KPIs escalares do dashboard. Função total: nunca falha e nunca divide por
/// zero — coleção vazia produz zeros em tudo.
pub fn compute(leads: &[Lead], now: NaiveDateTime) -> LeadStats {
    let total = leads.len() as u64;

    let leads_this_month = leads
        .iter()
        .filter(|lead| {
            parse_local_date(&lead.request_date)
                .is_some_and(|d| d.month() == now.month() && d.year() == now.year())
        })
        .count() as u64;

    let value_in_negotiation: Decimal = leads
        .iter()
        .filter(|lead| lead.status == LeadStatus::Negotiating)
        .map(total_cost)
        .sum();

    let won: Vec<&Lead> = leads
        .iter()
        .filter(|lead| lead.status == LeadStatus::ClosedWon)
        .collect();

    let conversion_rate = if total == 0 {
        0.0
    } else {
        won.len() as f64 / total as f64 * 100.0
    };

    let average_ticket = if won.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = won.iter().map(|lead| total_cost(lead)).sum();
        sum / Decimal::from(won.len() as u64)
    };

    // Pipeline ponderado: só leads abertos entram, cada um com o peso da
    // sua etapa.
    let revenue_forecast: Decimal = leads
        .iter()
        .filter(|lead| lead.status.is_open())
        .map(|lead| total_cost(lead) * lead.status.forecast_weight())
        .sum();

    LeadStats {
        total_leads: total,
        leads_this_month,
        value_in_negotiation,
        conversion_rate,
        average_ticket,
        revenue_forecast,
        status_distribution: status_distribution(leads),
    }
}

/// Contadores do cabeçalho da lista, sobre a coleção completa.
pub fn overview(leads: &[Lead]) -> LeadOverview {
    let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count() as u64;
    LeadOverview {
        total: leads.len() as u64,
        new: count(LeadStatus::New),
        negotiating: count(LeadStatus::Negotiating),
        closed_won: count(LeadStatus::ClosedWon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::testutil::lead;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 23)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn reference_scenario() {
        // [Negociação 1000, Novo 500, Fechado 2000]
        let leads = vec![
            lead(LeadStatus::Negotiating, Some(dec(1000))),
            lead(LeadStatus::New, Some(dec(500))),
            lead(LeadStatus::ClosedWon, Some(dec(2000))),
        ];
        let stats = compute(&leads, now());

        assert_eq!(stats.value_in_negotiation, dec(1000));
        // 1000*0.60 + 500*0.05 = 625
        assert_eq!(stats.revenue_forecast, dec(625));
        assert_eq!(stats.average_ticket, dec(2000));
        assert!((stats.conversion_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.total_leads, 3);
    }

    #[test]
    fn empty_collection_degrades_to_zeros() {
        let stats = compute(&[], now());
        assert_eq!(stats.total_leads, 0);
        assert_eq!(stats.leads_this_month, 0);
        assert_eq!(stats.value_in_negotiation, Decimal::ZERO);
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.average_ticket, Decimal::ZERO);
        assert_eq!(stats.revenue_forecast, Decimal::ZERO);
        assert!(stats.status_distribution.is_empty());
    }

    #[test]
    fn no_closed_won_never_divides_by_zero() {
        let leads = vec![lead(LeadStatus::New, Some(dec(100)))];
        let stats = compute(&leads, now());
        assert_eq!(stats.average_ticket, Decimal::ZERO);
        assert_eq!(stats.conversion_rate, 0.0);
        assert!(stats.conversion_rate.is_finite());
    }

    #[test]
    fn distribution_counts_sum_to_collection_length_in_first_seen_order() {
        let leads = vec![
            lead(LeadStatus::Negotiating, None),
            lead(LeadStatus::New, None),
            lead(LeadStatus::Negotiating, None),
            lead(LeadStatus::ClosedLost, None),
        ];
        let distribution = status_distribution(&leads);
        let sum: u64 = distribution.iter().map(|e| e.count).sum();
        assert_eq!(sum, leads.len() as u64);
        let order: Vec<LeadStatus> = distribution.iter().map(|e| e.status).collect();
        assert_eq!(
            order,
            [
                LeadStatus::Negotiating,
                LeadStatus::New,
                LeadStatus::ClosedLost
            ]
        );
        assert_eq!(distribution[0].count, 2);
    }

    #[test]
    fn missing_total_is_coerced_to_zero() {
        let leads = vec![
            lead(LeadStatus::Negotiating, None),
            lead(LeadStatus::Negotiating, Some(dec(300))),
        ];
        let stats = compute(&leads, now());
        assert_eq!(stats.value_in_negotiation, dec(300));
        assert_eq!(stats.revenue_forecast, dec(300) * Decimal::new(60, 2));
    }

    #[test]
    fn leads_this_month_matches_month_and_year() {
        let mut inside = lead(LeadStatus::New, None);
        inside.request_date = "2026-08-01".into();
        let mut other_month = lead(LeadStatus::New, None);
        other_month.request_date = "2026-07-01".into();
        let mut other_year = lead(LeadStatus::New, None);
        other_year.request_date = "2025-08-01".into();
        let mut invalid = lead(LeadStatus::New, None);
        invalid.request_date = "???".into();

        let stats = compute(&[inside, other_month, other_year, invalid], now());
        assert_eq!(stats.leads_this_month, 1);
    }

    #[test]
    fn overview_counts_fixed_statuses() {
        let leads = vec![
            lead(LeadStatus::New, None),
            lead(LeadStatus::New, None),
            lead(LeadStatus::Negotiating, None),
            lead(LeadStatus::ClosedWon, None),
            lead(LeadStatus::ClosedLost, None),
        ];
        let overview = overview(&leads);
        assert_eq!(overview.total, 5);
        assert_eq!(overview.new, 2);
        assert_eq!(overview.negotiating, 1);
        assert_eq!(overview.closed_won, 1);
    }
}
