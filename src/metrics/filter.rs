// src/metrics/filter.rs

use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::metrics::window::parse_local_date;
use crate::models::lead::{Lead, LeadStatus};

/// Chave de ordenação da lista. A ordenação é estável: leads com datas
/// iguais (ou inválidas) preservam a ordem relativa original entre
/// re-renderizações.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RequestDateDesc,
    RequestDateAsc,
    EventDateAsc,
    EventDateDesc,
}

/// Critérios de busca e ordenação aplicados após o filtro temporal.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Substring, sem diferenciar maiúsculas, sobre nome OU tipo de evento.
    pub search: Option<String>,
    /// `None` = todos os status.
    pub status: Option<LeadStatus>,
    pub sort: SortKey,
}

impl ListFilter {
    fn matches(&self, lead: &Lead) -> bool {
        let matches_search = match &self.search {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                lead.customer_name.to_lowercase().contains(&term)
                    || lead.event_type.to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_status = self.status.is_none_or(|s| s == lead.status);
        matches_search && matches_status
    }
}

// Datas inválidas comparam como iguais, mantendo a ordem de chegada.
fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_local_date(a), parse_local_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// Coleção nova, filtrada e ordenada; a entrada nunca é alterada.
pub fn apply(leads: &[Lead], filter: &ListFilter) -> Vec<Lead> {
    let mut result: Vec<Lead> = leads
        .iter()
        .filter(|lead| filter.matches(lead))
        .cloned()
        .collect();

    // `sort_by` é estável, o que é o contrato aqui.
    result.sort_by(|a, b| match filter.sort {
        SortKey::RequestDateDesc => compare_dates(&b.request_date, &a.request_date),
        SortKey::RequestDateAsc => compare_dates(&a.request_date, &b.request_date),
        SortKey::EventDateAsc => compare_dates(&a.event_date, &b.event_date),
        SortKey::EventDateDesc => compare_dates(&b.event_date, &a.event_date),
    });

    result
}
