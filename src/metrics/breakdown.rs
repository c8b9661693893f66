// src/metrics/breakdown.rs

use crate::metrics::window::parse_local_date;
use crate::models::dashboard::BreakdownEntry;
use crate::models::lead::{Lead, LeadStatus};

use chrono::Datelike;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const TOP_VENUES: usize = 10;

// Agrupamento em ordem de primeira aparição. As coleções têm dezenas ou
// centenas de registros, então a varredura linear é suficiente.
fn group_first_seen<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<BreakdownEntry> {
    let mut groups: Vec<BreakdownEntry> = Vec::new();
    for label in labels {
        match groups.iter_mut().find(|g| g.label == label) {
            Some(entry) => entry.count += 1,
            None => groups.push(BreakdownEntry::new(label, 1)),
        }
    }
    groups
}

/// Funil de vendas: as 5 etapas fixas na ordem do pipeline, com contagem
/// zero incluída.
pub fn funnel(leads: &[Lead]) -> Vec<BreakdownEntry> {
    LeadStatus::PIPELINE
        .iter()
        .map(|status| {
            let count = leads.iter().filter(|l| l.status == *status).count() as u64;
            BreakdownEntry::new(status.label(), count)
        })
        .collect()
}

/// Tipos de evento observados, na ordem de primeira aparição.
pub fn by_event_type(leads: &[Lead]) -> Vec<BreakdownEntry> {
    group_first_seen(leads.iter().map(|l| l.event_type.as_str()))
}

/// Top 10 locais por contagem decrescente; empates mantêm a primeira
/// ocorrência na frente (ordenação estável sobre a ordem de chegada).
pub fn by_venue(leads: &[Lead]) -> Vec<BreakdownEntry> {
    let mut groups = group_first_seen(leads.iter().map(|l| l.venue.as_str()));
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(TOP_VENUES);
    groups
}

/// Volume por mês da solicitação: sempre exatamente 12 baldes Jan–Dez em
/// ordem de calendário, independente do ano; datas inválidas ficam de fora.
pub fn by_month(leads: &[Lead]) -> Vec<BreakdownEntry> {
    let mut counts = [0u64; 12];
    for lead in leads {
        if let Some(date) = parse_local_date(&lead.request_date) {
            counts[date.month0() as usize] += 1;
        }
    }
    MONTH_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| BreakdownEntry::new(*label, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::testutil::{lead, lead_on};

    #[test]
    fn funnel_always_has_five_pipeline_ordered_stages() {
        let entries = funnel(&[]);
        assert_eq!(entries.len(), 5);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Novo", "Orçamento Enviado", "Em Negociação", "Fechado", "Perdido"]
        );
        assert!(entries.iter().all(|e| e.count == 0));

        let leads = vec![
            lead(LeadStatus::ClosedWon, None),
            lead(LeadStatus::New, None),
            lead(LeadStatus::New, None),
        ];
        let entries = funnel(&leads);
        assert_eq!(entries[0].count, 2); // Novo
        assert_eq!(entries[3].count, 1); // Fechado
    }

    #[test]
    fn event_types_keep_first_seen_order() {
        let mut a = lead(LeadStatus::New, None);
        a.event_type = "Aniversário".into();
        let mut b = lead(LeadStatus::New, None);
        b.event_type = "Casamento".into();
        let mut c = lead(LeadStatus::New, None);
        c.event_type = "Aniversário".into();

        let entries = by_event_type(&[a, b, c]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], BreakdownEntry::new("Aniversário", 2));
        assert_eq!(entries[1], BreakdownEntry::new("Casamento", 1));
    }

    #[test]
    fn venues_truncate_to_top_ten_with_first_seen_tiebreak() {
        let mut leads = Vec::new();
        // "Local 00" aparece primeiro e empata com os demais em contagem 1;
        // depois um local dominante com 3 ocorrências.
        for i in 0..15 {
            let mut l = lead(LeadStatus::New, None);
            l.venue = format!("Local {i:02}");
            leads.push(l);
        }
        for _ in 0..3 {
            let mut l = lead(LeadStatus::New, None);
            l.venue = "Praça Matriz".into();
            leads.push(l);
        }

        let entries = by_venue(&leads);
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], BreakdownEntry::new("Praça Matriz", 3));
        // Empate em 1: vence quem apareceu primeiro.
        assert_eq!(entries[1].label, "Local 00");
        assert_eq!(entries[9].label, "Local 08");
    }

    #[test]
    fn month_breakdown_always_yields_twelve_buckets() {
        assert_eq!(by_month(&[]).len(), 12);

        let leads = vec![
            lead_on("2026-01-10"),
            lead_on("2025-01-20"), // mesmo balde de janeiro, ano diferente
            lead_on("2026-12-31"),
            lead_on("data-ruim"),
        ];
        let entries = by_month(&leads);
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0], BreakdownEntry::new("Jan", 2));
        assert_eq!(entries[11], BreakdownEntry::new("Dez", 1));
        let total: u64 = entries.iter().map(|e| e.count).sum();
        assert_eq!(total, 3); // a data inválida não entra em nenhum mês
    }
}
