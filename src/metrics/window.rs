// src/metrics/window.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::lead::Lead;

/// Janela de tempo relativa, avaliada contra o instante `now` recebido na
/// chamada, aplicada sobre a data de solicitação de cada lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TimeWindow {
    #[default]
    All,
    Last30,
    Last90,
    ThisMonth,
    ThisQuarter,
    ThisYear,
}

/// Interpreta uma data vinda do armazenamento. Uma string 'YYYY-MM-DD' pura é
/// lida como meia-noite LOCAL (e não UTC) para evitar o deslocamento de um
/// dia perto da fronteira de fuso; qualquer outro formato recebe parsing
/// genérico. `None` é a sentinela de data inválida: falha toda comparação de
/// janela limitada.
pub fn parse_local_date(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Predicado da janela. Depende apenas da data de solicitação do registro e
/// do instante fixo `now`.
pub fn matches(window: TimeWindow, request_date: &str, now: NaiveDateTime) -> bool {
    if window == TimeWindow::All {
        return true;
    }
    let Some(date) = parse_local_date(request_date) else {
        // Data inválida: fora de qualquer janela limitada.
        return false;
    };
    match window {
        TimeWindow::All => true,
        // Subtração com precisão de milissegundo, sem truncar para o dia.
        TimeWindow::Last30 => date >= now - Duration::days(30),
        TimeWindow::Last90 => date >= now - Duration::days(90),
        TimeWindow::ThisMonth => date.month() == now.month() && date.year() == now.year(),
        TimeWindow::ThisQuarter => {
            date.month0() / 3 == now.month0() / 3 && date.year() == now.year()
        }
        TimeWindow::ThisYear => date.year() == now.year(),
    }
}

/// Subcoleção cujas datas de solicitação satisfazem a janela. Sempre devolve
/// uma coleção nova; a entrada não é tocada.
pub fn filter_by_window(leads: &[Lead], window: TimeWindow, now: NaiveDateTime) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| matches(window, &lead.request_date, now))
        .cloned()
        .collect()
}
