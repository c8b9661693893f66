// src/metrics/testutil.rs
//! Fixtures compartilhadas pelos testes do motor de agregação.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::lead::{Lead, LeadStatus};

pub(crate) fn lead(status: LeadStatus, total: Option<Decimal>) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        customer_name: "Cliente".into(),
        phone: "11999990000".into(),
        whatsapp_link: String::new(),
        status,
        request_date: "2026-08-10".into(),
        event_date: "2026-12-01".into(),
        event_type: "Casamento".into(),
        guest_count: 50,
        venue: "Salão Central".into(),
        gelato_cost: None,
        travel_fee: None,
        labor_cost: None,
        total_cost: total,
        gelato_kg: None,
        attendant_count: 1,
        notes: None,
        next_step_date: None,
        next_step_description: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub(crate) fn lead_on(request_date: &str) -> Lead {
    let mut l = lead(LeadStatus::New, None);
    l.request_date = request_date.into();
    l
}

pub(crate) fn named(name: &str, event_type: &str) -> Lead {
    let mut l = lead(LeadStatus::New, None);
    l.customer_name = name.into();
    l.event_type = event_type.into();
    l
}
