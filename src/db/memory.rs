// src/db/memory.rs
//! `LeadStore` em memória para isolar os serviços nos testes, com injeção
//! de falha para exercitar o rollback do delete otimista.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadStore,
    models::lead::{Lead, LeadChanges, NewLead},
};

#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
    fail_next_delete: AtomicBool,
    fail_next_list: AtomicBool,
}

impl InMemoryLeadStore {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(leads),
            ..Default::default()
        }
    }

    pub fn fail_next_delete(&self) {
        self.fail_next_delete.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_list(&self) {
        self.fail_next_list.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.leads.lock().unwrap().len()
    }

    fn transport_error() -> AppError {
        AppError::InternalServerError(anyhow::anyhow!("falha de transporte simulada"))
    }
}

fn apply_changes(lead: &mut Lead, changes: &LeadChanges) {
    if let Some(v) = &changes.customer_name {
        lead.customer_name = v.clone();
    }
    if let Some(v) = &changes.phone {
        lead.phone = v.clone();
    }
    if let Some(v) = &changes.whatsapp_link {
        lead.whatsapp_link = v.clone();
    }
    if let Some(v) = changes.status {
        lead.status = v;
    }
    if let Some(v) = &changes.request_date {
        lead.request_date = v.clone();
    }
    if let Some(v) = &changes.event_date {
        lead.event_date = v.clone();
    }
    if let Some(v) = &changes.event_type {
        lead.event_type = v.clone();
    }
    if let Some(v) = changes.guest_count {
        lead.guest_count = v;
    }
    if let Some(v) = &changes.venue {
        lead.venue = v.clone();
    }
    if let Some(v) = changes.gelato_cost {
        lead.gelato_cost = Some(v);
    }
    if let Some(v) = changes.travel_fee {
        lead.travel_fee = Some(v);
    }
    if let Some(v) = changes.labor_cost {
        lead.labor_cost = Some(v);
    }
    if let Some(v) = changes.total_cost {
        lead.total_cost = Some(v);
    }
    if let Some(v) = changes.gelato_kg {
        lead.gelato_kg = Some(v);
    }
    if let Some(v) = changes.attendant_count {
        lead.attendant_count = v;
    }
    if let Some(v) = &changes.notes {
        lead.notes = Some(v.clone());
    }
    if let Some(v) = &changes.next_step_date {
        lead.next_step_date = Some(v.clone());
    }
    if let Some(v) = &changes.next_step_description {
        lead.next_step_description = Some(v.clone());
    }
    lead.updated_at = Utc::now();
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn list(&self) -> Result<Vec<Lead>, AppError> {
        if self.fail_next_list.swap(false, Ordering::SeqCst) {
            return Err(Self::transport_error());
        }
        Ok(self.leads.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn create(&self, lead: &NewLead, total_cost: Decimal) -> Result<Lead, AppError> {
        let now = Utc::now();
        let created = Lead {
            id: Uuid::new_v4(),
            customer_name: lead.customer_name.clone(),
            phone: lead.phone.clone(),
            whatsapp_link: lead.whatsapp_link.clone(),
            status: lead.status,
            request_date: lead.request_date.clone(),
            event_date: lead.event_date.clone(),
            event_type: lead.event_type.clone(),
            guest_count: lead.guest_count,
            venue: lead.venue.clone(),
            gelato_cost: Some(lead.gelato_cost),
            travel_fee: Some(lead.travel_fee),
            labor_cost: Some(lead.labor_cost),
            total_cost: Some(total_cost),
            gelato_kg: Some(lead.gelato_kg),
            attendant_count: lead.attendant_count,
            notes: lead.notes.clone(),
            next_step_date: None,
            next_step_description: None,
            created_at: now,
            updated_at: now,
        };
        self.leads.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        let mut leads = self.leads.lock().unwrap();
        match leads.iter_mut().find(|l| l.id == id) {
            Some(lead) => {
                apply_changes(lead, changes);
                Ok(Some(lead.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        if self.fail_next_delete.swap(false, Ordering::SeqCst) {
            return Err(Self::transport_error());
        }
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|l| l.id != id);
        Ok(leads.len() < before)
    }
}
