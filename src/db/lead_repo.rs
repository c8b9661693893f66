// src/db/lead_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadStore,
    models::lead::{Lead, LeadChanges, NewLead},
};

const LEAD_COLUMNS: &str = r#"
    id, customer_name, phone, whatsapp_link, status,
    request_date, event_date, event_type, guest_count, venue,
    gelato_cost, travel_fee, labor_cost, total_cost,
    gelato_kg, attendant_count,
    notes, next_step_date, next_step_description,
    created_at, updated_at
"#;

// O repositório de leads, responsável por todas as interações com a tabela
// 'leads'. Consultas em tempo de execução (bind), sem macro: o crate compila
// sem um banco disponível.
#[derive(Clone)]
pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadRepository {
    async fn list(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY request_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    async fn create(&self, lead: &NewLead, total_cost: Decimal) -> Result<Lead, AppError> {
        let created = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (
                customer_name, phone, whatsapp_link, status,
                request_date, event_date, event_type, guest_count, venue,
                gelato_cost, travel_fee, labor_cost, total_cost,
                gelato_kg, attendant_count, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(&lead.customer_name)
        .bind(&lead.phone)
        .bind(&lead.whatsapp_link)
        .bind(lead.status)
        .bind(&lead.request_date)
        .bind(&lead.event_date)
        .bind(&lead.event_type)
        .bind(lead.guest_count)
        .bind(&lead.venue)
        .bind(lead.gelato_cost)
        .bind(lead.travel_fee)
        .bind(lead.labor_cost)
        .bind(total_cost)
        .bind(lead.gelato_kg)
        .bind(lead.attendant_count)
        .bind(&lead.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        // COALESCE mantém a coluna quando o campo não veio no payload.
        let updated = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads SET
                customer_name = COALESCE($2, customer_name),
                phone = COALESCE($3, phone),
                whatsapp_link = COALESCE($4, whatsapp_link),
                status = COALESCE($5, status),
                request_date = COALESCE($6, request_date),
                event_date = COALESCE($7, event_date),
                event_type = COALESCE($8, event_type),
                guest_count = COALESCE($9, guest_count),
                venue = COALESCE($10, venue),
                gelato_cost = COALESCE($11, gelato_cost),
                travel_fee = COALESCE($12, travel_fee),
                labor_cost = COALESCE($13, labor_cost),
                total_cost = COALESCE($14, total_cost),
                gelato_kg = COALESCE($15, gelato_kg),
                attendant_count = COALESCE($16, attendant_count),
                notes = COALESCE($17, notes),
                next_step_date = COALESCE($18, next_step_date),
                next_step_description = COALESCE($19, next_step_description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.customer_name)
        .bind(&changes.phone)
        .bind(&changes.whatsapp_link)
        .bind(changes.status)
        .bind(&changes.request_date)
        .bind(&changes.event_date)
        .bind(&changes.event_type)
        .bind(changes.guest_count)
        .bind(&changes.venue)
        .bind(changes.gelato_cost)
        .bind(changes.travel_fee)
        .bind(changes.labor_cost)
        .bind(changes.total_cost)
        .bind(changes.gelato_kg)
        .bind(changes.attendant_count)
        .bind(&changes.notes)
        .bind(&changes.next_step_date)
        .bind(&changes.next_step_description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
