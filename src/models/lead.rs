// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco. Os rótulos pt-BR são o formato
// de fio da API e os únicos cinco valores válidos, na ordem do pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status")]
pub enum LeadStatus {
    #[serde(rename = "Novo")]
    #[sqlx(rename = "Novo")]
    New,
    #[serde(rename = "Orçamento Enviado")]
    #[sqlx(rename = "Orçamento Enviado")]
    QuoteSent,
    #[serde(rename = "Em Negociação")]
    #[sqlx(rename = "Em Negociação")]
    Negotiating,
    #[serde(rename = "Fechado")]
    #[sqlx(rename = "Fechado")]
    ClosedWon,
    #[serde(rename = "Perdido")]
    #[sqlx(rename = "Perdido")]
    ClosedLost,
}

impl LeadStatus {
    /// Ordem fixa do pipeline, usada pelo funil do dashboard.
    pub const PIPELINE: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::QuoteSent,
        LeadStatus::Negotiating,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "Novo",
            LeadStatus::QuoteSent => "Orçamento Enviado",
            LeadStatus::Negotiating => "Em Negociação",
            LeadStatus::ClosedWon => "Fechado",
            LeadStatus::ClosedLost => "Perdido",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::PIPELINE.into_iter().find(|s| s.label() == label)
    }

    /// Um lead aberto ainda conta para a previsão de receita.
    pub fn is_open(&self) -> bool {
        !matches!(self, LeadStatus::ClosedWon | LeadStatus::ClosedLost)
    }

    /// Probabilidade histórica de fechamento por etapa (pipeline ponderado).
    /// Fechado/Perdido são excluídos da soma; o peso zero é só conceitual.
    pub fn forecast_weight(&self) -> Decimal {
        match self {
            LeadStatus::New => Decimal::new(5, 2),          // 0.05
            LeadStatus::QuoteSent => Decimal::new(20, 2),   // 0.20
            LeadStatus::Negotiating => Decimal::new(60, 2), // 0.60
            LeadStatus::ClosedWon | LeadStatus::ClosedLost => Decimal::ZERO,
        }
    }
}

// --- O REGISTRO ---

/// Um lead como o armazenamento remoto o devolve. As datas viajam como texto
/// ('YYYY-MM-DD' por convenção, mas o banco não valida o formato) e os campos
/// monetários podem estar ausentes — a camada de agregação trata ambos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    pub customer_name: String,
    pub phone: String,
    pub whatsapp_link: String,
    pub status: LeadStatus,

    pub request_date: String,
    pub event_date: String,

    pub event_type: String,
    pub guest_count: i32,
    pub venue: String,

    pub gelato_cost: Option<Decimal>,
    pub travel_fee: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,

    pub gelato_kg: Option<Decimal>,
    pub attendant_count: i32,

    pub notes: Option<String>,
    pub next_step_date: Option<String>,
    pub next_step_description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS DE ESCRITA ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Maria Souza")]
    pub customer_name: String,

    #[validate(length(min = 8, message = "Informe o telefone"))]
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,

    #[serde(default)]
    pub whatsapp_link: String,

    #[serde(default = "default_status")]
    pub status: LeadStatus,

    #[validate(length(min = 10, message = "Informe a data da solicitação"))]
    #[schema(example = "2026-08-01")]
    pub request_date: String,

    #[validate(length(min = 2, message = "Informe o tipo de evento"))]
    #[schema(example = "Casamento")]
    pub event_type: String,

    #[validate(length(min = 10, message = "Informe a data do evento"))]
    #[schema(example = "2026-10-15")]
    pub event_date: String,

    #[validate(range(min = 1, message = "Mínimo 1 convidado"))]
    pub guest_count: i32,

    #[validate(length(min = 2, message = "Informe o local do evento"))]
    #[schema(example = "Espaço Jardim, São Paulo")]
    pub venue: String,

    #[serde(default)]
    pub gelato_cost: Decimal,
    #[serde(default)]
    pub travel_fee: Decimal,
    #[serde(default)]
    pub labor_cost: Decimal,

    #[serde(default)]
    pub gelato_kg: Decimal,
    #[serde(default)]
    pub attendant_count: i32,

    pub notes: Option<String>,
}

fn default_status() -> LeadStatus {
    LeadStatus::New
}

impl NewLead {
    /// Valores monetários e quantidades não podem ser negativos. O `validator`
    /// cobre os demais campos; os Decimals são checados aqui.
    pub fn first_negative_field(&self) -> Option<&'static str> {
        [
            ("gelatoCost", self.gelato_cost),
            ("travelFee", self.travel_fee),
            ("laborCost", self.labor_cost),
            ("gelatoKg", self.gelato_kg),
        ]
        .into_iter()
        .find(|(_, v)| v.is_sign_negative() && !v.is_zero())
        .map(|(name, _)| name)
        .or_else(|| (self.attendant_count < 0).then_some("attendantCount"))
    }
}

/// Edição parcial: campos ausentes permanecem como estão no registro.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadChanges {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub customer_name: Option<String>,
    #[validate(length(min = 8, message = "Informe o telefone"))]
    pub phone: Option<String>,
    pub whatsapp_link: Option<String>,
    pub status: Option<LeadStatus>,
    #[validate(length(min = 10, message = "Informe a data da solicitação"))]
    pub request_date: Option<String>,
    #[validate(length(min = 2, message = "Informe o tipo de evento"))]
    pub event_type: Option<String>,
    #[validate(length(min = 10, message = "Informe a data do evento"))]
    pub event_date: Option<String>,
    #[validate(range(min = 1, message = "Mínimo 1 convidado"))]
    pub guest_count: Option<i32>,
    #[validate(length(min = 2, message = "Informe o local do evento"))]
    pub venue: Option<String>,
    pub gelato_cost: Option<Decimal>,
    pub travel_fee: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    /// Recalculado pelo serviço sempre que um componente muda; um valor
    /// enviado aqui é sobrescrito.
    pub total_cost: Option<Decimal>,
    pub gelato_kg: Option<Decimal>,
    pub attendant_count: Option<i32>,
    pub notes: Option<String>,
    pub next_step_date: Option<String>,
    pub next_step_description: Option<String>,
}

impl LeadChanges {
    pub fn touches_cost_component(&self) -> bool {
        self.gelato_cost.is_some() || self.travel_fee.is_some() || self.labor_cost.is_some()
    }

    pub fn first_negative_field(&self) -> Option<&'static str> {
        [
            ("gelatoCost", self.gelato_cost),
            ("travelFee", self.travel_fee),
            ("laborCost", self.labor_cost),
            ("gelatoKg", self.gelato_kg),
        ]
        .into_iter()
        .find(|(_, v)| v.is_some_and(|v| v.is_sign_negative() && !v.is_zero()))
        .map(|(name, _)| name)
        .or_else(|| self.attendant_count.is_some_and(|n| n < 0).then_some("attendantCount"))
    }
}
