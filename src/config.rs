// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::PgLeadRepository,
    services::{DashboardService, LeadService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub lead_service: LeadService<PgLeadRepository>,
    pub dashboard_service: DashboardService<PgLeadRepository>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        // Os dois serviços compartilham o mesmo LeadService (e portanto os
        // mesmos caches): uma mutação via API invalida o que o dashboard lê.
        let lead_repo = PgLeadRepository::new(db_pool.clone());
        let lead_service = LeadService::new(lead_repo);
        let dashboard_service = DashboardService::new(lead_service.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            lead_service,
            dashboard_service,
        })
    }
}
