// src/services/lead_service.rs

use chrono::Local;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    cache::QueryCache,
    common::error::AppError,
    db::LeadStore,
    models::lead::{Lead, LeadChanges, LeadStatus, NewLead},
};

/// Chave lógica da consulta de listagem no cache.
pub const LEADS_QUERY: &str = "leads";

fn detail_key(id: Uuid) -> String {
    format!("lead:{id}")
}

/// Fases do delete otimista.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    /// Remoção especulativa aplicada ao cache; aguardando o armazenamento.
    Pending,
    /// Armazenamento confirmou; caches invalidados.
    Committed,
    /// Armazenamento falhou; snapshot restaurado.
    RolledBack,
}

/// Protocolo de compensação do delete: snapshot → atualização especulativa →
/// commit ou rollback. Uma máquina de estados explícita em vez de uma cadeia
/// de callbacks.
struct OptimisticDelete {
    snapshot: Option<Vec<Lead>>,
    phase: DeletePhase,
}

impl OptimisticDelete {
    /// Fase 1: guarda o snapshot e remove o lead da lista em cache antes da
    /// confirmação remota.
    fn begin(cache: &QueryCache<Vec<Lead>>, id: Uuid) -> Self {
        let snapshot = cache.get(LEADS_QUERY);
        if let Some(list) = &snapshot {
            let speculative: Vec<Lead> = list.iter().filter(|l| l.id != id).cloned().collect();
            cache.replace(LEADS_QUERY, speculative);
        }
        Self {
            snapshot,
            phase: DeletePhase::Pending,
        }
    }

    fn commit(mut self) -> DeletePhase {
        self.phase = DeletePhase::Committed;
        self.phase
    }

    /// Ação compensatória: devolve a lista ao estado anterior à remoção
    /// especulativa.
    fn rollback(mut self, cache: &QueryCache<Vec<Lead>>) -> DeletePhase {
        if let Some(list) = self.snapshot.take() {
            cache.replace(LEADS_QUERY, list);
        }
        self.phase = DeletePhase::RolledBack;
        self.phase
    }
}

/// Orquestra a fonte de registros com o cache de consultas: toda mutação
/// invalida as chaves afetadas, e os invariantes do fluxo de escrita
/// (recálculo do total, notas somente-acréscimo) vivem aqui.
#[derive(Clone)]
pub struct LeadService<S: LeadStore> {
    store: S,
    list_cache: QueryCache<Vec<Lead>>,
    detail_cache: QueryCache<Lead>,
}

impl<S: LeadStore> LeadService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            list_cache: QueryCache::new(),
            detail_cache: QueryCache::new(),
        }
    }

    /// Snapshot corrente da coleção. Usa o cache quando quente; um resultado
    /// que chega depois de uma invalidação é descartado pelo contador de
    /// geração.
    pub async fn list(&self) -> Result<Vec<Lead>, AppError> {
        if let Some(cached) = self.list_cache.get(LEADS_QUERY) {
            return Ok(cached);
        }
        let generation = self.list_cache.begin(LEADS_QUERY);
        let leads = self.store.list().await?;
        self.list_cache.store(LEADS_QUERY, generation, leads.clone());
        Ok(leads)
    }

    pub async fn get(&self, id: Uuid) -> Result<Lead, AppError> {
        let key = detail_key(id);
        if let Some(cached) = self.detail_cache.get(&key) {
            return Ok(cached);
        }
        let generation = self.detail_cache.begin(&key);
        let lead = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(AppError::LeadNotFound)?;
        self.detail_cache.store(&key, generation, lead.clone());
        Ok(lead)
    }

    pub async fn create(&self, new: NewLead) -> Result<Lead, AppError> {
        if let Some(field) = new.first_negative_field() {
            return Err(AppError::NegativeAmount(field));
        }
        // Invariante do fluxo de criação: total = gelato + deslocamento +
        // mão de obra, ignorando qualquer total enviado pelo cliente.
        let total = new.gelato_cost + new.travel_fee + new.labor_cost;
        let created = self.store.create(&new, total).await?;
        self.list_cache.invalidate(LEADS_QUERY);
        Ok(created)
    }

    /// Edição parcial. Sempre que um componente de custo muda, o total é
    /// recalculado a partir dos componentes resultantes do merge.
    pub async fn update(&self, id: Uuid, mut changes: LeadChanges) -> Result<Lead, AppError> {
        if let Some(field) = changes.first_negative_field() {
            return Err(AppError::NegativeAmount(field));
        }
        if changes.touches_cost_component() {
            let current = self
                .store
                .get_by_id(id)
                .await?
                .ok_or(AppError::LeadNotFound)?;
            let component = |incoming: Option<Decimal>, existing: Option<Decimal>| {
                incoming.or(existing).unwrap_or(Decimal::ZERO)
            };
            changes.total_cost = Some(
                component(changes.gelato_cost, current.gelato_cost)
                    + component(changes.travel_fee, current.travel_fee)
                    + component(changes.labor_cost, current.labor_cost),
            );
        } else {
            // O total nunca é editável diretamente: sem componente no payload,
            // qualquer valor enviado é descartado e a coluna fica intacta.
            changes.total_cost = None;
        }
        self.apply_update(id, &changes).await
    }

    pub async fn update_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError> {
        let changes = LeadChanges {
            status: Some(status),
            ..Default::default()
        };
        self.apply_update(id, &changes).await
    }

    /// Notas são somente-acréscimo: a nova entrada ganha um prefixo com
    /// carimbo de data/hora local e é concatenada ao texto existente, nunca
    /// o substitui.
    pub async fn append_note(&self, id: Uuid, note: &str) -> Result<Lead, AppError> {
        let current = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(AppError::LeadNotFound)?;
        let timestamp = Local::now().format("%d/%m/%Y às %H:%M");
        let entry = format!("[{timestamp}] {note}\n");
        let notes = match current.notes {
            Some(existing) => format!("{existing}{entry}"),
            None => entry,
        };
        let changes = LeadChanges {
            notes: Some(notes),
            ..Default::default()
        };
        self.apply_update(id, &changes).await
    }

    pub async fn update_next_step(
        &self,
        id: Uuid,
        date: Option<String>,
        description: Option<String>,
    ) -> Result<Lead, AppError> {
        let changes = LeadChanges {
            next_step_date: date,
            next_step_description: description,
            ..Default::default()
        };
        self.apply_update(id, &changes).await
    }

    /// Delete otimista em três fases (ver [`OptimisticDelete`]).
    pub async fn delete(&self, id: Uuid) -> Result<DeletePhase, AppError> {
        let pending = OptimisticDelete::begin(&self.list_cache, id);

        match self.store.delete(id).await {
            Ok(true) => {
                let phase = pending.commit();
                self.invalidate_after_mutation(id);
                Ok(phase)
            }
            Ok(false) => {
                pending.rollback(&self.list_cache);
                Err(AppError::LeadNotFound)
            }
            Err(err) => {
                tracing::warn!(lead_id = %id, "delete falhou; restaurando snapshot da lista");
                pending.rollback(&self.list_cache);
                Err(err)
            }
        }
    }

    async fn apply_update(&self, id: Uuid, changes: &LeadChanges) -> Result<Lead, AppError> {
        let updated = self
            .store
            .update(id, changes)
            .await?
            .ok_or(AppError::LeadNotFound)?;
        self.invalidate_after_mutation(id);
        Ok(updated)
    }

    fn invalidate_after_mutation(&self, id: Uuid) {
        self.list_cache.invalidate(LEADS_QUERY);
        self.detail_cache.invalidate(&detail_key(id));
    }

    #[cfg(test)]
    pub(crate) fn cached_list(&self) -> Option<Vec<Lead>> {
        self.list_cache.get(LEADS_QUERY)
    }
}
