pub mod lead_repo;
pub use lead_repo::PgLeadRepository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::lead::{Lead, LeadChanges, NewLead};

/// Contrato da fonte de registros. O armazenamento remoto é a única fonte de
/// verdade; o serviço mantém apenas uma cópia transitória e invalidável.
/// A implementação de produção fala Postgres; os testes usam a versão em
/// memória de `db::memory`.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Todos os leads, mais recentes primeiro.
    async fn list(&self) -> Result<Vec<Lead>, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError>;
    /// O `total_cost` chega já recalculado pelo fluxo de criação; o
    /// armazenamento não impõe o invariante.
    async fn create(&self, lead: &NewLead, total_cost: Decimal) -> Result<Lead, AppError>;
    /// Atualização parcial: campos `None` permanecem intactos. `None` no
    /// retorno significa id inexistente.
    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError>;
    /// `false` quando o id não existe.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

// Permite compartilhar um store entre serviços (e testes) via Arc.
#[async_trait]
impl<S: LeadStore + ?Sized> LeadStore for std::sync::Arc<S> {
    async fn list(&self) -> Result<Vec<Lead>, AppError> {
        (**self).list().await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, lead: &NewLead, total_cost: Decimal) -> Result<Lead, AppError> {
        (**self).create(lead, total_cost).await
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        (**self).delete(id).await
    }
}
