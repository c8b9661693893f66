//! Motor de agregação: funções determinísticas e sem efeito colateral que
//! transformam a coleção de leads em listas filtradas/ordenadas, KPIs e
//! séries de gráfico. Nenhuma função aqui altera a coleção de entrada ou
//! falha — entrada vazia ou parcialmente inválida produz um resultado
//! completo e bem tipado.

pub mod breakdown;
#[cfg(test)]
pub(crate) mod testutil;
pub mod filter;
pub mod stats;
pub mod window;

pub use filter::{ListFilter, SortKey};
pub use window::TimeWindow;
