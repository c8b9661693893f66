// src/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache de consultas explícito e injetável, chaveado pelo nome lógico da
/// consulta ("leads", "lead:{id}"). Substitui o cache ambiente global da
/// camada de fetch: toda mutação invalida a chave explicitamente.
///
/// Cada slot carrega um contador de geração. Um fetch que começou antes de
/// uma invalidação recebe a geração antiga e tem seu `store` descartado —
/// um resultado que chega atrasado nunca ressuscita um snapshot obsoleto.
#[derive(Debug)]
pub struct QueryCache<V> {
    inner: Arc<RwLock<HashMap<String, Slot<V>>>>,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u64,
    value: Option<V>,
}

// Derive exigiria V: Clone; o Arc interno basta.
impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Só `get` precisa clonar o valor; o resto do cache funciona para qualquer V.
impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Marca o início de um fetch para a chave e devolve a geração corrente.
    pub fn begin(&self, key: &str) -> u64 {
        let mut guard = self.inner.write().expect("lock do cache envenenado");
        guard
            .entry(key.to_string())
            .or_insert(Slot {
                generation: 0,
                value: None,
            })
            .generation
    }

    /// Completa um fetch. Só grava se a geração ainda for a mesma de quando o
    /// fetch começou; devolve `false` quando o resultado chegou tarde demais.
    pub fn store(&self, key: &str, generation: u64, value: V) -> bool {
        let mut guard = self.inner.write().expect("lock do cache envenenado");
        match guard.get_mut(key) {
            Some(slot) if slot.generation == generation => {
                slot.value = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Descarta o valor e avança a geração, cortando fetches em voo.
    pub fn invalidate(&self, key: &str) {
        let mut guard = self.inner.write().expect("lock do cache envenenado");
        let slot = guard.entry(key.to_string()).or_insert(Slot {
            generation: 0,
            value: None,
        });
        slot.generation += 1;
        slot.value = None;
    }

    /// Troca o valor da chave diretamente (atualização especulativa do
    /// delete otimista). Não mexe na geração: um rollback posterior grava o
    /// snapshot de volta pelo mesmo caminho.
    pub fn replace(&self, key: &str, value: V) {
        let mut guard = self.inner.write().expect("lock do cache envenenado");
        let slot = guard.entry(key.to_string()).or_insert(Slot {
            generation: 0,
            value: None,
        });
        slot.value = Some(value);
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn get(&self, key: &str) -> Option<V> {
        let guard = self.inner.read().expect("lock do cache envenenado");
        guard.get(key).and_then(|slot| slot.value.clone())
    }
}
