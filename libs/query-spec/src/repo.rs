use std::sync::Arc;

use async_trait::async_trait;
use query_spec_core::Page;

use crate::schema::Entity;
use crate::specification::CompiledSpecification;

/// Port for executing compiled specifications against some storage.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Matching records, ordered and windowed by the specification.
    async fn list(&self, spec: &CompiledSpecification<T>) -> anyhow::Result<Page<T>>;
    /// Number of matching records, ignoring the page window.
    async fn count(&self, spec: &CompiledSpecification<T>) -> anyhow::Result<u64>;
}

/// Keeps records in memory and executes specifications in process.
pub struct InMemoryRepository<T> {
    items: Arc<Vec<T>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<T: Entity + Clone> Repository<T> for InMemoryRepository<T> {
    async fn list(&self, spec: &CompiledSpecification<T>) -> anyhow::Result<Page<T>> {
        Ok(spec.paginate(self.items.iter()).map_items(T::clone))
    }

    async fn count(&self, spec: &CompiledSpecification<T>) -> anyhow::Result<u64> {
        Ok(self.items.iter().filter(|i| spec.evaluate(i)).count() as u64)
    }
}
