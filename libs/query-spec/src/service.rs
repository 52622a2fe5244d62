use std::sync::Arc;

use query_spec_core::{BaseFilter, Page, PaginationFilter};
use tracing::{debug, instrument};

use crate::repo::Repository;
use crate::schema::Entity;
use crate::specification::{BuildOptions, SpecificationBuilder};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Spec(#[from] query_spec_core::Error),

    #[error("repository failure: {0:#}")]
    Repository(anyhow::Error),
}

impl QueryError {
    /// Client input problem, as opposed to a storage failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Spec(_))
    }
}

/// Compiles listing requests and runs them through a repository.
/// Depends only on the repository port.
pub struct QueryService<T: Entity> {
    repo: Arc<dyn Repository<T>>,
    options: BuildOptions,
}

impl<T: Entity> Clone for QueryService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            options: self.options.clone(),
        }
    }
}

impl<T: Entity> QueryService<T> {
    pub fn new(repo: Arc<dyn Repository<T>>, options: BuildOptions) -> Self {
        Self { repo, options }
    }

    #[instrument(name = "query_spec.service.list", skip(self, request), fields(entity = T::shape().name))]
    pub async fn list(&self, request: &PaginationFilter) -> Result<Page<T>, QueryError> {
        let spec = SpecificationBuilder::from_pagination_filter(request)?
            .with_options(self.options.clone())
            .build::<T>()?;

        let page = self.repo.list(&spec).await.map_err(QueryError::Repository)?;
        debug!(
            returned = page.items.len(),
            total = page.page_info.total_count,
            "listed entities"
        );
        Ok(page)
    }

    /// Count matches for a search/filter request.
    #[instrument(name = "query_spec.service.count", skip(self, request), fields(entity = T::shape().name))]
    pub async fn count(&self, request: &BaseFilter) -> Result<u64, QueryError> {
        let spec = SpecificationBuilder::from_base_filter(request)?.build::<T>()?;
        self.repo.count(&spec).await.map_err(QueryError::Repository)
    }
}
