mod common;

use std::sync::Arc;

use common::{catalog, names, Product};
use query_spec::{
    BuildOptions, Error, InMemoryRepository, QueryError, QueryService, Repository,
    SpecificationBuilder,
};
use query_spec_core::{BaseFilter, PaginationFilter};
use serde_json::json;

fn service(options: BuildOptions) -> QueryService<Product> {
    let repo: Arc<dyn Repository<Product>> = Arc::new(InMemoryRepository::new(catalog()));
    QueryService::new(repo, options)
}

#[tokio::test]
async fn in_memory_repository_lists_and_counts() {
    let repo = InMemoryRepository::new(catalog());
    let spec = SpecificationBuilder::new()
        .keyword("widget")
        .build::<Product>()
        .unwrap();

    let page = repo.list(&spec).await.unwrap();
    assert_eq!(names(&page.items), ["Widget", "Gizmo"]);
    assert_eq!(page.page_info.total_count, 2);
    assert_eq!(repo.count(&spec).await.unwrap(), 2);
}

#[tokio::test]
async fn service_lists_with_default_page_size() {
    let svc = service(BuildOptions {
        default_page_size: 2,
        max_page_size: None,
    });
    let request: PaginationFilter = serde_json::from_value(json!({
        "orderBy": ["name"]
    }))
    .unwrap();

    let page = svc.list(&request).await.unwrap();
    assert_eq!(names(&page.items), ["Gadget", "Gizmo"]);
    assert_eq!(page.page_info.page_size, 2);
    assert_eq!(page.page_info.total_pages, 2);
    assert!(page.page_info.has_next);
}

#[tokio::test]
async fn service_clamps_page_size() {
    let svc = service(BuildOptions {
        default_page_size: 10,
        max_page_size: Some(1),
    });
    let request = PaginationFilter {
        page_size: 50,
        ..Default::default()
    };
    let page = svc.list(&request).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page_info.page_size, 1);
}

#[tokio::test]
async fn service_reports_compile_errors_as_client_errors() {
    let svc = service(BuildOptions::default());
    let request: PaginationFilter = serde_json::from_value(json!({
        "advancedFilter": { "field": "brand.unknownProp", "operator": "eq", "value": "x" }
    }))
    .unwrap();

    let err = svc.list(&request).await.unwrap_err();
    assert!(err.is_client_error());
    match err {
        QueryError::Spec(Error::UnknownMember { member, .. }) => assert_eq!(member, "unknownProp"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn service_counts_without_paging() {
    let svc = service(BuildOptions::default());
    let request: BaseFilter = serde_json::from_value(json!({
        "advancedFilter": { "field": "active", "operator": "eq", "value": true }
    }))
    .unwrap();
    assert_eq!(svc.count(&request).await.unwrap(), 2);
}

struct FailingRepository;

#[async_trait::async_trait]
impl Repository<Product> for FailingRepository {
    async fn list(
        &self,
        _spec: &query_spec::CompiledSpecification<Product>,
    ) -> anyhow::Result<query_spec::Page<Product>> {
        anyhow::bail!("storage offline")
    }

    async fn count(&self, _spec: &query_spec::CompiledSpecification<Product>) -> anyhow::Result<u64> {
        anyhow::bail!("storage offline")
    }
}

#[tokio::test]
async fn repository_failures_are_not_client_errors() {
    let repo: Arc<dyn Repository<Product>> = Arc::new(FailingRepository);
    let svc = QueryService::new(repo, BuildOptions::default());
    let err = svc.list(&PaginationFilter::default()).await.unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(err.to_string(), "repository failure: storage offline");
}
