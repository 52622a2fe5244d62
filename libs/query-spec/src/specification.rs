use std::cmp::Ordering;
use std::fmt;

use query_spec_core::ast::FilterNode;
use query_spec_core::{
    BaseFilter, OrderBy, Page, PageBounds, PageInfo, PageSpec, PaginationFilter, Result,
    SearchSpec, DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::order::{compile_order, Comparator};
use crate::predicate::{and, compile_filter, Predicate};
use crate::schema::Entity;
use crate::search::compile_search_group;

/// Paging knobs applied while building. Mirrors the `query` config section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Page size used when the request asks for a non-positive one.
    pub default_page_size: u64,
    /// Upper clamp for requested page sizes. Off when `None`.
    pub max_page_size: Option<u64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE as u64,
            max_page_size: None,
        }
    }
}

/// Immutable, executable query over `T`.
///
/// A missing predicate matches everything; a missing comparator keeps the
/// source order; missing bounds return every match.
pub struct CompiledSpecification<T> {
    predicate: Option<Predicate<T>>,
    comparator: Option<Comparator<T>>,
    page: Option<PageBounds>,
}

impl<T> Clone for CompiledSpecification<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            comparator: self.comparator.clone(),
            page: self.page,
        }
    }
}

impl<T> fmt::Debug for CompiledSpecification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSpecification")
            .field("has_predicate", &self.predicate.is_some())
            .field("has_comparator", &self.comparator.is_some())
            .field("page", &self.page)
            .finish()
    }
}

impl<T> CompiledSpecification<T> {
    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    pub fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }

    pub fn page(&self) -> Option<&PageBounds> {
        self.page.as_ref()
    }

    pub fn evaluate(&self, item: &T) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(item))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.comparator
            .as_ref()
            .map_or(Ordering::Equal, |cmp| cmp(a, b))
    }

    /// Every match in order, before skip/take.
    pub fn matching<'a, I>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut matched: Vec<&T> = items.into_iter().filter(|i| self.evaluate(i)).collect();
        if let Some(cmp) = &self.comparator {
            // stable: ties keep source order
            matched.sort_by(|a, b| cmp(a, b));
        }
        matched
    }

    /// Filter, sort and window `items`.
    pub fn apply<'a, I>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let matched = self.matching(items);
        self.window(matched)
    }

    /// Like [`apply`](Self::apply), with page info computed from the total
    /// match count.
    pub fn paginate<'a, I>(&self, items: I) -> Page<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let matched = self.matching(items);
        let total = matched.len() as u64;
        Page::new(
            self.window(matched),
            PageInfo::from_bounds(total, self.page.as_ref()),
        )
    }

    fn window<'a>(&self, matched: Vec<&'a T>) -> Vec<&'a T> {
        match &self.page {
            Some(bounds) => matched
                .into_iter()
                .skip(usize::try_from(bounds.skip.unwrap_or(0)).unwrap_or(usize::MAX))
                .take(usize::try_from(bounds.take).unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        }
    }
}

/// Collects the parts of a query and compiles them against an entity shape.
#[derive(Clone, Debug, Default)]
pub struct SpecificationBuilder {
    search: Vec<SearchSpec>,
    filter: Option<FilterNode>,
    order: Option<OrderBy>,
    page: Option<PageSpec>,
    options: BuildOptions,
}

impl SpecificationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a search. Several searches are OR-ed together.
    pub fn search(mut self, spec: SearchSpec) -> Self {
        self.search.push(spec);
        self
    }

    /// Keyword over every eligible field.
    pub fn keyword(self, keyword: impl Into<String>) -> Self {
        self.search(SearchSpec::keyword(keyword))
    }

    pub fn filter(mut self, node: FilterNode) -> Self {
        self.filter = Some(node);
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: PageSpec) -> Self {
        self.page = Some(page);
        self
    }

    /// Search and filter only; no ordering, no paging.
    pub fn from_base_filter(filter: &BaseFilter) -> Result<Self> {
        let mut builder = Self::new();
        builder.search = filter.search_specs();
        builder.filter = filter.filter_node()?;
        Ok(builder)
    }

    pub fn from_pagination_filter(filter: &PaginationFilter) -> Result<Self> {
        let mut builder = Self::from_base_filter(&filter.base)?;
        builder.order = filter.order();
        builder.page = Some(filter.page());
        Ok(builder)
    }

    /// Compile for `T`. Fails on the first invalid piece; nothing partial
    /// is ever returned.
    pub fn build<T: Entity>(&self) -> Result<CompiledSpecification<T>> {
        let search = compile_search_group::<T>(&self.search)?;
        let filter = self.filter.as_ref().map(compile_filter::<T>).transpose()?;
        let predicate = match (search, filter) {
            (Some(s), Some(f)) => Some(and(s, f)),
            (s, f) => s.or(f),
        };

        let comparator = match &self.order {
            Some(order) if !order.is_empty() => Some(compile_order::<T>(order)?),
            _ => None,
        };

        let page = self.page.map(|p| {
            p.normalize_with(self.options.default_page_size, self.options.max_page_size)
        });

        debug!(
            target: "query_spec",
            entity = T::shape().name,
            searches = self.search.len(),
            filter_nodes = self.filter.as_ref().map_or(0, FilterNode::node_count),
            order = %self.order.clone().unwrap_or_default(),
            ?page,
            "compiled specification"
        );

        Ok(CompiledSpecification {
            predicate,
            comparator,
            page,
        })
    }
}
