use serde::{Deserialize, Serialize};

use crate::ast::{FilterNode, Logic, RawValue};
use crate::{Error, OrderBy, PageSpec, Result, SearchSpec};

/// Filter node as it arrives over the wire. Either `logic` + `filters`
/// (composite) or `field` + `operator` + `value` (leaf).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Option<FilterRequest>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl FilterRequest {
    pub fn leaf(field: impl Into<String>, operator: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn group(logic: impl Into<String>, filters: Vec<FilterRequest>) -> Self {
        Self {
            logic: Some(logic.into()),
            filters: Some(filters.into_iter().map(Some).collect()),
            ..Default::default()
        }
    }

    /// Check the node shape recursively and build the typed tree.
    ///
    /// A declared logic always makes the node a composite; `null` children
    /// are skipped, but at least one real child must remain.
    pub fn validate(&self) -> Result<FilterNode> {
        if let Some(raw_logic) = non_blank(&self.logic) {
            let logic: Logic = raw_logic.parse()?;
            let filters = self.filters.as_ref().ok_or(Error::MissingFilters)?;
            let children = filters
                .iter()
                .flatten()
                .map(FilterRequest::validate)
                .collect::<Result<Vec<_>>>()?;
            if children.is_empty() {
                return Err(Error::EmptyFilters(logic.to_string()));
            }
            return Ok(FilterNode::Composite { logic, children });
        }

        let field = non_blank(&self.field);
        if field.is_none() && self.filters.as_ref().is_some_and(|f| !f.is_empty()) {
            return Err(Error::MissingLogic);
        }

        let field = field.ok_or(Error::MissingField)?;
        let operator = non_blank(&self.operator).ok_or(Error::MissingOperator)?;

        Ok(FilterNode::Leaf {
            field: field.to_string(),
            operator: operator.parse()?,
            value: self.value.clone().unwrap_or(RawValue::Null),
        })
    }
}

/// Explicit-field keyword search (`advancedSearch`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl From<&SearchRequest> for SearchSpec {
    fn from(req: &SearchRequest) -> Self {
        SearchSpec {
            fields: req.fields.clone(),
            keyword: req.keyword.clone(),
        }
    }
}

/// Search and filter part of a listing request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_search: Option<SearchRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_filter: Option<FilterRequest>,
}

impl BaseFilter {
    /// Search specs that carry a keyword: the plain keyword (all eligible
    /// fields) first, then the advanced search.
    pub fn search_specs(&self) -> Vec<SearchSpec> {
        let keyword = self.keyword.as_ref().map(|k| SearchSpec::keyword(k.clone()));
        let advanced = self.advanced_search.as_ref().map(SearchSpec::from);
        keyword
            .into_iter()
            .chain(advanced)
            .filter(|s| s.effective_keyword().is_some())
            .collect()
    }

    pub fn filter_node(&self) -> Result<Option<FilterNode>> {
        self.advanced_filter
            .as_ref()
            .map(FilterRequest::validate)
            .transpose()
    }
}

/// Full listing request: search, filter, ordering and paging.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationFilter {
    #[serde(flatten)]
    pub base: BaseFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<String>>,
    #[serde(default)]
    pub page_number: i64,
    #[serde(default)]
    pub page_size: i64,
}

impl PaginationFilter {
    pub fn has_order_by(&self) -> bool {
        self.order_by
            .as_ref()
            .is_some_and(|o| o.iter().any(|t| !t.trim().is_empty()))
    }

    pub fn order(&self) -> Option<OrderBy> {
        self.has_order_by()
            .then(|| OrderBy::from_tokens(self.order_by.iter().flatten()))
    }

    pub fn page(&self) -> PageSpec {
        PageSpec::new(self.page_number, self.page_size)
    }
}
