//! Query execution: filter a catalog collection, then slice out one page.
//!
//! The functions here are synchronous and pure; the HTTP layer decides where
//! they run and how their output is wrapped. Records are cloned into the
//! result because a page outlives the borrow of the shared catalog.

use crate::catalog::Catalog;
use crate::filter::{self, ProductFilter, ProjectFilter};
use crate::paginate::{self, Page, PageMeta};
use crate::params::{ProductQuery, ProjectQuery};
use crate::types::{Product, Project};
use serde::{Deserialize, Serialize};

/// Pagination metadata plus the filters that produced the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMeta<E> {
    #[serde(flatten)]
    pub page: PageMeta,
    #[serde(flatten)]
    pub filters: E,
}

/// Filters echoed in the products response. Unset ones are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEcho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl From<&ProductFilter> for ProductEcho {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            category: filter.category.clone(),
            product_type: filter.product_type.clone(),
            search: filter.search.clone().filter(|s| !s.is_empty()),
        }
    }
}

/// Filters echoed in the projects response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEcho {
    /// `"all"` when unconstrained.
    pub category: String,
    pub search_query: String,
}

impl From<&ProjectFilter> for ProjectEcho {
    fn from(filter: &ProjectFilter) -> Self {
        Self {
            category: filter.category.as_str().to_string(),
            search_query: filter.search.clone(),
        }
    }
}

/// One page of a listing together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T, E> {
    pub data: Vec<T>,
    pub meta: ListMeta<E>,
}

pub type ProductList = ListResult<Product, ProductEcho>;
pub type ProjectList = ListResult<Project, ProjectEcho>;

/// The JSON body of every API response.
///
/// Successful list responses carry `data` and `meta`; detail responses carry
/// `data` alone; failures carry only `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T, M = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T, M> Envelope<T, M> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(message.into()),
        }
    }

    /// Split a decoded response into its payload or its error message.
    pub fn into_result(self) -> Result<(T, Option<M>), String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok((data, self.meta)),
            _ => Err(self
                .error
                .unwrap_or_else(|| "response carried no data".to_string())),
        }
    }
}

impl<T, E> From<ListResult<T, E>> for Envelope<Vec<T>, ListMeta<E>> {
    fn from(list: ListResult<T, E>) -> Self {
        Self {
            success: true,
            data: Some(list.data),
            meta: Some(list.meta),
            error: None,
        }
    }
}

impl<T, E> ListResult<T, E> {
    /// Reassemble a list from a decoded envelope.
    pub fn from_envelope(envelope: Envelope<Vec<T>, ListMeta<E>>) -> Result<Self, String> {
        match envelope.into_result()? {
            (data, Some(meta)) => Ok(Self { data, meta }),
            (_, None) => Err("list response carried no meta".to_string()),
        }
    }
}

pub fn run_products(catalog: &Catalog, query: &ProductQuery) -> ProductList {
    let matched = filter::apply(&catalog.products, &query.filter);
    let Page { items, meta } = paginate::paginate(matched, query.page);
    ListResult {
        data: items.into_iter().cloned().collect(),
        meta: ListMeta {
            page: meta,
            filters: ProductEcho::from(&query.filter),
        },
    }
}

pub fn run_projects(catalog: &Catalog, query: &ProjectQuery) -> ProjectList {
    let matched = filter::apply(&catalog.projects, &query.filter);
    let Page { items, meta } = paginate::paginate(matched, query.page);
    ListResult {
        data: items.into_iter().cloned().collect(),
        meta: ListMeta {
            page: meta,
            filters: ProjectEcho::from(&query.filter),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CategoryFilter;
    use crate::paginate::PageRequest;
    use crate::test_helpers::*;

    #[test]
    fn nine_products_fit_one_page() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let out = run_products(
            &catalog,
            &ProductQuery::new(ProductFilter::default(), PageRequest::new(1, 9)),
        );
        assert_eq!(out.data.len(), 9);
        assert_eq!(out.meta.page.total_pages, 1);
        assert!(!out.meta.page.has_more);
    }

    #[test]
    fn unknown_product_category_gives_empty_page() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let filter = ProductFilter {
            category: Some("Roofing".into()),
            ..Default::default()
        };
        let out = run_products(&catalog, &ProductQuery::new(filter, PageRequest::first(9)));
        assert!(out.data.is_empty());
        assert_eq!(out.meta.page.total, 0);
        assert_eq!(out.meta.page.total_pages, 0);
        assert!(!out.meta.page.has_more);
        assert_eq!(out.meta.filters.category.as_deref(), Some("Roofing"));
    }

    #[test]
    fn six_architecture_projects_all_returned() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let out = run_projects(
            &catalog,
            &ProjectQuery::new(ProjectFilter::default(), PageRequest::first(6)),
        );
        assert_eq!(out.data.len(), 6);
        assert_eq!(out.meta.page.total, 6);
        assert_eq!(out.meta.filters.category, "all");
        assert_eq!(out.meta.filters.search_query, "");
    }

    #[test]
    fn hyderabad_search_excludes_other_cities() {
        let catalog = mixed_city_catalog();
        let filter = ProjectFilter {
            category: CategoryFilter::All,
            search: "hyderabad".into(),
        };
        let out = run_projects(&catalog, &ProjectQuery::new(filter, PageRequest::first(6)));
        let ids: Vec<&str> = out.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["hyd-1", "hyd-2", "hyd-3"]);
        assert_eq!(out.meta.page.total, 3);
    }

    #[test]
    fn second_product_page_preserves_catalog_order() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let out = run_products(
            &catalog,
            &ProductQuery::new(ProductFilter::default(), PageRequest::new(2, 4)),
        );
        let ids: Vec<&str> = out.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "navimotive-glass",
                "locomotive-glass",
                "architectural-glass",
                "fire-resistant-glass"
            ]
        );
        assert!(out.meta.page.has_more);
    }

    #[test]
    fn product_meta_serialises_flat_with_echo() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let filter = ProductFilter {
            product_type: Some("Tempered".into()),
            search: Some(String::new()),
            ..Default::default()
        };
        let out = run_products(&catalog, &ProductQuery::new(filter, PageRequest::first(9)));
        let json = serde_json::to_value(&out.meta).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["limit"], 9);
        assert_eq!(json["total"], 2);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["hasMore"], false);
        assert_eq!(json["type"], "Tempered");
        assert!(json.get("category").is_none());
        assert!(json.get("search").is_none());
    }

    #[test]
    fn project_meta_round_trips_through_json() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let out = run_projects(
            &catalog,
            &ProjectQuery::new(ProjectFilter::default(), PageRequest::new(2, 4)),
        );
        let json = serde_json::to_string(&out.meta).unwrap();
        let back: ListMeta<ProjectEcho> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out.meta);
        assert!(json.contains("\"searchQuery\":\"\""));
    }

    #[test]
    fn envelope_wraps_list_and_back() {
        let catalog = crate::catalog::Catalog::seed().unwrap();
        let out = run_projects(
            &catalog,
            &ProjectQuery::new(ProjectFilter::default(), PageRequest::first(6)),
        );
        let json = serde_json::to_string(&Envelope::from(out.clone())).unwrap();
        assert!(json.starts_with("{\"success\":true"));
        assert!(!json.contains("\"error\""));
        let back: Envelope<Vec<Project>, ListMeta<ProjectEcho>> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(ListResult::from_envelope(back).unwrap(), out);
    }

    #[test]
    fn failure_envelope_has_only_error() {
        let env: Envelope<Vec<Product>> = Envelope::failure("Failed to fetch products");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Failed to fetch products"})
        );
        let back: Envelope<Vec<Product>, ListMeta<ProductEcho>> =
            serde_json::from_value(json).unwrap();
        assert_eq!(
            ListResult::from_envelope(back).unwrap_err(),
            "Failed to fetch products"
        );
    }
}
