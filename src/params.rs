//! Query-parameter parsing for the list endpoints.
//!
//! Raw query strings are untrusted text. Everything that turns them into
//! filters happens here, so the filter and pagination code only ever sees
//! typed values. Parsing never fails: a bad value falls back to its default.
//!
//! | Param | Products | Projects |
//! |-------|----------|----------|
//! | `page` | integer ≥ 1, default 1 | integer ≥ 1, default 1 |
//! | `limit` | integer ≥ 1, default 9 | integer ≥ 1, default 6 |
//! | `category` | exact label, empty = unset | label or `all`, default `all` |
//! | `type` | exact label, empty = unset | – |
//! | `search` | substring, empty = unset | substring, default `""` |
//!
//! Numeric values below 1 clamp to 1, and `limit` clamps to the configured
//! maximum. Text that is not an integer at all uses the default.

use crate::filter::{CategoryFilter, ProductFilter, ProjectFilter};
use crate::paginate::PageRequest;
use reqwest::Url;
use std::collections::HashMap;
use std::num::IntErrorKind;

pub const PRODUCTS_PAGE_SIZE: usize = 9;
pub const PROJECTS_PAGE_SIZE: usize = 6;
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// Per-endpoint defaults applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDefaults {
    /// `limit` used when the request does not give a usable one.
    pub page_size: usize,
    /// Upper bound for `limit`.
    pub max_limit: usize,
}

impl ListDefaults {
    pub fn products() -> Self {
        Self {
            page_size: PRODUCTS_PAGE_SIZE,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    pub fn projects() -> Self {
        Self {
            page_size: PROJECTS_PAGE_SIZE,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    fn page_request(&self, params: &HashMap<String, String>) -> PageRequest {
        let page = parse_count(params.get("page").map(String::as_str), 1, usize::MAX);
        let limit = parse_count(
            params.get("limit").map(String::as_str),
            self.page_size,
            self.max_limit.max(1),
        );
        PageRequest::new(page, limit)
    }

    fn limit_pair(&self, page: PageRequest) -> Option<(&'static str, String)> {
        (page.limit() != self.page_size).then(|| ("limit", page.limit().to_string()))
    }
}

/// A parsed products request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: PageRequest,
    pub filter: ProductFilter,
}

impl ProductQuery {
    pub fn new(filter: ProductFilter, page: PageRequest) -> Self {
        Self { page, filter }
    }

    pub fn from_params(params: &HashMap<String, String>, defaults: ListDefaults) -> Self {
        Self {
            page: defaults.page_request(params),
            filter: ProductFilter {
                category: non_empty(params.get("category")),
                product_type: non_empty(params.get("type")),
                search: non_empty(params.get("search")),
            },
        }
    }

    /// Parameters for an API request. Unset filters are left out.
    pub fn to_api_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.page().to_string()),
            ("limit", self.page.limit().to_string()),
        ];
        pairs.extend(self.filter_pairs());
        pairs
    }

    /// Query string for the listing page URL. `limit` is written only when
    /// it differs from the endpoint's page size.
    pub fn to_url_query(&self, defaults: ListDefaults) -> String {
        let mut pairs = vec![("page", self.page.page().to_string())];
        pairs.extend(defaults.limit_pair(self.page));
        pairs.extend(self.filter_pairs());
        encode_query(&pairs)
    }

    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("category", &self.filter.category),
            ("type", &self.filter.product_type),
            ("search", &self.filter.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

/// A parsed projects request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub page: PageRequest,
    pub filter: ProjectFilter,
}

impl ProjectQuery {
    pub fn new(filter: ProjectFilter, page: PageRequest) -> Self {
        Self { page, filter }
    }

    pub fn from_params(params: &HashMap<String, String>, defaults: ListDefaults) -> Self {
        Self {
            page: defaults.page_request(params),
            filter: ProjectFilter {
                category: CategoryFilter::parse(
                    params.get("category").map(String::as_str).unwrap_or(""),
                ),
                search: params.get("search").cloned().unwrap_or_default(),
            },
        }
    }

    /// Parse the state carried in a listing URL's query string.
    pub fn from_url_query(query: &str, defaults: ListDefaults) -> Self {
        Self::from_params(&decode_query(query), defaults)
    }

    /// Parameters for an API request. Category and search are always sent.
    pub fn to_api_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.page().to_string()),
            ("limit", self.page.limit().to_string()),
            ("category", self.filter.category.as_str().to_string()),
            ("search", self.filter.search.clone()),
        ]
    }

    /// Query string for a shareable listing URL.
    ///
    /// `category` is omitted when unconstrained, `search` when empty and
    /// `limit` when it is the page size. `page` is always present so
    /// back/forward lands on the same page.
    pub fn to_url_query(&self, defaults: ListDefaults) -> String {
        let mut pairs = Vec::new();
        if let CategoryFilter::Named(name) = &self.filter.category {
            pairs.push(("category", name.clone()));
        }
        if !self.filter.search.is_empty() {
            pairs.push(("search", self.filter.search.clone()));
        }
        pairs.push(("page", self.page.page().to_string()));
        pairs.extend(defaults.limit_pair(self.page));
        encode_query(&pairs)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Parse a positive count, clamping into `1..=max`.
fn parse_count(raw: Option<&str>, default: usize, max: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n < 1 => 1,
        Ok(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => max,
            IntErrorKind::NegOverflow => 1,
            _ => default,
        },
    }
}

/// Encode key/value pairs as an `application/x-www-form-urlencoded` string.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    Url::parse_with_params("http://localhost/", pairs)
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default()
}

/// Decode a query string (with or without the leading `?`). Later duplicates
/// win, matching how the server extracts parameters.
pub fn decode_query(query: &str) -> HashMap<String, String> {
    let raw = format!("http://localhost/?{}", query.trim_start_matches('?'));
    Url::parse(&raw)
        .map(|url| url.query_pairs().into_owned().collect())
        .unwrap_or_default()
}
