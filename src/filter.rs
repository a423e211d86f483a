//! Filter predicates for the list endpoints.
//!
//! Filtering is pure and order-preserving: [`apply`] returns the records of
//! the input that satisfy a filter, in input order, and never fails. An
//! unknown category or type simply matches nothing.
//!
//! The two collections deliberately differ in case handling:
//!
//! | Filter | Products | Projects |
//! |--------|----------|----------|
//! | category | exact, case-sensitive, on `categoryName` | case-insensitive, any of `categories` |
//! | type | exact, case-sensitive | n/a |
//! | search | name, description | title, description, location, categories |
//!
//! Search is always a case-insensitive substring match. A whitespace-only
//! search string is a literal token, not "no search".

use crate::types::{Product, Project};
use serde::Serialize;
use std::collections::HashSet;

/// A predicate over catalog records of type `T`.
pub trait Matcher<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Return the records matching `filter`, in input order.
pub fn apply<'a, T, M: Matcher<T>>(records: &'a [T], filter: &M) -> Vec<&'a T> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Constraints for the products listing. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.product_type.is_none()
            && self.search.as_deref().is_none_or(str::is_empty)
    }
}

impl Matcher<Product> for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|c| product.category_name.as_deref() == Some(c));
        let type_match = self
            .product_type
            .as_deref()
            .is_none_or(|t| product.product_type == t);
        let search_match = match self.search.as_deref() {
            None | Some("") => true,
            Some(search) => {
                let needle = search.to_lowercase();
                contains_folded(&product.name, &needle)
                    || contains_folded(&product.description, &needle)
            }
        };
        category_match && type_match && search_match
    }
}

/// The project category constraint. Serialises as `"all"` or the label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Interpret a raw category value: empty or exactly `all` is [`All`].
    /// Any other spelling is a category name, so `ALL` matches only projects
    /// categorised as "all".
    ///
    /// [`All`]: CategoryFilter::All
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Named(name) => name,
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Constraints for the projects listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFilter {
    pub category: CategoryFilter,
    /// Empty means unconstrained.
    #[serde(rename = "searchQuery")]
    pub search: String,
}

impl Matcher<Project> for ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        let category_match = match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Named(wanted) => {
                let wanted = wanted.to_lowercase();
                project.categories.iter().any(|c| c.to_lowercase() == wanted)
            }
        };
        if !category_match {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        contains_folded(&project.title, &needle)
            || contains_folded(&project.description, &needle)
            || project
                .location
                .as_deref()
                .is_some_and(|l| contains_folded(l, &needle))
            || project.categories.iter().any(|c| contains_folded(c, &needle))
    }
}

/// `needle` must already be lower-cased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Distinct filter values derived from loaded products, for populating the
/// category and type pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub types: Vec<String>,
}

impl Facets {
    /// Collect distinct categories (skipping missing or empty ones) and types,
    /// each in first-seen order.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut facets = Facets::default();
        let mut seen_categories = HashSet::new();
        let mut seen_types = HashSet::new();
        for product in products {
            if let Some(category) = product.category_name.as_deref().filter(|c| !c.is_empty()) {
                if seen_categories.insert(category) {
                    facets.categories.push(category.to_string());
                }
            }
            if seen_types.insert(product.product_type.as_str()) {
                facets.types.push(product.product_type.clone());
            }
        }
        facets
    }
}
