//! Shared test utilities for the glass-catalog test suite.
//!
//! Record builders produce minimal valid records that individual tests then
//! tweak field by field:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut p = project("lobby", &["Interiors"]);
//! p.location = Some("Hyderabad".into());
//! let catalog = Catalog::from_records(vec![product("a", "Transport", "Tempered")], vec![p]).unwrap();
//! ```

use crate::catalog::Catalog;
use crate::types::{Product, Project};

// =========================================================================
// Record builders
// =========================================================================

/// A product with the given id, category and type. An empty category is
/// kept as `Some("")` so tests can exercise that edge.
pub fn product(id: &str, category: &str, product_type: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: format!("Description of {id}"),
        category_name: Some(category.to_string()),
        product_type: product_type.to_string(),
        featured: false,
        features: vec![],
        applications: vec![],
        image: None,
    }
}

/// A project with the given id and categories, located nowhere in particular.
pub fn project(id: &str, categories: &[&str]) -> Project {
    Project {
        id: id.to_string(),
        title: format!("Project {id}"),
        description: format!("Description of {id}"),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        year: "2024".to_string(),
        location: None,
        is_featured: None,
        image: None,
        specs: None,
    }
}

/// An Architecture project at `location`.
pub fn project_at(id: &str, location: &str) -> Project {
    let mut p = project(id, &["Architecture"]);
    p.location = Some(location.to_string());
    p
}

/// `n` products named `p1..pn`, alternating between two categories.
pub fn numbered_products(n: usize) -> Vec<Product> {
    (1..=n)
        .map(|i| {
            let category = if i % 2 == 0 { "Transport" } else { "Construction" };
            product(&format!("p{i}"), category, "Tempered")
        })
        .collect()
}

// =========================================================================
// Catalog fixtures
// =========================================================================

/// Projects where most, but not all, are in Hyderabad.
pub fn mixed_city_catalog() -> Catalog {
    Catalog::from_records(
        vec![],
        vec![
            project_at("hyd-1", "Kokapet, Hyderabad"),
            project_at("blr-1", "Whitefield, Bengaluru"),
            project_at("hyd-2", "HITEC City, Hyderabad"),
            project_at("hyd-3", "Financial District, HYDERABAD"),
        ],
    )
    .unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Uniform access to record ids for assertions over mixed listings.
pub trait HasId {
    fn record_id(&self) -> &str;
}

impl HasId for Product {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl HasId for Project {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Ids of `records`, in order.
pub fn record_ids<T: HasId>(records: &[T]) -> Vec<&str> {
    records.iter().map(HasId::record_id).collect()
}
