//! The in-memory catalog store.
//!
//! A [`Catalog`] is built once at start-up, validated, and then shared
//! read-only between request handlers behind an `Arc`. There is no write
//! path: listing order is the order records appear in the source file.
//!
//! ## Sources
//!
//! The seed catalog (`data/catalog.toml`) is compiled into the binary. A file
//! of the same shape can be supplied instead:
//!
//! ```toml
//! [[products]]
//! id = "safety-glass"
//! name = "Safety Glass"
//! description = "Toughened glass that breaks into blunt fragments."
//! categoryName = "Construction"
//! type = "Tempered"
//!
//! [[projects]]
//! id = "one-golden-mile"
//! title = "One Golden Mile"
//! description = "Grade-A commercial tower."
//! categories = ["Architecture"]
//! year = "2026"
//! location = "Kokapet, Hyderabad"
//! isFeatured = true
//! ```

use crate::types::{Product, Project};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

const SEED_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Catalog validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub projects: Vec<Project>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_toml_str(SEED_CATALOG)
    }

    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog from already-constructed records, enforcing the same
    /// invariants as file loading.
    pub fn from_records(
        products: Vec<Product>,
        projects: Vec<Project>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self { products, projects };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check ids are present and unique, and that every project is categorised.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_ids("product", self.products.iter().map(|p| p.id.as_str()))?;
        check_ids("project", self.projects.iter().map(|p| p.id.as_str()))?;
        for project in &self.projects {
            if project.categories.iter().all(|c| c.trim().is_empty()) {
                return Err(CatalogError::Validation(format!(
                    "project '{}' must have at least one category",
                    project.id
                )));
            }
        }
        Ok(())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// The canonical featured project.
    ///
    /// If several records are flagged, the first one in catalog order wins.
    pub fn featured_project(&self) -> Option<&Project> {
        self.projects.iter().find(|p| p.featured())
    }

    pub fn featured_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Distinct project categories in first-seen order.
    pub fn project_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .flat_map(|p| p.categories.iter())
            .map(String::as_str)
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CatalogError::Validation(format!("{kind} id must not be empty")));
        }
        if !seen.insert(id) {
            return Err(CatalogError::Validation(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}
