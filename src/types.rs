//! Catalog record types.
//!
//! These are the records served by the list endpoints and decoded again by the
//! HTTP client, so the JSON field names are part of the wire contract
//! (`categoryName`, `type`, `isFeatured`). Records are read-only once the
//! catalog is loaded; nothing in the crate mutates them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A glass product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Product {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Classification label matched exactly by the `category` filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Second classification axis, matched exactly by the `type` filter.
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub featured: bool,
    /// Display-only bullet points. Never searched.
    #[serde(default)]
    pub features: Vec<String>,
    /// Display-only list of typical uses. Never searched.
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A reference installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Never empty; a project may belong to several categories.
    pub categories: Vec<String>,
    /// Display string such as `"2026"`. Not used for filtering or ordering.
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Label → value pairs shown on the project detail card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<BTreeMap<String, String>>,
}

impl Project {
    pub fn featured(&self) -> bool {
        self.is_featured.unwrap_or(false)
    }
}
