//! CLI output formatting.
//!
//! Output is record-first: each product or project leads with its positional
//! index and display name, with classification and location as indented
//! context lines. Positions are 1-based over the whole result, not the page,
//! so page 2 of a 9-per-page listing starts at `010`.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Products (9)
//! 001 Bullet Resistant Glass
//!     Category: Security Glass · Type: Laminated · featured
//!
//! Projects (6)
//! 001 One Golden Mile (2024)
//!     Location: Kokapet, Hyderabad
//!     Categories: Architecture
//!
//! Featured products: Bullet Resistant Glass, Automotive Glass, Architectural Glass
//! Featured project: One Golden Mile
//! Config
//!     bind: 127.0.0.1:3000
//!     page sizes: products 9, projects 6 (max 100)
//! ```
//!
//! ## Query / browse
//!
//! ```text
//! 007 Architectural Glass
//!     Category: Construction · Type: Insulated
//! That's all 9 products
//! ```
//!
//! Numbered listings end with a page strip such as `‹ 1 … 3 [4] 5 … 10 ›`.
//!
//! Each view has a `format_*` function (returns `Vec<String>`) and printing
//! is left to [`print_lines`]. Format functions are pure.

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::controller::{Footer, ListStatus};
use crate::paginate::{PageLink, PageMeta, page_window};
use crate::types::{Product, Project};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Records
// ============================================================================

pub fn format_product(index: usize, product: &Product) -> Vec<String> {
    let mut context = Vec::new();
    if let Some(category) = product.category_name.as_deref().filter(|c| !c.is_empty()) {
        context.push(format!("Category: {}", category));
    }
    context.push(format!("Type: {}", product.product_type));
    if product.featured {
        context.push("featured".to_string());
    }
    vec![
        format!("{} {}", format_index(index), product.name),
        format!("{}{}", indent(1), context.join(" · ")),
    ]
}

pub fn format_project(index: usize, project: &Project) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({})",
        format_index(index),
        project.title,
        project.year
    )];
    if let Some(location) = &project.location {
        lines.push(format!("{}Location: {}", indent(1), location));
    }
    lines.push(format!(
        "{}Categories: {}",
        indent(1),
        project.categories.join(", ")
    ));
    lines
}

/// Records starting at 1-based position `first`.
fn format_records<T>(
    records: &[T],
    first: usize,
    format: impl Fn(usize, &T) -> Vec<String>,
) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| format(first + i, record))
        .collect()
}

pub fn format_products(products: &[Product], first: usize) -> Vec<String> {
    format_records(products, first, format_product)
}

pub fn format_projects(projects: &[Project], first: usize) -> Vec<String> {
    format_records(projects, first, format_project)
}

/// 1-based position of the first record on the page described by `meta`.
pub fn first_position(meta: &PageMeta) -> usize {
    meta.item_range().map_or(1, |(first, _)| first)
}

// ============================================================================
// List status
// ============================================================================

/// Page strip: `‹ 1 … 3 [4] 5 … 10 ›`. Empty for a single page.
pub fn format_page_strip(current: usize, total_pages: usize) -> String {
    let links = page_window(current, total_pages);
    if links.is_empty() {
        return String::new();
    }
    let mut parts = vec!["‹".to_string()];
    parts.extend(links.iter().map(|link| match link {
        PageLink::Number(n) if *n == current => format!("[{}]", n),
        PageLink::Number(n) => n.to_string(),
        PageLink::Gap => "…".to_string(),
    }));
    parts.push("›".to_string());
    parts.join(" ")
}

/// Lines describing the list state that are not records themselves.
pub fn format_status(status: &ListStatus, noun: &str) -> Vec<String> {
    match status {
        ListStatus::Loading => vec![format!("Loading {}...", noun)],
        ListStatus::Failed { message } => vec![format!("Error: {}", message)],
        ListStatus::Empty => vec![format!("No {} found matching your criteria.", noun)],
        ListStatus::Items { footer } => match footer {
            Footer::Sentinel => vec![format!("More {} available", noun)],
            Footer::LoadingMore => vec![format!("Loading more {}...", noun)],
            Footer::RetryMore { message } => vec![format!("Error: {} (loaded items kept)", message)],
            Footer::End { total } => vec![format!("That's all {} {}", total, noun)],
            Footer::Pages {
                current,
                total_pages,
            } => {
                let mut lines = vec![format!("Page {} of {}", current, total_pages)];
                let strip = format_page_strip(*current, *total_pages);
                if !strip.is_empty() {
                    lines.push(strip);
                }
                lines
            }
        },
    }
}

/// "Showing 7–12 of 14 projects", or nothing for an empty page.
pub fn format_range(meta: &PageMeta, noun: &str) -> Option<String> {
    meta.item_range()
        .map(|(first, last)| format!("Showing {}–{} of {} {}", first, last, meta.total, noun))
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(catalog: &Catalog, config: &SiteConfig) -> Vec<String> {
    let mut lines = vec![format!("Products ({})", catalog.products.len())];
    lines.extend(format_products(&catalog.products, 1));

    lines.push(String::new());
    lines.push(format!("Projects ({})", catalog.projects.len()));
    for (i, project) in catalog.projects.iter().enumerate() {
        lines.extend(format_project(i + 1, project));
        lines.push(format!(
            "{}{}",
            indent(1),
            truncate_desc(&project.description, 60)
        ));
    }

    lines.push(String::new());
    let featured: Vec<&str> = catalog.featured_products().map(|p| p.name.as_str()).collect();
    if featured.is_empty() {
        lines.push("Featured products: none".to_string());
    } else {
        lines.push(format!("Featured products: {}", featured.join(", ")));
    }
    match catalog.featured_project() {
        Some(project) => lines.push(format!("Featured project: {}", project.title)),
        None => lines.push("Featured project: none".to_string()),
    }
    lines.push("Config".to_string());
    lines.push(format!(
        "{}catalog: {}",
        indent(1),
        config.catalog.as_deref().unwrap_or("(built-in)")
    ));
    lines.push(format!("{}bind: {}", indent(1), config.server.bind));
    lines.push(format!(
        "{}page sizes: products {}, projects {} (max {})",
        indent(1),
        config.api.products_page_size,
        config.api.projects_page_size,
        config.api.max_limit
    ));
    lines
}
