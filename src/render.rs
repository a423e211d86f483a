//! HTML rendering with maud.
//!
//! Pages are plain server-rendered documents: filter forms submit with GET and
//! every listing state (filters and page) lives in the query string, so any
//! view can be reloaded or shared. The list-state vocabulary is the
//! controller's [`ListStatus`], which keeps the HTML and the terminal views
//! in agreement about what "empty", "end of results" and "failed" mean.

use crate::controller::{Footer, ListStatus, Mode};
use crate::filter::{CategoryFilter, Facets, ProductFilter, ProjectFilter};
use crate::paginate::{PageLink, PageMeta, PageRequest, page_window};
use crate::params::{ListDefaults, ProductQuery, ProjectQuery};
use crate::query::{ProductList, ProjectList};
use crate::types::{Product, Project};
use maud::{DOCTYPE, Markup, html};

const CSS: &str = include_str!("../static/style.css");

/// Placeholder cards shown while the first page loads.
const SKELETON_CARDS: usize = 6;

fn base_document(title: &str, current: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (site_header(current))
                main { (content) }
            }
        }
    }
}

fn site_header(current: &str) -> Markup {
    html! {
        header.site-header {
            a href="/" { strong { "Glass Catalog" } }
            nav {
                @for (href, label) in [("/products", "Products"), ("/projects", "Projects")] {
                    a href=(href) aria-current=[(href == current).then_some("page")] { (label) }
                }
            }
        }
    }
}

pub fn error_page(message: &str) -> Markup {
    let content = html! {
        div.notice.error {
            p { (message) }
            a href="" { "Try again" }
        }
    };
    base_document("Error", "", content)
}

// =========================================================================
// Cards
// =========================================================================

pub fn product_card(product: &Product) -> Markup {
    html! {
        article.card id=(product.id) {
            @if let Some(src) = &product.image {
                img src=(src) alt=(product.name) loading="lazy";
            }
            div.body {
                @if let Some(category) = &product.category_name {
                    span.tag { (category) }
                }
                span.tag { (product.product_type) }
                h3 { (product.name) }
                p { (product.description) }
                @if !product.features.is_empty() {
                    ul.features {
                        @for feature in &product.features {
                            li { (feature) }
                        }
                    }
                }
            }
        }
    }
}

pub fn project_card(project: &Project) -> Markup {
    html! {
        article.card id=(project.id) {
            @if let Some(src) = &project.image {
                img src=(src) alt=(project.title) loading="lazy";
            }
            div.body {
                @for category in &project.categories {
                    span.tag { (category) }
                }
                span.tag { (project.year) }
                h3 { (project.title) }
                @if let Some(location) = &project.location {
                    p.location { (location) }
                }
                p { (project.description) }
            }
        }
    }
}

fn featured_project(project: &Project) -> Markup {
    html! {
        section.featured {
            @if let Some(src) = &project.image {
                img src=(src) alt=(project.title);
            }
            div.body {
                span.tag { "Featured" }
                h2 { (project.title) }
                p { (project.description) }
                @if let Some(specs) = &project.specs {
                    dl {
                        @for (label, value) in specs {
                            dt { (label) }
                            dd { (value) }
                        }
                    }
                }
            }
        }
    }
}

fn skeletons(count: usize) -> Markup {
    html! {
        div.grid aria-busy="true" {
            @for _ in 0..count {
                div.card.skeleton {}
            }
        }
    }
}

// =========================================================================
// List status
// =========================================================================

/// Status of a list rendered in one go from a completed query.
pub fn settled_status(meta: &PageMeta, shown: usize, mode: Mode) -> ListStatus {
    if shown == 0 {
        return ListStatus::Empty;
    }
    let footer = match mode {
        Mode::Accumulate if meta.has_more => Footer::Sentinel,
        Mode::Accumulate => Footer::End { total: meta.total },
        Mode::Replace => Footer::Pages {
            current: meta.page,
            total_pages: meta.total_pages,
        },
    };
    ListStatus::Items { footer }
}

fn items_footer(status: &ListStatus) -> Option<&Footer> {
    match status {
        ListStatus::Items { footer } => Some(footer),
        _ => None,
    }
}

/// Current page and page count of a numbered listing that has items.
fn page_position(status: &ListStatus) -> Option<(usize, usize)> {
    match status {
        ListStatus::Items {
            footer: Footer::Pages {
                current,
                total_pages,
            },
        } => Some((*current, *total_pages)),
        _ => None,
    }
}

/// Everything except the items themselves: placeholders, error, empty
/// notice. Renders nothing for [`ListStatus::Items`].
pub fn status_notice(status: &ListStatus, noun: &str) -> Markup {
    html! {
        @match status {
            ListStatus::Loading => {
                (skeletons(SKELETON_CARDS))
            }
            ListStatus::Failed { message } => {
                div.notice.error role="alert" {
                    p { (message) }
                    a href="" { "Try again" }
                }
            }
            ListStatus::Empty => {
                div.notice { p { "No " (noun) " found matching your criteria." } }
            }
            ListStatus::Items { .. } => {}
        }
    }
}

/// Footer below an accumulating list. `more_href` is the link that loads
/// the next page.
pub fn accumulate_footer(footer: &Footer, noun: &str, more_href: &str) -> Markup {
    html! {
        div.list-footer {
            @match footer {
                Footer::Sentinel => {
                    a.load-more href=(more_href) { "Load more" }
                }
                Footer::LoadingMore => {
                    span { "Loading more " (noun) "…" }
                }
                Footer::RetryMore { message } => {
                    span.error { (message) " " }
                    a href=(more_href) { "Retry" }
                }
                Footer::End { total } => {
                    span { "That's all " (total) " " (noun) }
                }
                Footer::Pages { .. } => {}
            }
        }
    }
}

/// Numbered page strip with previous/next links.
pub fn pagination(current: usize, total_pages: usize, href: impl Fn(usize) -> String) -> Markup {
    let links = page_window(current, total_pages);
    html! {
        @if !links.is_empty() {
            nav.pagination aria-label="Pagination" {
                @if current > 1 {
                    a rel="prev" href=(href(current - 1)) { "‹ Previous" }
                } @else {
                    span.disabled { "‹ Previous" }
                }
                @for link in &links {
                    @match link {
                        PageLink::Number(n) => {
                            a href=(href(*n)) aria-current=[(*n == current).then_some("page")] { (n) }
                        }
                        PageLink::Gap => {
                            span.gap { "…" }
                        }
                    }
                }
                @if current < total_pages {
                    a rel="next" href=(href(current + 1)) { "Next ›" }
                } @else {
                    span.disabled { "Next ›" }
                }
            }
        }
    }
}

// =========================================================================
// Pages
// =========================================================================

/// The page size to carry through forms and links, when not the default.
fn custom_limit(page: PageRequest, defaults: ListDefaults) -> Option<usize> {
    (page.limit() != defaults.page_size).then_some(page.limit())
}

fn product_filters(filter: &ProductFilter, facets: &Facets, limit: Option<usize>) -> Markup {
    let category = filter.category.as_deref().unwrap_or("");
    let product_type = filter.product_type.as_deref().unwrap_or("");
    html! {
        form.filters method="get" action="/products" {
            @if let Some(limit) = limit {
                input type="hidden" name="limit" value=(limit);
            }
            input type="search" name="search" placeholder="Search products"
                value=(filter.search.as_deref().unwrap_or(""));
            select name="category" {
                option value="" { "All categories" }
                @for c in &facets.categories {
                    option value=(c) selected[c == category] { (c) }
                }
            }
            select name="type" {
                option value="" { "All types" }
                @for t in &facets.types {
                    option value=(t) selected[t == product_type] { (t) }
                }
            }
            button type="submit" { "Filter" }
            @if !filter.is_unconstrained() {
                a.clear href="/products" { "Clear filters" }
            }
        }
    }
}

/// The products listing: every page up to the requested one, accumulated.
pub fn products_page(list: &ProductList, query: &ProductQuery, defaults: ListDefaults) -> Markup {
    let facets = Facets::from_products(&list.data);
    let status = settled_status(&list.meta.page, list.data.len(), Mode::Accumulate);
    let next = ProductQuery::new(query.filter.clone(), query.page.next());
    let more_href = format!("/products?{}", next.to_url_query(defaults));
    let content = html! {
        h1 { "Products" }
        (product_filters(&query.filter, &facets, custom_limit(query.page, defaults)))
        (status_notice(&status, "products"))
        @if let Some(footer) = items_footer(&status) {
            div.grid {
                @for product in &list.data {
                    (product_card(product))
                }
            }
            (accumulate_footer(footer, "products", &more_href))
        }
    };
    base_document("Products", "/products", content)
}

/// Whether a tab shows the active category. Names compare like the filter does.
fn same_category(tab: &CategoryFilter, active: &CategoryFilter) -> bool {
    match (tab, active) {
        (CategoryFilter::All, CategoryFilter::All) => true,
        (CategoryFilter::Named(a), CategoryFilter::Named(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

fn project_tabs(query: &ProjectQuery, defaults: ListDefaults, categories: &[&str]) -> Markup {
    let filter = &query.filter;
    let tab_href = |category: CategoryFilter| {
        let filter = ProjectFilter {
            category,
            search: filter.search.clone(),
        };
        let first = ProjectQuery::new(filter, query.page.with_page(1));
        format!("/projects?{}", first.to_url_query(defaults))
    };
    let all = std::iter::once(("All", CategoryFilter::All)).chain(
        categories
            .iter()
            .map(|c| (*c, CategoryFilter::Named(c.to_string()))),
    );
    html! {
        div.tabs {
            @for (label, category) in all {
                @let active = same_category(&category, &filter.category);
                a class=[active.then_some("active")] href=(tab_href(category)) { (label) }
            }
        }
    }
}

/// The projects listing: one numbered page.
pub fn projects_page(
    list: &ProjectList,
    query: &ProjectQuery,
    defaults: ListDefaults,
    featured: Option<&Project>,
    categories: &[&str],
) -> Markup {
    let meta = &list.meta.page;
    let status = settled_status(meta, list.data.len(), Mode::Replace);
    let page_href = |n: usize| {
        let q = ProjectQuery::new(query.filter.clone(), query.page.with_page(n));
        format!("/projects?{}", q.to_url_query(defaults))
    };
    let content = html! {
        h1 { "Projects" }
        @if let Some(project) = featured {
            (featured_project(project))
        }
        (project_tabs(query, defaults, categories))
        form.filters method="get" action="/projects" {
            @if let CategoryFilter::Named(name) = &query.filter.category {
                input type="hidden" name="category" value=(name);
            }
            @if let Some(limit) = custom_limit(query.page, defaults) {
                input type="hidden" name="limit" value=(limit);
            }
            input type="search" name="search" placeholder="Search projects"
                value=(query.filter.search);
            button type="submit" { "Search" }
        }
        (status_notice(&status, "projects"))
        @if let Some((current, total_pages)) = page_position(&status) {
            @if let Some((first, last)) = meta.item_range() {
                p.range { "Showing " (first) "–" (last) " of " (meta.total) " projects" }
            }
            div.grid {
                @for project in &list.data {
                    (project_card(project))
                }
            }
            (pagination(current, total_pages, page_href))
        }
    };
    base_document("Projects", "/projects", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::params::decode_query;
    use crate::query::{run_products, run_projects};
    use crate::test_helpers::*;

    fn meta(page: usize, limit: usize, total: usize) -> PageMeta {
        PageMeta::new(PageRequest::new(page, limit), total)
    }

    fn render_products(catalog: &Catalog, query: &ProductQuery) -> String {
        products_page(&run_products(catalog, query), query, ListDefaults::products()).into_string()
    }

    /// The unescaped href of the first link whose opening tag starts with `tag`.
    fn link_after(html: &str, tag: &str) -> String {
        let start = html.find(tag).expect("link present") + tag.len();
        let rest = &html[start..];
        let href = rest.find("href=\"").expect("href present") + 6;
        let end = rest[href..].find('"').expect("closing quote");
        rest[href..href + end].replace("&amp;", "&")
    }

    // =========================================================================
    // Status
    // =========================================================================

    #[test]
    fn settled_status_accumulate() {
        assert_eq!(
            settled_status(&meta(1, 9, 20), 9, Mode::Accumulate),
            ListStatus::Items {
                footer: Footer::Sentinel
            }
        );
        assert_eq!(
            settled_status(&meta(3, 9, 20), 20, Mode::Accumulate),
            ListStatus::Items {
                footer: Footer::End { total: 20 }
            }
        );
        assert_eq!(
            settled_status(&meta(1, 9, 0), 0, Mode::Accumulate),
            ListStatus::Empty
        );
    }

    #[test]
    fn settled_status_replace_past_the_end_is_empty() {
        assert_eq!(
            settled_status(&meta(5, 6, 14), 0, Mode::Replace),
            ListStatus::Empty
        );
        assert_eq!(
            settled_status(&meta(2, 6, 14), 6, Mode::Replace),
            ListStatus::Items {
                footer: Footer::Pages {
                    current: 2,
                    total_pages: 3
                }
            }
        );
    }

    #[test]
    fn notice_for_each_status() {
        let loading = status_notice(&ListStatus::Loading, "products").into_string();
        assert_eq!(loading.matches("skeleton").count(), SKELETON_CARDS);

        let failed = status_notice(
            &ListStatus::Failed {
                message: "Failed to fetch products".into(),
            },
            "products",
        )
        .into_string();
        assert!(failed.contains("Failed to fetch products"));
        assert!(failed.contains("Try again"));

        let empty = status_notice(&ListStatus::Empty, "projects").into_string();
        assert!(empty.contains("No projects found matching your criteria."));
    }

    #[test]
    fn footer_texts() {
        let end = accumulate_footer(&Footer::End { total: 9 }, "products", "/x").into_string();
        assert!(end.contains("all 9 products"));
        let more = accumulate_footer(&Footer::Sentinel, "products", "/products?page=2").into_string();
        assert!(more.contains("href=\"/products?page=2\""));
        assert!(more.contains("Load more"));
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    #[test]
    fn pagination_marks_current_and_gaps() {
        let html = pagination(5, 10, |n| format!("?page={n}")).into_string();
        assert!(html.contains("href=\"?page=5\" aria-current=\"page\""));
        assert!(html.contains("…"));
        assert!(html.contains("href=\"?page=10\""));
        assert!(html.contains("rel=\"prev\" href=\"?page=4\""));
        assert!(html.contains("rel=\"next\" href=\"?page=6\""));
    }

    #[test]
    fn pagination_hidden_for_single_page() {
        assert_eq!(pagination(1, 1, |n| n.to_string()).into_string(), "");
    }

    #[test]
    fn pagination_disables_edges() {
        let html = pagination(1, 3, |n| format!("?page={n}")).into_string();
        assert!(html.contains("<span class=\"disabled\">‹ Previous</span>"));
        assert!(!html.contains("rel=\"prev\""));
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn products_page_lists_cards_and_end_marker() {
        let catalog = Catalog::seed().unwrap();
        let query = ProductQuery::new(ProductFilter::default(), PageRequest::first(9));
        let html = render_products(&catalog, &query);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("<article class=\"card\"").count(), 9);
        assert!(html.contains("products</span>"));
        assert!(!html.contains("Load more"));
        assert!(!html.contains("Clear filters"));
    }

    #[test]
    fn products_page_links_to_next_page_when_more_exist() {
        let catalog = Catalog::from_records(numbered_products(12), vec![]).unwrap();
        let query = ProductQuery::new(ProductFilter::default(), PageRequest::first(9));
        let html = render_products(&catalog, &query);
        assert!(html.contains("href=\"/products?page=2\""));
    }

    #[test]
    fn products_load_more_keeps_custom_limit() {
        let catalog = Catalog::from_records(numbered_products(12), vec![]).unwrap();
        let query = ProductQuery::new(ProductFilter::default(), PageRequest::first(3));
        let html = render_products(&catalog, &query);
        assert!(html.contains("<input type=\"hidden\" name=\"limit\" value=\"3\">"));
        let more = link_after(&html, "<a class=\"load-more\"");
        assert_eq!(more, "/products?page=2&limit=3");

        let next = ProductQuery::from_params(
            &decode_query(more.trim_start_matches("/products")),
            ListDefaults::products(),
        );
        assert_eq!(next.page, PageRequest::new(2, 3));
        let list = crate::server::accumulated_products(&catalog, &next);
        assert_eq!(list.data.len(), 6);
        let html = products_page(&list, &next, ListDefaults::products()).into_string();
        assert_eq!(html.matches("<article class=\"card\"").count(), 6);
        assert_eq!(link_after(&html, "<a class=\"load-more\""), "/products?page=3&limit=3");
    }

    #[test]
    fn products_page_keeps_selected_filters() {
        let catalog = Catalog::seed().unwrap();
        let filter = ProductFilter {
            category: Some("Transport".into()),
            ..Default::default()
        };
        let query = ProductQuery::new(filter, PageRequest::first(9));
        let html = render_products(&catalog, &query);
        assert!(html.contains("<option value=\"Transport\" selected>Transport</option>"));
        assert!(html.contains("<a class=\"clear\" href=\"/products\">Clear filters</a>"));
        assert_eq!(html.matches("<article class=\"card\"").count(), 3);
    }

    #[test]
    fn projects_page_shows_range_and_featured() {
        let catalog = Catalog::seed().unwrap();
        let query = ProjectQuery::new(ProjectFilter::default(), PageRequest::new(1, 4));
        let list = run_projects(&catalog, &query);
        let html = projects_page(
            &list,
            &query,
            ListDefaults {
                page_size: 4,
                max_limit: 100,
            },
            catalog.featured_project(),
            &catalog.project_categories(),
        )
        .into_string();
        assert!(html.contains("Showing 1–4 of 6 projects"));
        assert!(html.contains("class=\"featured\""));
        assert!(html.contains("href=\"/projects?page=2\""));
        assert!(html.contains("<a class=\"active\" href=\"/projects?page=1\">All</a>"));
    }

    #[test]
    fn projects_next_link_keeps_custom_limit() {
        let catalog = Catalog::seed().unwrap();
        let defaults = ListDefaults::projects();
        let query = ProjectQuery::from_url_query("limit=2", defaults);
        let html = projects_page(&run_projects(&catalog, &query), &query, defaults, None, &[])
            .into_string();
        assert!(html.contains("Showing 1–2 of 6 projects"));
        let next = link_after(&html, "<a rel=\"next\"");
        assert_eq!(next, "/projects?page=2&limit=2");

        let followed = ProjectQuery::from_url_query(next.trim_start_matches("/projects"), defaults);
        let list = run_projects(&catalog, &followed);
        assert_eq!(list.data.len(), 2);
        let html = projects_page(&list, &followed, defaults, None, &[]).into_string();
        assert!(html.contains("Showing 3–4 of 6 projects"));
        assert!(html.contains("href=\"/projects?page=3&amp;limit=2\""));
    }

    #[test]
    fn projects_page_search_with_no_match() {
        let catalog = mixed_city_catalog();
        let filter = ProjectFilter {
            search: "mumbai".into(),
            ..Default::default()
        };
        let query = ProjectQuery::new(filter, PageRequest::first(6));
        let html = projects_page(
            &run_projects(&catalog, &query),
            &query,
            ListDefaults::projects(),
            None,
            &[],
        )
        .into_string();
        assert!(html.contains("No projects found matching your criteria."));
        assert!(!html.contains("Showing"));
        assert!(html.contains("value=\"mumbai\""));
    }

    #[test]
    fn card_text_is_escaped() {
        let mut p = product("x", "Transport", "Tempered");
        p.name = "<b>bold</b>".into();
        let html = product_card(&p).into_string();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
