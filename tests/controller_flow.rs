use glass_catalog::catalog::Catalog;
use glass_catalog::client::{self, LocalSource, PageSource};
use glass_catalog::controller::{Delivery, Footer, ListController, ListStatus, Phase};
use glass_catalog::filter::{CategoryFilter, ProductFilter, ProjectFilter};
use glass_catalog::params::{ListDefaults, ProjectQuery};
use glass_catalog::types::{Product, Project};
use std::sync::Arc;

fn seed_source() -> LocalSource {
    LocalSource::new(Arc::new(Catalog::seed().expect("seed catalog")))
}

fn category(name: &str) -> ProductFilter {
    ProductFilter {
        category: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn products_scroll_in_pages_of_two() {
    let source = seed_source();
    let mut c: ListController<Product, ProductFilter> =
        ListController::accumulating(ProductFilter::default(), 2);
    let first = c.start();
    client::drive(&mut c, &source, first).await;
    assert_eq!(c.items().len(), 2);

    let mut loads = 1;
    while let Some(next) = c.sentinel_visible() {
        assert_eq!(c.status(), ListStatus::Items { footer: Footer::LoadingMore });
        client::drive(&mut c, &source, next).await;
        loads += 1;
    }
    assert_eq!(loads, 5);
    assert_eq!(c.items().len(), 9);
    assert_eq!(c.status(), ListStatus::Items { footer: Footer::End { total: 9 } });
}

#[tokio::test]
async fn out_of_order_filter_responses_render_the_latest_filter() {
    let source = seed_source();
    let mut c: ListController<Product, ProductFilter> =
        ListController::accumulating(ProductFilter::default(), 9);
    let initial = c.start();
    client::drive(&mut c, &source, initial).await;

    let a = c.set_filter(category("Security Glass")).expect("filter A");
    let b = c.set_filter(category("Transport")).expect("filter B");

    // B's response arrives first, A's after it.
    let b_page = PageSource::<ProductFilter, Product>::fetch(&source, &b.filter, b.page).await.expect("fetch B");
    let a_page = PageSource::<ProductFilter, Product>::fetch(&source, &a.filter, a.page).await.expect("fetch A");
    assert_eq!(c.on_success(b.ticket, b_page), Delivery::Applied);
    assert_eq!(c.on_success(a.ticket, a_page), Delivery::Stale);

    assert_eq!(c.items().len(), 3);
    assert!(c
        .items()
        .iter()
        .all(|p| p.category_name.as_deref() == Some("Transport")));
    assert_eq!(c.facets().categories, vec!["Transport"]);
}

#[tokio::test]
async fn category_without_matches_is_empty_not_error() {
    let source = seed_source();
    let mut c: ListController<Product, ProductFilter> =
        ListController::accumulating(category("Roofing"), 9);
    let first = c.start();
    client::drive(&mut c, &source, first).await;
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.status(), ListStatus::Empty);
    assert!(c.sentinel_visible().is_none());
}

#[tokio::test]
async fn project_url_navigation() {
    let source = seed_source();
    let defaults = ListDefaults {
        page_size: 4,
        max_limit: 100,
    };
    let mut c: ListController<Project, ProjectFilter> =
        ListController::paged(ProjectFilter::default(), defaults.page_size);

    // Landing on a shared URL.
    let landing = ProjectQuery::from_url_query("?page=2", defaults);
    let first = c.start_at(landing.page.page());
    client::drive(&mut c, &source, first).await;
    assert_eq!(c.page(), 2);
    assert_eq!(c.items().len(), 2);

    // Back button to page 1.
    let back = ProjectQuery::from_url_query("page=1", defaults);
    let req = c.sync_url(back.filter, back.page.page()).expect("page change");
    client::drive(&mut c, &source, req).await;
    assert_eq!(c.page(), 1);
    assert_eq!(
        c.status(),
        ListStatus::Items {
            footer: Footer::Pages {
                current: 1,
                total_pages: 2
            }
        }
    );

    // A search URL resets to its own page.
    let searched = ProjectQuery::from_url_query("search=kokapet&page=1", defaults);
    let req = c.sync_url(searched.filter.clone(), searched.page.page()).expect("filter change");
    client::drive(&mut c, &source, req).await;
    assert_eq!(c.items().len(), 1);
    assert_eq!(c.items()[0].id, "one-golden-mile");
    assert_eq!(c.filter().category, CategoryFilter::All);

    // The controller's state round-trips through the URL.
    let url = ProjectQuery::new(c.filter().clone(), searched.page).to_url_query(defaults);
    assert_eq!(url, "search=kokapet&page=1");
}
