use clap::{Args, Parser, Subcommand};
use glass_catalog::catalog::Catalog;
use glass_catalog::client::{self, CatalogClient, LocalSource, PageSource};
use glass_catalog::config::{self, LoggingConfig, SiteConfig};
use glass_catalog::controller::ListController;
use glass_catalog::filter::{CategoryFilter, ProductFilter, ProjectFilter};
use glass_catalog::paginate::PageRequest;
use glass_catalog::params::{ProductQuery, ProjectQuery};
use glass_catalog::query::{self, Envelope};
use glass_catalog::types::{Product, Project};
use glass_catalog::{output, server};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "glass-catalog")]
#[command(about = "Product and project catalog service")]
#[command(long_about = "\
Product and project catalog service

Serves a filtered, paginated JSON API and HTML listings over a catalog of
glass products and reference projects.

  GET /api/products?category=&type=&search=&page=&limit=
  GET /api/projects?category=all&search=&page=&limit=
  GET /api/products/:id   GET /api/projects/:id   GET /api/projects/featured
  GET /products           GET /projects           GET /healthz

Products filter by exact category and type; projects filter by
case-insensitive category and a search over title, description, location
and categories.

Run 'glass-catalog gen-config' to generate a documented config.toml.")]
#[command(version = glass_catalog::LONG_VERSION)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "glass-catalog.toml", global = true)]
    config: PathBuf,

    /// Catalog file, overriding the config's `catalog` key
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Listen address, overriding `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one list query against the catalog and print the page
    #[command(subcommand)]
    Query(QueryCommand),
    /// Page through a listing the way the website does
    #[command(subcommand)]
    Browse(BrowseCommand),
    /// Validate the config and catalog, then print a summary
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Filter and page the products
    Products {
        #[command(flatten)]
        filter: ProductArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Filter and page the projects
    Projects {
        #[command(flatten)]
        filter: ProjectArgs,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum BrowseCommand {
    /// Scroll through products, loading up to `--pages` pages
    Products {
        #[command(flatten)]
        filter: ProductArgs,
        #[command(flatten)]
        source: SourceArgs,
        /// Pages to load before stopping
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show one numbered page of projects
    Projects {
        #[command(flatten)]
        filter: ProjectArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Args, Clone)]
struct ProductArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long = "type")]
    product_type: Option<String>,
    #[arg(long)]
    search: Option<String>,
}

impl ProductArgs {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category: self.category.filter(|s| !s.is_empty()),
            product_type: self.product_type.filter(|s| !s.is_empty()),
            search: self.search.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Args, Clone)]
struct ProjectArgs {
    /// Category, or `all`
    #[arg(long, default_value = "all")]
    category: String,
    #[arg(long, default_value = "")]
    search: String,
}

impl ProjectArgs {
    fn into_filter(self) -> ProjectFilter {
        ProjectFilter {
            category: CategoryFilter::parse(&self.category),
            search: self.search,
        }
    }
}

#[derive(Args, Clone)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Page size (defaults to the configured size)
    #[arg(long)]
    limit: Option<usize>,
    /// Print the JSON response body instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Server to query; without it the local catalog is used
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let catalog_override = cli.catalog.as_deref();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Serve { bind } => {
            let (mut site_config, catalog) = setup(&cli.config, catalog_override)?;
            if let Some(bind) = bind {
                site_config.server.bind = bind;
                site_config.validate()?;
            }
            server::serve(&site_config, catalog).await?;
        }
        Command::Query(QueryCommand::Products { filter, page }) => {
            let (site_config, catalog) = setup(&cli.config, catalog_override)?;
            let limit = page.limit.unwrap_or(site_config.api.products_page_size);
            let request = PageRequest::new(page.page, limit.min(site_config.api.max_limit));
            let query = ProductQuery::new(filter.into_filter(), request);
            let list = query::run_products(&catalog, &query);
            if page.json {
                println!("{}", serde_json::to_string_pretty(&Envelope::from(list))?);
            } else {
                let mut lines =
                    output::format_products(&list.data, output::first_position(&list.meta.page));
                lines.extend(output::format_range(&list.meta.page, "products"));
                output::print_lines(&lines);
            }
        }
        Command::Query(QueryCommand::Projects { filter, page }) => {
            let (site_config, catalog) = setup(&cli.config, catalog_override)?;
            let limit = page.limit.unwrap_or(site_config.api.projects_page_size);
            let request = PageRequest::new(page.page, limit.min(site_config.api.max_limit));
            let query = ProjectQuery::new(filter.into_filter(), request);
            let list = query::run_projects(&catalog, &query);
            if page.json {
                println!("{}", serde_json::to_string_pretty(&Envelope::from(list))?);
            } else {
                let mut lines =
                    output::format_projects(&list.data, output::first_position(&list.meta.page));
                lines.extend(output::format_range(&list.meta.page, "projects"));
                output::print_lines(&lines);
            }
        }
        Command::Browse(BrowseCommand::Products {
            filter,
            source,
            pages,
        }) => {
            let (site_config, catalog) = setup(&cli.config, catalog_override)?;
            let source = page_source::<ProductFilter, Product>(source, catalog)?;
            let mut controller: ListController<Product, ProductFilter> =
                ListController::accumulating(
                    filter.into_filter(),
                    site_config.api.products_page_size,
                );
            browse_products(&mut controller, source.as_ref(), pages).await;
        }
        Command::Browse(BrowseCommand::Projects {
            filter,
            source,
            page,
        }) => {
            let (site_config, catalog) = setup(&cli.config, catalog_override)?;
            let source = page_source::<ProjectFilter, Project>(source, catalog)?;
            let mut controller: ListController<Project, ProjectFilter> =
                ListController::paged(filter.into_filter(), site_config.api.projects_page_size);
            let request = controller.start_at(page);
            client::drive(&mut controller, source.as_ref(), request).await;

            let mut lines: Vec<String> = controller
                .meta()
                .and_then(|m| output::format_range(m, "projects"))
                .into_iter()
                .collect();
            let first = controller.meta().map_or(1, output::first_position);
            lines.extend(output::format_projects(controller.items(), first));
            lines.extend(output::format_status(&controller.status(), "projects"));
            output::print_lines(&lines);
        }
        Command::Check => {
            let (site_config, catalog) = setup(&cli.config, catalog_override)?;
            println!("==> Checking {}", cli.config.display());
            output::print_lines(&output::format_check_output(&catalog, &site_config));
            println!("==> Catalog is valid");
        }
    }

    Ok(())
}

/// Load config, start logging, load the catalog.
fn setup(
    config_path: &Path,
    catalog_override: Option<&Path>,
) -> Result<(SiteConfig, Catalog), Box<dyn std::error::Error>> {
    let site_config = config::load_config(config_path)?;
    init_tracing(&site_config.logging);
    let catalog = load_catalog(config_path, catalog_override, &site_config)?;
    Ok((site_config, catalog))
}

/// Load pages the way scrolling would, stopping after `pages` pages or at
/// the end of the list.
async fn browse_products(
    controller: &mut ListController<Product, ProductFilter>,
    source: &dyn PageSource<ProductFilter, Product>,
    pages: usize,
) {
    let mut request = Some(controller.start());
    let mut shown = 0;
    while let Some(next) = request.take() {
        client::drive(controller, source, next).await;
        output::print_lines(&output::format_products(&controller.items()[shown..], shown + 1));
        shown = controller.items().len();
        if controller.page() < pages {
            request = controller.sentinel_visible();
        }
    }
    output::print_lines(&output::format_status(&controller.status(), "products"));
    if !controller.items().is_empty() {
        let facets = controller.facets();
        println!("Categories: {}", facets.categories.join(", "));
        println!("Types: {}", facets.types.join(", "));
    }
}

fn page_source<F, T>(
    args: SourceArgs,
    catalog: Catalog,
) -> Result<Box<dyn PageSource<F, T>>, Box<dyn std::error::Error>>
where
    F: Sync + 'static,
    T: 'static,
    CatalogClient: PageSource<F, T>,
    LocalSource: PageSource<F, T>,
{
    let source: Box<dyn PageSource<F, T>> = match args.url {
        Some(url) => {
            let client = CatalogClient::new(&url)?;
            info!(url = %client.base_url(), "browsing remote catalog");
            Box::new(client)
        }
        None => Box::new(LocalSource::new(Arc::new(catalog))),
    };
    Ok(source)
}

/// The catalog named by `--catalog`, else by the config (relative to the
/// config file's directory), else the built-in one.
fn load_catalog(
    config_path: &Path,
    cli_catalog: Option<&Path>,
    site_config: &SiteConfig,
) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = match (cli_catalog, &site_config.catalog) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(configured)) => {
            let base = config_path.parent().unwrap_or_else(|| Path::new(""));
            Some(base.join(configured))
        }
        (None, None) => None,
    };
    let catalog = match &path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::seed()?,
    };
    let source = path
        .as_deref()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
    info!(
        %source,
        products = catalog.products.len(),
        projects = catalog.projects.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
