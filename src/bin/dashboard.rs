//! Dashboard Command Line Interface
//!
//! Loads one card against the backend proxy and prints what the card would
//! show.
//!
//! # Usage
//!
//! ```bash
//! dashboard books "dune" --limit 5
//! dashboard cep 01001-000
//! dashboard countries --region Europe --search land
//! dashboard worldbank --income "High income" --all
//! dashboard weather London
//! dashboard news --category technology --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use url::Url;

use api_dashboard::filter::{apply, distinct_facet_values, FacetKind, FilterCriteria, Window};
use api_dashboard::resources::{
    format_cep, format_population, relative_age, Books, BooksQuery, Cep, CepInput, Countries,
    News, NewsCategory, Resource, Weather, WeatherQuery, WorldBank, WorldBankQuery,
    NEWS_DISPLAY_LIMIT, WORLDBANK_INITIAL_DISPLAY,
};
use api_dashboard::{DashboardConfig, Fetcher, HttpFetcher, ResourceBinder, ViewState, ViewStatus};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(version)]
#[command(about = "Query the public API dashboard cards from the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the card payload as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Backend proxy base URL (overrides DASHBOARD_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// YAML configuration file (environment is used when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search books by title or author
    Books {
        query: String,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Look up a Brazilian postal code
    Cep { cep: String },

    /// List countries
    Countries {
        #[arg(short, long)]
        search: Option<String>,

        /// Africa, Americas, Asia, Europe, Oceania or all
        #[arg(short, long)]
        region: Option<String>,
    },

    /// World Bank country classifications
    Worldbank {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        region: Option<String>,

        #[arg(short, long)]
        income: Option<String>,

        /// Show every match instead of the first page
        #[arg(long)]
        all: bool,
    },

    /// Current weather for a city
    Weather { city: String },

    /// Top headlines
    News {
        #[arg(short, long, default_value = "general")]
        category: NewsCategory,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match load_config(&cli) {
        Ok(config) => run(&cli, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DashboardConfig::from_env().context("Invalid DASHBOARD_* environment")?,
    };

    match &cli.base_url {
        Some(raw) => {
            let url = Url::parse(raw).with_context(|| format!("Invalid --base-url '{}'", raw))?;
            Ok(config.with_base_url(url))
        }
        None => Ok(config),
    }
}

async fn run(cli: &Cli, config: &DashboardConfig) -> Result<()> {
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::from_config(config).context("Failed to build HTTP client")?);

    match &cli.command {
        Commands::Books { query, limit } => {
            let params = BooksQuery::new(query).with_limit(*limit);
            let binder = load::<Books>(fetcher, config, params).await?;
            let search = binder.state().payload_or_empty();
            if cli.json {
                return print_json(&search);
            }
            header(Books::NAME, binder.status(), search.books.len());
            for book in &search.books {
                let year = book
                    .first_publish_year
                    .map(|y| format!(" ({})", y))
                    .unwrap_or_default();
                println!("  {}{}", book.title.bold(), year.dimmed());
                if let Some(authors) = book.authors() {
                    println!("    {}", authors);
                }
            }
        }

        Commands::Cep { cep } => {
            let input = CepInput::parse(cep);
            let binder = load::<Cep>(fetcher, config, input.clone()).await?;
            let address = binder.state().payload_or_empty();
            if cli.json {
                return print_json(&address);
            }
            header(Cep::NAME, binder.status(), usize::from(address.is_some()));
            if let Some(address) = address {
                println!("  {}", format_cep(&address.cep).bold());
                for line in [&address.street, &address.complement, &address.neighborhood] {
                    if let Some(line) = line.as_deref().filter(|l| !l.is_empty()) {
                        println!("  {}", line);
                    }
                }
                if let Some(locality) = address.locality() {
                    println!("  {}", locality);
                }
            } else if !input.is_empty() {
                println!("  no address for {}", input.formatted());
            }
        }

        Commands::Countries { search, region } => {
            let binder = load::<Countries>(fetcher, config, ()).await?;
            let list = binder.state().payload_or_empty();
            let criteria = criteria(search, FacetKind::Region, region);
            let view = apply(&list.countries, &criteria, &Window::unbounded());
            if cli.json {
                return print_json(&view.items);
            }
            header(Countries::NAME, binder.status(), view.total_matches);
            for country in &view.items {
                println!(
                    "  {:<32} {:<20} {:>16}",
                    country.name.bold(),
                    country.capital.as_deref().unwrap_or("-"),
                    format_population(country.population)
                );
            }
        }

        Commands::Worldbank {
            search,
            region,
            income,
            all,
        } => {
            let binder = load::<WorldBank>(fetcher, config, WorldBankQuery::default()).await?;
            let payload = binder.state().payload_or_empty();
            let mut criteria = criteria(search, FacetKind::Region, region);
            if let Some(income) = income {
                criteria = criteria.with_facet(FacetKind::IncomeLevel, income.as_str());
            }
            let mut window = Window::new(WORLDBANK_INITIAL_DISPLAY);
            if *all {
                window.toggle();
            }
            let view = apply(&payload.countries, &criteria, &window);
            if cli.json {
                return print_json(&view.items);
            }
            header(WorldBank::NAME, binder.status(), view.total_matches);
            for country in &view.items {
                println!(
                    "  {:<4} {:<32} {}",
                    country.id.dimmed(),
                    country.name.bold(),
                    country.income_level.as_deref().unwrap_or("-")
                );
            }
            if view.hidden() > 0 {
                println!("  ... {} more (use --all)", view.hidden());
            }
            if search.is_none() && region.is_none() {
                let regions = distinct_facet_values(&payload.countries, FacetKind::Region);
                println!("  {} {}", "regions:".dimmed(), regions.join(", "));
            }
        }

        Commands::Weather { city } => {
            let binder = load::<Weather>(fetcher, config, WeatherQuery::new(city)).await?;
            let report = binder.state().payload_or_empty();
            if cli.json {
                return print_json(&report);
            }
            header(Weather::NAME, binder.status(), usize::from(report.is_some()));
            if let Some(report) = report {
                let place = match &report.location.country {
                    Some(country) => format!("{}, {}", report.location.city, country),
                    None => report.location.city.clone(),
                };
                println!("  {}", place.bold());
                println!(
                    "  {:.1}°C  {}",
                    report.current.temperature, report.current.description
                );
                if let Some(humidity) = report.current.humidity {
                    println!("  humidity {:.0}%", humidity);
                }
                if let Some(speed) = report.wind.speed {
                    println!("  wind {:.1} m/s", speed);
                }
            }
        }

        Commands::News {
            category,
            search,
            source,
        } => {
            let binder = load::<News>(fetcher, config, *category).await?;
            let feed = binder.state().payload_or_empty();
            let criteria = criteria(search, FacetKind::Source, source);
            let view = apply(&feed.articles, &criteria, &Window::new(NEWS_DISPLAY_LIMIT));
            if cli.json {
                return print_json(&view.items);
            }
            header(
                &format!("{} / {}", News::NAME, category.label()),
                binder.status(),
                view.total_matches,
            );
            let now = Utc::now();
            for article in &view.items {
                let age = article
                    .published()
                    .map(|at| relative_age(at, now))
                    .unwrap_or_default();
                println!("  {}", article.title.bold());
                println!("    {} {}", article.source.name.cyan(), age.dimmed());
            }
        }
    }

    Ok(())
}

/// Mount a single binder, apply `params` and wait for the answer
async fn load<R: Resource>(
    fetcher: Arc<dyn Fetcher>,
    config: &DashboardConfig,
    params: R::Params,
) -> Result<ResourceBinder<R>> {
    let mut binder = ResourceBinder::<R>::new(fetcher, config);
    binder.set_params(params);
    binder.settle().await;

    if let ViewState::Failed(message) = binder.state() {
        let cause = binder
            .last_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no response".to_string());
        return Err(anyhow!("{} ({})", message, cause));
    }
    Ok(binder)
}

fn criteria(search: &Option<String>, kind: FacetKind, facet: &Option<String>) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();
    if let Some(term) = search {
        criteria = criteria.with_term(term.as_str());
    }
    if let Some(value) = facet {
        criteria = criteria.with_facet(kind, value.as_str());
    }
    criteria
}

fn header(name: &str, status: ViewStatus, count: usize) {
    let status = match status {
        ViewStatus::Ready => "ready".green(),
        ViewStatus::Empty => "empty".yellow(),
        ViewStatus::Failed => "failed".red(),
        ViewStatus::Loading => "loading".blue(),
        ViewStatus::Idle => "idle".dimmed(),
    };
    println!("{} [{}] {} item(s)", name.bold(), status, count);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}
