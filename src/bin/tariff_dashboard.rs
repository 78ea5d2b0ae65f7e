use std::path::PathBuf;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

use tariff_dashboard::{
    CountryRates, DashboardConfig, QueryError, ResolveStatus, TariffRecord, TariffStore, YearlyMean,
    aggregate_yearly_mean, item_name, rates_for_year, resolve_country_rates, search_countries,
};

/// Semiconductor tariff-rate dashboard
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List classification codes, optionally by prefix
    Codes {
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// List selectable countries, optionally filtered by name
    Countries {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show the rates of a code and the ones applicable to a country
    Rates {
        #[arg(long)]
        code: String,
        #[arg(long)]
        country: String,
        /// Defaults to the configured target year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show the yearly mean rate of a code
    Trend {
        #[arg(long)]
        code: String,
    },
}

#[derive(Serialize)]
struct RatesView<'a> {
    code: &'a str,
    year: i32,
    item_name: Option<&'a str>,
    year_rates: Vec<&'a TariffRecord>,
    country: &'a str,
    country_rates: CountryRates<'a>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_toml_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows(rows: &[&TariffRecord]) {
    for row in rows {
        println!("  {:<16} {:<12} {}", row.rate_category, row.rate_category_value, row.rate_percent_raw);
    }
}

fn run_codes(store: &TariffStore, prefix: &str, json: bool) -> Result<()> {
    let search = store.search_codes(prefix)?;
    if json {
        return print_json(&search);
    }
    if search.fell_back {
        println!("No classification code starts with '{}'; showing all codes.", prefix);
    }
    for code in &search.candidates {
        println!("{}", code);
    }
    Ok(())
}

fn run_countries(query: &str, json: bool) -> Result<()> {
    let search = search_countries(query);
    if json {
        return print_json(&search);
    }
    if search.fell_back {
        println!("No country matches '{}'; showing all countries.", query);
    }
    for country in &search.candidates {
        println!("{}", country);
    }
    Ok(())
}

fn run_rates(store: &TariffStore, code: &str, country: &str, year: i32, json: bool) -> Result<()> {
    let table = store.table()?;
    let year_rates = rates_for_year(table, code, year)?;
    let country_rates = resolve_country_rates(table, code, year, country)?;
    let name = item_name(table, code);

    if json {
        return print_json(&RatesView {
            code,
            year,
            item_name: name,
            year_rates,
            country,
            country_rates,
        });
    }

    if !table.contains_code(code) {
        println!("No data for classification code {}.", code);
        return Ok(());
    }
    if let Some(name) = name {
        println!("Item: {}", name);
    }

    println!("{} rates for {}:", year, code);
    if year_rates.is_empty() {
        println!("  No {} data; see the yearly trend for other years.", year);
    } else {
        print_rows(&year_rates);
    }

    println!("Rates applicable to {}:", country);
    match country_rates.status {
        ResolveStatus::Applicable => print_rows(&country_rates.rows),
        ResolveStatus::NoApplicableRate => println!("  No agreement data for {}.", country),
        ResolveStatus::NoRecordsForYear => println!("  No {} data, so country rates cannot be shown.", year),
        ResolveStatus::NotComputable => println!("  The data has no country scope or country list column."),
    }
    Ok(())
}

fn run_trend(store: &TariffStore, code: &str, json: bool) -> Result<()> {
    let trend: Vec<YearlyMean> = aggregate_yearly_mean(store.table()?, code)?;
    if json {
        return print_json(&trend);
    }
    if trend.is_empty() {
        println!("No numeric rates for classification code {}.", code);
        return Ok(());
    }
    println!("{:<6} mean rate (%)", "year");
    for point in &trend {
        println!("{:<6} {:.4}", point.year, point.mean_rate);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    debug!("Using configuration: {:?}", config);
    let store = TariffStore::new(config);

    let result = match &cli.command {
        Command::Codes { prefix } => run_codes(&store, prefix, cli.json),
        Command::Countries { query } => run_countries(query, cli.json),
        Command::Rates { code, country, year } => {
            let year = year.unwrap_or(store.config().target_year);
            run_rates(&store, code.trim(), country.trim(), year, cli.json)
        }
        Command::Trend { code } => run_trend(&store, code.trim(), cli.json),
    };

    if let Err(e) = &result {
        if let Some(QueryError::UnknownCountry(name)) = e.downcast_ref::<QueryError>() {
            bail!("'{}' is not a selectable country; run `countries` for the list", name);
        }
    }
    result
}
