// Entry point and high-level CLI flow.
//
// Each subcommand renders one panel:
// - `calc` prices a weight of silver and converts the total.
// - `prices` shows the bucketed historical series and its stats.
// - `sales` shows the state ranking, the simulated monthly series and the
//   map layer.
// - `all` (the default) runs every panel. A failing panel is reported and the
//   others still run; the exit code is non-zero if any panel failed.
use clap::{Args, Parser, Subcommand};
use silver_dash::config::Config;
use silver_dash::currency::{
    self, ExchangeRates, WeightUnit, DEFAULT_CURRENCY, DEFAULT_PRICE_PER_GRAM,
    DEFAULT_WEIGHT_GRAMS, GRAMS_PER_KG,
};
use silver_dash::geo;
use silver_dash::output;
use silver_dash::panel::PanelRun;
use silver_dash::prices;
use silver_dash::purchases;
use silver_dash::reports;
use silver_dash::synthetic::{self, DEFAULT_SEED};
use silver_dash::types::{PriceBucket, SummaryStats};
use silver_dash::util::format_number;
use silver_dash::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "silver_dash")]
#[command(about = "Silver price calculator and state-wise silver sales panels", long_about = None)]
struct Cli {
    /// Historical price CSV (Year, Month, Silver_Price_INR_per_kg)
    #[arg(long, global = true, value_name = "CSV")]
    prices_csv: Option<PathBuf>,

    /// State purchase CSV (State, Silver_Purchased_kg)
    #[arg(long, global = true, value_name = "CSV")]
    purchases_csv: Option<PathBuf>,

    /// Directory for CSV/JSON exports
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print previews only, write no files
    #[arg(long, global = true)]
    no_export: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a weight of silver and convert the total
    Calc(CalcArgs),
    /// Historical price trend for a price bucket
    Prices(PriceArgs),
    /// State ranking, simulated monthly sales and map layer
    Sales(SalesArgs),
    /// Every panel
    All {
        #[command(flatten)]
        calc: CalcArgs,
        #[command(flatten)]
        prices: PriceArgs,
        #[command(flatten)]
        sales: SalesArgs,
    },
}

#[derive(Args, Clone)]
struct CalcArgs {
    /// Weight in `--unit` (defaults to 100 g or 0.1 kg)
    #[arg(long)]
    weight: Option<f64>,

    /// grams or kilograms
    #[arg(long, default_value = "grams")]
    unit: WeightUnit,

    /// Current price per gram in INR
    #[arg(long, default_value_t = DEFAULT_PRICE_PER_GRAM)]
    price_per_gram: f64,

    /// Target currency (USD, EUR, GBP, AED)
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
}

impl Default for CalcArgs {
    fn default() -> Self {
        Self {
            weight: None,
            unit: WeightUnit::Grams,
            price_per_gram: DEFAULT_PRICE_PER_GRAM,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

#[derive(Args, Clone)]
struct PriceArgs {
    /// all, low (<= 20,000), mid (20,000 - 30,000), high (> 30,000), or 0..=3
    #[arg(long, default_value = "all")]
    bucket: PriceBucket,

    /// Rows shown in the console preview
    #[arg(long, default_value_t = 12)]
    preview_rows: usize,
}

impl Default for PriceArgs {
    fn default() -> Self {
        Self {
            bucket: PriceBucket::All,
            preview_rows: 12,
        }
    }
}

#[derive(Args, Clone)]
struct SalesArgs {
    /// Seed for the simulated monthly series
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Skip the boundary download and use centroid bubbles
    #[arg(long)]
    offline: bool,
}

impl Default for SalesArgs {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            offline: false,
        }
    }
}

/// Where panel exports go, if anywhere.
struct ExportTarget(Option<PathBuf>);

impl ExportTarget {
    fn csv<T: serde::Serialize>(&self, file: &str, rows: &[T]) -> Result<()> {
        if let Some(dir) = &self.0 {
            let path = dir.join(file);
            output::write_csv(&path, rows)?;
            println!("(Full table exported to {})\n", path.display());
        }
        Ok(())
    }
}

fn run_calc(args: &CalcArgs) -> Result<()> {
    println!("Silver Price Calculator\n");
    let weight = args.weight.unwrap_or(match args.unit {
        WeightUnit::Grams => DEFAULT_WEIGHT_GRAMS,
        WeightUnit::Kilograms => DEFAULT_WEIGHT_GRAMS / GRAMS_PER_KG,
    });
    let rates = ExchangeRates::fixed();
    let q = currency::quote(&rates, weight, args.unit, args.price_per_gram, &args.currency)?;
    for line in reports::quote_lines(&q) {
        println!("- {}", line);
    }
    println!();
    Ok(())
}

fn run_prices(
    cfg: &Config,
    args: &PriceArgs,
    export: &ExportTarget,
    summary: &mut SummaryStats,
) -> Result<()> {
    println!("Historical Silver Price Trends");
    println!("(Filter: {})\n", args.bucket.label());

    let trend = prices::load_and_filter(&cfg.prices_csv, args.bucket)?;
    let rows = reports::price_rows(&trend);
    output::preview_table_rows(&rows, args.preview_rows);
    println!("{}\n", reports::price_stats_line(&trend));
    export.csv("price_trend.csv", &rows)?;

    summary.prices = Some(reports::generate_price_summary(&trend));
    Ok(())
}

fn run_sales(
    cfg: &Config,
    args: &SalesArgs,
    export: &ExportTarget,
    summary: &mut SummaryStats,
) -> Result<()> {
    println!("Silver Sales Dashboard - India\n");

    let ranking = purchases::rank(&cfg.purchases_csv)?;

    let url = if args.offline {
        None
    } else {
        cfg.boundary_url.as_deref()
    };
    let layer = geo::build_map_layer(url, cfg.fetch_timeout, &ranking.all);
    println!("State-wise Silver Purchase Map ({})\n", layer.kind());
    output::preview_table_rows(&reports::map_rows(&layer), 10);

    println!("Regional Distribution of Silver Purchases\n");
    let all_rows = reports::ranking_rows(&ranking);
    output::preview_table_rows(&all_rows, all_rows.len());
    export.csv("state_ranking.csv", &all_rows)?;

    println!("Top 5 States - Highest Silver Purchases\n");
    let top_rows = reports::state_rank_rows(&ranking.top5);
    output::preview_table_rows(&top_rows, top_rows.len());
    export.csv("top5_states.csv", &top_rows)?;

    let series = synthetic::derive_for_top_states(&ranking.all, args.seed);
    println!(
        "Top 10 States - Monthly Silver Sales ({} data, seed {})\n",
        series.label, series.seed
    );
    let sim_rows = reports::synthetic_rows(&series);
    output::preview_table_rows(&sim_rows, sim_rows.len());
    println!(
        "(Simulated total: {} kg, not measured data)\n",
        format_number(series.total_simulated_kg(), 2)
    );
    export.csv("synthetic_monthly_sales.csv", &sim_rows)?;

    println!("Overall Statistics");
    for line in reports::totals_lines(&ranking) {
        println!("- {}", line);
    }
    println!();

    summary.sales = Some(reports::generate_sales_summary(&ranking, &series, &layer));
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(p) = cli.prices_csv {
        cfg.prices_csv = p;
    }
    if let Some(p) = cli.purchases_csv {
        cfg.purchases_csv = p;
    }
    if let Some(d) = cli.output_dir {
        cfg.output_dir = d;
    }

    let export = if cli.no_export {
        ExportTarget(None)
    } else {
        if let Err(e) = std::fs::create_dir_all(&cfg.output_dir) {
            error!(dir = %cfg.output_dir.display(), error = %e, "cannot create output directory");
            return ExitCode::FAILURE;
        }
        ExportTarget(Some(cfg.output_dir.clone()))
    };

    let command = cli.command.unwrap_or(Commands::All {
        calc: CalcArgs::default(),
        prices: PriceArgs::default(),
        sales: SalesArgs::default(),
    });

    let mut run = PanelRun::new();
    let mut summary = SummaryStats::default();
    match &command {
        Commands::Calc(args) => {
            run.run("calculator", || run_calc(args));
        }
        Commands::Prices(args) => {
            run.run("prices", || run_prices(&cfg, args, &export, &mut summary));
        }
        Commands::Sales(args) => {
            run.run("sales", || run_sales(&cfg, args, &export, &mut summary));
        }
        Commands::All {
            calc,
            prices,
            sales,
        } => {
            run.run("calculator", || run_calc(calc));
            run.run("prices", || run_prices(&cfg, prices, &export, &mut summary));
            run.run("sales", || run_sales(&cfg, sales, &export, &mut summary));
        }
    }

    if let Some(dir) = &export.0 {
        if summary.prices.is_some() || summary.sales.is_some() {
            let path = dir.join("summary.json");
            match output::write_json(&path, &summary) {
                Ok(()) => info!(path = %path.display(), "summary written"),
                Err(e) => {
                    error!(error = %e, "summary write failed");
                    run.record_failure("summary", e.to_string());
                }
            }
        }
    }

    if run.all_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
