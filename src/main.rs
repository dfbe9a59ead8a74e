use clap::Parser;
use serde::Serialize;
use std::{error::Error, fs, path::PathBuf, thread, time::Duration};
use supply_route::{
    algorithms::cost_model::TrafficWeatherCostModel,
    algorithms::optimizer::RouteOptimizer,
    models::RouteSelection,
    routing::{Geocoder, LiveRouteProvider, NoLiveRoutes, NominatimGeocoder, StaticGeocoder, TomTomProvider},
    utils::config::{OptimizerConfig, API_KEY_ENV},
    utils::log::init_logging,
    utils::map::{describe_selection, render_route_map, MapStyle},
    utils::metrics::{assess_efficiency, EfficiencyAssessment, PerKmNormalCost, RouteMetrics},
};

/// Finds the cheapest delivery route from the hospital to one of its suppliers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "optimizer.json")]
    config: PathBuf,

    /// Where to write the route map (PNG)
    #[arg(short, long, default_value = "optimized_route.png")]
    output: PathBuf,

    /// Also write the selection, metrics and efficiency check as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip live routing and resolve addresses from known_locations only
    #[arg(long)]
    offline: bool,

    /// Re-run the optimization every N minutes
    #[arg(long)]
    watch: Option<u64>,

    /// Draw markers and the route without caption, axes or legend
    #[arg(long)]
    no_labels: bool,
}

#[derive(Serialize)]
struct RouteReport<'a> {
    selection: &'a RouteSelection,
    metrics: RouteMetrics,
    efficiency: Option<EfficiencyAssessment>,
}

fn build_geocoder(
    config: &OptimizerConfig,
    offline: bool,
) -> Result<Box<dyn Geocoder>, Box<dyn Error>> {
    let known = StaticGeocoder::new(config.known_points());
    if offline {
        return Ok(Box::new(known));
    }
    let remote = NominatimGeocoder::new(&config.geocoder)?;
    Ok(Box::new(known.with_fallback(Box::new(remote))))
}

fn build_provider(
    config: &OptimizerConfig,
    offline: bool,
) -> Result<Box<dyn LiveRouteProvider>, Box<dyn Error>> {
    if offline {
        log::info!("Offline mode, live routing disabled");
        return Ok(Box::new(NoLiveRoutes));
    }
    match &config.routing.api_key {
        Some(api_key) => Ok(Box::new(TomTomProvider::new(api_key.clone(), &config.routing)?)),
        None => {
            log::warn!("{} is not set, live routing disabled", API_KEY_ENV);
            Ok(Box::new(NoLiveRoutes))
        }
    }
}

fn run_once(optimizer: &RouteOptimizer, cli: &Cli) -> Result<(), Box<dyn Error>> {
    let selection = optimizer.optimize_route();
    if selection.is_feasible() {
        log::info!("Best route cost: {:.2}", selection.cost);
    }
    log::info!("{}", describe_selection(&selection));

    let metrics = RouteMetrics::from_selection(&selection);
    let calculator = PerKmNormalCost::default();
    let efficiency = assess_efficiency(&selection, Some(&calculator));
    if let Some(assessment) = &efficiency {
        if assessment.is_inefficient {
            log::warn!(
                "Current route is significantly affected by traffic or weather (cost {:.2} vs normal {:.2}). Consider adjusting delivery schedules.",
                assessment.actual_cost,
                assessment.normal_cost
            );
        }
    }

    let style = MapStyle {
        show_labels: !cli.no_labels,
        ..MapStyle::default()
    };
    render_route_map(
        &cli.output,
        optimizer.origin(),
        optimizer.suppliers(),
        &selection,
        &style,
    )?;
    log::info!("Route map saved as {}", cli.output.display());

    if let Some(path) = &cli.json {
        let report = RouteReport {
            selection: &selection,
            metrics,
            efficiency,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        log::info!("Route report written to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    // --- Dependency Initialization ---
    let config = OptimizerConfig::load_from_file(&cli.config)?.with_env_overrides();
    let geocoder = build_geocoder(&config, cli.offline)?;
    let provider = build_provider(&config, cli.offline)?;

    let optimizer = RouteOptimizer::from_addresses(
        &config.hospital_address,
        &config.suppliers,
        geocoder.as_ref(),
        Box::new(TrafficWeatherCostModel::new()),
        provider,
    )?
    .with_parallel(config.routing.parallel);
    log::info!(
        "Optimizing over {} suppliers",
        optimizer.suppliers().len()
    );

    // --- Optimization loop ---
    loop {
        match (run_once(&optimizer, &cli), cli.watch) {
            (Ok(()), None) => break,
            (Err(e), None) => return Err(e),
            (result, Some(minutes)) => {
                if let Err(e) = result {
                    log::error!("Optimization run failed: {}", e);
                }
                log::info!("Waiting {} minutes for next optimization...", minutes);
                thread::sleep(Duration::from_secs(minutes * 60));
            }
        }
    }

    Ok(())
}
