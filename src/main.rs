use brand_sniper::assigner::{build_assignment, Assigner, BrandAssigner};
use brand_sniper::brands::{flatten, BrandGraph};
use brand_sniper::config::{load_config, AppConfig, TargetConfig};
use brand_sniper::matcher::TitleBrandMatcher;
use brand_sniper::source::{CatalogSource, RecordSource};
use brand_sniper::storage::SqliteStorage;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let source = CatalogSource::new(config.clone(), storage.clone());

    info!("Fetching brand connections...");
    let connections = match source.fetch_connections().await {
        Ok(c) => c,
        Err(e) => {
            error!("Brand connections fetch failed: {}", e);
            return;
        }
    };

    let graph = BrandGraph::from_connections(&connections);
    if graph.is_empty() {
        warn!("No brand connections available, every record will stay unmatched");
    }
    let classes = flatten(&graph);
    info!(
        "Brand graph: {} connections, {} brands, {} equivalence classes",
        connections.len(),
        classes.len(),
        classes.component_count()
    );

    let matcher = TitleBrandMatcher::new(config.rules.clone());
    let assigner = Arc::new(BrandAssigner::new(&classes, &matcher));

    info!("Targets to process: {}", config.targets.len());
    let tasks: Vec<_> = config
        .targets
        .iter()
        .map(|target| process_target(target, &source, assigner.clone(), storage.clone(), &config))
        .collect();
    join_all(tasks).await;

    info!("Brand assignment finished.");
}

/// Runs one source/country slice: fetch candidates, match them, persist the assignments.
async fn process_target(
    target: &TargetConfig,
    source: &CatalogSource,
    assigner: Arc<BrandAssigner>,
    storage: Arc<Mutex<SqliteStorage>>,
    config: &AppConfig,
) {
    info!("Processing target: {} / {}", target.source, target.country_code);

    let records = match source.fetch_candidates(target).await {
        Ok(r) => r,
        Err(e) => {
            warn!("Candidate fetch error for {}: {}", target.source, e);
            return;
        }
    };
    info!("Candidates: {}", records.len());

    let (results, summary) =
        match tokio::task::spawn_blocking(move || assigner.assign_all(&records)).await {
            Ok(out) => out,
            Err(e) => {
                error!("Assignment worker failed: {}", e);
                return;
            }
        };

    let mut saved = 0;
    for result in &results {
        let row = build_assignment(&target.source, &target.country_code, &config.version_key, result);
        if let Err(e) = storage.lock().await.save_assignment(&row) {
            warn!("DB save error for {}: {}", result.source_id, e);
        } else {
            saved += 1;
        }
    }

    info!(
        "Finished {} / {}: processed = {}, skipped = {}, matched = {}, unmatched = {}, saved = {}",
        target.source,
        target.country_code,
        summary.processed,
        summary.skipped,
        summary.matched,
        summary.unmatched,
        saved
    );
}
