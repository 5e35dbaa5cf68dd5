mod analytics;
mod app;
mod audit;
mod config;
mod data;
mod error;
mod event;
mod orchestrator;
mod query;
mod remote;
mod session;
mod theme;
mod ui;

use app::AccuQueryApp;
use audit::store::{FileStore, KeyValueStore};
use audit::AuditLogger;
use clap::Parser;
use config::{Args, Config};
use data::MockDataset;
use eframe::egui;
use orchestrator::Orchestrator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use remote::WebhookClient;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accuquery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = Config::try_from(Args::parse())?;
    info!(
        mode = config.mode.as_str(),
        role = %config.role,
        data_dir = %config.data_dir.display(),
        "starting AccuQuery"
    );

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("accuquery-runtime")
        .build()?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
    let audit = AuditLogger::new(Arc::clone(&store));
    let _audit_poller = audit::spawn_poller(
        runtime.handle(),
        store,
        audit.generation(),
        config.audit_poll_interval,
        tx.clone(),
    );

    let webhook = WebhookClient::new(
        config.webhook_url.clone(),
        config.request_timeout,
        tx,
        runtime.handle().clone(),
    )?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = MockDataset::generate(&mut rng, chrono::Local::now().date_naive());
    info!(
        orders = dataset.orders.len(),
        disputes = dataset.disputes.len(),
        "dataset generated"
    );

    let orchestrator = Orchestrator::new(config.mode, config.role, Arc::new(dataset));
    let app = AccuQueryApp::new(rx, orchestrator, audit, webhook);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 900.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AccuQuery AI",
        native_options,
        Box::new(move |creation_context| {
            app.theme().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
