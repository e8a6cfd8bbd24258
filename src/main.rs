use actix_web::{App, HttpServer, web};
use clap::Parser;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, filter::LevelFilter};

use job_board::api::{
    health::health_config,
    job::{handlers::job_config, JobService, SharedSavedJobs},
    saved::saved_config,
    validation,
};
use job_board::catalog::JobStore;
use job_board::cli::{self, Cli, Command};
use job_board::config::Config;
use job_board::saved::{FileStore, KeyValueStore, SavedJobs};
use job_board::shutdown::ShutdownCoordinator;

/// File-based logging with daily rotation and level separation, plus console output
///
/// Log files are created as: logs/info.log.2024-12-22, logs/error.log.2024-12-22, etc.
/// The server logs to stdout; one-shot commands keep stdout for their output.
fn init_tracing(log_dir: &Path, console_to_stdout: bool) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = if console_to_stdout {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::WARN)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

fn load_catalog(config: &Config) -> std::io::Result<JobStore> {
    let store = match &config.catalog_path {
        Some(path) => JobStore::from_path(path),
        None => JobStore::embedded(),
    };
    store.map_err(std::io::Error::other)
}

fn open_saved_jobs(config: &Config) -> SharedSavedJobs {
    let store: Box<dyn KeyValueStore> = Box::new(FileStore::new(&config.saved_jobs_path));
    Arc::new(Mutex::new(SavedJobs::load(store)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let serving = matches!(args.command, None | Some(Command::Serve));
    init_tracing(&config.log_dir, serving)?;

    let catalog = Arc::new(load_catalog(&config)?);
    let saved = open_saved_jobs(&config);
    let service = JobService::new(catalog.clone(), saved.clone(), config.page_size);

    match args.command {
        Some(Command::Search(search)) => {
            return cli::run_search(&service, search, &mut std::io::stdout().lock())
                .map_err(|e| std::io::Error::other(e.to_string()));
        }
        Some(Command::Saved { action }) => {
            return cli::run_saved(&service, action, &mut std::io::stdout().lock())
                .map_err(|e| std::io::Error::other(e.to_string()));
        }
        None | Some(Command::Serve) => {}
    }

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Jobs in catalog: {}", catalog.len());
    info!("  - Saved jobs file: {}", config.saved_jobs_path.display());
    info!("  - Page size: {}", config.page_size);
    info!("  - Max payload size: {} bytes", config.max_payload_size);

    let job_service = web::Data::new(service);
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default()
            .limit(max_payload_size);

        let multipart_config = validation::multipart_config()
            .total_limit(max_payload_size);

        App::new()
            .app_data(job_service.clone())
            .app_data(payload_config) // Global payload size limit
            .app_data(multipart_config) // Global multipart/file upload size limit
            .app_data(validation::json_config()) // Global validation config
            .app_data(validation::query_config())
            .configure(health_config) // Health check endpoints
            .configure(job_config)
            .configure(saved_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    // Bind and start the server
    let server = server
        .bind((config.host.as_str(), config.port))?
        .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, saved);

    coordinator.wait_for_shutdown().await
}
