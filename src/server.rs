//! Reusable employee service runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database and
//! migrations, the REST API, the report tasks and graceful shutdown. The
//! CLI binary is a thin wrapper around it.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{
    start_report_tasks, AggregateReconciler, EmployeeService, LogNotifier,
};
use crate::config::AppConfig;
use crate::domain::{EmployeeRepository, EmployeeValidator};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmEmployeeRepository};
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::support::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Start the periodic reports when `[reports] enabled` (default: true).
    pub run_reports: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            run_reports: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running employee service.
pub struct ServerHandle {
    /// Application service, for embedding callers.
    pub service: Arc<EmployeeService>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the REST API is bound to (resolved when configured as 0).
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    report_tasks: Vec<JoinHandle<()>>,
}

/// The global metrics recorder can only be installed once per process.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable, /metrics will be empty");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// 1. Install Prometheus metrics recorder
    /// 2. Connect to database and run migrations
    /// 3. Start the report tasks (if enabled)
    /// 4. Start the REST API (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting employee service...");
        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repository & Service ───────────────────────────────
        let repo: Arc<dyn EmployeeRepository> = Arc::new(SeaOrmEmployeeRepository::new(db.clone()));
        let reconciler = AggregateReconciler::new(EmployeeValidator::new())
            .with_unmatched_phone_policy(app_cfg.reconciler.unmatched_phone);
        let service = Arc::new(EmployeeService::new(repo.clone(), reconciler));
        info!(
            unmatched_phone = ?app_cfg.reconciler.unmatched_phone,
            "Employee service ready"
        );

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Background tasks ───────────────────────────────────
        let report_tasks = if opts.run_reports && app_cfg.reports.enabled {
            start_report_tasks(
                repo,
                Arc::new(LogNotifier),
                app_cfg.reports.schedule(),
                shutdown_signal.clone(),
            )
        } else {
            info!("Periodic reports disabled");
            Vec::new()
        };

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(ApiContext {
            service: service.clone(),
            db: Some(db.clone()),
            prometheus,
        });

        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            service,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
            report_tasks,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown, let in-flight work finish within the configured
    /// timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            report_tasks,
            ..
        } = self;

        let finished = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                for task in report_tasks {
                    if let Err(e) = task.await {
                        error!("Report task panicked: {}", e);
                    }
                }
            })
            .await;
        if !finished {
            warn!("Some tasks were still running at shutdown");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Employee service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down employee service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the API server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
