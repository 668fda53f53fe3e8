use salary_ledger_rust::{api, service::run_sync_loop, AppConfig, ClientRegistry, LedgerService, LedgerStore, PgLedgerStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式, 级别由 RUST_LOG 控制 (默认 info)
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 账本数据源: 连接失败时降级运行
    let store: Option<Arc<dyn LedgerStore>> = match &config.database.url {
        Some(url) => match PgLedgerStore::connect(url).await {
            Ok(store) => {
                info!("✅ Ledger store connected");
                Some(Arc::new(store))
            }
            Err(e) => {
                error!("❌ Ledger store: {}", e);
                None
            }
        },
        None => {
            warn!("DATABASE_URL not set, running without ledger store");
            None
        }
    };

    // 客户登记簿
    let registry = match ClientRegistry::open(&config.registry.path).await {
        Ok(registry) => {
            info!("✅ Clients registry loaded from {}", config.registry.path);
            Some(Arc::new(registry))
        }
        Err(e) => {
            error!("❌ Clients registry: {}", e);
            None
        }
    };

    let ledger = Arc::new(LedgerService::new(store, Duration::from_secs(config.cache.ttl_secs)));

    // 后台同步
    let sync_task = tokio::spawn(run_sync_loop(
        ledger.clone(),
        Duration::from_secs(config.sync.interval_secs),
    ));

    let app = api::router(api::AppState::new(ledger, registry));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/entries             - ledger snapshot");
    info!("  GET  /api/clients/analytics   - client grouping analytics");
    info!("  GET  /ws                      - live updates");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sync_task.abort();
    info!("🛑 Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
