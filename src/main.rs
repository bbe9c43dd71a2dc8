use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use product_catalog::{
    app::product::{MemoryProductStore, PgProductStore, ProductFactory, ProductService, ProductStore},
    config::{load_config, resolve_config_path, Config, StoreBackend},
    infrastructure::{database::DatabaseManager, logger::init_logging},
    router, AppState,
};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "product-catalog", version, about = "Product catalog HTTP service")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true, env = "APP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 启动 HTTP 服务
    Serve {
        /// 启动前写入的随机产品数量
        #[arg(long, default_value_t = 0)]
        seed: usize,
    },
    /// 执行数据库迁移
    Migrate,
    /// 写入随机产品数据
    Seed {
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
    /// 打印当前生效的配置
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = load_config(config_path.as_deref())?;

    if let Some(Command::Config) = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = init_logging(&config.logging)?;
    match &config_path {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    match cli.command.unwrap_or(Command::Serve { seed: 0 }) {
        Command::Serve { seed } => serve(&config, seed).await,
        Command::Migrate => migrate(&config).await,
        Command::Seed { count } => {
            let service = ProductService::new(open_store(&config).await?);
            seed_products(&service, count).await
        }
        Command::Config => Ok(()),
    }
}

async fn serve(config: &Config, seed: usize) -> anyhow::Result<()> {
    let state = AppState::new(open_store(config).await?);
    if seed > 0 {
        seed_products(&state.product_service, seed).await?;
    }

    let app = router(state, Duration::from_secs(config.http.timeout_seconds));

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 Product catalog running on http://{}", listener.local_addr()?);
    info!("📖 API endpoints:");
    info!("   GET    /api/products      - List products");
    info!("   POST   /api/products      - Create product");
    info!("   GET    /api/products/:id  - Get product");
    info!("   PUT    /api/products/:id  - Update product");
    info!("   DELETE /api/products/:id  - Delete product");
    info!("   GET    /products          - Product list page");
    info!("   GET    /health            - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        bail!("migrations only apply to the postgres backend");
    }
    let db = DatabaseManager::connect(&config.database).await?;
    db.migrate().await?;
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.database.backend {
        StoreBackend::Memory => {
            info!("Using in-memory product store");
            Arc::new(MemoryProductStore::new())
        }
        StoreBackend::Postgres => {
            let db = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.run_migrations {
                db.migrate().await?;
            }
            Arc::new(PgProductStore::new(db.into_pool()))
        }
    };
    Ok(store)
}

async fn seed_products(service: &ProductService, count: usize) -> anyhow::Result<()> {
    let products = ProductFactory::new().make_many(count);
    for product in products {
        service.insert(product).await?;
    }
    info!("Seeded {} products", count);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
