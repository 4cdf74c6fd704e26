use quote_budget_rust::{api, create_pool, db, AppConfig, BudgetEngine, BudgetService};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式，RUST_LOG 可调整级别
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池并确保表存在
    let pool = create_pool(&config.database.url).await?;
    db::ensure_schema(&pool).await?;
    info!("Database pool created");

    // 上传目录
    tokio::fs::create_dir_all(&config.upload.dir).await?;

    // 创建预算服务
    let engine = BudgetEngine::new(&config.rules, config.matching)?;
    let service = BudgetService::new(pool, engine, config.ocr.clone());
    let state = api::AppState::new(service, config.upload.dir.clone());

    // 构建路由
    let app = api::router(state, config.upload.max_bytes);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /health");
    info!("  POST /api/orcamento  (multipart field '{}')", api::UPLOAD_FIELD);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
