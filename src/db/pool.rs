use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    pool_options()
        .connect_with(connect_options(database_url)?)
        .await
}

/// 延迟连接：第一次查询时才建立连接
pub fn create_lazy_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    Ok(pool_options().connect_lazy_with(connect_options(database_url)?))
}

fn connect_options(database_url: &str) -> Result<PgConnectOptions, sqlx::Error> {
    // 目录查询很小，超过 2 秒就记慢查询
    Ok(PgConnectOptions::from_str(database_url)?
        .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(2)))
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
}
