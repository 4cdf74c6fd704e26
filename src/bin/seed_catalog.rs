use bigdecimal::BigDecimal;
use quote_budget_rust::{create_pool, db, AppConfig};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

/// 初始目录
const SEED_PRODUCTS: &[(&str, &str)] = &[
    ("Caneta", "2.50"),
    ("Caderno", "15.90"),
    ("Mochila", "129.90"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::load()?;
    let pool = create_pool(&config.database.url).await?;
    db::ensure_schema(&pool).await?;

    for (name, price) in SEED_PRODUCTS {
        db::add_product(&pool, name, &BigDecimal::from_str(price)?).await?;
    }

    let products = db::list_products(&pool).await?;
    info!("目录共 {} 个商品", products.len());
    for product in &products {
        info!("  #{} {} R$ {}", product.id, product.name, product.unit_price.with_scale(2));
    }

    Ok(())
}
