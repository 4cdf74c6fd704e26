use crate::models::CatalogEntry;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// 建表 (幂等)
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id    BIGSERIAL PRIMARY KEY,
            name  TEXT NOT NULL UNIQUE,
            price NUMERIC(12, 2) NOT NULL CHECK (price >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// 查询全部商品 (一次运行的目录快照，按 id 排序即迭代顺序)
pub async fn list_products(pool: &PgPool) -> Result<Vec<CatalogEntry>, sqlx::Error> {
    sqlx::query_as::<_, CatalogEntry>(
        r#"
        SELECT id, name, price
        FROM products
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 按名称查询商品
pub async fn find_product_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<CatalogEntry>, sqlx::Error> {
    sqlx::query_as::<_, CatalogEntry>(
        r#"
        SELECT id, name, price
        FROM products
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// 新增商品；名称已存在时返回已有记录
pub async fn add_product(
    pool: &PgPool,
    name: &str,
    price: &BigDecimal,
) -> Result<CatalogEntry, sqlx::Error> {
    let inserted = sqlx::query_as::<_, CatalogEntry>(
        r#"
        INSERT INTO products (name, price)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, price
        "#,
    )
    .bind(name)
    .bind(price)
    .fetch_optional(pool)
    .await?;

    if let Some(product) = inserted {
        tracing::info!("[DB] Product added: {} (R$ {})", product.name, product.unit_price.with_scale(2));
        return Ok(product);
    }

    tracing::warn!("[DB] Product already exists: {}. Ignored.", name);
    find_product_by_name(pool, name)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}
