use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 目录商品 (products)
///
/// 序列化字段名沿用前端约定的 `id/nome/preco`，`preco` 为 JSON 数字。
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco", with = "super::decimal")]
    #[sqlx(rename = "price")]
    pub unit_price: BigDecimal,
}

impl CatalogEntry {
    pub fn new(id: i64, name: impl Into<String>, unit_price: BigDecimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
        }
    }
}
