use super::CatalogEntry;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 单行匹配结果
///
/// 未匹配的行仍保留最佳候选及其分数，仅用于诊断，不计入总价。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "nomeBuscado")]
    pub original_line: String,
    #[serde(rename = "nomeNormalizado")]
    pub normalized_name: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "encontrado")]
    pub matched: bool,
    #[serde(rename = "produto", skip_serializing_if = "Option::is_none")]
    pub catalog_entry: Option<CatalogEntry>,
    #[serde(rename = "melhorCandidato", skip_serializing_if = "Option::is_none")]
    pub best_candidate: Option<String>,
    #[serde(rename = "similaridade", skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(
        rename = "valorLinha",
        with = "super::decimal::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub line_amount: Option<BigDecimal>,
}

/// 预算报告：按文档顺序的逐行结果 + 总价
///
/// 只由聚合器构造，构造后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    #[serde(rename = "itens")]
    items: Vec<MatchResult>,
    #[serde(with = "super::decimal")]
    total: BigDecimal,
}

impl BudgetReport {
    pub(crate) fn new(items: Vec<MatchResult>, total: BigDecimal) -> Self {
        Self { items, total }
    }

    pub fn items(&self) -> &[MatchResult] {
        &self.items
    }

    pub fn total(&self) -> &BigDecimal {
        &self.total
    }

    pub fn matched_count(&self) -> usize {
        self.items.iter().filter(|i| i.matched).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.items.len() - self.matched_count()
    }
}
