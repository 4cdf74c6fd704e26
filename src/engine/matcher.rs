use super::similarity::SimilarityMetric;
use crate::error::{BudgetError, Result};
use crate::models::CatalogEntry;
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 最高分并列时的取舍规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// 目录迭代顺序中先出现的胜出
    #[default]
    FirstSeen,
    /// 名称字典序最小的胜出
    Lexicographic,
}

/// 匹配参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// 分数严格大于该阈值才算匹配
    pub threshold: f64,
    pub tie_break: TieBreak,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            tie_break: TieBreak::default(),
        }
    }
}

/// 最佳候选 (无论是否通过阈值)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'c> {
    pub entry: &'c CatalogEntry,
    pub score: f64,
}

/// 目录匹配器，持有一次运行的不可变目录快照
pub struct CatalogMatcher<'c> {
    /// 名称 -> 商品，保持目录迭代顺序；重名时保留先出现的
    entries: IndexMap<&'c str, &'c CatalogEntry>,
    first: &'c CatalogEntry,
    config: MatchingConfig,
    metric: &'c dyn SimilarityMetric,
}

impl<'c> CatalogMatcher<'c> {
    /// 空目录在任何一行打分之前就报 `EmptyCatalog`
    pub fn new(
        catalog: &'c [CatalogEntry],
        config: MatchingConfig,
        metric: &'c dyn SimilarityMetric,
    ) -> Result<Self> {
        let Some(first) = catalog.first() else {
            return Err(BudgetError::EmptyCatalog);
        };

        let mut entries = IndexMap::with_capacity(catalog.len());
        for entry in catalog {
            if entry.unit_price < BigDecimal::zero() {
                return Err(BudgetError::NegativePrice {
                    name: entry.name.clone(),
                    price: entry.unit_price.clone(),
                });
            }
            entries.entry(entry.name.as_str()).or_insert(entry);
        }

        Ok(Self {
            entries,
            first,
            config,
            metric,
        })
    }

    /// 对全部目录名打分，返回最高分候选
    pub fn best_match(&self, name: &str) -> Candidate<'c> {
        let mut best = Candidate {
            entry: self.first,
            score: self.metric.score(name, &self.first.name),
        };

        // 第一个索引项就是 first
        for entry in self.entries.values().skip(1).copied() {
            let score = self.metric.score(name, &entry.name);
            let better = score > best.score
                || (score == best.score
                    && self.config.tie_break == TieBreak::Lexicographic
                    && entry.name < best.entry.name);
            if better {
                best = Candidate { entry, score };
            }
        }

        best
    }

    pub fn is_accepted(&self, candidate: &Candidate<'_>) -> bool {
        candidate.score > self.config.threshold
    }

    /// 去重后的目录条目数
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::similarity::DiceBigram;
    use std::str::FromStr;

    fn entry(id: i64, name: &str, price: &str) -> CatalogEntry {
        CatalogEntry::new(id, name, BigDecimal::from_str(price).unwrap())
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![entry(1, "Caneta", "2.50"), entry(2, "Caderno", "15.90")]
    }

    #[test]
    fn plural_matches_singular_entry() {
        let catalog = catalog();
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &DiceBigram).unwrap();
        let best = matcher.best_match("Canetas");
        assert_eq!(best.entry.name, "Caneta");
        assert!(best.score > 0.3);
        assert!(matcher.is_accepted(&best));
    }

    #[test]
    fn unrelated_name_is_rejected_but_keeps_candidate() {
        let catalog = catalog();
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &DiceBigram).unwrap();
        let best = matcher.best_match("Xilofone");
        assert!(best.score <= 0.3);
        assert!(!matcher.is_accepted(&best));
        assert_eq!(best.entry.name, "Caneta");
    }

    #[test]
    fn empty_catalog_fails_up_front() {
        let result = CatalogMatcher::new(&[], MatchingConfig::default(), &DiceBigram);
        assert!(matches!(result, Err(BudgetError::EmptyCatalog)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let catalog = vec![entry(1, "Caneta", "-1.00")];
        let result = CatalogMatcher::new(&catalog, MatchingConfig::default(), &DiceBigram);
        assert!(matches!(result, Err(BudgetError::NegativePrice { .. })));
    }

    #[test]
    fn threshold_is_strictly_greater() {
        struct Fixed(f64);
        impl SimilarityMetric for Fixed {
            fn score(&self, _: &str, _: &str) -> f64 {
                self.0
            }
        }
        let catalog = catalog();
        let at = Fixed(0.3);
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &at).unwrap();
        assert!(!matcher.is_accepted(&matcher.best_match("qualquer")));

        let above = Fixed(0.31);
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &above).unwrap();
        assert!(matcher.is_accepted(&matcher.best_match("qualquer")));
    }

    #[test]
    fn ties_go_to_first_seen_by_default() {
        let catalog = vec![entry(1, "Lápis B", "1.00"), entry(2, "Lápis A", "2.00")];
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &DiceBigram).unwrap();
        let best = matcher.best_match("Lápis");
        assert_eq!(best.entry.id, 1);
    }

    #[test]
    fn lexicographic_tie_break_is_available() {
        let catalog = vec![entry(1, "Lápis B", "1.00"), entry(2, "Lápis A", "2.00")];
        let config = MatchingConfig {
            tie_break: TieBreak::Lexicographic,
            ..MatchingConfig::default()
        };
        let matcher = CatalogMatcher::new(&catalog, config, &DiceBigram).unwrap();
        assert_eq!(matcher.best_match("Lápis").entry.id, 2);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let catalog = vec![entry(1, "Cola", "3.00"), entry(2, "Cola", "9.00")];
        let matcher = CatalogMatcher::new(&catalog, MatchingConfig::default(), &DiceBigram).unwrap();
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.best_match("Cola").entry.id, 1);
    }
}
