use super::matcher::Candidate;
use crate::models::{BudgetReport, ExtractionResult, MatchResult};
use bigdecimal::{BigDecimal, Zero};

/// 行聚合器：按文档顺序累积逐行结果与总价
#[derive(Debug)]
pub struct LineAggregator {
    items: Vec<MatchResult>,
    total: BigDecimal,
}

impl LineAggregator {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total: BigDecimal::zero(),
        }
    }

    /// 匹配成功：行金额 = 单价 × 数量，并计入总价
    pub fn record_matched(
        &mut self,
        original_line: &str,
        extraction: ExtractionResult,
        candidate: Candidate<'_>,
    ) {
        let entry = candidate.entry;
        let line_amount = &entry.unit_price * &BigDecimal::from(extraction.quantity);
        self.total += &line_amount;

        self.items.push(MatchResult {
            original_line: original_line.to_string(),
            normalized_name: extraction.normalized_name,
            quantity: extraction.quantity,
            matched: true,
            catalog_entry: Some(entry.clone()),
            best_candidate: Some(entry.name.clone()),
            similarity_score: Some(candidate.score),
            line_amount: Some(line_amount),
        });
    }

    /// 未匹配：不计价；有候选时保留候选名与分数用于诊断
    pub fn record_unmatched(
        &mut self,
        original_line: &str,
        extraction: ExtractionResult,
        candidate: Option<Candidate<'_>>,
    ) {
        self.items.push(MatchResult {
            original_line: original_line.to_string(),
            normalized_name: extraction.normalized_name,
            quantity: extraction.quantity,
            matched: false,
            catalog_entry: None,
            best_candidate: candidate.map(|c| c.entry.name.clone()),
            similarity_score: candidate.map(|c| c.score),
            line_amount: None,
        });
    }

    pub fn finish(self) -> BudgetReport {
        BudgetReport::new(self.items, self.total)
    }
}

impl Default for LineAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn extraction(quantity: u32, name: &str) -> ExtractionResult {
        ExtractionResult {
            quantity,
            normalized_name: name.to_string(),
            skip: false,
        }
    }

    #[test]
    fn line_amount_is_unit_price_times_quantity() {
        let caneta = CatalogEntry::new(1, "Caneta", dec("2.50"));
        let mut agg = LineAggregator::new();
        agg.record_matched(
            "3x Caneta Azul",
            extraction(3, "Caneta"),
            Candidate {
                entry: &caneta,
                score: 1.0,
            },
        );
        let report = agg.finish();
        assert_eq!(report.items()[0].line_amount, Some(dec("7.50")));
        assert_eq!(report.total(), &dec("7.50"));
    }

    #[test]
    fn unmatched_lines_do_not_contribute() {
        let caneta = CatalogEntry::new(1, "Caneta", dec("2.50"));
        let caderno = CatalogEntry::new(2, "Caderno", dec("15.90"));
        let mut agg = LineAggregator::new();
        agg.record_matched(
            "Caderno",
            extraction(2, "Caderno"),
            Candidate {
                entry: &caderno,
                score: 1.0,
            },
        );
        agg.record_unmatched(
            "Xilofone",
            extraction(1, "Xilofone"),
            Some(Candidate {
                entry: &caneta,
                score: 0.17,
            }),
        );
        agg.record_unmatched("10 unid azul", extraction(10, ""), None);

        let report = agg.finish();
        assert_eq!(report.total(), &dec("31.80"));
        assert_eq!(report.items().len(), 3);
        assert_eq!(report.items()[1].best_candidate.as_deref(), Some("Caneta"));
        assert_eq!(report.items()[1].similarity_score, Some(0.17));
        assert!(report.items()[1].catalog_entry.is_none());
        assert!(report.items()[2].best_candidate.is_none());
        assert_eq!(report.matched_count(), 1);
    }

    #[test]
    fn all_unmatched_total_is_zero() {
        let mut agg = LineAggregator::new();
        agg.record_unmatched("Xilofone", extraction(1, "Xilofone"), None);
        assert_eq!(agg.finish().total(), &BigDecimal::zero());
    }
}
