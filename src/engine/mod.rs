pub mod aggregator;
pub mod classifier;
pub mod extractor;
pub mod matcher;
pub mod rules;
pub mod similarity;

pub use aggregator::LineAggregator;
pub use classifier::{LineClass, LineClassifier, NoiseReason};
pub use extractor::QuantityExtractor;
pub use matcher::{Candidate, CatalogMatcher, MatchingConfig, TieBreak};
pub use rules::{OcrRepair, RuleTables};
pub use similarity::{dice_coefficient, DiceBigram, SimilarityMetric};

use crate::error::Result;
use crate::models::{BudgetReport, CatalogEntry};
use std::sync::Arc;

/// 行抽取 + 模糊目录匹配引擎
///
/// 同步、单线程地按文档顺序处理每一行。引擎本身不可变，
/// 可以放在 `Arc` 里被多个请求共享；每次 `process` 调用都使用
/// 调用方传入的目录快照，调用之间没有共享状态。
#[derive(Clone)]
pub struct BudgetEngine {
    classifier: LineClassifier,
    extractor: QuantityExtractor,
    matching: MatchingConfig,
    metric: Arc<dyn SimilarityMetric>,
}

impl BudgetEngine {
    pub fn new(rules: &RuleTables, matching: MatchingConfig) -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(rules),
            extractor: QuantityExtractor::new(rules)?,
            matching,
            metric: Arc::new(DiceBigram),
        })
    }

    /// 替换相似度度量
    pub fn with_metric(mut self, metric: Arc<dyn SimilarityMetric>) -> Self {
        self.metric = metric;
        self
    }

    /// 处理一份文档的全部行
    ///
    /// 目录为空时在处理任何一行之前返回 `EmptyCatalog`。
    /// 噪声行不进入报告；名称过短的候选行记为未匹配，不参与打分。
    pub fn process<I, S>(&self, lines: I, catalog: &[CatalogEntry]) -> Result<BudgetReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matcher = CatalogMatcher::new(catalog, self.matching, self.metric.as_ref())?;
        let mut aggregator = LineAggregator::new();
        let mut noise_lines = 0usize;

        for line in lines {
            let line = line.as_ref();

            let candidate = match self.classifier.classify(line) {
                LineClass::Noise(reason) => {
                    tracing::debug!(line, ?reason, "line skipped as noise");
                    noise_lines += 1;
                    continue;
                }
                LineClass::Candidate(text) => text,
            };

            let extraction = self.extractor.extract(candidate);
            if extraction.skip {
                tracing::debug!(line, name = %extraction.normalized_name, "name too short after cleanup");
                aggregator.record_unmatched(line, extraction, None);
                continue;
            }

            let best = matcher.best_match(&extraction.normalized_name);
            if matcher.is_accepted(&best) {
                tracing::debug!(
                    "✔ \"{}\" | similar to | \"{}\" ({:.0}%)",
                    extraction.normalized_name,
                    best.entry.name,
                    best.score * 100.0
                );
                aggregator.record_matched(line, extraction, best);
            } else {
                tracing::debug!(
                    "✘ \"{}\" | similar to | \"{}\" ({:.0}%) - low confidence",
                    extraction.normalized_name,
                    best.entry.name,
                    best.score * 100.0
                );
                aggregator.record_unmatched(line, extraction, Some(best));
            }
        }

        let report = aggregator.finish();
        tracing::info!(
            catalog = matcher.len(),
            matched = report.matched_count(),
            unmatched = report.unmatched_count(),
            noise = noise_lines,
            total = %report.total(),
            "budget computed"
        );
        Ok(report)
    }
}

/// 使用默认规则表和默认阈值处理
pub fn process<I, S>(lines: I, catalog: &[CatalogEntry]) -> Result<BudgetReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    BudgetEngine::new(&RuleTables::default(), MatchingConfig::default())?.process(lines, catalog)
}
