use crate::db::queries;
use crate::engine::BudgetEngine;
use crate::error::Result;
use crate::extract::{self, OcrConfig};
use crate::models::BudgetReport;
use sqlx::PgPool;
use std::path::{Path, PathBuf};

/// 预算服务：解码文档 -> 读取目录快照 -> 引擎计算
pub struct BudgetService {
    pool: PgPool,
    engine: BudgetEngine,
    ocr: OcrConfig,
}

impl BudgetService {
    pub fn new(pool: PgPool, engine: BudgetEngine, ocr: OcrConfig) -> Self {
        Self { pool, engine, ocr }
    }

    /// 处理一份已落盘的文档
    pub async fn process_file(&self, path: &Path) -> Result<BudgetReport> {
        // 1. 解码文档 (PDF / OCR 都是阻塞操作)
        let lines = self.decode(path.to_path_buf()).await?;
        tracing::info!("文档 {} 解码完成，共 {} 行", path.display(), lines.len());

        // 2. 读取目录快照，本次运行期间不再变化
        let catalog = queries::list_products(&self.pool).await?;
        tracing::info!("目录快照: {} 个商品", catalog.len());

        // 3. 逐行匹配并汇总
        let report = self.engine.process(&lines, &catalog)?;
        tracing::info!(
            "文档 {} 处理完成: 匹配 {} 行, 未匹配 {} 行, 总价 {}",
            path.display(),
            report.matched_count(),
            report.unmatched_count(),
            report.total()
        );
        Ok(report)
    }

    async fn decode(&self, path: PathBuf) -> Result<Vec<String>> {
        let ocr = self.ocr.clone();
        tokio::task::spawn_blocking(move || extract::read_lines(&path, &ocr))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
    }
}
