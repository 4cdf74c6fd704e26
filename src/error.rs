use bigdecimal::BigDecimal;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 文档解码所处阶段，用于错误报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// 按扩展名选择解码器
    Routing,
    /// 读取文件字节
    Read,
    /// PDF 文本层提取
    Pdf,
    /// DOCX 解包与 XML 解析
    Docx,
    /// 图片 OCR
    Ocr,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::Routing => write!(f, "routing"),
            DecodeStage::Read => write!(f, "read"),
            DecodeStage::Pdf => write!(f, "pdf"),
            DecodeStage::Docx => write!(f, "docx"),
            DecodeStage::Ocr => write!(f, "ocr"),
        }
    }
}

/// 整个流程的错误类型
///
/// 单行的噪声判定或低置信度都不是错误，只会体现在报告里。
/// 这里的每一种错误都会中止整次运行，不返回部分报告。
#[derive(Error, Debug)]
pub enum BudgetError {
    /// 文档无法读取 (上游前置条件失败)
    #[error("failed to read {} ({stage}): {reason}", path.display())]
    Decode {
        path: PathBuf,
        stage: DecodeStage,
        reason: String,
    },

    /// 目录为空，无法匹配
    #[error("catalog is empty: no products to match against")]
    EmptyCatalog,

    /// 目录快照中存在负单价
    #[error("catalog entry '{name}' has negative unit price {price}")]
    NegativePrice { name: String, price: BigDecimal },

    /// 规则表生成了非法正则
    #[error("invalid rule table: {0}")]
    Rules(#[from] regex::Error),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("csv export: {0}")]
    Csv(#[from] csv::Error),
}

impl BudgetError {
    pub fn decode(path: impl Into<PathBuf>, stage: DecodeStage, reason: impl Into<String>) -> Self {
        BudgetError::Decode {
            path: path.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// "无法读取文档" 与其它失败的区分
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, BudgetError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;
