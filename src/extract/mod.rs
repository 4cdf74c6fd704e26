//! 文本来源：按扩展名把上传文件解码成行
//!
//! 引擎本身不挑选解码器；这里负责路由，并在解码失败时
//! 以 `BudgetError::Decode` 中止，不进入匹配阶段。

pub mod docx;
pub mod image;
pub mod pdf;
pub mod plain;

pub use image::OcrConfig;

use crate::error::{BudgetError, DecodeStage, Result};
use std::path::Path;
use tracing::info;

/// 支持的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
    Image,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

impl DocumentFormat {
    /// 按扩展名 (不区分大小写) 识别格式
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(DocumentFormat::PlainText),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Ok(DocumentFormat::Image),
            "" => Err(BudgetError::decode(
                path,
                DecodeStage::Routing,
                "file has no extension",
            )),
            other => Err(BudgetError::decode(
                path,
                DecodeStage::Routing,
                format!("unsupported file format: .{other}"),
            )),
        }
    }
}

/// 读取整份文档的文本
pub fn read_text(path: &Path, ocr: &OcrConfig) -> Result<String> {
    let format = DocumentFormat::from_path(path)?;
    info!(path = %path.display(), ?format, "routing document");

    match format {
        DocumentFormat::PlainText => plain::read_text(path),
        DocumentFormat::Pdf => pdf::read_text(path),
        DocumentFormat::Docx => docx::read_text(path),
        DocumentFormat::Image => image::read_text(path, ocr),
    }
}

/// 读取文档并拆成非空行
pub fn read_lines(path: &Path, ocr: &OcrConfig) -> Result<Vec<String>> {
    let text = read_text(path, ocr)?;
    let lines = split_lines(&text);
    info!(path = %path.display(), lines = lines.len(), "text extracted");
    Ok(lines)
}

/// 按换行拆分、去除首尾空白、丢弃空行，保持原顺序
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
