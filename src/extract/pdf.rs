use crate::error::{BudgetError, DecodeStage, Result};
use lopdf::Document;
use std::path::Path;
use tracing::{info, warn};

/// 少于这么多非空白字符的 PDF 视为没有文本层
const MIN_TEXT_CHARS: usize = 10;

/// 图片页占比达到该值时整份 PDF 视为扫描件
const SCANNED_PAGE_RATIO: f64 = 0.8;

pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| BudgetError::decode(path, DecodeStage::Read, e.to_string()))?;
    extract_text_from_mem(path, &bytes)
}

/// 先用 lopdf 做结构检查，再用 pdf-extract 取文本
pub fn extract_text_from_mem(path: &Path, bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        BudgetError::decode(path, DecodeStage::Pdf, format!("failed to parse PDF: {e}"))
    })?;

    if looks_like_scanned(&doc) {
        return Err(BudgetError::decode(
            path,
            DecodeStage::Pdf,
            "PDF has no text layer (scanned pages); upload the pages as images for OCR",
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "pdf-extract failed");
        BudgetError::decode(path, DecodeStage::Pdf, format!("text extraction failed: {e}"))
    })?;

    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        return Err(BudgetError::decode(
            path,
            DecodeStage::Pdf,
            format!("PDF text layer is empty ({meaningful} characters)"),
        ));
    }

    info!(path = %path.display(), chars = meaningful, "PDF text extracted");
    Ok(text)
}

/// 页面资源里有图片 XObject 却没有字体，基本就是扫描页
fn looks_like_scanned(doc: &Document) -> bool {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return false;
    }

    let mut image_only_pages = 0;
    for object_id in pages.values() {
        let Ok(page_dict) = doc.get_object(*object_id).and_then(|o| o.as_dict()) else {
            continue;
        };

        let resources = page_dict
            .get(b"Resources")
            .ok()
            .and_then(|r| doc.dereference(r).ok())
            .and_then(|(_, resolved)| resolved.as_dict().ok());

        let has_resource = |key: &[u8]| {
            resources
                .and_then(|res| res.get(key).ok())
                .and_then(|v| doc.dereference(v).ok())
                .and_then(|(_, resolved)| resolved.as_dict().ok())
                .is_some_and(|dict| !dict.is_empty())
        };

        if has_resource(b"XObject") && !has_resource(b"Font") {
            image_only_pages += 1;
        }
    }

    let ratio = image_only_pages as f64 / pages.len() as f64;
    info!(
        total_pages = pages.len(),
        image_only = image_only_pages,
        ratio = %format!("{ratio:.2}"),
        "scanned-page analysis"
    );
    ratio >= SCANNED_PAGE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_pdf_failure() {
        let err = extract_text_from_mem(Path::new("lista.pdf"), b"not a pdf at all").unwrap_err();
        assert!(matches!(
            err,
            BudgetError::Decode {
                stage: DecodeStage::Pdf,
                ..
            }
        ));
    }
}
