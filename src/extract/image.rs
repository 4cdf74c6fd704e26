use crate::error::{BudgetError, DecodeStage, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// OCR 配置 (外部 tesseract 命令)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub program: String,
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
            language: "por".to_string(),
        }
    }
}

/// 调用 `tesseract <image> stdout -l <lang>` 识别图片文本
pub fn read_text(path: &Path, ocr: &OcrConfig) -> Result<String> {
    if !path.is_file() {
        return Err(BudgetError::decode(path, DecodeStage::Read, "file not found"));
    }

    info!(path = %path.display(), program = %ocr.program, language = %ocr.language, "running OCR");
    let output = Command::new(&ocr.program)
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(&ocr.language)
        .output()
        .map_err(|e| {
            BudgetError::decode(
                path,
                DecodeStage::Ocr,
                format!("failed to execute {}: {e}", ocr.program),
            )
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BudgetError::decode(
            path,
            DecodeStage::Ocr,
            format!("{} returned {}: {}", ocr.program, output.status, stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_a_read_failure() {
        let err = read_text(Path::new("/nonexistent/foto.png"), &OcrConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::Decode {
                stage: DecodeStage::Read,
                ..
            }
        ));
    }

    #[test]
    fn missing_ocr_program_is_an_ocr_failure() {
        let image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let ocr = OcrConfig {
            program: "definitely-not-an-ocr-binary".to_string(),
            ..OcrConfig::default()
        };
        let err = read_text(image.path(), &ocr).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::Decode {
                stage: DecodeStage::Ocr,
                ..
            }
        ));
    }
}
