use crate::error::{BudgetError, DecodeStage, Result};
use std::path::Path;
use tracing::warn;

/// 纯文本：优先 UTF-8，非 UTF-8 内容按有损方式转换
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| BudgetError::decode(path, DecodeStage::Read, e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(path = %path.display(), "text file is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_utf8_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "2 unid Caderno\nLápis preto").unwrap();
        let text = read_text(file.path()).unwrap();
        assert!(text.contains("Lápis preto"));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"L\xe1pis\n").unwrap();
        let text = read_text(file.path()).unwrap();
        assert!(text.starts_with('L'));
        assert!(text.contains("pis"));
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let err = read_text(Path::new("/nonexistent/lista.txt")).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::Decode {
                stage: DecodeStage::Read,
                ..
            }
        ));
    }
}
