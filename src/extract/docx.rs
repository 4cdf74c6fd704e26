use crate::error::{BudgetError, DecodeStage, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";

pub fn read_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .map_err(|e| BudgetError::decode(path, DecodeStage::Read, e.to_string()))?;
    extract_text_from_reader(file)
        .map_err(|reason| BudgetError::decode(path, DecodeStage::Docx, reason))
}

/// 从 DOCX 压缩包取出正文纯文本：每个段落一行
pub fn extract_text_from_reader<R: Read + Seek>(reader: R) -> std::result::Result<String, String> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| format!("Failed to read DOCX as ZIP: {}", e))?;
    let xml = read_zip_file(&mut archive, DOCUMENT_XML)?;
    paragraphs_from_xml(&xml)
}

fn read_zip_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> std::result::Result<String, String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| format!("Missing {} in archive: {}", name, e))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("Failed to read {}: {}", name, e))?;
    Ok(content)
}

/// 解析 word/document.xml
///
/// `<w:t>` 内文本拼接，`<w:tab/>` 转为制表符，`<w:br/>` 与段落结束转为换行。
fn paragraphs_from_xml(xml: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(ref e)) if in_text => match e.resolve_char_ref() {
                // 数字字符引用 (&#233; / &#x2022;)
                Ok(Some(ch)) => text.push(ch),
                Ok(None) => text.push_str(entity(&String::from_utf8_lossy(e.as_ref()))),
                Err(err) => return Err(format!("XML parse error: {}", err)),
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn entity(name: &str) -> &'static str {
    match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "",
    }
}
