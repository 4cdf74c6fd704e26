use super::rules::{alternation, OcrRepair, RuleTables};
use crate::error::Result;
use crate::models::ExtractionResult;
use regex::Regex;

/// 数量策略命中：数量 + 去掉数量片段后的剩余文本
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuantityHit {
    quantity: u32,
    residual: String,
}

type QuantityStrategy = fn(&QuantityExtractor, &str) -> Option<QuantityHit>;

/// 按顺序尝试，第一个命中的策略生效；都不命中时数量为 1
const STRATEGIES: &[QuantityStrategy] = &[
    QuantityExtractor::explicit_marker,
    QuantityExtractor::leading_number,
];

/// 数量抽取 + 名称规范化
///
/// 关键点是不把商品属性 (如 "96 fls") 误判为采购数量，
/// 并容忍行首的 OCR 识别噪声。
#[derive(Debug, Clone)]
pub struct QuantityExtractor {
    ocr_repairs: Vec<OcrRepair>,
    /// 尺寸 "50 x 66 cm"，先于数量策略剔除
    dimension: Regex,
    /// 数字 + 数量单位
    explicit: Option<Regex>,
    /// 行首裸数字 + 空白
    leading: Regex,
    /// 行首数字紧跟属性单位
    leading_attribute: Option<Regex>,
    /// 任意位置的数字 + 属性单位
    attribute: Option<Regex>,
    punctuation: Regex,
    noise: Option<Regex>,
    digits: Regex,
    whitespace: Regex,
    min_name_chars: usize,
}

impl QuantityExtractor {
    pub fn new(rules: &RuleTables) -> Result<Self> {
        let explicit = alternation(&rules.explicit_markers)
            .map(|alt| Regex::new(&format!(r"(?i)\b(\d+)\s*(?:{alt})\b")))
            .transpose()?;
        let attribute_alt = alternation(&rules.attribute_markers);
        let leading_attribute = attribute_alt
            .as_ref()
            .map(|alt| Regex::new(&format!(r"(?i)^\d+\s+(?:{alt})\b")))
            .transpose()?;
        let attribute = attribute_alt
            .as_ref()
            .map(|alt| Regex::new(&format!(r"(?i)\b\d+(?:[.,]\d+)?\s*(?:{alt})\b")))
            .transpose()?;
        // 第二个数字后要么紧跟属性单位 ("200cm")，要么是词边界
        let dimension_end = attribute_alt
            .as_ref()
            .map(|alt| format!(r"(?:\s*(?:{alt})\b|\b)"))
            .unwrap_or_else(|| r"\b".to_string());
        let dimension = Regex::new(&format!(
            r"(?i)\b\d+(?:[.,]\d+)?\s*[x×]\s*\d+(?:[.,]\d+)?{dimension_end}"
        ))?;
        let noise = alternation(&rules.noise_words)
            .map(|alt| Regex::new(&format!(r"(?i)\b(?:{alt})\b")))
            .transpose()?;

        Ok(Self {
            ocr_repairs: rules.ocr_repairs.clone(),
            dimension,
            explicit,
            leading: Regex::new(r"^(\d+)\s+")?,
            leading_attribute,
            attribute,
            punctuation: Regex::new(r"[\p{P}\p{S}]")?,
            noise,
            digits: Regex::new(r"\b\d+\b")?,
            whitespace: Regex::new(r"\s+")?,
            min_name_chars: rules.min_name_chars,
        })
    }

    /// 对分类器接受的候选行抽取数量与规范化名称
    pub fn extract(&self, line: &str) -> ExtractionResult {
        let repaired = self.repair_leading_digit(line.trim());
        let repaired = self.dimension.replace_all(&repaired, " ").into_owned();

        let (quantity, residual) = STRATEGIES
            .iter()
            .find_map(|strategy| strategy(self, &repaired))
            .map(|hit| (hit.quantity, hit.residual))
            .unwrap_or_else(|| (1, repaired.clone()));

        let normalized_name = self.normalize(&residual);
        let skip = normalized_name.chars().count() < self.min_name_chars;

        ExtractionResult {
            quantity,
            normalized_name,
            skip,
        }
    }

    /// 行首整词的 OCR 纠错 ("l Caderno" -> "1 Caderno")
    fn repair_leading_digit(&self, line: &str) -> String {
        let Some((first, rest)) = line.split_once(char::is_whitespace) else {
            return line.to_string();
        };
        match self.ocr_repairs.iter().find(|r| r.token == first) {
            Some(repair) => format!("{} {}", repair.replacement, rest.trim_start()),
            None => line.to_string(),
        }
    }

    /// 数字紧跟数量单位 ("2 unid", "3x", "10 cx")
    fn explicit_marker(&self, line: &str) -> Option<QuantityHit> {
        let caps = self.explicit.as_ref()?.captures(line)?;
        let quantity = parse_quantity(caps.get(1)?.as_str())?;
        let whole = caps.get(0)?;
        Some(QuantityHit {
            quantity,
            residual: format!("{} {}", &line[..whole.start()], &line[whole.end()..]),
        })
    }

    /// 行首裸数字，除非后面跟的是属性单位 ("96 fls" 是张数不是数量)
    fn leading_number(&self, line: &str) -> Option<QuantityHit> {
        let caps = self.leading.captures(line)?;
        if self
            .leading_attribute
            .as_ref()
            .is_some_and(|re| re.is_match(line))
        {
            return None;
        }
        let quantity = parse_quantity(caps.get(1)?.as_str())?;
        let whole = caps.get(0)?;
        Some(QuantityHit {
            quantity,
            residual: line[whole.end()..].to_string(),
        })
    }

    /// 残余清洗：属性数值、标点符号、描述词、裸数字、多余空白
    fn normalize(&self, residual: &str) -> String {
        let mut text = residual.to_string();
        if let Some(re) = &self.attribute {
            text = re.replace_all(&text, " ").into_owned();
        }
        text = self.punctuation.replace_all(&text, " ").into_owned();
        if let Some(re) = &self.noise {
            text = re.replace_all(&text, " ").into_owned();
        }
        text = self.digits.replace_all(&text, " ").into_owned();
        // 残留的孤立 OCR 误识别 token ("2 unid I Caderno" 中的 "I")
        self.whitespace
            .replace_all(&text, " ")
            .split(' ')
            .filter(|word| !word.is_empty() && !self.ocr_repairs.iter().any(|r| r.token == *word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 数量至少为 1；溢出的数字视为未命中
fn parse_quantity(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().map(|q| q.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> QuantityExtractor {
        QuantityExtractor::new(&RuleTables::default()).unwrap()
    }

    fn extract(line: &str) -> (u32, String) {
        let r = extractor().extract(line);
        (r.quantity, r.normalized_name)
    }

    #[test]
    fn explicit_unit_marker_is_quantity() {
        assert_eq!(extract("2 unid Caderno"), (2, "Caderno".to_string()));
        assert_eq!(extract("Cola bastão 4 UNIDADES"), (4, "Cola bastão".to_string()));
        assert_eq!(extract("Lápis preto 2 cx"), (2, "Lápis".to_string()));
        assert_eq!(extract("1 pacote Papel sulfite"), (1, "Papel sulfite".to_string()));
    }

    #[test]
    fn multiplier_marker_and_colour_noise() {
        assert_eq!(extract("3x Caneta Azul"), (3, "Caneta".to_string()));
        assert_eq!(extract("Caneta vermelha 2 x"), (2, "Caneta".to_string()));
    }

    #[test]
    fn leading_attribute_is_not_a_quantity() {
        assert_eq!(extract("96 fls Caderno Espiral"), (1, "Caderno Espiral".to_string()));
        assert_eq!(extract("500 g Massa de modelar"), (1, "Massa de modelar".to_string()));
        assert_eq!(extract("12 cores Lápis de cor"), (1, "Lápis de cor".to_string()));
    }

    #[test]
    fn leading_bare_number_is_quantity() {
        assert_eq!(extract("5 Borrachas"), (5, "Borrachas".to_string()));
        assert_eq!(
            extract("2 Caderno brochura 96 folhas"),
            (2, "Caderno brochura".to_string())
        );
    }

    #[test]
    fn attribute_numerics_are_removed_anywhere() {
        assert_eq!(
            extract("Caderno universitário 200fls 10 matérias"),
            (1, "Caderno universitário matérias".to_string())
        );
        assert_eq!(extract("Cola branca 1,5 kg"), (1, "Cola".to_string()));
    }

    #[test]
    fn ocr_confusions_at_line_start() {
        assert_eq!(extract("l Caderno"), (1, "Caderno".to_string()));
        assert_eq!(extract("I Mochila"), (1, "Mochila".to_string()));
        assert_eq!(extract("| Estojo"), (1, "Estojo".to_string()));
        assert_eq!(extract("Ol Tesoura"), (1, "Tesoura".to_string()));
        assert_eq!(extract("Ql unid Régua"), (1, "Régua".to_string()));
        // 只纠正行首独立的 token
        assert_eq!(extract("lápis grafite"), (1, "lápis grafite".to_string()));
    }

    #[test]
    fn dimension_pairs_are_attributes_not_quantities() {
        assert_eq!(extract("Cartolina 50 x 66 cm"), (1, "Cartolina".to_string()));
        assert_eq!(extract("Papel Paraná 80 x 100"), (1, "Papel Paraná".to_string()));
        assert_eq!(extract("Papel crepom 48x200cm"), (1, "Papel crepom".to_string()));
        // 前导数量仍然有效，"x" 后面没有数字时仍是数量单位
        assert_eq!(extract("3 Cartolina 50 x 66 cm"), (3, "Cartolina".to_string()));
        assert_eq!(extract("3x Cartolina"), (3, "Cartolina".to_string()));
    }

    #[test]
    fn stray_ocr_tokens_are_dropped_from_the_name() {
        assert_eq!(extract("2 unid I Caderno"), (2, "Caderno".to_string()));
        assert_eq!(extract("Caderno l"), (1, "Caderno".to_string()));
    }

    #[test]
    fn quantity_is_never_zero() {
        assert_eq!(extract("0 unid Caneta").0, 1);
        assert_eq!(extract("00 Caneta").0, 1);
    }

    #[test]
    fn overflowing_number_falls_back_to_default() {
        assert_eq!(extract("99999999999 Caneta"), (1, "Caneta".to_string()));
    }

    #[test]
    fn punctuation_and_bare_digits_are_stripped() {
        assert_eq!(
            extract("Régua (30 cm) - acrílica!"),
            (1, "Régua acrílica".to_string())
        );
        assert_eq!(extract("Caneta, 2023; nº 7"), (1, "Caneta nº".to_string()));
    }

    #[test]
    fn near_empty_names_are_skipped() {
        let e = extractor();
        assert!(e.extract("10 unid azul").skip);
        assert!(e.extract("2 x 30 cm").skip);
        assert!(!e.extract("2 unid Caderno").skip);
    }

    #[test]
    fn extraction_is_idempotent_on_the_normalized_name() {
        let e = extractor();
        let lines = [
            "2 unid Caderno",
            "96 fls Caderno Espiral",
            "3x Caneta Azul",
            "l Mochila grande",
            "Cola bastão 4 UNIDADES",
            "Régua (30 cm) - acrílica!",
            "5 Borrachas",
            "2 unid I Caderno",
            "Cartolina 50 x 66 cm",
        ];
        for line in lines {
            let first = e.extract(line);
            let second = e.extract(&first.normalized_name);
            assert_eq!(second.quantity, 1, "line {line:?}");
            assert_eq!(second.normalized_name, first.normalized_name, "line {line:?}");
        }
    }

    #[test]
    fn empty_marker_tables_disable_their_strategy() {
        let rules = RuleTables {
            explicit_markers: Vec::new(),
            attribute_markers: Vec::new(),
            ..RuleTables::default()
        };
        let e = QuantityExtractor::new(&rules).unwrap();
        // 没有数量单位时 "2 unid" 由行首数字策略处理
        let r = e.extract("2 unid Caderno");
        assert_eq!(r.quantity, 2);
        assert_eq!(r.normalized_name, "unid Caderno");
        // 没有属性单位时 "96 fls" 被当作数量
        assert_eq!(e.extract("96 fls Caderno").quantity, 96);
    }
}
