use super::rules::RuleTables;

/// 行被判为噪声的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoiseReason {
    /// 去除列表标记后太短
    TooShort,
    /// 命中表头/表尾词
    HeaderTerm(String),
}

/// 行分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Noise(NoiseReason),
    /// 候选商品行，携带去除列表标记后的文本
    Candidate(&'a str),
}

impl LineClass<'_> {
    pub fn is_skip(&self) -> bool {
        matches!(self, LineClass::Noise(_))
    }
}

/// 行分类器：纯函数，结果只取决于 (行, 规则表)
#[derive(Debug, Clone)]
pub struct LineClassifier {
    list_markers: Vec<char>,
    min_line_chars: usize,
    header_terms: Vec<String>,
}

impl LineClassifier {
    pub fn new(rules: &RuleTables) -> Self {
        Self {
            list_markers: rules.list_markers.chars().collect(),
            min_line_chars: rules.min_line_chars,
            header_terms: rules
                .header_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let stripped = line
            .trim_start_matches(|c: char| c.is_whitespace() || self.list_markers.contains(&c))
            .trim_end();

        if stripped.chars().count() < self.min_line_chars {
            return LineClass::Noise(NoiseReason::TooShort);
        }

        let lower = stripped.to_lowercase();
        if let Some(term) = self.header_terms.iter().find(|t| lower.contains(t.as_str())) {
            return LineClass::Noise(NoiseReason::HeaderTerm(term.clone()));
        }

        LineClass::Candidate(stripped)
    }
}
