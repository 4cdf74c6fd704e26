use serde::{Deserialize, Serialize};

/// 行首 OCR 数字纠错：整词 `token` 出现在行首时替换为 `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRepair {
    pub token: String,
    pub replacement: String,
}

impl OcrRepair {
    pub fn new(token: &str, replacement: &str) -> Self {
        Self {
            token: token.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// 启发式规则表
///
/// 所有词表都是配置数据，在构造分类器/抽取器时注入，
/// 可以通过 `budget.toml` 的 `[rules]` 段按语言或文档类型调整。
/// 默认值面向葡萄牙语的学校材料清单。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// 行首列表标记字符 (项目符号、破折号、编号标点)
    pub list_markers: String,
    /// 去除标记后的最短行长度 (字符数)
    pub min_line_chars: usize,
    /// 表头/表尾词 (小写子串)
    pub header_terms: Vec<String>,
    pub ocr_repairs: Vec<OcrRepair>,
    /// 数量单位标记：数字 + 标记 = 采购数量
    pub explicit_markers: Vec<String>,
    /// 属性单位标记：数字 + 标记 = 商品属性 (张数、重量、尺寸)
    pub attribute_markers: Vec<String>,
    /// 不区分商品的描述词 (尺寸、颜色、包装)
    pub noise_words: Vec<String>,
    /// 清洗后名称的最短长度
    pub min_name_chars: usize,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            list_markers: "-–—•*·▪●○■□►>.)_=~#".to_string(),
            min_line_chars: 4,
            header_terms: words(&[
                "total",
                "obrigatório",
                "obrigatoria",
                "obrigatória",
                "obrigatorio",
                "ensino fundamental",
                "ensino médio",
                "ensino medio",
                "educação infantil",
                "educacao infantil",
                "série",
                "º ano",
                "° ano",
                "ano letivo",
                "atenção",
                "atencao",
                "aviso",
                "observação",
                "observacao",
                "obs:",
                "importante",
                "escola:",
                "escola municipal",
                "escola estadual",
                "colégio",
                "colegio",
                "lista de materia",
                "material escolar",
                "materiais escolares",
                "aluno",
                "aluna",
                "professor",
                "turma",
                "período",
                "data:",
                "nome:",
                "descrição",
                "descricao",
            ]),
            ocr_repairs: vec![
                OcrRepair::new("l", "1"),
                OcrRepair::new("I", "1"),
                OcrRepair::new("|", "1"),
                OcrRepair::new("Ol", "01"),
                OcrRepair::new("OI", "01"),
                OcrRepair::new("O|", "01"),
                OcrRepair::new("Ql", "01"),
                OcrRepair::new("QI", "01"),
            ],
            explicit_markers: words(&[
                "unidades", "unidade", "unid", "und", "uni", "un", "caixas", "caixa", "cx",
                "pacotes", "pacote", "pcts", "pct", "peças", "peça", "pçs", "pç", "pcs", "pc",
                "x", "pares", "par", "jogos", "jogo", "kits", "kit", "conjuntos", "conjunto",
                "cj", "dúzias", "dúzia", "dz",
            ]),
            attribute_markers: words(&[
                "folhas", "folha", "fls", "fl", "gramas", "grama", "gr", "g", "kg", "mg",
                "litros", "litro", "ml", "l", "metros", "metro", "cm2", "cm", "mm", "m2", "m",
                "pol", "cores",
            ]),
            noise_words: words(&[
                "grande", "grandes", "pequeno", "pequena", "pequenos", "pequenas", "médio",
                "média", "medio", "media", "tamanho", "tam", "azul", "azuis", "vermelho",
                "vermelha", "vermelhos", "vermelhas", "preto", "preta", "pretos", "pretas",
                "verde", "verdes", "amarelo", "amarela", "branco", "branca", "rosa", "roxo",
                "roxa", "laranja", "marrom", "cinza", "colorido", "colorida", "coloridos",
                "coloridas", "sortido", "sortida", "sortidos", "sortidas", "avulso", "avulsa",
                "embalagem", "novo", "nova",
            ]),
            min_name_chars: 3,
        }
    }
}

/// 把词表编译成正则分支：转义、去重、长词优先
///
/// 正则分支是最左优先的，长词在前才能让 `unidades` 先于 `un` 命中。
/// 空词表返回 `None`，对应的规则整体关闭。
pub(crate) fn alternation(list: &[String]) -> Option<String> {
    let mut items: Vec<&str> = list
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    if items.is_empty() {
        return None;
    }
    items.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    items.dedup();
    Some(
        items
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternation_puts_longer_words_first() {
        let list = words(&["un", "unidades", "unid", "un"]);
        assert_eq!(alternation(&list).as_deref(), Some("unidades|unid|un"));
    }

    #[test]
    fn alternation_escapes_metacharacters() {
        let list = words(&["c/", "m2", "a.b"]);
        assert_eq!(alternation(&list).as_deref(), Some(r"a\.b|c/|m2"));
    }

    #[test]
    fn empty_table_disables_rule() {
        assert_eq!(alternation(&[]), None);
        assert_eq!(alternation(&words(&["  "])), None);
    }

    #[test]
    fn rule_tables_deserialize_with_partial_overrides() {
        let tables: RuleTables =
            serde_json::from_str(r#"{ "min_line_chars": 6, "noise_words": ["liso"] }"#).unwrap();
        assert_eq!(tables.min_line_chars, 6);
        assert_eq!(tables.noise_words, vec!["liso".to_string()]);
        assert_eq!(tables.header_terms, RuleTables::default().header_terms);
    }
}
