/// 单行抽取结果：数量 + 规范化名称
///
/// `skip` 为 true 表示清洗后名称过短，调用方不应再送去匹配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub quantity: u32,
    pub normalized_name: String,
    pub skip: bool,
}
