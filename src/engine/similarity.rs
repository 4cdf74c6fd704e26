use std::collections::HashMap;

/// 字符串相似度度量，返回 [0, 1]
pub trait SimilarityMetric: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// 字符二元组 Dice 系数 (默认度量)
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceBigram;

impl SimilarityMetric for DiceBigram {
    fn score(&self, a: &str, b: &str) -> f64 {
        dice_coefficient(a, b)
    }
}

/// 2 × |共享二元组| / (|bigrams(A)| + |bigrams(B)|)
///
/// 不区分大小写，先去掉空白；共享二元组按多重集计数。
/// 完全相同记 1，任一方不足两个字符记 0。
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a = fold(a);
    let b = fold(b);

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *first.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = first.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / ((a.len() - 1) + (b.len() - 1)) as f64
}

fn fold(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
