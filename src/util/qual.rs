//! Phred+33 质量值工具

/// Sanger / Illumina 1.8+ 编码偏移
pub const PHRED_OFFSET: i32 = 33;

/// 超过该值的质量分数视为异常数据
pub const MAX_QSCORE: i32 = 44;

/// FASTA 记录没有质量行，用统一的高分字符代替（'H' = Q39）
pub const HIGH_QSCORE_CHAR: u8 = b'H';

#[inline]
pub fn phred(code: u8) -> i32 {
    code as i32 - PHRED_OFFSET
}

/// 前 `len` 个碱基的质量都落在 [min_qscore, MAX_QSCORE] 内。
/// 质量串短于 `len` 时返回 false。
pub fn window_passes(qual: &[u8], len: usize, min_qscore: i32) -> bool {
    if qual.len() < len {
        return false;
    }
    qual[..len]
        .iter()
        .all(|&q| (min_qscore..=MAX_QSCORE).contains(&phred(q)))
}
