/// 比对中使用的 gap 占位符。
pub const GAP: u8 = b'-';

/// 反转序列（注意：不是反向互补，流水线刻意只做反转）。
#[inline]
pub fn reverse(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().copied().collect()
}

/// 在 haystack 中查找 needle 第一次出现的位置。
/// 空 needle 约定命中位置 0。
pub fn find_sub(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// 清洗输入序列：去空白并转大写。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect()
}
