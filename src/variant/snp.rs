use std::collections::BTreeMap;

use super::{SnpCall, DEDUP_DISTANCE};

/// 最少支持数：某位置上出现次数达到该值的碱基才会被判为 SNP。
pub const SNP_THRESHOLD: usize = 5;

/// 按参考位置累积错配投票的状态对象。
///
/// 底层用 `BTreeMap` 保证按位置升序遍历，调用结果顺序与报告输出
/// 顺序因此是确定的。
#[derive(Debug, Default, Clone)]
pub struct VariationTable {
    votes: BTreeMap<usize, Vec<u8>>,
}

impl VariationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次错配观测。
    pub fn record(&mut self, pos: usize, base: u8) {
        self.votes.entry(pos).or_default().push(base);
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    #[cfg(test)]
    pub(crate) fn votes_at(&self, pos: usize) -> Option<&[u8]> {
        self.votes.get(&pos).map(Vec::as_slice)
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.votes.iter().map(|(&p, v)| (p, v.as_slice()))
    }
}

/// 多数投票：对每个有观测的位置取出现最多的碱基（并列取先观测到的），
/// 支持数达到 [`SNP_THRESHOLD`] 才产出调用。
pub fn call_snps(table: &VariationTable, reference: &[u8]) -> Vec<SnpCall> {
    let mut snps = Vec::new();
    for (pos, bases) in table.iter() {
        let Some((best, count)) = majority(bases) else {
            continue;
        };
        if count >= SNP_THRESHOLD {
            if let Some(&ref_base) = reference.get(pos) {
                snps.push(SnpCall { reference: ref_base, donor: best, pos });
            }
        }
    }
    snps
}

/// 出现次数最多的碱基；并列时保留最先观测到的那个。
fn majority(bases: &[u8]) -> Option<(u8, usize)> {
    let mut best: Option<(u8, usize)> = None;
    for (i, &b) in bases.iter().enumerate() {
        if bases[..i].contains(&b) {
            continue;
        }
        let count = bases.iter().filter(|&&x| x == b).count();
        match best {
            Some((_, c)) if c >= count => {}
            _ => best = Some((b, count)),
        }
    }
    best
}

/// 近邻去重：丢弃与上一条保留记录位置相距 ≤ 10 的调用。
pub fn dedup_snps(snps: &[SnpCall]) -> Vec<SnpCall> {
    let mut kept: Vec<SnpCall> = Vec::new();
    for snp in snps {
        match kept.last() {
            Some(prev) if prev.pos.abs_diff(snp.pos) <= DEDUP_DISTANCE => {}
            _ => kept.push(*snp),
        }
    }
    kept
}
