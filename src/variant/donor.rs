use std::collections::HashMap;

use super::{IndelCall, SnpCall, StrCall};

/// 将 SNP 与 INDEL 调用应用回参考序列，重建供体序列。
///
/// 返回供体序列与坐标数组：数组初始化为 `1..len(reference)`（1-based，
/// 与参考自身恒等），插入使之后的条目整体上移插入长度，缺失则下移。
/// 应用顺序固定为 SNP → 插入 → 缺失。
pub fn build_donor(
    reference: &[u8],
    snps: &[SnpCall],
    deletions: &[IndelCall],
    insertions: &[IndelCall],
) -> (Vec<u8>, Vec<i64>) {
    let mut donor = reference.to_vec();
    let mut coords: Vec<i64> = (1..reference.len() as i64).collect();

    for snp in snps {
        if let Some(slot) = donor.get_mut(snp.pos) {
            *slot = snp.donor;
        }
    }

    for ins in insertions {
        let shift = ins.seq.len() as i64;
        for c in coords.iter_mut().skip(ins.pos) {
            *c += shift;
        }
        let at = ins.pos.min(donor.len());
        donor.splice(at..at, ins.seq.iter().copied());
    }

    for del in deletions {
        // 坐标数组给出该参考位置当前在供体中的落点
        let Some(&loc) = coords.get(del.pos) else {
            continue;
        };
        let shift = del.seq.len() as i64;
        for c in coords.iter_mut().skip(del.pos) {
            *c -= shift;
        }
        let start = (loc - 1).max(0) as usize;
        let end = (start + del.seq.len()).min(donor.len());
        if start < end {
            donor.drain(start..end);
        }
    }

    (donor, coords)
}

/// 把在供体上找到的 STR 坐标翻译回参考坐标。
///
/// 在坐标数组中查找该值第一次出现的下标，找不到时容忍 ±1 的漂移，
/// 仍然找不到则放弃该条 STR 而不是估算位置。
pub fn remap_strs(strs: &[StrCall], coords: &[i64]) -> Vec<StrCall> {
    let mut first_index: HashMap<i64, usize> = HashMap::new();
    for (i, &v) in coords.iter().enumerate() {
        first_index.entry(v).or_insert(i);
    }

    let mut remapped = Vec::new();
    for call in strs {
        let p = call.pos as i64;
        let hit = first_index
            .get(&p)
            .or_else(|| first_index.get(&(p + 1)))
            .or_else(|| first_index.get(&(p - 1)));
        if let Some(&idx) = hit {
            remapped.push(StrCall { seq: call.seq.clone(), pos: idx });
        }
    }
    remapped
}
