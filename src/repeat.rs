//! 短串联重复（STR）检测：对每种 2..=5 长度的重复单元做精确周期
//! 匹配，块式延伸求真实重复数，并消除旋转别名与近邻冗余。

use std::collections::{HashMap, HashSet};

use crate::util::dna::find_sub;
use crate::variant::StrCall;

/// 连续重复次数达到该值才算一个 STR。
pub const STR_THRESHOLD: usize = 5;
/// 重复单元长度范围。
pub const MIN_UNIT_LEN: usize = 2;
pub const MAX_UNIT_LEN: usize = 5;
/// 旋转别名判定距离：互为旋转的单元起点相距小于该值视为同一重复。
const ROTATION_DISTANCE: usize = 10;

/// 一次检测到的重复：单元、起始位置、真实重复次数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TandemRepeat {
    pub unit: Vec<u8>,
    pub start: usize,
    pub repeats: usize,
}

/// 枚举 {A,C,G,T} 上所有指定长度的单元，字典序（A < C < G < T）。
pub fn unit_combos(len: usize) -> Vec<Vec<u8>> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut combos: Vec<Vec<u8>> = vec![Vec::new()];
    for _ in 0..len {
        let mut next = Vec::with_capacity(combos.len() * 4);
        for prefix in &combos {
            for &b in &BASES {
                let mut unit = prefix.clone();
                unit.push(b);
                next.push(unit);
            }
        }
        combos = next;
    }
    combos
}

/// 单元左旋 n 位。
pub fn rotate(unit: &[u8], n: usize) -> Vec<u8> {
    let n = n % unit.len().max(1);
    let mut out = unit[n..].to_vec();
    out.extend_from_slice(&unit[..n]);
    out
}

/// 非重叠地找出 pattern 的所有出现位置（从左到右扫描）。
fn find_non_overlapping(seq: &[u8], pattern: &[u8]) -> Vec<usize> {
    let mut hits = Vec::new();
    let mut from = 0usize;
    while let Some(p) = find_sub(&seq[from..], pattern) {
        hits.push(from + p);
        from += p + pattern.len();
        if from >= seq.len() {
            break;
        }
    }
    hits
}

/// 检测序列中的全部 STR（参考或重建的供体均可）。
pub fn find_tandem_repeats(seq: &[u8]) -> Vec<TandemRepeat> {
    let mut found = Vec::new();

    for unit_len in MIN_UNIT_LEN..=MAX_UNIT_LEN {
        println!("Checking STR of length : {unit_len}");
        let combos = unit_combos(unit_len);
        let mut candidates: Vec<TandemRepeat> = Vec::new();

        for unit in &combos {
            let pattern = unit.repeat(STR_THRESHOLD);
            let indices = find_non_overlapping(seq, &pattern);

            // 相邻出现点塌缩成簇，只留每簇最小起点
            let threshold = unit_len * STR_THRESHOLD;
            let mut clean_indices = Vec::new();
            for (k, &idx) in indices.iter().enumerate() {
                if k == 0 || idx - indices[k - 1] > threshold {
                    clean_indices.push(idx);
                }
            }

            // 逐块延伸，数出真实重复次数
            for start in clean_indices {
                let mut cur = start;
                let mut repeats = 0;
                while seq.get(cur..cur + unit_len) == Some(unit.as_slice()) {
                    repeats += 1;
                    cur += unit_len;
                }
                candidates.push(TandemRepeat { unit: unit.clone(), start, repeats });
            }
        }

        found.extend(dedup_rotations(candidates));
    }

    found
}

/// 旋转别名消解：互为旋转的单元在相距 10 以内标记同一物理重复时，
/// 只保留起点更早的那条；起点相同则保留字典序在前的单元。
fn dedup_rotations(candidates: Vec<TandemRepeat>) -> Vec<TandemRepeat> {
    let mut by_unit: HashMap<&[u8], Vec<(usize, usize)>> = HashMap::new();
    for (order, c) in candidates.iter().enumerate() {
        by_unit.entry(c.unit.as_slice()).or_default().push((c.start, order));
    }

    let mut kept = Vec::new();
    'outer: for (order, c) in candidates.iter().enumerate() {
        for com in 1..c.unit.len() {
            let rot = rotate(&c.unit, com);
            if rot == c.unit {
                continue;
            }
            if let Some(others) = by_unit.get(rot.as_slice()) {
                for &(start, other_order) in others {
                    if c.start.abs_diff(start) < ROTATION_DISTANCE
                        && (start < c.start || (start == c.start && other_order < order))
                    {
                        continue 'outer;
                    }
                }
            }
        }
        kept.push(c.clone());
    }
    kept
}

/// 后处理：展开为字面重复串，去掉相邻重复，塌缩连续位置簇，
/// 每个保留位置只取第一条。
pub fn preprocess_tandems(repeats: &[TandemRepeat]) -> Vec<StrCall> {
    println!("Preprocessing tandem repeats - removing outliers");

    let mut expanded: Vec<(Vec<u8>, usize)> = repeats
        .iter()
        .map(|r| (r.unit.repeat(r.repeats), r.start))
        .collect();
    expanded.dedup();

    // 位置按升序分段：连续递增 1 的归为一簇，取簇首
    let mut indices: Vec<usize> = expanded.iter().map(|(_, p)| *p).collect();
    indices.sort_unstable();
    let mut unique_indices: HashSet<usize> = HashSet::new();
    let mut cluster_first: Option<usize> = None;
    let mut prev: Option<usize> = None;
    for &idx in &indices {
        match prev {
            Some(p) if idx == p + 1 => {}
            _ => cluster_first = Some(idx),
        }
        if let Some(first) = cluster_first {
            unique_indices.insert(first);
        }
        prev = Some(idx);
    }

    let mut out = Vec::new();
    for (seq, pos) in expanded {
        if unique_indices.remove(&pos) {
            out.push(StrCall { seq, pos });
        }
    }
    out
}

/// 检测 + 后处理的组合入口。
pub fn get_tandem_repeats(seq: &[u8]) -> Vec<StrCall> {
    println!("Getting short tandem repeats");
    preprocess_tandems(&find_tandem_repeats(seq))
}
