use crate::align::sw::{smith_waterman, Alignment};
use crate::util::dna::{find_sub, GAP};
use crate::variant::{IndelCall, DEDUP_DISTANCE};

/// 两个单列 gap 被视为一次联合调用的最大间隔（对齐列数）。
const PAIRED_GAP_SPAN: usize = 6;

/// 插入 / 缺失调用的累积状态，替代原先的进程级可变全局。
#[derive(Debug, Default, Clone)]
pub struct IndelSet {
    insertions: Vec<IndelCall>,
    deletions: Vec<IndelCall>,
}

impl IndelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_insertion(&mut self, seq: Vec<u8>, pos: usize) {
        self.insertions.push(IndelCall::new(seq, pos));
    }

    pub fn add_deletion(&mut self, seq: Vec<u8>, pos: usize) {
        self.deletions.push(IndelCall::new(seq, pos));
    }

    /// 按位置排序并去掉相邻完全重复后的插入调用。
    pub fn insertions(&self) -> Vec<IndelCall> {
        sorted_dedup(&self.insertions)
    }

    /// 按位置排序并去掉相邻完全重复后的缺失调用。
    pub fn deletions(&self) -> Vec<IndelCall> {
        sorted_dedup(&self.deletions)
    }
}

fn sorted_dedup(calls: &[IndelCall]) -> Vec<IndelCall> {
    let mut out = calls.to_vec();
    out.sort_by_key(|c| c.pos);
    out.dedup();
    out
}

/// 近邻去重：与上一条保留记录序列相同、或位置相距 ≤ 10 的调用丢弃。
pub fn dedup_indels(calls: &[IndelCall]) -> Vec<IndelCall> {
    let mut kept: Vec<IndelCall> = Vec::new();
    for call in calls {
        match kept.last() {
            Some(prev)
                if prev.seq == call.seq || prev.pos.abs_diff(call.pos) <= DEDUP_DISTANCE => {}
            _ => kept.push(call.clone()),
        }
    }
    kept
}

/// 对一条未比对读段跑局部比对，把 gap 游程转成插入 / 缺失调用。
///
/// 参考侧出现 gap 而读段侧没有 → 供体多出碱基，记为插入（序列取自
/// 读段侧）；读段侧出现 gap 而参考侧没有 → 供体缺少碱基，记为缺失
/// （序列取自参考侧）。比对失败或 gap 形态超出覆盖范围时静默跳过。
pub fn extract_indels(
    read: &[u8],
    reference: &[u8],
    window_start: usize,
    window_end: usize,
    indels: &mut IndelSet,
) {
    let start = window_start.min(reference.len());
    let end = window_end.min(reference.len());
    if start >= end {
        return;
    }
    let window = &reference[start..end];

    let Some(alignment) = smith_waterman(window, read) else {
        return;
    };
    let Alignment { aligned_ref, aligned_read, .. } = alignment;

    let ref_has_gap = aligned_ref.contains(&GAP);
    let read_has_gap = aligned_read.contains(&GAP);

    if ref_has_gap && !read_has_gap {
        if let Some((seq, pos)) = call_from_runs(&aligned_ref, &aligned_read, window, start) {
            indels.add_insertion(seq, pos);
        }
    } else if read_has_gap && !ref_has_gap {
        if let Some((seq, pos)) = call_from_runs(&aligned_read, &aligned_ref, window, start) {
            indels.add_deletion(seq, pos);
        }
    }
}

/// 由带 gap 一侧的游程推导调用：锚定无 gap 一侧在游程前的子串，
/// 在原窗口里定位它，得出绝对参考位置。
fn call_from_runs(
    gapped: &[u8],
    solid: &[u8],
    window: &[u8],
    window_start: usize,
) -> Option<(Vec<u8>, usize)> {
    let runs = gap_runs(gapped);

    match runs.as_slice() {
        [(rs, re)] => {
            let check = &solid[..*rs];
            let i = find_sub(window, check)?;
            let seq = solid[*rs..*re].to_vec();
            Some((seq, i + check.len() + window_start))
        }
        [(s0, e0), (s1, e1)] if s1.abs_diff(*s0) < PAIRED_GAP_SPAN => {
            // 两个相距很近的单列 gap 合并为一次双碱基调用
            if e0 - s0 != 1 || e1 - s1 != 1 {
                return None;
            }
            let check = &solid[..*s0];
            let i = find_sub(window, check)?;
            let seq = solid[s0 + 1..s1 + 1].to_vec();
            let pos = i + check.len() + window_start + seq.len() - 1;
            Some((seq, pos))
        }
        _ => None,
    }
}

/// 线性扫描找出 gap 符号的所有极大游程，区间为 `[start, end)`。
fn gap_runs(seq: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &b) in seq.iter().enumerate() {
        match (b == GAP, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, seq.len()));
    }
    runs
}
