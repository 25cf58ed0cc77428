use crate::util::dna::GAP;

pub const MATCH_AWARD: i32 = 10;
pub const MISMATCH_PENALTY: i32 = -5;
pub const GAP_PENALTY: i32 = -5;

/// 回溯指针：每个格子记录产生其得分的前驱。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pointer {
    /// 路径终点
    Stop,
    /// 消耗参考碱基，读段侧补 gap（来自上方格）
    GapRead,
    /// 消耗读段碱基，参考侧补 gap（来自左方格）
    GapRef,
    /// 对角线：双方都消耗一个碱基
    Diag,
}

/// 局部比对结果：两条等长的带 gap 序列（已恢复从左到右顺序）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub aligned_ref: Vec<u8>,
    pub aligned_read: Vec<u8>,
    pub score: i32,
}

fn match_score(alpha: u8, beta: u8) -> i32 {
    if alpha == beta {
        MATCH_AWARD
    } else if alpha == GAP || beta == GAP {
        GAP_PENALTY
    } else {
        MISMATCH_PENALTY
    }
}

/// Smith-Waterman 局部对齐：`seq1` 为参考窗口，`seq2` 为读段片段。
///
/// DP 表取 `max(0, 左+gap, 上+gap, 对角+match)`，指针优先级为
/// 对角 > 参考侧 gap > 读段侧 gap > 终止；全表最高分（并列取行优先
/// 扫描中最后出现者）作为回溯起点。回溯越界或比对为空时返回 `None`。
pub fn smith_waterman(seq1: &[u8], seq2: &[u8]) -> Option<Alignment> {
    let m = seq1.len();
    let n = seq2.len();
    if m == 0 || n == 0 {
        return None;
    }

    let cols = n + 1;
    let mut score = vec![0i32; (m + 1) * cols];
    let mut pointer = vec![Pointer::Stop; (m + 1) * cols];

    let mut max_score = 0i32;
    let mut max_i = 0usize;
    let mut max_j = 0usize;

    for i in 1..=m {
        for j in 1..=n {
            let diag = score[(i - 1) * cols + (j - 1)] + match_score(seq1[i - 1], seq2[j - 1]);
            let gap_ref = score[i * cols + (j - 1)] + GAP_PENALTY;
            let gap_read = score[(i - 1) * cols + j] + GAP_PENALTY;
            let val = 0.max(gap_ref).max(gap_read).max(diag);

            let idx = i * cols + j;
            score[idx] = val;
            // 后写覆盖先写，得到 对角 > GapRef > GapRead > Stop 的优先级
            let mut p = Pointer::Stop;
            if val == gap_read {
                p = Pointer::GapRead;
            }
            if val == gap_ref {
                p = Pointer::GapRef;
            }
            if val == diag {
                p = Pointer::Diag;
            }
            pointer[idx] = p;

            if val >= max_score {
                max_score = val;
                max_i = i;
                max_j = j;
            }
        }
    }

    // 从最高分格子回溯
    let mut aligned_ref: Vec<u8> = Vec::new();
    let mut aligned_read: Vec<u8> = Vec::new();
    let mut i = max_i;
    let mut j = max_j;

    while pointer[i * cols + j] != Pointer::Stop {
        match pointer[i * cols + j] {
            Pointer::Diag => {
                if i == 0 || j == 0 {
                    return None;
                }
                aligned_ref.push(seq1[i - 1]);
                aligned_read.push(seq2[j - 1]);
                i -= 1;
                j -= 1;
            }
            Pointer::GapRef => {
                if j == 0 {
                    return None;
                }
                aligned_ref.push(GAP);
                aligned_read.push(seq2[j - 1]);
                j -= 1;
            }
            Pointer::GapRead => {
                if i == 0 {
                    return None;
                }
                aligned_ref.push(seq1[i - 1]);
                aligned_read.push(GAP);
                i -= 1;
            }
            Pointer::Stop => unreachable!(),
        }
    }

    if aligned_ref.is_empty() || aligned_read.is_empty() {
        return None;
    }

    aligned_ref.reverse();
    aligned_read.reverse();

    Some(Alignment { aligned_ref, aligned_read, score: max_score })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_align_all_diagonal() {
        let seq = b"ACGTACGTAC";
        let aln = smith_waterman(seq, seq).expect("alignment");
        assert_eq!(aln.score, MATCH_AWARD * seq.len() as i32);
        assert_eq!(aln.aligned_ref, seq);
        assert_eq!(aln.aligned_read, seq);
        assert!(!aln.aligned_ref.contains(&GAP));
        assert!(!aln.aligned_read.contains(&GAP));
    }

    #[test]
    fn single_mismatch_still_full_span() {
        let aln = smith_waterman(b"ACGTACGT", b"ACGAACGT").expect("alignment");
        assert_eq!(aln.aligned_ref.len(), aln.aligned_read.len());
        assert!(!aln.aligned_ref.contains(&GAP));
        assert!(!aln.aligned_read.contains(&GAP));
    }

    #[test]
    fn deletion_from_reference_gaps_read_side() {
        // 读段缺了参考中间的两个碱基
        let reference = b"AAACCCGGGTTT";
        let read = b"AAACCGGTTT";
        let aln = smith_waterman(reference, read).expect("alignment");
        assert!(aln.aligned_read.contains(&GAP));
        assert!(!aln.aligned_ref.contains(&GAP));
    }

    #[test]
    fn insertion_into_read_gaps_reference_side() {
        let reference = b"AAACCCGGGTTT";
        let read = b"AAACCCTTGGGTTT";
        let aln = smith_waterman(reference, read).expect("alignment");
        assert!(aln.aligned_ref.contains(&GAP));
        assert!(!aln.aligned_read.contains(&GAP));
    }

    #[test]
    fn empty_inputs_yield_none() {
        assert!(smith_waterman(b"", b"ACGT").is_none());
        assert!(smith_waterman(b"ACGT", b"").is_none());
    }

    #[test]
    fn disjoint_alphabets_yield_none() {
        assert!(smith_waterman(b"AAAA", b"TTTT").is_none());
    }
}
