use crate::index::{KmerIndex, KEY_LENGTH};
use crate::variant::VariationTable;

/// 将读段映射到参考上，返回推断的起始偏移。
///
/// 读段被切成 [`KEY_LENGTH`] 个连续块，逐块在索引中查精确匹配；
/// 每个候选位置回推读段起点并与等长参考窗口比较，错配数不超过
/// `KEY_LENGTH - 1` 的第一个位置即被接受，所有错配同时投入变异表。
/// 任何块都找不到可接受窗口时返回 `None`。
pub fn map_read(
    read: &[u8],
    index: &KmerIndex,
    reference: &[u8],
    variations: &mut VariationTable,
) -> Option<usize> {
    let chunk = read.len() / KEY_LENGTH;
    if chunk == 0 {
        return None;
    }

    for (i, part) in read.chunks(chunk).enumerate() {
        let Some(candidates) = index.lookup(part) else {
            continue;
        };
        for &candidate in candidates {
            // 回推的起点为负说明该候选不可能容纳整条读段
            let Some(start) = (candidate as usize).checked_sub(i * chunk) else {
                continue;
            };
            let end = (start + read.len()).min(reference.len());
            if start >= end {
                continue;
            }
            let mismatches = mismatch_positions(read, &reference[start..end], start);
            if mismatches.len() <= KEY_LENGTH - 1 {
                for (pos, base) in mismatches {
                    variations.record(pos, base);
                }
                return Some(start);
            }
        }
    }

    None
}

/// 读段与参考窗口的逐碱基比较，返回 (参考位置, 读段碱基) 错配对。
/// 窗口在参考末端被截短时只比较重叠部分。
fn mismatch_positions(read: &[u8], window: &[u8], window_start: usize) -> Vec<(usize, u8)> {
    window
        .iter()
        .zip(read.iter())
        .enumerate()
        .filter(|(_, (r, q))| r != q)
        .map(|(i, (_, &q))| (window_start + i, q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{KmerIndex, READ_LENGTH};

    fn make_reference(len: usize) -> Vec<u8> {
        let bases = [b'A', b'C', b'G', b'T'];
        let mut seq = Vec::with_capacity(len);
        let mut x: u32 = 42;
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            seq.push(bases[(x >> 16) as usize % 4]);
        }
        seq
    }

    #[test]
    fn exact_read_maps_with_no_votes() {
        let reference = make_reference(120);
        let index = KmerIndex::build(&reference);
        let mut table = VariationTable::new();
        let read = reference[5..5 + READ_LENGTH].to_vec();
        assert_eq!(map_read(&read, &index, &reference, &mut table), Some(5));
        assert!(table.is_empty());
    }

    #[test]
    fn offset_zero_is_a_valid_mapping() {
        let reference = make_reference(120);
        let index = KmerIndex::build(&reference);
        let mut table = VariationTable::new();
        let read = reference[..READ_LENGTH].to_vec();
        assert_eq!(map_read(&read, &index, &reference, &mut table), Some(0));
        assert!(table.is_empty());
    }

    #[test]
    fn mismatches_within_budget_are_recorded() {
        let reference = make_reference(120);
        let index = KmerIndex::build(&reference);
        let mut table = VariationTable::new();

        let mut read = reference[5..5 + READ_LENGTH].to_vec();
        let flip = |b: u8| if b == b'A' { b'C' } else { b'A' };
        read[15] = flip(reference[20]);
        read[25] = flip(reference[30]);

        assert_eq!(map_read(&read, &index, &reference, &mut table), Some(5));
        assert_eq!(table.votes_at(20), Some(&[read[15]][..]));
        assert_eq!(table.votes_at(30), Some(&[read[25]][..]));
    }

    #[test]
    fn unmappable_read_returns_none() {
        let reference = make_reference(120);
        let index = KmerIndex::build(&reference);
        let mut table = VariationTable::new();
        let read = vec![b'A'; READ_LENGTH];
        assert_eq!(map_read(&read, &index, &reference, &mut table), None);
        assert!(table.is_empty());
    }

    #[test]
    fn over_budget_window_is_rejected() {
        let reference = make_reference(120);
        let index = KmerIndex::build(&reference);
        let mut table = VariationTable::new();

        // 第一块保持原样以命中索引，其余位置全部破坏
        let mut read = reference[40..40 + READ_LENGTH].to_vec();
        for i in 10..READ_LENGTH {
            read[i] = if reference[40 + i] == b'G' { b'T' } else { b'G' };
        }
        assert_eq!(map_read(&read, &index, &reference, &mut table), None);
    }
}
