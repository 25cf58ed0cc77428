//! 分阶段、可断点续跑的批处理流水线。
//!
//! 每个主要阶段（索引构建、读段映射、indel 检测）先查数据集命名的
//! 磁盘缓存，命中则整段跳过；完成时落盘。缓存齐备时重跑会直接
//! 短路到下一阶段。严格单线程，顺序执行。

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::align::{dedup_indels, extract_indels, map_read, IndelSet};
use crate::index::{IndexMeta, KmerIndex, READ_LENGTH};
use crate::io::reads::ReadPair;
use crate::io::report;
use crate::repeat;
use crate::util::dna;
use crate::variant::{
    build_donor, call_snps, dedup_snps, remap_strs, IndelCall, SnpCall, UnmappedRead,
    VariationTable,
};

/// 未比对读段搜索窗口的半径（围绕已比对端的位置）。
pub const UNMAPPED_WINDOW: usize = 200;

/// 四个缓存文件的位置，按数据集名派生。
#[derive(Debug, Clone)]
pub struct CacheLayout {
    pub hashed: PathBuf,
    pub snps: PathBuf,
    pub unmapped: PathBuf,
    pub indels: PathBuf,
}

impl CacheLayout {
    pub fn new(cache_dir: &Path, dataset: &str) -> Self {
        Self {
            hashed: cache_dir.join(format!("hashed_{dataset}.bin")),
            snps: cache_dir.join(format!("snps_{dataset}.bin")),
            unmapped: cache_dir.join(format!("unmapped_{dataset}.bin")),
            indels: cache_dir.join(format!("indels_{dataset}.bin")),
        }
    }
}

fn dump<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = std::fs::File::create(path)
        .map_err(|e| anyhow::anyhow!("cannot create cache file '{}': {}", path.display(), e))?;
    bincode::serialize_into(&mut f, value)?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open cache file '{}': {}", path.display(), e))?;
    Ok(bincode::deserialize_from(f)?)
}

/// 阶段 0：加载或构建参考索引（带构建元信息）。
pub fn load_or_build_index(
    reference: &[u8],
    reference_file: &str,
    caches: &CacheLayout,
) -> Result<KmerIndex> {
    if caches.hashed.exists() {
        println!("Loading hashed index from {}", caches.hashed.display());
        return KmerIndex::load_from_file(&caches.hashed);
    }
    println!("Creating hashed index from reference");
    let mut index = KmerIndex::build(reference);
    index.set_meta(IndexMeta {
        reference_file: Some(reference_file.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });
    println!("Dumping hashed index at {}", caches.hashed.display());
    index.save_to_file(&caches.hashed)?;
    Ok(index)
}

/// 正向映射失败时用反转读段重试（只反转，不取互补）。
fn map_with_reverse(
    read: &[u8],
    index: &KmerIndex,
    reference: &[u8],
    variations: &mut VariationTable,
) -> (Option<usize>, bool) {
    if let Some(pos) = map_read(read, index, reference, variations) {
        return (Some(pos), false);
    }
    (map_read(&dna::reverse(read), index, reference, variations), true)
}

/// 阶段 1：映射全部读段对，产出 SNP 调用；恰好单端未比对的配对
/// 记入未比对缓存供阶段 2 使用。SNP 缓存命中则整段跳过。
pub fn map_reads_snps(
    pairs: &[ReadPair],
    index: &KmerIndex,
    reference: &[u8],
    caches: &CacheLayout,
) -> Result<Vec<SnpCall>> {
    if caches.snps.exists() {
        println!("Loading SNPs from {}", caches.snps.display());
        return load(&caches.snps);
    }

    println!("Finding SNPs in the donor");
    let mut variations = VariationTable::new();
    let mut unmapped: Vec<UnmappedRead> = Vec::new();

    for (count, pair) in pairs.iter().enumerate() {
        if count % 1000 == 0 && count != 0 {
            println!(
                "Mapping reads to reference. Completed {:.2} %",
                100.0 * count as f64 / pairs.len() as f64
            );
        }

        if pair.r1.len() != READ_LENGTH || pair.r2.len() != READ_LENGTH {
            continue;
        }

        let (pos1, rev1) = map_with_reverse(&pair.r1, index, reference, &mut variations);
        let (pos2, rev2) = map_with_reverse(&pair.r2, index, reference, &mut variations);

        // 恰有一端比对成功：把未比对端（按已比对端的方向整理后再反转）
        // 连同 ±200 的搜索窗口记下来，留给 indel 阶段做局部比对
        let one_sided = match (pos1, pos2) {
            (Some(pos), None) => Some((pos, rev1, &pair.r2)),
            (None, Some(pos)) => Some((pos, rev2, &pair.r1)),
            _ => None,
        };
        if let Some((pos, mapped_rev, mate)) = one_sided {
            let candidate = if mapped_rev { mate.clone() } else { dna::reverse(mate) };
            unmapped.push(UnmappedRead {
                read: candidate,
                start: pos.saturating_sub(UNMAPPED_WINDOW),
                end: (pos + UNMAPPED_WINDOW).min(reference.len()),
            });
        }
    }

    let snps = call_snps(&variations, reference);
    println!("Dumping unmapped reads at {}", caches.unmapped.display());
    dump(&caches.unmapped, &unmapped)?;
    println!("Dumping SNPs at {}", caches.snps.display());
    dump(&caches.snps, &snps)?;
    Ok(snps)
}

/// 阶段 2：对未比对读段做局部比对，提取 indel。
///
/// 返回 `(缺失列表, 插入列表)`。indel 缓存命中直接加载；未比对缓存
/// 不存在（映射阶段从未跑过）是致命错误。
pub fn map_reads_indels(
    reference: &[u8],
    caches: &CacheLayout,
) -> Result<(Vec<IndelCall>, Vec<IndelCall>)> {
    if caches.indels.exists() {
        println!("Loading INDELs from {}", caches.indels.display());
        return load(&caches.indels);
    }

    if !caches.unmapped.exists() {
        anyhow::bail!(
            "unmapped-reads cache '{}' not found: run the mapping stage first",
            caches.unmapped.display()
        );
    }

    println!("Loading unmapped reads from {}", caches.unmapped.display());
    let unmapped: Vec<UnmappedRead> = load(&caches.unmapped)?;
    println!("Checking {} unmapped reads for insertions / deletions", unmapped.len());

    let mut indels = IndelSet::new();
    for (count, record) in unmapped.iter().enumerate() {
        if count % 1000 == 0 && count != 0 {
            println!(
                "Aligning unmapped reads. Completed {:.2} %",
                100.0 * count as f64 / unmapped.len() as f64
            );
        }
        extract_indels(&record.read, reference, record.start, record.end, &mut indels);
    }

    let result = (indels.deletions(), indels.insertions());
    println!("Dumping INDELs at {}", caches.indels.display());
    dump(&caches.indels, &result)?;
    Ok(result)
}

/// 完整流水线：映射 → indel → 供体重建 → STR → 报告。
pub fn run(
    reference_path: &Path,
    reads_path: &Path,
    caches: &CacheLayout,
    out_path: &Path,
) -> Result<()> {
    println!("Reading reference file : {}", reference_path.display());
    let reference = crate::io::reference::read_reference_file(reference_path)?;
    println!("Length of reference sequence : {}", reference.len());

    println!("Reading reads file : {}", reads_path.display());
    let pairs = crate::io::reads::read_pairs_file(reads_path)?;
    println!("Number of paired-end reads : {}", pairs.len());

    let index = load_or_build_index(&reference, &reference_path.to_string_lossy(), caches)?;

    let snps = map_reads_snps(&pairs, &index, &reference, caches)?;
    let snps = dedup_snps(&snps);

    let (deletions, insertions) = map_reads_indels(&reference, caches)?;
    let deletions = dedup_indels(&deletions);
    let insertions = dedup_indels(&insertions);

    println!("Reassembling donor sequence");
    let (donor, coords) = build_donor(&reference, &snps, &deletions, &insertions);

    let strs = repeat::get_tandem_repeats(&donor);
    let strs = remap_strs(&strs, &coords);

    println!("Total number of SNPs : {}", snps.len());
    println!("Total number of INS : {}", insertions.len());
    println!("Total number of DEL : {}", deletions.len());
    println!("Total number of STRs : {}", strs.len());

    report::write_report_file(out_path, &snps, &strs, &insertions, &deletions)?;
    println!("Process completed");
    Ok(())
}

/// 基线模式：直接在参考序列上找 STR，其余小节留空。
pub fn run_baseline(reference_path: &Path, out_path: &Path) -> Result<()> {
    println!("Reading reference file : {}", reference_path.display());
    let reference = crate::io::reference::read_reference_file(reference_path)?;
    println!("Length of reference sequence : {}", reference.len());

    let strs = repeat::get_tandem_repeats(&reference);
    println!("Total number of STRs found : {}", strs.len());

    report::write_report_file(out_path, &[], &strs, &[], &[])?;
    println!("Process completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::StrCall;

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
    fn indel_stage_without_mapping_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let caches = CacheLayout::new(dir.path(), "practice");
        let reference = make_reference(500);
        let err = map_reads_indels(&reference, &caches).unwrap_err();
        assert!(err.to_string().contains("run the mapping stage first"));
    }

    #[test]
    fn snp_cache_short_circuits_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let caches = CacheLayout::new(dir.path(), "practice");
        let cached = vec![SnpCall { reference: b'A', donor: b'G', pos: 3 }];
        dump(&caches.snps, &cached).unwrap();

        let reference = make_reference(500);
        let index = KmerIndex::build(&reference);
        // 即使不给任何读段，也应直接返回缓存内容
        let snps = map_reads_snps(&[], &index, &reference, &caches).unwrap();
        assert_eq!(snps, cached);
    }

    #[test]
    fn mapping_stage_dumps_both_caches() {
        let dir = tempfile::tempdir().unwrap();
        let caches = CacheLayout::new(dir.path(), "practice");
        let reference = make_reference(500);
        let index = KmerIndex::build(&reference);

        let pairs = vec![ReadPair {
            r1: reference[60..60 + READ_LENGTH].to_vec(),
            r2: reference[200..200 + READ_LENGTH].to_vec(),
        }];
        let snps = map_reads_snps(&pairs, &index, &reference, &caches).unwrap();
        assert!(snps.is_empty());
        assert!(caches.snps.exists());
        assert!(caches.unmapped.exists());

        let unmapped: Vec<UnmappedRead> = load(&caches.unmapped).unwrap();
        assert!(unmapped.is_empty());
    }

    #[test]
    fn one_sided_pair_produces_window_record() {
        let dir = tempfile::tempdir().unwrap();
        let caches = CacheLayout::new(dir.path(), "practice");
        let reference = make_reference(500);
        let index = KmerIndex::build(&reference);

        // r1 精确命中 300，r2 两个方向都比不上
        let pairs = vec![ReadPair {
            r1: reference[300..300 + READ_LENGTH].to_vec(),
            r2: vec![b'A'; READ_LENGTH],
        }];
        map_reads_snps(&pairs, &index, &reference, &caches).unwrap();

        let unmapped: Vec<UnmappedRead> = load(&caches.unmapped).unwrap();
        assert_eq!(unmapped.len(), 1);
        assert_eq!(unmapped[0].start, 100);
        assert_eq!(unmapped[0].end, 500);
        // 已比对端为正向，未比对端按反转存储
        assert_eq!(unmapped[0].read, dna::reverse(&vec![b'A'; READ_LENGTH]));
    }

    #[test]
    fn indel_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let caches = CacheLayout::new(dir.path(), "practice");
        let reference = make_reference(500);

        let cached = (
            vec![IndelCall::new(b"AT".to_vec(), 20)],
            vec![IndelCall::new(b"GG".to_vec(), 5)],
        );
        dump(&caches.indels, &cached).unwrap();
        let loaded = map_reads_indels(&reference, &caches).unwrap();
        assert_eq!(loaded, cached);
    }

    #[test]
    fn str_remap_uses_reconstruction_coords() {
        let reference = make_reference(120);
        let insertions = vec![IndelCall::new(b"GG".to_vec(), 10)];
        let (_, coords) = build_donor(&reference, &[], &[], &insertions);
        let strs = vec![StrCall { seq: b"ACACACACAC".to_vec(), pos: 50 }];
        let remapped = remap_strs(&strs, &coords);
        // 供体坐标 50 = 参考坐标 48 处的 1-based 值 + 插入位移
        assert_eq!(remapped.len(), 1);
        assert_eq!(remapped[0].pos, 47);
    }
}
