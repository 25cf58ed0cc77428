use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// 读段固定长度。
pub const READ_LENGTH: usize = 50;
/// 读段被切成的块数，同时是比对时允许的错配预算 + 1。
pub const KEY_LENGTH: usize = 5;
/// 索引键长 = 读段长度 / 块数。
pub const CHUNK: usize = READ_LENGTH / KEY_LENGTH;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 参考序列的 k-mer 哈希索引：
/// - 键为长度 [`CHUNK`] 的子串，值为其所有起始位置（升序）。
/// - 构建一次后通过 bincode 持久化，后续运行直接加载。
#[derive(Debug, Serialize, Deserialize)]
pub struct KmerIndex {
    pub chunk: usize,
    map: HashMap<Vec<u8>, Vec<u32>>,
    pub meta: IndexMeta,
}

impl KmerIndex {
    /// 扫描参考序列，建立 k-mer → 起始位置表。
    pub fn build(reference: &[u8]) -> Self {
        let mut map: HashMap<Vec<u8>, Vec<u32>> = HashMap::new();
        if reference.len() >= CHUNK {
            let total = reference.len() - CHUNK + 1;
            for i in 0..total {
                if i % 100_000 == 0 && i != 0 {
                    println!(
                        "Creating hashed reference map. Completed {:.2} %",
                        100.0 * i as f64 / total as f64
                    );
                }
                map.entry(reference[i..i + CHUNK].to_vec())
                    .or_default()
                    .push(i as u32);
            }
        }
        Self { chunk: CHUNK, map, meta: IndexMeta::default() }
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 该 k-mer 在参考中的全部起始位置（升序），未出现时为 None。
    #[inline]
    pub fn lookup(&self, kmer: &[u8]) -> Option<&[u32]> {
        self.map.get(kmer).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut f = std::fs::File::create(path)?;
        bincode::serialize_into(&mut f, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(f)?;
        Ok(idx)
    }
}
