//! 变异记录类型与各阶段的状态对象。
//!
//! 所有记录都以 0-based 参考坐标为键，并通过 serde 进入缓存文件，
//! 因此字段布局即缓存的稳定格式。

use serde::{Deserialize, Serialize};

pub mod donor;
pub mod snp;

pub use donor::{build_donor, remap_strs};
pub use snp::{call_snps, dedup_snps, VariationTable};

/// 单碱基变异：参考碱基、供体碱基、参考位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnpCall {
    pub reference: u8,
    pub donor: u8,
    pub pos: usize,
}

/// 插入或缺失：变异序列与绝对参考位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndelCall {
    pub seq: Vec<u8>,
    pub pos: usize,
}

/// 短串联重复：展开后的重复串与起始位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrCall {
    pub seq: Vec<u8>,
    pub pos: usize,
}

/// 配对中恰有一端未比对成功时记录的候选读段，
/// 窗口为已比对端位置 ±200（截断到参考范围内）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedRead {
    pub read: Vec<u8>,
    pub start: usize,
    pub end: usize,
}

impl IndelCall {
    pub fn new(seq: Vec<u8>, pos: usize) -> Self {
        Self { seq, pos }
    }
}

/// 近邻去重距离：与上一条保留记录相距不超过该值的同类调用视为重复。
pub const DEDUP_DISTANCE: usize = 10;
