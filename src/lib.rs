//! # strfinder-rust
//!
//! 参考引导的供体基因组重建与变异检测器（Rust 实现）。
//!
//! 本 crate 从参考序列与双端短读段出发，重建供体序列并报告变异，
//! 包括：
//!
//! - **索引构建**：参考序列的 k-mer 哈希索引（可持久化缓存）
//! - **读段映射**：分块查找 + 有界错配比对，带反转回退
//! - **SNP 检测**：逐位置错配投票的多数共识
//! - **INDEL 恢复**：Smith-Waterman 局部对齐 + gap 游程提取
//! - **STR 检测**：2..=5 长度单元的精确周期重复搜索
//! - **供体重建**：变异回写参考序列，附带坐标重映射表
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use strfinder_rust::align::map_read;
//! use strfinder_rust::index::KmerIndex;
//! use strfinder_rust::variant::VariationTable;
//!
//! // 构建 k-mer 索引
//! let reference: Vec<u8> = b"ACGTACGTAG".repeat(6);
//! let index = KmerIndex::build(&reference);
//!
//! // 映射一条 50bp 读段并收集错配投票
//! let mut variations = VariationTable::new();
//! if let Some(pos) = map_read(&reference[..50], &index, &reference, &mut variations) {
//!     println!("read mapped at offset {pos}");
//! }
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — 参考 / 读段文件解析与报告输出
//! - [`index`] — k-mer 哈希索引（构建、持久化）
//! - [`align`] — 读段映射、Smith-Waterman 局部对齐、indel 提取
//! - [`variant`] — 变异记录类型、SNP 共识、供体重建与坐标重映射
//! - [`repeat`] — 短串联重复检测与去冗余
//! - [`pipeline`] — 带磁盘缓存的分阶段批处理流水线
//! - [`util`] — 序列反转 / 子串查找等工具函数

pub mod align;
pub mod index;
pub mod io;
pub mod pipeline;
pub mod repeat;
pub mod util;
pub mod variant;
