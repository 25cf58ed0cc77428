pub mod indel;
pub mod mapper;
pub mod sw;

pub use indel::{dedup_indels, extract_indels, IndelSet};
pub use mapper::map_read;
pub use sw::{smith_waterman, Alignment};
