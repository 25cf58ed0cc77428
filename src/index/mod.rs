pub mod kmer;

pub use kmer::{IndexMeta, KmerIndex, CHUNK, KEY_LENGTH, READ_LENGTH};
