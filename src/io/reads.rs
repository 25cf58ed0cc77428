use anyhow::{anyhow, Result};
use std::io::BufRead;
use std::path::Path;

/// 一对双端读段。长度校验（固定 50）由映射阶段负责，这里只做解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    pub r1: Vec<u8>,
    pub r2: Vec<u8>,
}

/// 读段文件解析器：首行为头部（丢弃），其后每行 `read1,read2`。
pub struct ReadPairReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    header_skipped: bool,
}

impl<R: BufRead> ReadPairReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, header_skipped: false }
    }

    pub fn next_record(&mut self) -> Result<Option<ReadPair>> {
        if self.done {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                return Ok(None);
            }
            if !self.header_skipped {
                self.header_skipped = true;
                continue;
            }
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split(',');
            let r1 = parts.next().unwrap_or("").as_bytes().to_vec();
            let r2 = parts
                .next()
                .ok_or_else(|| anyhow!("reads line without ',' separator: '{}'", line))?
                .as_bytes()
                .to_vec();
            return Ok(Some(ReadPair { r1, r2 }));
        }
    }
}

pub fn read_pairs_file(path: &Path) -> Result<Vec<ReadPair>> {
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow!("cannot open reads file '{}': {}", path.display(), e))?;
    let mut reader = ReadPairReader::new(std::io::BufReader::new(fh));
    let mut pairs = Vec::new();
    while let Some(pair) = reader.next_record()? {
        pairs.push(pair);
    }
    Ok(pairs)
}
