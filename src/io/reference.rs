use anyhow::Result;
use std::io::BufRead;
use std::path::Path;

use crate::util::dna;

/// 读入参考序列文件：首行为头部（丢弃），其余行去空白后拼接。
pub fn read_reference<R: BufRead>(mut reader: R) -> Result<Vec<u8>> {
    let mut seq = Vec::new();
    let mut buf = String::new();
    let mut first_line = true;

    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        if first_line {
            first_line = false;
            continue;
        }
        seq.extend_from_slice(&dna::normalize_seq(buf.as_bytes()));
    }

    Ok(seq)
}

pub fn read_reference_file(path: &Path) -> Result<Vec<u8>> {
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open reference file '{}': {}", path.display(), e))?;
    let seq = read_reference(std::io::BufReader::new(fh))?;
    if seq.is_empty() {
        anyhow::bail!("reference file '{}' contains no sequence", path.display());
    }
    Ok(seq)
}
