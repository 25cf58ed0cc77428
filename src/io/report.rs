use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::variant::{IndelCall, SnpCall, StrCall};

/// 写出变异报告。
///
/// 格式：`>标题`，随后按固定顺序输出 `>SNP`、`>STR`、`>INS`、`>DEL`
/// 四个小节（每条调用一行 CSV），最后无条件附上 `>CNV`、`>ALU`、
/// `>INV` 三个空占位小节（末尾不带换行）。
pub fn write_report<W: Write>(
    mut w: W,
    title: &str,
    snps: &[SnpCall],
    strs: &[StrCall],
    insertions: &[IndelCall],
    deletions: &[IndelCall],
) -> Result<()> {
    writeln!(w, ">{title}")?;

    writeln!(w, ">SNP")?;
    for snp in snps {
        writeln!(w, "{},{},{}", snp.reference as char, snp.donor as char, snp.pos)?;
    }

    writeln!(w, ">STR")?;
    for call in strs {
        writeln!(w, "{},{}", String::from_utf8_lossy(&call.seq), call.pos)?;
    }

    writeln!(w, ">INS")?;
    for ins in insertions {
        writeln!(w, "{},{}", String::from_utf8_lossy(&ins.seq), ins.pos)?;
    }

    writeln!(w, ">DEL")?;
    for del in deletions {
        writeln!(w, "{},{}", String::from_utf8_lossy(&del.seq), del.pos)?;
    }

    write!(w, ">CNV\n>ALU\n>INV")?;
    Ok(())
}

/// 写报告到文件，标题取输出文件的主名（去扩展名）。
pub fn write_report_file(
    path: &Path,
    snps: &[SnpCall],
    strs: &[StrCall],
    insertions: &[IndelCall],
    deletions: &[IndelCall],
) -> Result<()> {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let f = std::fs::File::create(path)
        .map_err(|e| anyhow::anyhow!("cannot write report to '{}': {}", path.display(), e))?;
    let mut out = std::io::BufWriter::new(f);
    write_report(&mut out, &title, snps, strs, insertions, deletions)?;
    out.flush()?;
    Ok(())
}
