use anyhow::Result;
use std::io::{BufRead, Write};

use crate::io::fastq::{FastqReader, FastqRecord};
use crate::util::qual::phred;

/// 修剪后短于该长度的读段会被替换为全 N，保留记录以维持双端文件的配对
pub const MIN_TRIMMED_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct TrimOptions {
    pub min_qscore: i32,
    /// 只保留 header 中的 read ID，'+' 行置空
    pub slim: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimStats {
    pub reads: u64,
    pub trimmed_bases: u64,
    pub masked_reads: u64,
}

/// 先修剪 3' 端（第一个碱基不参与），再修剪 5' 端。
/// 返回被修剪掉的碱基数；读段过短时改写为 N 并返回 `None`。
pub fn trim_record(rec: &mut FastqRecord, opts: &TrimOptions) -> Option<usize> {
    let len = rec.qual.len();
    let low = |q: u8| phred(q) < opts.min_qscore;

    let three = rec.qual.iter().skip(1).rev().take_while(|&&q| low(q)).count();
    rec.seq.truncate(len - three);
    rec.qual.truncate(len - three);

    let five = rec.qual.iter().take_while(|&&q| low(q)).count();
    rec.seq.drain(..five);
    rec.qual.drain(..five);

    if opts.slim {
        rec.header = rec.id().to_string();
        rec.plus.clear();
    }

    if rec.seq.len() < MIN_TRIMMED_LENGTH {
        rec.seq = vec![b'N'; MIN_TRIMMED_LENGTH];
        rec.qual = vec![b'#'; MIN_TRIMMED_LENGTH];
        return None;
    }
    Some(three + five)
}

pub fn trim_low_quality_bases<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    opts: &TrimOptions,
) -> Result<TrimStats> {
    let mut reader = FastqReader::new(reader);
    let mut stats = TrimStats::default();
    while let Some(mut rec) = reader.next_record()? {
        stats.reads += 1;
        let before = rec.seq.len() as u64;
        match trim_record(&mut rec, opts) {
            Some(n) => stats.trimmed_bases += n as u64,
            None => {
                stats.masked_reads += 1;
                stats.trimmed_bases += before;
            }
        }
        rec.write_to(out)?;
    }
    Ok(stats)
}
